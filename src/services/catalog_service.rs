// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SpecialistRepository},
    middleware::{auth::CurrentUser, rbac},
    models::{
        auth::UserRole,
        catalog::{
            CreateServiceMasterPayload, CreateServiceOfferingPayload, ServiceMaster,
            ServiceOffering, ServiceOfferingDetail, UpdateServiceMasterPayload,
        },
    },
};

const PRIVILEGED_FOR_OFFERINGS: &[UserRole] = &[UserRole::Admin];

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    specialist_repo: SpecialistRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, specialist_repo: SpecialistRepository) -> Self {
        Self {
            catalog_repo,
            specialist_repo,
        }
    }

    // --- Catálogo mestre (a escrita é gated por service.manage na rota) ---

    pub async fn list_masters(&self, search: Option<&str>) -> Result<Vec<ServiceMaster>, AppError> {
        self.catalog_repo.list_masters(search).await
    }

    pub async fn get_master(&self, id: Uuid) -> Result<ServiceMaster, AppError> {
        self.catalog_repo
            .find_master_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Serviço do catálogo"))
    }

    pub async fn create_master(
        &self,
        payload: CreateServiceMasterPayload,
    ) -> Result<ServiceMaster, AppError> {
        self.catalog_repo
            .create_master(
                &payload.title,
                &payload.description,
                payload.s3_key.as_deref(),
                payload.bucket_name.as_deref(),
            )
            .await
    }

    pub async fn update_master(
        &self,
        id: Uuid,
        payload: UpdateServiceMasterPayload,
    ) -> Result<ServiceMaster, AppError> {
        let mut service = self.get_master(id).await?;

        if let Some(title) = payload.title {
            service.title = title;
        }
        if let Some(description) = payload.description {
            service.description = description;
        }
        if payload.s3_key.is_some() {
            service.s3_key = payload.s3_key;
        }
        if payload.bucket_name.is_some() {
            service.bucket_name = payload.bucket_name;
        }

        self.catalog_repo.update_master(&service).await
    }

    pub async fn delete_master(&self, id: Uuid) -> Result<(), AppError> {
        self.catalog_repo.soft_delete_master(id).await
    }

    // --- Vínculos especialista <-> serviço ---

    pub async fn list_by_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<ServiceOfferingDetail>, AppError> {
        self.catalog_repo
            .list_offerings_by_specialist(specialist_id)
            .await
    }

    pub async fn list_by_service(
        &self,
        service_master_id: Uuid,
    ) -> Result<Vec<ServiceOffering>, AppError> {
        self.catalog_repo
            .list_offerings_by_service(service_master_id)
            .await
    }

    // Vincula um serviço do catálogo ao especialista do chamador. O par é
    // único; duplicata vira conflito (409).
    pub async fn create_offering(
        &self,
        payload: CreateServiceOfferingPayload,
        user: &CurrentUser,
    ) -> Result<ServiceOffering, AppError> {
        let specialist = self
            .specialist_repo
            .find_by_id(payload.specialist_id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_OFFERINGS)?;

        self.catalog_repo
            .find_master_by_id(payload.service_master_id)
            .await?
            .ok_or(AppError::NotFound("Serviço do catálogo"))?;

        self.catalog_repo
            .create_offering(payload.specialist_id, payload.service_master_id)
            .await
    }

    pub async fn delete_offering(&self, id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        let offering = self
            .catalog_repo
            .find_offering_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Vínculo de serviço"))?;

        let specialist = self
            .specialist_repo
            .find_by_id(offering.specialist_id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_OFFERINGS)?;

        self.catalog_repo.soft_delete_offering(id).await
    }
}
