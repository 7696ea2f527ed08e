// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{ServiceMaster, ServiceOffering, ServiceOfferingDetail},
};

// Catálogo mestre + vínculos especialista <-> serviço
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CATÁLOGO MESTRE
    // =========================================================================

    pub async fn list_masters(&self, search: Option<&str>) -> Result<Vec<ServiceMaster>, AppError> {
        let services = sqlx::query_as::<_, ServiceMaster>(
            r#"
            SELECT * FROM service_offerings_master_list
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(services)
    }

    pub async fn find_master_by_id(&self, id: Uuid) -> Result<Option<ServiceMaster>, AppError> {
        let maybe = sqlx::query_as::<_, ServiceMaster>(
            "SELECT * FROM service_offerings_master_list WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn create_master(
        &self,
        title: &str,
        description: &str,
        s3_key: Option<&str>,
        bucket_name: Option<&str>,
    ) -> Result<ServiceMaster, AppError> {
        let service = sqlx::query_as::<_, ServiceMaster>(
            r#"
            INSERT INTO service_offerings_master_list (title, description, s3_key, bucket_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(s3_key)
        .bind(bucket_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    pub async fn update_master(&self, service: &ServiceMaster) -> Result<ServiceMaster, AppError> {
        let updated = sqlx::query_as::<_, ServiceMaster>(
            r#"
            UPDATE service_offerings_master_list
            SET title = $2, description = $3, s3_key = $4, bucket_name = $5, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(service.id)
        .bind(&service.title)
        .bind(&service.description)
        .bind(&service.s3_key)
        .bind(&service.bucket_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn soft_delete_master(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE service_offerings_master_list
            SET deleted_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Serviço do catálogo"));
        }
        Ok(())
    }

    // =========================================================================
    //  VÍNCULOS (OFFERINGS)
    // =========================================================================

    pub async fn list_offerings_by_specialist(
        &self,
        specialist_id: Uuid,
    ) -> Result<Vec<ServiceOfferingDetail>, AppError> {
        let offerings = sqlx::query_as::<_, ServiceOfferingDetail>(
            r#"
            SELECT o.id, o.specialist_id, o.service_master_id,
                   m.title, m.description, o.created_at
            FROM service_offerings o
            JOIN service_offerings_master_list m ON m.id = o.service_master_id
            WHERE o.specialist_id = $1 AND o.deleted_at IS NULL
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(specialist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(offerings)
    }

    pub async fn list_offerings_by_service(
        &self,
        service_master_id: Uuid,
    ) -> Result<Vec<ServiceOffering>, AppError> {
        let offerings = sqlx::query_as::<_, ServiceOffering>(
            r#"
            SELECT * FROM service_offerings
            WHERE service_master_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(service_master_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(offerings)
    }

    pub async fn find_offering_by_id(&self, id: Uuid) -> Result<Option<ServiceOffering>, AppError> {
        let maybe = sqlx::query_as::<_, ServiceOffering>(
            "SELECT * FROM service_offerings WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn create_offering(
        &self,
        specialist_id: Uuid,
        service_master_id: Uuid,
    ) -> Result<ServiceOffering, AppError> {
        let offering = sqlx::query_as::<_, ServiceOffering>(
            r#"
            INSERT INTO service_offerings (specialist_id, service_master_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(specialist_id)
        .bind(service_master_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(offering)
    }

    pub async fn soft_delete_offering(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE service_offerings SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Vínculo de serviço"));
        }
        Ok(())
    }
}
