// src/services/media_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MediaRepository, SpecialistRepository},
    middleware::{auth::CurrentUser, rbac},
    models::{
        auth::UserRole,
        media::{Media, MediaType, MimeType, UpdateMediaPayload},
    },
    services::storage::{FileUpload, StorageService},
};

const PRIVILEGED_FOR_MEDIA: &[UserRole] = &[UserRole::Admin];

#[derive(Clone)]
pub struct MediaService {
    media_repo: MediaRepository,
    specialist_repo: SpecialistRepository,
    storage: StorageService,
    pool: sqlx::PgPool,
}

impl MediaService {
    pub fn new(
        media_repo: MediaRepository,
        specialist_repo: SpecialistRepository,
        storage: StorageService,
        pool: sqlx::PgPool,
    ) -> Self {
        Self {
            media_repo,
            specialist_repo,
            storage,
            pool,
        }
    }

    // Galeria de um especialista. Para anúncio ainda não público, só o dono
    // e a gestão enxergam os arquivos.
    pub async fn list_by_specialist(
        &self,
        specialist_id: Uuid,
        user: &CurrentUser,
    ) -> Result<Vec<Media>, AppError> {
        let specialist = self
            .specialist_repo
            .find_by_id(specialist_id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        if !specialist.is_publicly_visible() {
            rbac::ensure_owner_or_privileged(
                user,
                specialist.created_by_id,
                &[UserRole::Admin, UserRole::Manager],
            )?;
        }

        self.media_repo.list_by_specialist(specialist_id).await
    }

    // Upload: manda o arquivo para o armazenamento externo e grava a linha.
    // Se a gravação falhar, o arquivo recém-subido é removido (compensação).
    pub async fn upload(
        &self,
        specialist_id: Uuid,
        file: FileUpload,
        media_type: Option<MediaType>,
        display_order: Option<i32>,
        user: &CurrentUser,
    ) -> Result<Media, AppError> {
        let specialist = self
            .specialist_repo
            .find_by_id(specialist_id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_MEDIA)?;

        let mime_type = MimeType::from_content_type(&file.content_type).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Tipo de arquivo não suportado: {}",
                file.content_type
            ))
        })?;

        let file_name = file.file_name.clone();
        let file_size = file.bytes.len() as i64;

        let asset = self.storage.upload(file, "media").await?;

        let created = self
            .media_repo
            .create(
                &self.pool,
                specialist_id,
                &asset.url,
                &asset.public_id,
                &file_name,
                file_size,
                mime_type,
                media_type.unwrap_or(MediaType::Gallery),
                display_order.unwrap_or(0),
            )
            .await;

        match created {
            Ok(media) => Ok(media),
            Err(e) => {
                if let Err(cleanup_err) = self.storage.delete(&asset.public_id).await {
                    tracing::error!(
                        "🧹 Falha ao limpar upload órfão {}: {}",
                        asset.public_id,
                        cleanup_err
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateMediaPayload,
        user: &CurrentUser,
    ) -> Result<Media, AppError> {
        let media = self
            .media_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Mídia"))?;

        self.ensure_ownership(media.specialist_id, user).await?;

        self.media_repo
            .update(
                id,
                payload.display_order.unwrap_or(media.display_order),
                payload.media_type.unwrap_or(media.media_type),
            )
            .await
    }

    // Exclusão lógica; a remoção do arquivo remoto é melhor esforço
    pub async fn delete(&self, id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        let media = self
            .media_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Mídia"))?;

        self.ensure_ownership(media.specialist_id, user).await?;

        self.media_repo.soft_delete(id).await?;

        if let Err(e) = self.storage.delete(&media.storage_public_id).await {
            tracing::error!(
                "🧹 Falha ao remover arquivo {} do armazenamento: {}",
                media.storage_public_id,
                e
            );
        }

        Ok(())
    }

    // A posse da mídia é a posse do especialista dela
    async fn ensure_ownership(&self, specialist_id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        let specialist = self
            .specialist_repo
            .find_by_id(specialist_id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_MEDIA)
    }
}
