// src/db/media_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::media::{Media, MediaType, MimeType},
};

#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Galeria do especialista, em ordem de exibição crescente
    pub async fn list_by_specialist(&self, specialist_id: Uuid) -> Result<Vec<Media>, AppError> {
        let media = sqlx::query_as::<_, Media>(
            r#"
            SELECT * FROM media
            WHERE specialist_id = $1 AND deleted_at IS NULL
            ORDER BY display_order ASC
            "#,
        )
        .bind(specialist_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(media)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Media>, AppError> {
        let maybe = sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        specialist_id: Uuid,
        storage_url: &str,
        storage_public_id: &str,
        file_name: &str,
        file_size: i64,
        mime_type: MimeType,
        media_type: MediaType,
        display_order: i32,
    ) -> Result<Media, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let media = sqlx::query_as::<_, Media>(
            r#"
            INSERT INTO media (
                specialist_id, storage_url, storage_public_id,
                file_name, file_size, mime_type, media_type, display_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(specialist_id)
        .bind(storage_url)
        .bind(storage_public_id)
        .bind(file_name)
        .bind(file_size)
        .bind(mime_type)
        .bind(media_type)
        .bind(display_order)
        .fetch_one(executor)
        .await?;

        Ok(media)
    }

    pub async fn update(
        &self,
        id: Uuid,
        display_order: i32,
        media_type: MediaType,
    ) -> Result<Media, AppError> {
        let updated = sqlx::query_as::<_, Media>(
            r#"
            UPDATE media
            SET display_order = $2, media_type = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(display_order)
        .bind(media_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE media SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Mídia"));
        }
        Ok(())
    }

    // Cascata lógica: tombstona a galeria junto com o especialista e devolve
    // as linhas afetadas para a limpeza no serviço de armazenamento.
    pub async fn soft_delete_by_specialist<'e, E>(
        &self,
        executor: E,
        specialist_id: Uuid,
    ) -> Result<Vec<Media>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let removed = sqlx::query_as::<_, Media>(
            r#"
            UPDATE media SET deleted_at = now()
            WHERE specialist_id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(specialist_id)
        .fetch_all(executor)
        .await?;

        Ok(removed)
    }
}
