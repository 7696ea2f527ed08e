// src/db/specialist_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::specialist::{Specialist, SpecialistFilter, SpecialistStats, VerificationStatus},
};

#[derive(Clone)]
pub struct SpecialistRepository {
    pool: PgPool,
}

// Linha auxiliar do agregado de estatísticas
#[derive(sqlx::FromRow)]
struct StatsRow {
    total: i64,
    published: i64,
}

impl SpecialistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem com filtros opcionais. Os parâmetros nulos desligam o filtro
    // correspondente ($N IS NULL OR ...), mantendo o SQL estático.
    pub async fn list(
        &self,
        filter: &SpecialistFilter,
        force_public: bool,
    ) -> Result<(Vec<Specialist>, i64), AppError> {
        // Para chamadores não privilegiados a visibilidade pública é imposta
        // por cima de qualquer filtro pedido.
        let (is_draft, verification) = if force_public {
            (Some(false), Some(VerificationStatus::Verified))
        } else {
            (filter.is_draft, filter.verification_status)
        };

        let data = sqlx::query_as::<_, Specialist>(
            r#"
            SELECT * FROM specialists
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::numeric IS NULL OR base_price >= $2)
              AND ($3::numeric IS NULL OR base_price <= $3)
              AND ($4::boolean IS NULL OR is_draft = $4)
              AND ($5::verification_status IS NULL OR verification_status = $5)
            ORDER BY created_at DESC
            "#,
        )
        .bind(&filter.title)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(is_draft)
        .bind(verification)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM specialists
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
              AND ($2::numeric IS NULL OR base_price >= $2)
              AND ($3::numeric IS NULL OR base_price <= $3)
              AND ($4::boolean IS NULL OR is_draft = $4)
              AND ($5::verification_status IS NULL OR verification_status = $5)
            "#,
        )
        .bind(&filter.title)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(is_draft)
        .bind(verification)
        .fetch_one(&self.pool)
        .await?;

        Ok((data, total))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Specialist>, AppError> {
        let maybe = sqlx::query_as::<_, Specialist>(
            "SELECT * FROM specialists WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Tranca a linha para leitura-modificação-escrita (notas e contadores).
    // Deve rodar dentro de uma transação.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Specialist>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Specialist>(
            "SELECT * FROM specialists WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        slug: &str,
        title: &str,
        description: &str,
        short_bio: Option<&str>,
        base_price: Decimal,
        platform_fee: Decimal,
        final_price: Decimal,
        duration_days: i32,
        additional_offerings: Option<sqlx::types::Json<Vec<String>>>,
        expertise_areas: Option<sqlx::types::Json<Vec<String>>>,
        certifications: Option<sqlx::types::Json<Vec<crate::models::specialist::Certification>>>,
        created_by_id: Uuid,
    ) -> Result<Specialist, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let specialist = sqlx::query_as::<_, Specialist>(
            r#"
            INSERT INTO specialists (
                slug, title, description, short_bio,
                base_price, platform_fee, final_price, duration_days,
                additional_offerings, expertise_areas, certifications,
                created_by_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(description)
        .bind(short_bio)
        .bind(base_price)
        .bind(platform_fee)
        .bind(final_price)
        .bind(duration_days)
        .bind(additional_offerings)
        .bind(expertise_areas)
        .bind(certifications)
        .bind(created_by_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(specialist)
    }

    // Atualização de linha inteira, exceto slug (gerado uma única vez) e os
    // agregados de nota (caminho próprio com lock).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        specialist: &Specialist,
    ) -> Result<Specialist, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Specialist>(
            r#"
            UPDATE specialists SET
                title = $2,
                description = $3,
                short_bio = $4,
                base_price = $5,
                platform_fee = $6,
                final_price = $7,
                is_draft = $8,
                verification_status = $9,
                is_verified = $10,
                specialist_status = $11,
                total_projects_completed = $12,
                duration_days = $13,
                additional_offerings = $14,
                expertise_areas = $15,
                certifications = $16,
                assigned_secretary_id = $17,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(specialist.id)
        .bind(&specialist.title)
        .bind(&specialist.description)
        .bind(&specialist.short_bio)
        .bind(specialist.base_price)
        .bind(specialist.platform_fee)
        .bind(specialist.final_price)
        .bind(specialist.is_draft)
        .bind(specialist.verification_status)
        .bind(specialist.is_verified)
        .bind(specialist.specialist_status)
        .bind(specialist.total_projects_completed)
        .bind(specialist.duration_days)
        .bind(&specialist.additional_offerings)
        .bind(&specialist.expertise_areas)
        .bind(&specialist.certifications)
        .bind(specialist.assigned_secretary_id)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }

    // Escrita dos agregados de nota; o chamador já segura o lock da linha
    pub async fn update_rating<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        average_rating: Decimal,
        total_number_of_ratings: i32,
    ) -> Result<Specialist, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Specialist>(
            r#"
            UPDATE specialists
            SET average_rating = $2, total_number_of_ratings = $3, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(average_rating)
        .bind(total_number_of_ratings)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }

    pub async fn soft_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE specialists SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Especialista"));
        }
        Ok(())
    }

    // total/publicados/rascunhos, opcionalmente restrito a um criador
    pub async fn stats(&self, created_by: Option<Uuid>) -> Result<SpecialistStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_draft = FALSE) AS published
            FROM specialists
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR created_by_id = $1)
            "#,
        )
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(SpecialistStats {
            total: row.total,
            published: row.published,
            draft: row.total - row.published,
        })
    }
}
