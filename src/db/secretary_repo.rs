// src/db/secretary_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::secretary::{ContactInformation, Secretary, SecretaryStatus, SecretaryType},
};

#[derive(Clone)]
pub struct SecretaryRepository {
    pool: PgPool,
}

impl SecretaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, status: Option<SecretaryStatus>) -> Result<Vec<Secretary>, AppError> {
        let secretaries = sqlx::query_as::<_, Secretary>(
            r#"
            SELECT * FROM secretaries
            WHERE deleted_at IS NULL
              AND ($1::secretary_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(secretaries)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Secretary>, AppError> {
        let maybe = sqlx::query_as::<_, Secretary>(
            "SELECT * FROM secretaries WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Secretary>, AppError> {
        let maybe = sqlx::query_as::<_, Secretary>(
            "SELECT * FROM secretaries WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Lock de linha para mutação dos contadores de carga. Sempre dentro de
    // transação, junto com a escrita que motivou a mutação.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Secretary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Secretary>(
            "SELECT * FROM secretaries WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
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
        user_id: Uuid,
        registration_number: &str,
        secretary_type: SecretaryType,
        registration_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        qualification: Option<&str>,
        company_name: Option<&str>,
        experience: Option<&str>,
        areas_of_expertise: Option<Json<Vec<String>>>,
        years_of_experience: i32,
        hourly_rate: Option<Decimal>,
        monthly_rate: Option<Decimal>,
        avatar: Option<&str>,
        banner: Option<&str>,
        contact_information: Option<Json<ContactInformation>>,
    ) -> Result<Secretary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let secretary = sqlx::query_as::<_, Secretary>(
            r#"
            INSERT INTO secretaries (
                user_id, registration_number, secretary_type,
                registration_date, expiry_date, qualification, company_name,
                experience, areas_of_expertise, years_of_experience,
                hourly_rate, monthly_rate, avatar, banner, contact_information
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(registration_number)
        .bind(secretary_type)
        .bind(registration_date)
        .bind(expiry_date)
        .bind(qualification)
        .bind(company_name)
        .bind(experience)
        .bind(areas_of_expertise)
        .bind(years_of_experience)
        .bind(hourly_rate)
        .bind(monthly_rate)
        .bind(avatar)
        .bind(banner)
        .bind(contact_information)
        .fetch_one(executor)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(secretary)
    }

    // Atualização de linha inteira, exceto contadores/flags (caminho próprio)
    pub async fn update<'e, E>(
        &self,
        executor: E,
        secretary: &Secretary,
    ) -> Result<Secretary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Secretary>(
            r#"
            UPDATE secretaries SET
                status = $2,
                secretary_type = $3,
                registration_date = $4,
                expiry_date = $5,
                qualification = $6,
                company_name = $7,
                experience = $8,
                areas_of_expertise = $9,
                certifications = $10,
                satisfaction_rate = $11,
                years_of_experience = $12,
                hourly_rate = $13,
                monthly_rate = $14,
                avatar = $15,
                banner = $16,
                availability_schedule = $17,
                contact_information = $18,
                manager_id = $19,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(secretary.id)
        .bind(secretary.status)
        .bind(secretary.secretary_type)
        .bind(secretary.registration_date)
        .bind(secretary.expiry_date)
        .bind(&secretary.qualification)
        .bind(&secretary.company_name)
        .bind(&secretary.experience)
        .bind(&secretary.areas_of_expertise)
        .bind(&secretary.certifications)
        .bind(secretary.satisfaction_rate)
        .bind(secretary.years_of_experience)
        .bind(secretary.hourly_rate)
        .bind(secretary.monthly_rate)
        .bind(&secretary.avatar)
        .bind(&secretary.banner)
        .bind(&secretary.availability_schedule)
        .bind(&secretary.contact_information)
        .bind(secretary.manager_id)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }

    // Contadores e flags de aceitação gravados juntos, na mesma instrução.
    // O chamador já recalculou as flags e segura o lock da linha.
    pub async fn update_counters<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        total_companies_managed: i32,
        total_specialists_managed: i32,
        is_accepting_new_companies: bool,
        is_accepting_new_specialists: bool,
    ) -> Result<Secretary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Secretary>(
            r#"
            UPDATE secretaries SET
                total_companies_managed = $2,
                total_specialists_managed = $3,
                is_accepting_new_companies = $4,
                is_accepting_new_specialists = $5,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(total_companies_managed)
        .bind(total_specialists_managed)
        .bind(is_accepting_new_companies)
        .bind(is_accepting_new_specialists)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }

    pub async fn set_verification(
        &self,
        id: Uuid,
        is_verified: bool,
        verification_notes: Option<&str>,
        verified_by_id: Option<Uuid>,
    ) -> Result<Secretary, AppError> {
        let updated = sqlx::query_as::<_, Secretary>(
            r#"
            UPDATE secretaries SET
                is_verified = $2,
                verification_notes = $3,
                verified_by_id = $4,
                verified_at = CASE WHEN $2 THEN now() ELSE NULL END,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(is_verified)
        .bind(verification_notes)
        .bind(verified_by_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE secretaries SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Secretária"));
        }
        Ok(())
    }
}
