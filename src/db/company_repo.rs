// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::company::Company};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem; dono nulo = sem restrição (papéis com company.read.any)
    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        assigned_secretary_id: Option<Uuid>,
    ) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE deleted_at IS NULL
              AND ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::uuid IS NULL OR assigned_secretary_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(assigned_secretary_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let maybe = sqlx::query_as::<_, Company>(
            "SELECT * FROM companies WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // O INSERT recebe a entidade montada pelo serviço (payload já validado e
    // com dono resolvido). Mantém a assinatura enxuta para tantas colunas.
    pub async fn create<'e, E>(&self, executor: E, company: &Company) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (
                legal_name, registration_number, company_number,
                entity_type, status, incorporation_date,
                business_sector, business_nature,
                authorized_capital, paid_up_capital, total_shares, par_value,
                financial_year_end, next_annual_return_due, last_annual_return_filed,
                next_agm_date, last_agm_held, is_agm_held, is_annual_return_filed,
                registered_address, business_address, phone_number, email, website,
                directors, shareholders, secretaries, auditors, bank_accounts,
                notes, is_active, owner_id, assigned_secretary_id
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19,
                $20, $21, $22, $23, $24, $25, $26, $27, $28, $29,
                $30, $31, $32, $33
            )
            RETURNING *
            "#,
        )
        .bind(&company.legal_name)
        .bind(&company.registration_number)
        .bind(&company.company_number)
        .bind(company.entity_type)
        .bind(company.status)
        .bind(company.incorporation_date)
        .bind(&company.business_sector)
        .bind(&company.business_nature)
        .bind(company.authorized_capital)
        .bind(company.paid_up_capital)
        .bind(company.total_shares)
        .bind(&company.par_value)
        .bind(company.financial_year_end)
        .bind(company.next_annual_return_due)
        .bind(company.last_annual_return_filed)
        .bind(company.next_agm_date)
        .bind(company.last_agm_held)
        .bind(company.is_agm_held)
        .bind(company.is_annual_return_filed)
        .bind(&company.registered_address)
        .bind(&company.business_address)
        .bind(&company.phone_number)
        .bind(&company.email)
        .bind(&company.website)
        .bind(&company.directors)
        .bind(&company.shareholders)
        .bind(&company.secretaries)
        .bind(&company.auditors)
        .bind(&company.bank_accounts)
        .bind(&company.notes)
        .bind(company.is_active)
        .bind(company.owner_id)
        .bind(company.assigned_secretary_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(created)
    }

    pub async fn update<'e, E>(&self, executor: E, company: &Company) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                legal_name = $2,
                company_number = $3,
                entity_type = $4,
                status = $5,
                incorporation_date = $6,
                business_sector = $7,
                business_nature = $8,
                authorized_capital = $9,
                paid_up_capital = $10,
                total_shares = $11,
                par_value = $12,
                financial_year_end = $13,
                next_annual_return_due = $14,
                last_annual_return_filed = $15,
                next_agm_date = $16,
                last_agm_held = $17,
                is_agm_held = $18,
                is_annual_return_filed = $19,
                registered_address = $20,
                business_address = $21,
                phone_number = $22,
                email = $23,
                website = $24,
                directors = $25,
                shareholders = $26,
                secretaries = $27,
                auditors = $28,
                bank_accounts = $29,
                notes = $30,
                is_active = $31,
                assigned_secretary_id = $32,
                updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.legal_name)
        .bind(&company.company_number)
        .bind(company.entity_type)
        .bind(company.status)
        .bind(company.incorporation_date)
        .bind(&company.business_sector)
        .bind(&company.business_nature)
        .bind(company.authorized_capital)
        .bind(company.paid_up_capital)
        .bind(company.total_shares)
        .bind(&company.par_value)
        .bind(company.financial_year_end)
        .bind(company.next_annual_return_due)
        .bind(company.last_annual_return_filed)
        .bind(company.next_agm_date)
        .bind(company.last_agm_held)
        .bind(company.is_agm_held)
        .bind(company.is_annual_return_filed)
        .bind(&company.registered_address)
        .bind(&company.business_address)
        .bind(&company.phone_number)
        .bind(&company.email)
        .bind(&company.website)
        .bind(&company.directors)
        .bind(&company.shareholders)
        .bind(&company.secretaries)
        .bind(&company.auditors)
        .bind(&company.bank_accounts)
        .bind(&company.notes)
        .bind(company.is_active)
        .bind(company.assigned_secretary_id)
        .fetch_one(executor)
        .await
        .map_err(AppError::from_unique_violation)?;

        Ok(updated)
    }

    pub async fn soft_delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE companies SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Empresa"));
        }
        Ok(())
    }
}
