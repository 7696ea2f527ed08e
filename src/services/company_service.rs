// src/services/company_service.rs

use chrono::Utc;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, SecretaryRepository},
    middleware::{auth::CurrentUser, rbac::perms},
    models::{
        auth::UserRole,
        company::{
            Company, CompanyStatus, CompanyType, ComplianceReport, CreateCompanyPayload,
            UpdateCompanyPayload,
        },
    },
    services::secretary_service,
};

#[derive(Clone)]
pub struct CompanyService {
    company_repo: CompanyRepository,
    secretary_repo: SecretaryRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(
        company_repo: CompanyRepository,
        secretary_repo: SecretaryRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            company_repo,
            secretary_repo,
            pool,
        }
    }

    // Quem não tem company.read.any enxerga o próprio recorte: clientes as
    // empresas que possuem, secretárias as que administram.
    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<Company>, AppError> {
        if user.has_permission(perms::COMPANY_READ_ANY) {
            return self.company_repo.list(None, None).await;
        }

        if user.role == UserRole::Secretary {
            let profile = self.secretary_repo.find_by_user_id(user.id).await?;
            return match profile {
                Some(secretary) => self.company_repo.list(None, Some(secretary.id)).await,
                None => Ok(Vec::new()),
            };
        }

        self.company_repo.list(Some(user.id), None).await
    }

    pub async fn get(&self, id: Uuid, user: &CurrentUser) -> Result<Company, AppError> {
        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        self.ensure_can_access(&company, user).await?;
        Ok(company)
    }

    // Criação. O dono padrão é quem chama; criar para terceiros exige papel
    // de gestão. Atribuição de secretária incrementa o contador dela na
    // mesma transação.
    pub async fn create(
        &self,
        payload: CreateCompanyPayload,
        user: &CurrentUser,
    ) -> Result<Company, AppError> {
        let owner_id = match payload.owner_id {
            Some(owner) if owner != user.id => {
                if !user.has_any_role(&[UserRole::SuperAdmin, UserRole::Admin]) {
                    return Err(AppError::Forbidden(
                        "Apenas a gestão pode criar empresas para outro dono.".into(),
                    ));
                }
                owner
            }
            _ => user.id,
        };

        let now = Utc::now();
        let company = Company {
            id: Uuid::nil(), // Substituído pelo banco no INSERT
            legal_name: payload.legal_name,
            registration_number: payload.registration_number,
            company_number: payload.company_number,
            entity_type: payload.entity_type.unwrap_or(CompanyType::SdnBhd),
            status: payload.status.unwrap_or(CompanyStatus::Incorporating),
            incorporation_date: payload.incorporation_date,
            business_sector: payload.business_sector,
            business_nature: payload.business_nature,
            authorized_capital: payload.authorized_capital,
            paid_up_capital: payload.paid_up_capital,
            total_shares: payload.total_shares,
            par_value: payload.par_value,
            financial_year_end: payload.financial_year_end,
            next_annual_return_due: payload.next_annual_return_due,
            last_annual_return_filed: None,
            next_agm_date: payload.next_agm_date,
            last_agm_held: None,
            is_agm_held: false,
            is_annual_return_filed: false,
            registered_address: payload.registered_address,
            business_address: payload.business_address,
            phone_number: payload.phone_number,
            email: payload.email,
            website: payload.website,
            directors: payload.directors.map(Json),
            shareholders: payload.shareholders.map(Json),
            secretaries: payload.secretaries.map(Json),
            auditors: payload.auditors.map(Json),
            bank_accounts: payload.bank_accounts.map(Json),
            notes: payload.notes,
            is_active: true,
            owner_id,
            assigned_secretary_id: payload.assigned_secretary_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let mut tx = self.pool.begin().await?;

        if let Some(secretary_id) = company.assigned_secretary_id {
            secretary_service::assign_company(&self.secretary_repo, &mut tx, secretary_id).await?;
        }

        let created = self.company_repo.create(&mut *tx, &company).await?;
        tx.commit().await?;

        tracing::info!("🏢 Empresa '{}' cadastrada", created.legal_name);
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateCompanyPayload,
        user: &CurrentUser,
    ) -> Result<Company, AppError> {
        let mut company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        self.ensure_can_modify(&company, user).await?;

        // Mexer nas datas de obrigação é gesto de compliance, com permissão
        // própria por cima da regra de posse.
        let touches_compliance = payload.financial_year_end.is_some()
            || payload.next_annual_return_due.is_some()
            || payload.last_annual_return_filed.is_some()
            || payload.next_agm_date.is_some()
            || payload.last_agm_held.is_some()
            || payload.is_agm_held.is_some()
            || payload.is_annual_return_filed.is_some();
        if touches_compliance && !user.has_permission(perms::COMPANY_MANAGE_COMPLIANCE) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                perms::COMPANY_MANAGE_COMPLIANCE
            )));
        }

        if let Some(legal_name) = payload.legal_name {
            company.legal_name = legal_name;
        }
        if payload.company_number.is_some() {
            company.company_number = payload.company_number;
        }
        if let Some(entity_type) = payload.entity_type {
            company.entity_type = entity_type;
        }
        if let Some(status) = payload.status {
            company.status = status;
        }
        if payload.incorporation_date.is_some() {
            company.incorporation_date = payload.incorporation_date;
        }
        if payload.business_sector.is_some() {
            company.business_sector = payload.business_sector;
        }
        if payload.business_nature.is_some() {
            company.business_nature = payload.business_nature;
        }
        if payload.authorized_capital.is_some() {
            company.authorized_capital = payload.authorized_capital;
        }
        if payload.paid_up_capital.is_some() {
            company.paid_up_capital = payload.paid_up_capital;
        }
        if payload.total_shares.is_some() {
            company.total_shares = payload.total_shares;
        }
        if payload.par_value.is_some() {
            company.par_value = payload.par_value;
        }
        if payload.financial_year_end.is_some() {
            company.financial_year_end = payload.financial_year_end;
        }
        if payload.next_annual_return_due.is_some() {
            company.next_annual_return_due = payload.next_annual_return_due;
        }
        if payload.last_annual_return_filed.is_some() {
            company.last_annual_return_filed = payload.last_annual_return_filed;
        }
        if payload.next_agm_date.is_some() {
            company.next_agm_date = payload.next_agm_date;
        }
        if payload.last_agm_held.is_some() {
            company.last_agm_held = payload.last_agm_held;
        }
        if let Some(flag) = payload.is_agm_held {
            company.is_agm_held = flag;
        }
        if let Some(flag) = payload.is_annual_return_filed {
            company.is_annual_return_filed = flag;
        }
        if payload.registered_address.is_some() {
            company.registered_address = payload.registered_address;
        }
        if payload.business_address.is_some() {
            company.business_address = payload.business_address;
        }
        if payload.phone_number.is_some() {
            company.phone_number = payload.phone_number;
        }
        if payload.email.is_some() {
            company.email = payload.email;
        }
        if payload.website.is_some() {
            company.website = payload.website;
        }
        if let Some(directors) = payload.directors {
            company.directors = Some(Json(directors));
        }
        if let Some(shareholders) = payload.shareholders {
            company.shareholders = Some(Json(shareholders));
        }
        if let Some(secretaries) = payload.secretaries {
            company.secretaries = Some(Json(secretaries));
        }
        if let Some(auditors) = payload.auditors {
            company.auditors = Some(Json(auditors));
        }
        if let Some(bank_accounts) = payload.bank_accounts {
            company.bank_accounts = Some(Json(bank_accounts));
        }
        if payload.notes.is_some() {
            company.notes = payload.notes;
        }
        if let Some(active) = payload.is_active {
            company.is_active = active;
        }

        let mut tx = self.pool.begin().await?;

        // Reatribuição de secretária: solta uma ponta, prende a outra
        if let Some(new_secretary_id) = payload.assigned_secretary_id {
            if company.assigned_secretary_id != Some(new_secretary_id) {
                if let Some(old_id) = company.assigned_secretary_id {
                    secretary_service::adjust_counters(&self.secretary_repo, &mut tx, old_id, -1, 0)
                        .await?;
                }
                secretary_service::assign_company(&self.secretary_repo, &mut tx, new_secretary_id)
                    .await?;
                company.assigned_secretary_id = Some(new_secretary_id);
            }
        }

        let updated = self.company_repo.update(&mut *tx, &company).await?;
        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        if !user.has_permission(perms::COMPANY_DELETE_ANY) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                perms::COMPANY_DELETE_ANY
            )));
        }

        let company = self
            .company_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Empresa"))?;

        let mut tx = self.pool.begin().await?;

        if let Some(secretary_id) = company.assigned_secretary_id {
            secretary_service::adjust_counters(&self.secretary_repo, &mut tx, secretary_id, -1, 0)
                .await?;
        }

        self.company_repo.soft_delete(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(())
    }

    // Situação de compliance derivada na leitura, nada gravado
    pub async fn compliance(
        &self,
        id: Uuid,
        user: &CurrentUser,
    ) -> Result<ComplianceReport, AppError> {
        let company = self.get(id, user).await?;
        let today = Utc::now().date_naive();

        Ok(ComplianceReport {
            company_id: company.id,
            is_compliant: company.is_compliant(today),
            next_compliance_due: company.next_compliance_due(),
            company_age_years: company.company_age_years(today),
        })
    }

    // Leitura: read.any, dono, ou a secretária atribuída
    async fn ensure_can_access(&self, company: &Company, user: &CurrentUser) -> Result<(), AppError> {
        if user.has_permission(perms::COMPANY_READ_ANY) || company.owner_id == user.id {
            return Ok(());
        }

        if user.role == UserRole::Secretary {
            if let Some(profile) = self.secretary_repo.find_by_user_id(user.id).await? {
                if company.assigned_secretary_id == Some(profile.id) {
                    return Ok(());
                }
            }
        }

        Err(AppError::Forbidden(
            "Você não tem acesso a esta empresa.".into(),
        ))
    }

    // Escrita: update.any, dono, ou a secretária atribuída
    async fn ensure_can_modify(&self, company: &Company, user: &CurrentUser) -> Result<(), AppError> {
        if user.has_permission(perms::COMPANY_UPDATE_ANY) || company.owner_id == user.id {
            return Ok(());
        }

        if user.role == UserRole::Secretary {
            if let Some(profile) = self.secretary_repo.find_by_user_id(user.id).await? {
                if company.assigned_secretary_id == Some(profile.id) {
                    return Ok(());
                }
            }
        }

        Err(AppError::Forbidden(
            "Você não é dono(a) deste recurso.".into(),
        ))
    }
}
