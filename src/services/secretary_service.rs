// src/services/secretary_service.rs

use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::{error::AppError, lifecycle},
    db::{SecretaryRepository, UserRepository},
    middleware::{auth::CurrentUser, rbac::perms},
    models::{
        auth::{UserRole, UserStatus},
        secretary::{
            CreateSecretaryPayload, Secretary, SecretaryStats, SecretaryStatus, SecretaryType,
            SecretaryWithUser, UpdateSecretaryPayload, VerifySecretaryPayload,
        },
    },
    services::{
        auth,
        storage::{FileUpload, StorageService},
    },
};

// ---
// Mutação de contadores de carga (compartilhada com os serviços de empresa e
// de especialista). Lock de linha + recomputação das flags na mesma operação:
// as flags nunca são graváveis de forma independente.
// ---

pub(crate) async fn adjust_counters(
    repo: &SecretaryRepository,
    tx: &mut Transaction<'_, Postgres>,
    secretary_id: Uuid,
    company_delta: i32,
    specialist_delta: i32,
) -> Result<Secretary, AppError> {
    let secretary = repo
        .find_by_id_for_update(&mut **tx, secretary_id)
        .await?
        .ok_or(AppError::NotFound("Secretária"))?;

    // Piso em zero nos decrementos
    let companies = (secretary.total_companies_managed + company_delta).max(0);
    let specialists = (secretary.total_specialists_managed + specialist_delta).max(0);

    let (accepting_companies, accepting_specialists) =
        lifecycle::recompute_availability(companies, specialists);

    repo.update_counters(
        &mut **tx,
        secretary_id,
        companies,
        specialists,
        accepting_companies,
        accepting_specialists,
    )
    .await
}

// Incremento que respeita a flag de aceitação vigente
pub(crate) async fn assign_company(
    repo: &SecretaryRepository,
    tx: &mut Transaction<'_, Postgres>,
    secretary_id: Uuid,
) -> Result<Secretary, AppError> {
    let secretary = repo
        .find_by_id_for_update(&mut **tx, secretary_id)
        .await?
        .ok_or(AppError::NotFound("Secretária"))?;

    if !secretary.is_accepting_new_companies {
        return Err(AppError::Forbidden(
            "A secretária não está aceitando novas empresas.".into(),
        ));
    }

    adjust_counters(repo, tx, secretary_id, 1, 0).await
}

pub(crate) async fn assign_specialist(
    repo: &SecretaryRepository,
    tx: &mut Transaction<'_, Postgres>,
    secretary_id: Uuid,
) -> Result<Secretary, AppError> {
    let secretary = repo
        .find_by_id_for_update(&mut **tx, secretary_id)
        .await?
        .ok_or(AppError::NotFound("Secretária"))?;

    if !secretary.is_accepting_new_specialists {
        return Err(AppError::Forbidden(
            "A secretária não está aceitando novos especialistas.".into(),
        ));
    }

    adjust_counters(repo, tx, secretary_id, 0, 1).await
}

#[derive(Clone)]
pub struct SecretaryService {
    secretary_repo: SecretaryRepository,
    user_repo: UserRepository,
    storage: StorageService,
    pool: PgPool,
}

impl SecretaryService {
    pub fn new(
        secretary_repo: SecretaryRepository,
        user_repo: UserRepository,
        storage: StorageService,
        pool: PgPool,
    ) -> Self {
        Self {
            secretary_repo,
            user_repo,
            storage,
            pool,
        }
    }

    pub async fn list(&self, status: Option<SecretaryStatus>) -> Result<Vec<Secretary>, AppError> {
        self.secretary_repo.list(status).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Secretary, AppError> {
        self.secretary_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Secretária"))
    }

    // Onboarding iniciado por admin: cria o usuário e o perfil na MESMA
    // transação. Os uploads acontecem antes dela; se a transação falhar, os
    // arquivos órfãos são removidos como ação compensatória.
    pub async fn create_with_user(
        &self,
        payload: CreateSecretaryPayload,
        avatar: Option<FileUpload>,
        banner: Option<FileUpload>,
    ) -> Result<SecretaryWithUser, AppError> {
        // 1. Uploads primeiro (fora da transação, rastreados para limpeza)
        let mut uploaded_public_ids: Vec<String> = Vec::new();

        let avatar_url = match avatar {
            Some(file) => {
                let asset = self.storage.upload(file, "secretaries/avatars").await?;
                uploaded_public_ids.push(asset.public_id.clone());
                Some(asset.url)
            }
            None => None,
        };
        let banner_url = match banner {
            Some(file) => {
                let asset = self.storage.upload(file, "secretaries/banners").await?;
                uploaded_public_ids.push(asset.public_id.clone());
                Some(asset.url)
            }
            None => None,
        };

        // 2. Escrita transacional
        let result = self
            .create_records(payload, avatar_url.as_deref(), banner_url.as_deref())
            .await;

        // 3. Se o banco falhou, apaga os uploads recém-feitos. A falha da
        // limpeza é logada e não encobre o erro original.
        if result.is_err() {
            for public_id in &uploaded_public_ids {
                if let Err(e) = self.storage.delete(public_id).await {
                    tracing::error!("🧹 Falha ao limpar upload órfão {}: {}", public_id, e);
                }
            }
        }

        result
    }

    async fn create_records(
        &self,
        payload: CreateSecretaryPayload,
        avatar_url: Option<&str>,
        banner_url: Option<&str>,
    ) -> Result<SecretaryWithUser, AppError> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = auth::ensure_hashed(payload.password.clone()).await?;

        let mut tx = self.pool.begin().await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                &payload.email,
                &hashed_password,
                &payload.full_name,
                payload.phone_number.as_deref(),
                None,
                avatar_url,
                UserRole::Secretary,
                UserStatus::Active,
                None,
            )
            .await?; // Se falhar aqui, o tx sofre rollback no drop

        let secretary = self
            .secretary_repo
            .create(
                &mut *tx,
                user.id,
                &payload.registration_number,
                payload.secretary_type.unwrap_or(SecretaryType::Individual),
                payload.registration_date,
                payload.expiry_date,
                payload.qualification.as_deref(),
                payload.company_name.as_deref(),
                payload.experience.as_deref(),
                payload.areas_of_expertise.clone().map(Json),
                payload.years_of_experience.unwrap_or(0),
                payload.hourly_rate,
                payload.monthly_rate,
                avatar_url,
                banner_url,
                payload.contact_information.clone().map(Json),
            )
            .await?; // Idem: o usuário criado acima é desfeito junto

        tx.commit().await?;

        tracing::info!("🧑‍💼 Secretária {} cadastrada", secretary.registration_number);
        Ok(SecretaryWithUser { secretary, user })
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateSecretaryPayload,
    ) -> Result<Secretary, AppError> {
        let mut secretary = self.get(id).await?;

        if let Some(status) = payload.status {
            secretary.status = status;
        }
        if let Some(kind) = payload.secretary_type {
            secretary.secretary_type = kind;
        }
        if payload.qualification.is_some() {
            secretary.qualification = payload.qualification;
        }
        if payload.company_name.is_some() {
            secretary.company_name = payload.company_name;
        }
        if payload.experience.is_some() {
            secretary.experience = payload.experience;
        }
        if let Some(areas) = payload.areas_of_expertise {
            secretary.areas_of_expertise = Some(Json(areas));
        }
        if let Some(certs) = payload.certifications {
            secretary.certifications = Some(Json(certs));
        }
        if let Some(years) = payload.years_of_experience {
            secretary.years_of_experience = years;
        }
        if payload.hourly_rate.is_some() {
            secretary.hourly_rate = payload.hourly_rate;
        }
        if payload.monthly_rate.is_some() {
            secretary.monthly_rate = payload.monthly_rate;
        }
        if payload.availability_schedule.is_some() {
            secretary.availability_schedule = payload.availability_schedule;
        }
        if let Some(contact) = payload.contact_information {
            secretary.contact_information = Some(Json(contact));
        }

        self.secretary_repo.update(&self.pool, &secretary).await
    }

    // Verificação administrativa do perfil (quem verificou fica registrado)
    pub async fn set_verification(
        &self,
        id: Uuid,
        payload: VerifySecretaryPayload,
        user: &CurrentUser,
    ) -> Result<Secretary, AppError> {
        if !user.has_permission(perms::SECRETARY_UPDATE) {
            return Err(AppError::Forbidden(format!(
                "Você precisa da permissão '{}' para realizar esta ação.",
                perms::SECRETARY_UPDATE
            )));
        }

        self.secretary_repo
            .set_verification(
                id,
                payload.is_verified,
                payload.verification_notes.as_deref(),
                Some(user.id),
            )
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.secretary_repo.soft_delete(id).await
    }

    // Indicadores derivados dos contadores
    pub async fn stats(&self, id: Uuid) -> Result<SecretaryStats, AppError> {
        let secretary = self.get(id).await?;
        Ok(SecretaryStats {
            workload: secretary.workload_percentage(),
            is_overloaded: secretary.is_overloaded(),
            is_available: secretary.is_available(),
        })
    }
}
