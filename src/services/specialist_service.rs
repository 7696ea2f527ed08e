// src/services/specialist_service.rs

use rust_decimal::Decimal;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::{error::AppError, lifecycle},
    db::{FeeRepository, MediaRepository, SecretaryRepository, SpecialistRepository},
    middleware::{auth::CurrentUser, rbac},
    models::{
        auth::UserRole,
        specialist::{
            CreateSpecialistPayload, Specialist, SpecialistFilter, SpecialistListResponse,
            SpecialistStats, UpdateSpecialistPayload, VerificationStatus,
        },
    },
    services::{secretary_service, storage::StorageService},
};

// Papéis que atravessam a checagem de posse (além do super admin, que passa
// sempre). Exclusão fica mais restrita que edição.
const PRIVILEGED_FOR_VIEW: &[UserRole] = &[UserRole::Admin, UserRole::Manager];
const PRIVILEGED_FOR_WRITE: &[UserRole] = &[UserRole::Admin];

#[derive(Clone)]
pub struct SpecialistService {
    specialist_repo: SpecialistRepository,
    secretary_repo: SecretaryRepository,
    media_repo: MediaRepository,
    fee_repo: FeeRepository,
    storage: StorageService,
    pool: PgPool,
}

impl SpecialistService {
    pub fn new(
        specialist_repo: SpecialistRepository,
        secretary_repo: SecretaryRepository,
        media_repo: MediaRepository,
        fee_repo: FeeRepository,
        storage: StorageService,
        pool: PgPool,
    ) -> Self {
        Self {
            specialist_repo,
            secretary_repo,
            media_repo,
            fee_repo,
            storage,
            pool,
        }
    }

    // Percentual da faixa vigente para o preço; lacuna de faixa cai no padrão
    async fn resolve_fee(&self, base_price: Decimal) -> Result<Decimal, AppError> {
        let tiers = self.fee_repo.list_all().await?;
        Ok(lifecycle::resolve_platform_fee(base_price, &tiers))
    }

    // Listagem. Fora do super admin, todo mundo enxerga apenas o que está
    // publicado E verificado, por cima de qualquer filtro pedido.
    pub async fn list(
        &self,
        filter: &SpecialistFilter,
        user: &CurrentUser,
    ) -> Result<SpecialistListResponse, AppError> {
        let force_public = user.role != UserRole::SuperAdmin;
        let (data, total) = self.specialist_repo.list(filter, force_public).await?;
        Ok(SpecialistListResponse { data, total })
    }

    // Rascunho só aparece para o criador e para papéis privilegiados
    pub async fn get(&self, id: Uuid, user: &CurrentUser) -> Result<Specialist, AppError> {
        let specialist = self
            .specialist_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        if specialist.is_draft {
            rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_VIEW)?;
        }

        Ok(specialist)
    }

    // Criação: nasce como rascunho, pendente de verificação, com o slug
    // derivado do título (uma única vez) e o preço final já calculado.
    pub async fn create(
        &self,
        payload: CreateSpecialistPayload,
        user: &CurrentUser,
    ) -> Result<Specialist, AppError> {
        let slug = lifecycle::slugify(&payload.title);
        let platform_fee = self.resolve_fee(payload.base_price).await?;
        let final_price = lifecycle::final_price(payload.base_price, platform_fee);

        let specialist = self
            .specialist_repo
            .create(
                &self.pool,
                &slug,
                &payload.title,
                &payload.description,
                payload.short_bio.as_deref(),
                payload.base_price,
                platform_fee,
                final_price,
                payload.duration_days,
                payload.additional_offerings.map(Json),
                payload.expertise_areas.map(Json),
                payload.certifications.map(Json),
                user.id,
            )
            .await?;

        tracing::info!("📋 Especialista '{}' criado como rascunho", specialist.slug);
        Ok(specialist)
    }

    // Atualização. O slug nunca é regenerado, mesmo com troca de título.
    // Mudança de preço base rederiva a taxa da faixa e o preço final antes
    // de persistir.
    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateSpecialistPayload,
        user: &CurrentUser,
    ) -> Result<Specialist, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut specialist = self
            .specialist_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_WRITE)?;

        if let Some(title) = payload.title {
            specialist.title = title;
        }
        if let Some(description) = payload.description {
            specialist.description = description;
        }
        if payload.short_bio.is_some() {
            specialist.short_bio = payload.short_bio;
        }
        if let Some(duration) = payload.duration_days {
            specialist.duration_days = duration;
        }
        if let Some(status) = payload.specialist_status {
            specialist.specialist_status = status;
        }
        if let Some(areas) = payload.expertise_areas {
            specialist.expertise_areas = Some(Json(areas));
        }
        if let Some(offerings) = payload.additional_offerings {
            specialist.additional_offerings = Some(Json(offerings));
        }
        if let Some(certs) = payload.certifications {
            specialist.certifications = Some(Json(certs));
        }

        if let Some(base_price) = payload.base_price {
            specialist.base_price = base_price;
            specialist.platform_fee = self.resolve_fee(base_price).await?;
        }
        // Recalculado sempre: qualquer mutação que tocou preço/taxa reflete aqui
        specialist.final_price = Some(lifecycle::final_price(
            specialist.base_price,
            specialist.platform_fee,
        ));

        // Reatribuição de secretária mexe nos contadores de carga das duas
        // pontas, na mesma transação.
        if let Some(new_secretary_id) = payload.assigned_secretary_id {
            if !user.has_any_role(&[UserRole::SuperAdmin, UserRole::Admin, UserRole::Manager]) {
                return Err(AppError::Forbidden(
                    "Apenas a gestão pode reatribuir secretárias.".into(),
                ));
            }

            if specialist.assigned_secretary_id != Some(new_secretary_id) {
                if let Some(old_id) = specialist.assigned_secretary_id {
                    secretary_service::adjust_counters(&self.secretary_repo, &mut tx, old_id, 0, -1)
                        .await?;
                }
                secretary_service::assign_specialist(&self.secretary_repo, &mut tx, new_secretary_id)
                    .await?;
                specialist.assigned_secretary_id = Some(new_secretary_id);
            }
        }

        let updated = self.specialist_repo.update(&mut *tx, &specialist).await?;
        tx.commit().await?;

        Ok(updated)
    }

    // Publicar/despublicar alterna apenas is_draft; o estado de verificação
    // não é tocado.
    pub async fn set_published(
        &self,
        id: Uuid,
        published: bool,
        user: &CurrentUser,
    ) -> Result<Specialist, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut specialist = self
            .specialist_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_WRITE)?;

        specialist.is_draft = !published;
        let updated = self.specialist_repo.update(&mut *tx, &specialist).await?;
        tx.commit().await?;

        Ok(updated)
    }

    // Transição de verificação: só o super admin. O espelho is_verified é
    // recalculado junto, nunca de forma independente.
    pub async fn set_verification_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
        user: &CurrentUser,
    ) -> Result<Specialist, AppError> {
        rbac::require_role(user, &[UserRole::SuperAdmin])?;

        let mut tx = self.pool.begin().await?;

        let mut specialist = self
            .specialist_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        specialist.verification_status = status;
        specialist.is_verified = status == VerificationStatus::Verified;

        let updated = self.specialist_repo.update(&mut *tx, &specialist).await?;
        tx.commit().await?;

        tracing::info!(
            "✅ Especialista {} agora está com verificação '{:?}'",
            updated.slug,
            updated.verification_status
        );
        Ok(updated)
    }

    // Nota nova: leitura-modificação-escrita serializada pelo lock da linha,
    // para não perder submissões concorrentes.
    pub async fn rate(&self, id: Uuid, rating: Decimal) -> Result<Specialist, AppError> {
        let mut tx = self.pool.begin().await?;

        let specialist = self
            .specialist_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        let (average, count) = lifecycle::apply_rating(
            specialist.average_rating,
            specialist.total_number_of_ratings,
            rating,
        );

        let updated = self
            .specialist_repo
            .update_rating(&mut *tx, id, average.round_dp(2), count)
            .await?;
        tx.commit().await?;

        Ok(updated)
    }

    // Exclusão lógica em cascata: o anúncio, a galeria e o contador da
    // secretária saem na mesma transação; os arquivos remotos são limpos
    // depois, em melhor esforço.
    pub async fn delete(&self, id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let specialist = self
            .specialist_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Especialista"))?;

        rbac::ensure_owner_or_privileged(user, specialist.created_by_id, PRIVILEGED_FOR_WRITE)?;

        let removed_media = self
            .media_repo
            .soft_delete_by_specialist(&mut *tx, id)
            .await?;

        if let Some(secretary_id) = specialist.assigned_secretary_id {
            secretary_service::adjust_counters(&self.secretary_repo, &mut tx, secretary_id, 0, -1)
                .await?;
        }

        self.specialist_repo.soft_delete(&mut *tx, id).await?;
        tx.commit().await?;

        for media in removed_media {
            if let Err(e) = self.storage.delete(&media.storage_public_id).await {
                tracing::error!(
                    "🧹 Falha ao remover arquivo {} do armazenamento: {}",
                    media.storage_public_id,
                    e
                );
            }
        }

        Ok(())
    }

    // total/publicados/rascunhos; a gestão enxerga o agregado global
    pub async fn stats(&self, user: &CurrentUser) -> Result<SpecialistStats, AppError> {
        let created_by = if user.has_any_role(&[UserRole::SuperAdmin, UserRole::Admin]) {
            None
        } else {
            Some(user.id)
        };
        self.specialist_repo.stats(created_by).await
    }
}
