// src/models/specialist.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::lifecycle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "verification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    InReview,
    Verified,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "specialist_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SpecialistStatus {
    Available,
    Busy,
    OnLeave,
    Inactive,
}

// Certificação embutida como JSON tipado (validada na borda, não blob solto)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
}

// Um anúncio de especialista vindo do banco
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Specialist {
    pub id: Uuid,

    #[schema(example = "tax-audit-review")]
    pub slug: String,

    pub title: String,
    pub description: String,
    pub short_bio: Option<String>,

    pub base_price: Decimal,
    pub platform_fee: Decimal,
    pub final_price: Option<Decimal>,

    pub average_rating: Decimal,
    pub total_number_of_ratings: i32,

    pub is_draft: bool,
    pub verification_status: VerificationStatus,
    // Espelho de verification_status == verified; recalculado junto com ele
    pub is_verified: bool,
    pub specialist_status: SpecialistStatus,

    pub total_projects_completed: i32,
    pub duration_days: i32,

    #[schema(value_type = Option<Vec<String>>)]
    pub additional_offerings: Option<Json<Vec<String>>>,
    #[schema(value_type = Option<Vec<String>>)]
    pub expertise_areas: Option<Json<Vec<String>>>,
    #[schema(value_type = Option<Vec<Certification>>)]
    pub certifications: Option<Json<Vec<Certification>>>,

    pub created_by_id: Uuid,
    pub assigned_secretary_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Specialist {
    // Visível no caminho público: publicado E verificado.
    // Publicação e verificação são eixos independentes.
    pub fn is_publicly_visible(&self) -> bool {
        !self.is_draft && self.verification_status == VerificationStatus::Verified
    }

    pub fn is_available(&self) -> bool {
        self.specialist_status == SpecialistStatus::Available && !self.is_draft
    }

    pub fn can_be_booked(&self) -> bool {
        self.is_available() && self.is_verified
    }

    pub fn years_of_experience(&self, today: NaiveDate) -> i32 {
        lifecycle::full_years_between(self.created_at.date_naive(), today)
    }
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_rating_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ONE || *value > Decimal::from(5) {
        let mut err = ValidationError::new("rating_range");
        err.message = Some("A nota deve estar entre 1 e 5.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpecialistPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Tax & Audit Review")]
    pub title: String,

    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub short_bio: Option<String>,

    #[validate(custom(function = "validate_non_negative"))]
    pub base_price: Decimal,

    #[validate(range(min = 1, max = 365, message = "A duração deve ficar entre 1 e 365 dias."))]
    pub duration_days: i32,

    pub expertise_areas: Option<Vec<String>>,
    pub additional_offerings: Option<Vec<String>>,
    pub certifications: Option<Vec<Certification>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpecialistPayload {
    #[validate(length(min = 1, message = "O título não pode ficar vazio."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub short_bio: Option<String>,

    #[validate(custom(function = "validate_non_negative"))]
    pub base_price: Option<Decimal>,

    #[validate(range(min = 1, max = 365, message = "A duração deve ficar entre 1 e 365 dias."))]
    pub duration_days: Option<i32>,

    pub specialist_status: Option<SpecialistStatus>,

    // Reatribuição de secretária: apenas papéis privilegiados
    pub assigned_secretary_id: Option<Uuid>,

    pub expertise_areas: Option<Vec<String>>,
    pub additional_offerings: Option<Vec<String>>,
    pub certifications: Option<Vec<Certification>>,
}

// Filtros da listagem (query string)
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistFilter {
    pub title: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_draft: Option<bool>,
    pub verification_status: Option<VerificationStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVerificationPayload {
    pub status: VerificationStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingPayload {
    #[validate(custom(function = "validate_rating_range"))]
    #[schema(example = 4.5)]
    pub rating: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistListResponse {
    pub data: Vec<Specialist>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialistStats {
    pub total: i64,
    pub published: i64,
    pub draft: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample(is_draft: bool, status: VerificationStatus) -> Specialist {
        let now = Utc::now();
        Specialist {
            id: Uuid::new_v4(),
            slug: "tax-audit-review".into(),
            title: "Tax & Audit Review".into(),
            description: "desc".into(),
            short_bio: None,
            base_price: Decimal::from_str("1000").unwrap(),
            platform_fee: Decimal::from_str("10").unwrap(),
            final_price: Some(Decimal::from_str("1100").unwrap()),
            average_rating: Decimal::ZERO,
            total_number_of_ratings: 0,
            is_draft,
            verification_status: status,
            is_verified: status == VerificationStatus::Verified,
            specialist_status: SpecialistStatus::Available,
            total_projects_completed: 0,
            duration_days: 30,
            additional_offerings: None,
            expertise_areas: None,
            certifications: None,
            created_by_id: Uuid::new_v4(),
            assigned_secretary_id: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn only_published_and_verified_is_publicly_visible() {
        assert!(sample(false, VerificationStatus::Verified).is_publicly_visible());
        assert!(!sample(true, VerificationStatus::Verified).is_publicly_visible());
        assert!(!sample(false, VerificationStatus::Pending).is_publicly_visible());
        assert!(!sample(false, VerificationStatus::Rejected).is_publicly_visible());
    }

    #[test]
    fn booking_requires_availability_and_verification() {
        let ok = sample(false, VerificationStatus::Verified);
        assert!(ok.can_be_booked());

        let mut busy = sample(false, VerificationStatus::Verified);
        busy.specialist_status = SpecialistStatus::Busy;
        assert!(!busy.can_be_booked());

        let unverified = sample(false, VerificationStatus::InReview);
        assert!(!unverified.can_be_booked());
    }
}
