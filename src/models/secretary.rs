// src/models/secretary.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::lifecycle;
use crate::models::specialist::Certification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "secretary_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SecretaryStatus {
    Active,
    OnLeave,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "secretary_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SecretaryType {
    Corporate,
    Individual,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactInformation {
    pub office_phone: Option<String>,
    pub mobile_phone: Option<String>,
    pub office_address: Option<String>,
    pub emergency_contact: Option<String>,
}

// Perfil profissional de secretária, 1:1 com um usuário
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Secretary {
    pub id: Uuid,

    #[schema(example = "SSM-2024-001234")]
    pub registration_number: String,

    pub secretary_type: SecretaryType,
    pub status: SecretaryStatus,

    pub registration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,

    pub qualification: Option<String>,
    pub company_name: Option<String>,
    pub experience: Option<String>,

    #[schema(value_type = Option<Vec<String>>)]
    pub areas_of_expertise: Option<Json<Vec<String>>>,
    #[schema(value_type = Option<Vec<Certification>>)]
    pub certifications: Option<Json<Vec<Certification>>>,

    // Contadores de vínculos. Mutados apenas pelos fluxos que também
    // reavaliam as flags de aceitação (nunca de forma independente).
    pub total_companies_managed: i32,
    pub total_specialists_managed: i32,

    pub satisfaction_rate: Decimal,
    pub years_of_experience: i32,

    pub is_verified: bool,
    pub verification_notes: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by_id: Option<Uuid>,

    pub hourly_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,

    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub availability_schedule: Option<String>,

    pub is_accepting_new_companies: bool,
    pub is_accepting_new_specialists: bool,

    #[schema(value_type = Option<ContactInformation>)]
    pub contact_information: Option<Json<ContactInformation>>,

    pub user_id: Uuid,
    pub manager_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Secretary {
    pub fn is_available(&self) -> bool {
        self.status == SecretaryStatus::Active && self.is_verified
    }

    // Derivado dos contadores; nunca armazenado como fonte de verdade
    pub fn workload_percentage(&self) -> Decimal {
        lifecycle::workload_percentage(self.total_companies_managed, self.total_specialists_managed)
    }

    pub fn is_overloaded(&self) -> bool {
        self.workload_percentage() >= Decimal::from(80)
    }

    pub fn can_take_more_companies(&self) -> bool {
        self.is_accepting_new_companies && self.is_available()
    }

    pub fn can_take_more_specialists(&self) -> bool {
        self.is_accepting_new_specialists && self.is_available()
    }
}

// Payload de criação de secretária COM o usuário vinculado (onboarding
// iniciado por admin). Roda em uma única transação no serviço.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretaryPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 8, message = "A senha deve ter no mínimo 8 caracteres."))]
    pub password: String,

    #[validate(length(min = 1, message = "O nome completo é obrigatório."))]
    pub full_name: String,

    pub phone_number: Option<String>,

    #[validate(length(min = 1, message = "O número de registro é obrigatório."))]
    pub registration_number: String,

    pub secretary_type: Option<SecretaryType>,
    pub registration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub qualification: Option<String>,
    pub company_name: Option<String>,
    pub experience: Option<String>,
    pub areas_of_expertise: Option<Vec<String>>,
    pub years_of_experience: Option<i32>,
    pub hourly_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
    pub contact_information: Option<ContactInformation>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecretaryPayload {
    pub status: Option<SecretaryStatus>,
    pub secretary_type: Option<SecretaryType>,
    pub qualification: Option<String>,
    pub company_name: Option<String>,
    pub experience: Option<String>,
    pub areas_of_expertise: Option<Vec<String>>,
    pub certifications: Option<Vec<Certification>>,
    pub years_of_experience: Option<i32>,
    pub hourly_rate: Option<Decimal>,
    pub monthly_rate: Option<Decimal>,
    pub availability_schedule: Option<String>,
    pub contact_information: Option<ContactInformation>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifySecretaryPayload {
    pub is_verified: bool,
    pub verification_notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretaryStats {
    pub workload: Decimal,
    pub is_overloaded: bool,
    pub is_available: bool,
}

// Resposta do onboarding: perfil + usuário recém-criado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecretaryWithUser {
    #[serde(flatten)]
    pub secretary: Secretary,
    pub user: crate::models::auth::User,
}
