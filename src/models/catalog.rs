// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Entrada do catálogo mestre de serviços
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMaster {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub s3_key: Option<String>,
    pub bucket_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Vínculo N:N especialista <-> serviço do catálogo (único por par)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: Uuid,
    pub specialist_id: Uuid,
    pub service_master_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
}

// Vínculo já com os dados do serviço do catálogo (join de leitura)
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOfferingDetail {
    pub id: Uuid,
    pub specialist_id: Uuid,
    pub service_master_id: Uuid,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceMasterPayload {
    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    pub s3_key: Option<String>,
    pub bucket_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceMasterPayload {
    #[validate(length(min = 1, message = "O título não pode ficar vazio."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub s3_key: Option<String>,
    pub bucket_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceOfferingPayload {
    pub specialist_id: Uuid,
    pub service_master_id: Uuid,
}
