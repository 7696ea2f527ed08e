// src/models/fees.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tier_name", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TierName {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

// Faixa de preço -> percentual de taxa da plataforma
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformFee {
    pub id: Uuid,
    pub tier_name: TierName,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub platform_fee_percentage: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPlatformFeePayload {
    pub tier_name: TierName,
    pub min_value: Decimal,
    pub max_value: Decimal,
    pub platform_fee_percentage: Decimal,
}

// Consulta de taxa para um preço (usada pelo frontend de precificação)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteQuery {
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuote {
    pub price: Decimal,
    pub platform_fee_percentage: Decimal,
    pub final_price: Decimal,
}
