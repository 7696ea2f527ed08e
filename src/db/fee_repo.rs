// src/db/fee_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::fees::{PlatformFee, TierName},
};

#[derive(Clone)]
pub struct FeeRepository {
    pool: PgPool,
}

impl FeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<PlatformFee>, AppError> {
        let tiers = sqlx::query_as::<_, PlatformFee>(
            "SELECT * FROM platform_fee ORDER BY min_value ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tiers)
    }

    // Faixa cobrindo o preço (inclusive nas duas pontas); None é lacuna
    // operacional esperada, o chamador aplica o percentual padrão.
    pub async fn find_tier_for(&self, price: Decimal) -> Result<Option<PlatformFee>, AppError> {
        let maybe = sqlx::query_as::<_, PlatformFee>(
            "SELECT * FROM platform_fee WHERE min_value <= $1 AND max_value >= $1",
        )
        .bind(price)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Uma linha por faixa: criar ou sobrescrever pela chave tier_name
    pub async fn upsert(
        &self,
        tier_name: TierName,
        min_value: Decimal,
        max_value: Decimal,
        platform_fee_percentage: Decimal,
    ) -> Result<PlatformFee, AppError> {
        let tier = sqlx::query_as::<_, PlatformFee>(
            r#"
            INSERT INTO platform_fee (tier_name, min_value, max_value, platform_fee_percentage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tier_name) DO UPDATE SET
                min_value = EXCLUDED.min_value,
                max_value = EXCLUDED.max_value,
                platform_fee_percentage = EXCLUDED.platform_fee_percentage,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tier_name)
        .bind(min_value)
        .bind(max_value)
        .bind(platform_fee_percentage)
        .fetch_one(&self.pool)
        .await?;

        Ok(tier)
    }
}
