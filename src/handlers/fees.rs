// src/handlers/fees.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, lifecycle, response::ApiResponse},
    config::AppState,
    middleware::rbac::{PermPlatformFeeManage, PermPlatformFeeRead, RequirePermission},
    models::fees::{FeeQuote, FeeQuoteQuery, PlatformFee, UpsertPlatformFeePayload},
};

// GET /api/fees
#[utoipa::path(
    get,
    path = "/api/fees",
    tag = "Platform Fees",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Faixas vigentes", body = [PlatformFee]))
)]
pub async fn list_fees(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPlatformFeeRead>,
) -> Result<impl IntoResponse, AppError> {
    let tiers = app_state.fee_repo.list_all().await?;
    Ok(Json(ApiResponse::ok(tiers)))
}

// GET /api/fees/quote?price=...
//
// Sem faixa para o preço não é erro: cai no percentual padrão (com aviso
// no log, já que é lacuna de configuração).
#[utoipa::path(
    get,
    path = "/api/fees/quote",
    tag = "Platform Fees",
    security(("api_jwt" = [])),
    params(("price" = String, Query, description = "Preço base a cotar")),
    responses((status = 200, description = "Percentual e preço final derivados", body = FeeQuote))
)]
pub async fn quote_fee(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPlatformFeeRead>,
    Query(query): Query<FeeQuoteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let tiers = app_state.fee_repo.list_all().await?;
    let percentage = lifecycle::resolve_platform_fee(query.price, &tiers);

    Ok(Json(ApiResponse::ok(FeeQuote {
        price: query.price,
        platform_fee_percentage: percentage,
        final_price: lifecycle::final_price(query.price, percentage),
    })))
}

// PUT /api/fees
#[utoipa::path(
    put,
    path = "/api/fees",
    tag = "Platform Fees",
    security(("api_jwt" = [])),
    request_body = UpsertPlatformFeePayload,
    responses((status = 200, description = "Faixa criada ou sobrescrita", body = PlatformFee))
)]
pub async fn upsert_fee(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermPlatformFeeManage>,
    Json(payload): Json<UpsertPlatformFeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.min_value > payload.max_value {
        return Err(AppError::InvalidInput(
            "min_value não pode ser maior que max_value.".into(),
        ));
    }

    let tier = app_state
        .fee_repo
        .upsert(
            payload.tier_name,
            payload.min_value,
            payload.max_value,
            payload.platform_fee_percentage,
        )
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(tier))))
}
