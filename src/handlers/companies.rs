// src/handlers/companies.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermCompanyCreate, RequirePermission},
    },
    models::company::{Company, ComplianceReport, CreateCompanyPayload, UpdateCompanyPayload},
};

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Companies",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Empresas visíveis para o chamador", body = [Company]))
)]
pub async fn list_companies(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let companies = app_state.company_service.list(&user).await?;
    Ok(Json(ApiResponse::ok(companies)))
}

// GET /api/companies/{id}
#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses(
        (status = 200, description = "Empresa encontrada", body = Company),
        (status = 403, description = "Sem acesso"),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn get_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company = app_state.company_service.get(id, &user).await?;
    Ok(Json(ApiResponse::ok(company)))
}

// GET /api/companies/{id}/compliance
#[utoipa::path(
    get,
    path = "/api/companies/{id}/compliance",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 200, description = "Situação derivada na leitura", body = ComplianceReport))
)]
pub async fn get_compliance(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.company_service.compliance(id, &user).await?;
    Ok(Json(ApiResponse::ok(report)))
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Companies",
    security(("api_jwt" = [])),
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada", body = Company),
        (status = 409, description = "Número de registro já em uso")
    )
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermCompanyCreate>,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state.company_service.create(payload, &user).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(company))))
}

// PUT /api/companies/{id}
#[utoipa::path(
    put,
    path = "/api/companies/{id}",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da empresa")),
    request_body = UpdateCompanyPayload,
    responses((status = 200, description = "Empresa atualizada", body = Company))
)]
pub async fn update_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let company = app_state.company_service.update(id, payload, &user).await?;
    Ok(Json(ApiResponse::ok(company)))
}

// DELETE /api/companies/{id}
#[utoipa::path(
    delete,
    path = "/api/companies/{id}",
    tag = "Companies",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 200, description = "Empresa removida"))
)]
pub async fn delete_company(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.company_service.delete(id, &user).await?;
    Ok(Json(ApiResponse::message("Empresa removida.")))
}
