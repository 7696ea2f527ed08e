// src/handlers/specialists.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{PermSpecialistCreate, RequirePermission},
    },
    models::specialist::{
        CreateSpecialistPayload, RatingPayload, Specialist, SpecialistFilter,
        SpecialistListResponse, SpecialistStats, UpdateSpecialistPayload,
        UpdateVerificationPayload,
    },
};

// GET /api/specialists
#[utoipa::path(
    get,
    path = "/api/specialists",
    tag = "Specialists",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Listagem pública (gestão enxerga rascunhos)", body = SpecialistListResponse))
)]
pub async fn list_specialists(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<SpecialistFilter>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state.specialist_service.list(&filter, &user).await?;
    Ok(Json(ApiResponse::ok(response)))
}

// GET /api/specialists/stats
#[utoipa::path(
    get,
    path = "/api/specialists/stats",
    tag = "Specialists",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Totais de anúncios", body = SpecialistStats))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.specialist_service.stats(&user).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

// GET /api/specialists/{id}
#[utoipa::path(
    get,
    path = "/api/specialists/{id}",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses(
        (status = 200, description = "Anúncio encontrado", body = Specialist),
        (status = 404, description = "Não encontrado")
    )
)]
pub async fn get_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let specialist = app_state.specialist_service.get(id, &user).await?;
    Ok(Json(ApiResponse::ok(specialist)))
}

// POST /api/specialists
#[utoipa::path(
    post,
    path = "/api/specialists",
    tag = "Specialists",
    security(("api_jwt" = [])),
    request_body = CreateSpecialistPayload,
    responses((status = 201, description = "Criado como rascunho", body = Specialist))
)]
pub async fn create_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermSpecialistCreate>,
    Json(payload): Json<CreateSpecialistPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let specialist = app_state.specialist_service.create(payload, &user).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(specialist))))
}

// PUT /api/specialists/{id}
#[utoipa::path(
    put,
    path = "/api/specialists/{id}",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    request_body = UpdateSpecialistPayload,
    responses(
        (status = 200, description = "Anúncio atualizado", body = Specialist),
        (status = 403, description = "Sem posse do recurso")
    )
)]
pub async fn update_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSpecialistPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let specialist = app_state
        .specialist_service
        .update(id, payload, &user)
        .await?;
    Ok(Json(ApiResponse::ok(specialist)))
}

// DELETE /api/specialists/{id}
#[utoipa::path(
    delete,
    path = "/api/specialists/{id}",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses((status = 200, description = "Anúncio removido"))
)]
pub async fn delete_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.specialist_service.delete(id, &user).await?;
    Ok(Json(ApiResponse::message("Especialista removido.")))
}

// POST /api/specialists/{id}/publish
#[utoipa::path(
    post,
    path = "/api/specialists/{id}/publish",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses((status = 200, description = "Publicado (a verificação não muda)", body = Specialist))
)]
pub async fn publish_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let specialist = app_state
        .specialist_service
        .set_published(id, true, &user)
        .await?;
    Ok(Json(ApiResponse::ok(specialist)))
}

// POST /api/specialists/{id}/unpublish
#[utoipa::path(
    post,
    path = "/api/specialists/{id}/unpublish",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses((status = 200, description = "De volta a rascunho", body = Specialist))
)]
pub async fn unpublish_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let specialist = app_state
        .specialist_service
        .set_published(id, false, &user)
        .await?;
    Ok(Json(ApiResponse::ok(specialist)))
}

// PATCH /api/specialists/{id}/verification
#[utoipa::path(
    patch,
    path = "/api/specialists/{id}/verification",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    request_body = UpdateVerificationPayload,
    responses(
        (status = 200, description = "Estado de verificação alterado", body = Specialist),
        (status = 403, description = "Apenas super admin")
    )
)]
pub async fn update_verification(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVerificationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let specialist = app_state
        .specialist_service
        .set_verification_status(id, payload.status, &user)
        .await?;
    Ok(Json(ApiResponse::ok(specialist)))
}

// POST /api/specialists/{id}/rating
#[utoipa::path(
    post,
    path = "/api/specialists/{id}/rating",
    tag = "Specialists",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    request_body = RatingPayload,
    responses((status = 200, description = "Média recalculada", body = Specialist))
)]
pub async fn rate_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RatingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let specialist = app_state
        .specialist_service
        .rate(id, payload.rating)
        .await?;
    Ok(Json(ApiResponse::ok(specialist)))
}
