// src/handlers/secretaries.rs

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            PermSecretaryCreate, PermSecretaryDelete, PermSecretaryRead, PermSecretaryUpdate,
            RequirePermission,
        },
    },
    models::secretary::{
        CreateSecretaryPayload, Secretary, SecretaryStats, SecretaryStatus, SecretaryWithUser,
        UpdateSecretaryPayload, VerifySecretaryPayload,
    },
    services::storage::FileUpload,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretaryListQuery {
    pub status: Option<SecretaryStatus>,
}

// GET /api/secretaries
#[utoipa::path(
    get,
    path = "/api/secretaries",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Listagem de secretárias", body = [Secretary]))
)]
pub async fn list_secretaries(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryRead>,
    Query(query): Query<SecretaryListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let secretaries = app_state.secretary_service.list(query.status).await?;
    Ok(Json(ApiResponse::ok(secretaries)))
}

// GET /api/secretaries/{id}
#[utoipa::path(
    get,
    path = "/api/secretaries/{id}",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da secretária")),
    responses(
        (status = 200, description = "Perfil encontrado", body = Secretary),
        (status = 404, description = "Não encontrada")
    )
)]
pub async fn get_secretary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let secretary = app_state.secretary_service.get(id).await?;
    Ok(Json(ApiResponse::ok(secretary)))
}

// GET /api/secretaries/{id}/stats
#[utoipa::path(
    get,
    path = "/api/secretaries/{id}/stats",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da secretária")),
    responses((status = 200, description = "Carga de trabalho derivada", body = SecretaryStats))
)]
pub async fn get_secretary_stats(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.secretary_service.stats(id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

// POST /api/secretaries
//
// Multipart: parte "data" com o JSON do payload, partes opcionais de arquivo
// "avatar" e "banner". Os uploads acontecem antes da transação; a transação
// cria usuário + perfil e, se falhar, os arquivos são removidos.
#[utoipa::path(
    post,
    path = "/api/secretaries",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    responses(
        (status = 201, description = "Secretária e usuário criados", body = SecretaryWithUser),
        (status = 409, description = "E-mail ou número de registro já em uso")
    )
)]
pub async fn create_secretary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryCreate>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut payload: Option<CreateSecretaryPayload> = None;
    let mut avatar: Option<FileUpload> = None;
    let mut banner: Option<FileUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        // Copia o nome antes de consumir o field (text/bytes tomam self)
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "data" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                payload = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| AppError::InvalidInput(format!("JSON inválido: {}", e)))?,
                );
            }
            "avatar" | "banner" => {
                let file_name = field.file_name().unwrap_or("arquivo").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;

                let upload = FileUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                };
                if name == "avatar" {
                    avatar = Some(upload);
                } else {
                    banner = Some(upload);
                }
            }
            _ => {} // campos desconhecidos são ignorados
        }
    }

    let payload = payload
        .ok_or_else(|| AppError::InvalidInput("A parte 'data' é obrigatória.".into()))?;
    payload.validate()?;

    let created = app_state
        .secretary_service
        .create_with_user(payload, avatar, banner)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

// PUT /api/secretaries/{id}
#[utoipa::path(
    put,
    path = "/api/secretaries/{id}",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da secretária")),
    request_body = UpdateSecretaryPayload,
    responses((status = 200, description = "Perfil atualizado", body = Secretary))
)]
pub async fn update_secretary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryUpdate>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSecretaryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let secretary = app_state.secretary_service.update(id, payload).await?;
    Ok(Json(ApiResponse::ok(secretary)))
}

// PATCH /api/secretaries/{id}/verification
#[utoipa::path(
    patch,
    path = "/api/secretaries/{id}/verification",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da secretária")),
    request_body = VerifySecretaryPayload,
    responses((status = 200, description = "Verificação registrada", body = Secretary))
)]
pub async fn verify_secretary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifySecretaryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let secretary = app_state
        .secretary_service
        .set_verification(id, payload, &user)
        .await?;
    Ok(Json(ApiResponse::ok(secretary)))
}

// DELETE /api/secretaries/{id}
#[utoipa::path(
    delete,
    path = "/api/secretaries/{id}",
    tag = "Secretaries",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da secretária")),
    responses((status = 200, description = "Perfil removido"))
)]
pub async fn delete_secretary(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermSecretaryDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.secretary_service.delete(id).await?;
    Ok(Json(ApiResponse::message("Secretária removida.")))
}
