// src/handlers/media.rs

use axum::{
    extract::{Multipart, Path, State},
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
        rbac::{PermMediaRead, PermMediaUpload, RequirePermission},
    },
    models::media::{Media, MediaType, UpdateMediaPayload},
    services::storage::FileUpload,
};

// GET /api/media/specialist/{id}
#[utoipa::path(
    get,
    path = "/api/media/specialist/{id}",
    tag = "Media",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses((status = 200, description = "Galeria em ordem de exibição", body = [Media]))
)]
pub async fn list_by_specialist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermMediaRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let media = app_state.media_service.list_by_specialist(id, &user).await?;
    Ok(Json(ApiResponse::ok(media)))
}

// POST /api/media
//
// Multipart: "specialistId", opcionais "mediaType"/"displayOrder" e a parte
// de arquivo "file".
#[utoipa::path(
    post,
    path = "/api/media",
    tag = "Media",
    security(("api_jwt" = [])),
    responses(
        (status = 201, description = "Arquivo enviado e vinculado", body = Media),
        (status = 400, description = "Multipart incompleto ou tipo não suportado")
    )
)]
pub async fn upload_media(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _perm: RequirePermission<PermMediaUpload>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut specialist_id: Option<Uuid> = None;
    let mut media_type: Option<MediaType> = None;
    let mut display_order: Option<i32> = None;
    let mut file: Option<FileUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        // Copia o nome antes de consumir o field (text/bytes tomam self)
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "specialistId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                specialist_id = Some(
                    text.parse()
                        .map_err(|_| AppError::InvalidInput("specialistId inválido.".into()))?,
                );
            }
            "mediaType" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                media_type = Some(MediaType::parse(&text).ok_or_else(|| {
                    AppError::InvalidInput(format!("mediaType desconhecido: {}", text))
                })?);
            }
            "displayOrder" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                display_order = Some(
                    text.parse()
                        .map_err(|_| AppError::InvalidInput("displayOrder inválido.".into()))?,
                );
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("arquivo").to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;

                file = Some(FileUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let specialist_id = specialist_id
        .ok_or_else(|| AppError::InvalidInput("A parte 'specialistId' é obrigatória.".into()))?;
    let file = file.ok_or_else(|| AppError::InvalidInput("A parte 'file' é obrigatória.".into()))?;

    let media = app_state
        .media_service
        .upload(specialist_id, file, media_type, display_order, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(media))))
}

// PUT /api/media/{id}
#[utoipa::path(
    put,
    path = "/api/media/{id}",
    tag = "Media",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da mídia")),
    request_body = UpdateMediaPayload,
    responses((status = 200, description = "Ordem/tipo atualizados", body = Media))
)]
pub async fn update_media(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMediaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let media = app_state.media_service.update(id, payload, &user).await?;
    Ok(Json(ApiResponse::ok(media)))
}

// DELETE /api/media/{id}
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    tag = "Media",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da mídia")),
    responses((status = 200, description = "Mídia removida"))
)]
pub async fn delete_media(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.media_service.delete(id, &user).await?;
    Ok(Json(ApiResponse::message("Mídia removida.")))
}
