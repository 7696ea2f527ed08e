// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{PermServiceManage, PermServiceRead, RequirePermission},
    },
    models::catalog::{
        CreateServiceMasterPayload, CreateServiceOfferingPayload, ServiceMaster, ServiceOffering,
        ServiceOfferingDetail, UpdateServiceMasterPayload,
    },
};

#[derive(Debug, Deserialize)]
pub struct CatalogSearchQuery {
    pub search: Option<String>,
}

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Catálogo mestre", body = [ServiceMaster]))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceRead>,
    Query(query): Query<CatalogSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let services = app_state
        .catalog_service
        .list_masters(query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(services)))
}

// GET /api/services/{id}
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses((status = 200, description = "Serviço do catálogo", body = ServiceMaster))
)]
pub async fn get_service(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = app_state.catalog_service.get_master(id).await?;
    Ok(Json(ApiResponse::ok(service)))
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    request_body = CreateServiceMasterPayload,
    responses((status = 201, description = "Serviço adicionado ao catálogo", body = ServiceMaster))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceManage>,
    Json(payload): Json<CreateServiceMasterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = app_state.catalog_service.create_master(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(service))))
}

// PUT /api/services/{id}
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do serviço")),
    request_body = UpdateServiceMasterPayload,
    responses((status = 200, description = "Serviço atualizado", body = ServiceMaster))
)]
pub async fn update_service(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceMasterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = app_state.catalog_service.update_master(id, payload).await?;
    Ok(Json(ApiResponse::ok(service)))
}

// DELETE /api/services/{id}
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do serviço")),
    responses((status = 200, description = "Serviço removido do catálogo"))
)]
pub async fn delete_service(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceManage>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_master(id).await?;
    Ok(Json(ApiResponse::message("Serviço removido do catálogo.")))
}

// GET /api/offerings/specialist/{id}
#[utoipa::path(
    get,
    path = "/api/offerings/specialist/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do especialista")),
    responses((status = 200, description = "Serviços oferecidos pelo especialista", body = [ServiceOfferingDetail]))
)]
pub async fn list_offerings_by_specialist(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let offerings = app_state.catalog_service.list_by_specialist(id).await?;
    Ok(Json(ApiResponse::ok(offerings)))
}

// GET /api/offerings/service/{id}
#[utoipa::path(
    get,
    path = "/api/offerings/service/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do serviço do catálogo")),
    responses((status = 200, description = "Especialistas que oferecem o serviço", body = [ServiceOffering]))
)]
pub async fn list_offerings_by_service(
    State(app_state): State<AppState>,
    _perm: RequirePermission<PermServiceRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let offerings = app_state.catalog_service.list_by_service(id).await?;
    Ok(Json(ApiResponse::ok(offerings)))
}

// POST /api/offerings
#[utoipa::path(
    post,
    path = "/api/offerings",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    request_body = CreateServiceOfferingPayload,
    responses(
        (status = 201, description = "Serviço vinculado", body = ServiceOffering),
        (status = 409, description = "Par especialista/serviço já existe")
    )
)]
pub async fn create_offering(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateServiceOfferingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let offering = app_state
        .catalog_service
        .create_offering(payload, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(offering))))
}

// DELETE /api/offerings/{id}
#[utoipa::path(
    delete,
    path = "/api/offerings/{id}",
    tag = "Service Catalog",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses((status = 200, description = "Vínculo removido"))
)]
pub async fn delete_offering(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_offering(id, &user).await?;
    Ok(Json(ApiResponse::message("Vínculo de serviço removido.")))
}
