use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::restrooms::dtos::{
    ListRestroomsQuery, RestroomDeletedDto, RestroomDto, UpsertRestroomDto,
};
use crate::features::restrooms::services::RestroomService;
use crate::shared::types::ErrorResponse;

/// List the restroom catalog
///
/// Active restrooms only unless `includeInactive=true`.
#[utoipa::path(
    get,
    path = "/api/restrooms",
    params(
        ("includeInactive" = Option<bool>, Query, description = "Include deactivated restrooms")
    ),
    responses(
        (status = 200, description = "Restroom catalog", body = Vec<RestroomDto>),
    ),
    tag = "restrooms"
)]
pub async fn list_restrooms(
    State(service): State<Arc<RestroomService>>,
    AppQuery(query): AppQuery<ListRestroomsQuery>,
) -> Result<Json<Vec<RestroomDto>>> {
    let restrooms = service.list(query.include_inactive).await?;
    Ok(Json(restrooms))
}

/// Get an active restroom by id (QR landing lookup)
#[utoipa::path(
    get,
    path = "/api/restrooms/{id}",
    params(
        ("id" = String, Path, description = "Restroom id")
    ),
    responses(
        (status = 200, description = "Restroom found", body = RestroomDto),
        (status = 404, description = "Restroom missing or inactive", body = ErrorResponse)
    ),
    tag = "restrooms"
)]
pub async fn get_restroom(
    State(service): State<Arc<RestroomService>>,
    Path(id): Path<String>,
) -> Result<Json<RestroomDto>> {
    let restroom = service.get_active(&id).await?;
    Ok(Json(restroom))
}

/// Create or replace a restroom
#[utoipa::path(
    put,
    path = "/api/restrooms/{id}",
    params(
        ("id" = String, Path, description = "Restroom id")
    ),
    request_body = UpsertRestroomDto,
    responses(
        (status = 200, description = "Restroom saved", body = RestroomDto),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 401, description = "Missing or wrong admin credentials")
    ),
    tag = "restrooms"
)]
pub async fn upsert_restroom(
    State(service): State<Arc<RestroomService>>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpsertRestroomDto>,
) -> Result<Json<RestroomDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let restroom = service.upsert(&id, dto).await?;
    Ok(Json(restroom))
}

/// Delete a restroom
///
/// Restrooms that already have reports cannot be deleted; deactivate them instead.
#[utoipa::path(
    delete,
    path = "/api/restrooms/{id}",
    params(
        ("id" = String, Path, description = "Restroom id")
    ),
    responses(
        (status = 200, description = "Restroom deleted", body = RestroomDeletedDto),
        (status = 401, description = "Missing or wrong admin credentials"),
        (status = 404, description = "Restroom not found", body = ErrorResponse),
        (status = 409, description = "Restroom still has reports", body = ErrorResponse)
    ),
    tag = "restrooms"
)]
pub async fn delete_restroom(
    State(service): State<Arc<RestroomService>>,
    Path(id): Path<String>,
) -> Result<Json<RestroomDeletedDto>> {
    service.delete(&id).await?;
    Ok(Json(RestroomDeletedDto { ok: true, id }))
}
