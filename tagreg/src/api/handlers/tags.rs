use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    api::models::{
        tags::{GenerateQrResponse, StatusResponse, TagListEntry},
        users::CurrentUser,
    },
    db::handlers::{Pets, Repository, Tags},
    db::models::tags::TagCreateDBRequest,
    errors::Error,
    qr, AppState,
};

/// Issue a new tag and render its QR image
#[utoipa::path(
    post,
    path = "/api/qr/generate",
    tag = "qr",
    responses(
        (status = 200, description = "Tag issued", body = GenerateQrResponse),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %user.email))]
pub async fn generate(State(state): State<AppState>, user: CurrentUser) -> Result<Json<GenerateQrResponse>, Error> {
    // Random UUID token; the collision space makes a uniqueness retry loop
    // unnecessary.
    let code = Uuid::new_v4().to_string();

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut tags = Tags::new(&mut conn);
    let tag = tags
        .create(&TagCreateDBRequest {
            code,
            created_by: user.id,
        })
        .await?;

    let qr_url = state.config.registration_url(&tag.code);
    let qr_image = qr::render_data_url(&qr_url)?;

    Ok(Json(GenerateQrResponse {
        qr: tag.into(),
        qr_url,
        qr_image,
    }))
}

/// List the caller's tags with their bound pets, newest first
#[utoipa::path(
    get,
    path = "/api/qr/list",
    tag = "qr",
    responses(
        (status = 200, description = "Tags with registration state", body = Vec<TagListEntry>),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %user.email))]
pub async fn list(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Vec<TagListEntry>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut tags = Tags::new(&mut conn);

    let entries = tags.list_with_pets(user.id).await?;

    Ok(Json(entries.into_iter().map(TagListEntry::from).collect()))
}

/// Registration status of one tag (public)
#[utoipa::path(
    get,
    path = "/api/qr/{code}/status",
    tag = "qr",
    params(("code" = String, Path, description = "Tag code")),
    responses(
        (status = 200, description = "Registration status", body = StatusResponse),
        (status = 404, description = "Unknown tag"),
    )
)]
#[tracing::instrument(skip_all, fields(code = %code))]
pub async fn status(State(state): State<AppState>, Path(code): Path<String>) -> Result<Json<StatusResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut tags = Tags::new(&mut conn);
    let tag = tags.get_by_code(&code).await?.ok_or_else(|| Error::NotFound {
        resource: "tag".to_string(),
        id: code.clone(),
    })?;

    let mut pets = Pets::new(&mut conn);
    let pet = pets.get_by_tag_id(tag.id).await?;

    Ok(Json(StatusResponse {
        registered: pet.is_some(),
        mascota: pet.map(Into::into),
        qr: tag.into(),
    }))
}
