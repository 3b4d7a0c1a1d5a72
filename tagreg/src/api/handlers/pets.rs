use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts, Path, Query, State},
    http::request::Parts,
    Json,
};

use crate::{
    api::models::{
        pets::{
            DeletePetResponse, LookupResponse, PetSearchResult, RegisterPetRequest, RegisterPetResponse, ScanQuery, SearchQuery,
            UpdatePetRequest, UpdatePetResponse,
        },
        users::CurrentUser,
    },
    db::handlers::{Pets, Repository, Scans, Tags},
    db::models::{
        pets::{PetCreateDBRequest, PetUpdateDBRequest},
        scans::ScanCreateDBRequest,
    },
    errors::Error,
    notifications,
    types::PetId,
    AppState,
};

/// The connecting client's socket address, when the listener provides it.
///
/// Falls back to `None` instead of rejecting so handlers also work in test
/// harnesses that serve without connect info.
pub struct ClientAddr(pub Option<SocketAddr>);

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0)))
    }
}

fn require_field(value: &str, name: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::BadRequest {
            message: format!("Field '{name}' is required"),
        });
    }
    Ok(())
}

/// Bind owner/pet data to an issued tag (public)
#[utoipa::path(
    post,
    path = "/api/mascotas/registrar",
    request_body = RegisterPetRequest,
    tag = "mascotas",
    responses(
        (status = 200, description = "Pet registered", body = RegisterPetResponse),
        (status = 400, description = "Missing required field"),
        (status = 404, description = "Unknown tag"),
        (status = 409, description = "Tag already registered"),
    )
)]
#[tracing::instrument(skip_all, fields(code = %request.code))]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterPetRequest>) -> Result<Json<RegisterPetResponse>, Error> {
    require_field(&request.code, "codigo_qr")?;
    require_field(&request.pet_name, "nombre_mascota")?;
    require_field(&request.owner_name, "nombre_dueno")?;
    require_field(&request.owner_address, "direccion_dueno")?;
    require_field(&request.owner_email, "email_dueno")?;
    require_field(&request.owner_phone, "telefono_dueno")?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut tags = Tags::new(&mut conn);
    let tag = tags.get_by_code(&request.code).await?.ok_or_else(|| Error::NotFound {
        resource: "tag".to_string(),
        id: request.code.clone(),
    })?;

    let mut pets = Pets::new(&mut conn);
    if pets.get_by_tag_id(tag.id).await?.is_some() {
        return Err(Error::Conflict {
            message: "This tag is already registered".to_string(),
        });
    }

    // A concurrent registration that slips past the check above still ends up
    // as a 409 via the UNIQUE constraint on pets.tag_id.
    let pet = pets
        .create(&PetCreateDBRequest {
            tag_id: tag.id,
            pet_name: request.pet_name,
            owner_name: request.owner_name,
            owner_address: request.owner_address,
            owner_email: request.owner_email,
            owner_phone: request.owner_phone,
        })
        .await?;

    notifications::spawn_registration_notifications(&state, pet.clone(), tag);

    Ok(Json(RegisterPetResponse {
        success: true,
        mascota: pet.into(),
        message: "Pet registered successfully".to_string(),
    }))
}

/// Public lookup of a registered tag: returns the pet, records a scan event,
/// and alerts the owner and issuing admin
#[utoipa::path(
    get,
    path = "/api/mascotas/qr/{code}",
    tag = "mascotas",
    params(("code" = String, Path, description = "Tag code"), ScanQuery),
    responses(
        (status = 200, description = "Pet contact data", body = LookupResponse),
        (status = 404, description = "Unknown or unregistered tag"),
    )
)]
#[tracing::instrument(skip_all, fields(code = %code))]
pub async fn lookup(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ScanQuery>,
    ClientAddr(addr): ClientAddr,
) -> Result<Json<LookupResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let mut tags = Tags::new(&mut conn);
    let tag = tags.get_by_code(&code).await?.ok_or_else(|| Error::NotFound {
        resource: "tag".to_string(),
        id: code.clone(),
    })?;

    let mut pets = Pets::new(&mut conn);
    let pet = pets.get_by_tag_id(tag.id).await?.ok_or_else(|| Error::NotFound {
        resource: "registration for tag".to_string(),
        id: code.clone(),
    })?;

    // Every lookup of a registered tag is a real-world scan worth recording;
    // repeated scans each append a new event and re-notify.
    let mut scans = Scans::new(&mut conn);
    let scan = scans
        .create(&ScanCreateDBRequest {
            tag_id: tag.id,
            latitude: query.lat,
            longitude: query.lng,
            source_ip: addr.map(|a| a.ip().to_string()),
        })
        .await?;

    notifications::spawn_scan_notifications(&state, pet.clone(), tag.clone(), scan.clone());

    Ok(Json(LookupResponse {
        mascota: pet.into(),
        qr: tag.into(),
        scan: scan.into(),
    }))
}

/// Update any subset of a pet's fields
#[utoipa::path(
    put,
    path = "/api/mascotas/{id}",
    request_body = UpdatePetRequest,
    tag = "mascotas",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet updated", body = UpdatePetResponse),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Unknown pet"),
    )
)]
#[tracing::instrument(skip_all, fields(pet_id = %id))]
pub async fn update_pet(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<PetId>,
    Json(request): Json<UpdatePetRequest>,
) -> Result<Json<UpdatePetResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut pets = Pets::new(&mut conn);

    let pet = pets
        .update(
            id,
            &PetUpdateDBRequest {
                pet_name: request.pet_name,
                owner_name: request.owner_name,
                owner_address: request.owner_address,
                owner_email: request.owner_email,
                owner_phone: request.owner_phone,
            },
        )
        .await?;

    Ok(Json(UpdatePetResponse {
        success: true,
        mascota: pet.into(),
    }))
}

/// Delete a pet record; its tag stays active and becomes reusable
#[utoipa::path(
    delete,
    path = "/api/mascotas/{id}",
    tag = "mascotas",
    params(("id" = String, Path, description = "Pet id")),
    responses(
        (status = 200, description = "Pet deleted", body = DeletePetResponse),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
        (status = 404, description = "Unknown pet"),
    )
)]
#[tracing::instrument(skip_all, fields(pet_id = %id))]
pub async fn delete_pet(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<PetId>,
) -> Result<Json<DeletePetResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut pets = Pets::new(&mut conn);

    if !pets.delete(id).await? {
        return Err(Error::NotFound {
            resource: "pet".to_string(),
            id: id.to_string(),
        });
    }

    Ok(Json(DeletePetResponse { success: true }))
}

/// Case-insensitive substring search across owner name, owner email and pet name
#[utoipa::path(
    get,
    path = "/api/mascotas/buscar",
    tag = "mascotas",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching pets with their tags", body = Vec<PetSearchResult>),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
    )
)]
#[tracing::instrument(skip_all, fields(query = %query.q))]
pub async fn search(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<PetSearchResult>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut pets = Pets::new(&mut conn);

    let matches = pets.search_with_tags(&query.q).await?;

    Ok(Json(matches.into_iter().map(PetSearchResult::from).collect()))
}
