//! OpenAPI documentation configuration.
//!
//! Aggregates the annotated handler paths into one document, rendered by
//! RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::api::{handlers, models};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "tagreg API",
        description = "Pet-tag QR registration service: issue QR tags, register pets, alert owners on scans."
    ),
    paths(
        handlers::auth::login,
        handlers::auth::verify,
        handlers::tags::generate,
        handlers::tags::list,
        handlers::tags::status,
        handlers::pets::register,
        handlers::pets::lookup,
        handlers::pets::update_pet,
        handlers::pets::delete_pet,
        handlers::pets::search,
        handlers::stats::stats,
    ),
    components(schemas(
        models::auth::LoginRequest,
        models::auth::LoginResponse,
        models::auth::VerifyResponse,
        models::users::UserResponse,
        models::users::CurrentUser,
        models::users::Role,
        models::tags::TagResponse,
        models::tags::GenerateQrResponse,
        models::tags::TagListEntry,
        models::tags::StatusResponse,
        models::pets::PetResponse,
        models::pets::RegisterPetRequest,
        models::pets::RegisterPetResponse,
        models::pets::LookupResponse,
        models::pets::UpdatePetRequest,
        models::pets::UpdatePetResponse,
        models::pets::DeletePetResponse,
        models::pets::PetSearchResult,
        models::scans::ScanResponse,
        models::stats::StatsResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_doc_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/api/qr/generate"));
        assert!(json.contains("/api/mascotas/registrar"));
    }
}
