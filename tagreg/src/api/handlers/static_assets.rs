//! HTTP handlers for static asset serving.

use axum::{
    body::Body,
    http::{Response, StatusCode, Uri},
    response::IntoResponse,
};
use tracing::instrument;

use crate::static_assets;

/// Serve embedded static assets. `/` maps to `index.html`, and extensionless
/// paths like `/admin` map to `admin.html`.
#[instrument]
pub async fn serve_embedded_asset(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    if path.is_empty() || path.ends_with('/') {
        path.push_str("index.html");
    } else if !path.contains('.') {
        path.push_str(".html");
    }

    if let Some(content) = static_assets::Assets::get(&path) {
        let mime = mime_guess::from_path(&path).first_or_octet_stream();

        return Response::builder()
            .header(axum::http::header::CONTENT_TYPE, mime.as_ref())
            .header(axum::http::header::CACHE_CONTROL, "no-cache")
            .body(Body::from(content.data.into_owned()))
            .unwrap();
    }

    Response::builder().status(StatusCode::NOT_FOUND).body(Body::empty()).unwrap()
}
