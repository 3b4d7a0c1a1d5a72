use axum::{extract::State, Json};

use crate::{
    api::models::{stats::StatsResponse, users::CurrentUser},
    db::handlers::Tags,
    errors::Error,
    AppState,
};

/// Dashboard counters for the caller's tags
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard counters", body = StatsResponse),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
    )
)]
#[tracing::instrument(skip_all, fields(admin = %user.email))]
pub async fn stats(State(state): State<AppState>, user: CurrentUser) -> Result<Json<StatsResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut tags = Tags::new(&mut conn);

    let stats = tags.creator_stats(user.id).await?;

    Ok(Json(StatsResponse::from(stats)))
}
