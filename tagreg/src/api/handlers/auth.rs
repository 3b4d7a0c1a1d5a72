use axum::{extract::State, Json};

use crate::{
    api::models::{
        auth::{LoginRequest, LoginResponse, VerifyResponse},
        users::{CurrentUser, UserResponse},
    },
    auth::{password, session},
    db::handlers::Users,
    errors::Error,
    AppState,
};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    // Find admin by email; unknown addresses get the same answer as bad
    // passwords
    let user = user_repo
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        })?;

    // Verify password on a blocking thread to avoid blocking the async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    let current_user = CurrentUser::from(user.clone());
    let token = session::create_session_token(&current_user, &state.config)?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Echo the decoded session
#[utoipa::path(
    get,
    path = "/api/auth/verify",
    tag = "auth",
    responses(
        (status = 200, description = "Session is valid", body = VerifyResponse),
        (status = 401, description = "No token provided"),
        (status = 403, description = "Invalid or expired token"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn verify(user: CurrentUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { user })
}
