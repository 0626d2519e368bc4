//! Handlers for registration, login and the session profile.

use crate::apis::into_api_error;
use crate::auth::{issue_token, AuthActor};
use crate::server::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use store_types::{ApiError, LoginRequest, LoginResponse, RegisterRequest, UserProfile};

/// Handles POST /api/auth/register.
pub async fn register(
	State(state): State<AppState>,
	Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
	let profile = state.engine.register(req).await.map_err(into_api_error)?;
	Ok((StatusCode::CREATED, Json(profile)))
}

/// Handles POST /api/auth/login.
pub async fn login(
	State(state): State<AppState>,
	Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
	let user = state
		.engine
		.verify_credentials(&req.username, &req.password)
		.await
		.map_err(into_api_error)?;

	let access_token = issue_token(&user.actor(), &state.engine.config().auth)?;
	Ok(Json(LoginResponse {
		access_token,
		user: UserProfile::from(&user),
	}))
}

/// Handles GET /api/auth/profile.
pub async fn profile(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
) -> Result<Json<UserProfile>, ApiError> {
	let user = state
		.engine
		.get_user(&actor.id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(UserProfile::from(&user)))
}
