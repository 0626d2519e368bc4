//! Handlers for the buyer's shopping cart.

use crate::apis::into_api_error;
use crate::auth::AuthActor;
use crate::server::AppState;
use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::Json,
};
use store_types::{AddCartItem, ApiError, CartView, UpdateCartItem};

/// Handles GET /api/cart.
pub async fn view_cart(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
) -> Result<Json<CartView>, ApiError> {
	let view = state.engine.view_cart(&actor).await.map_err(into_api_error)?;
	Ok(Json(view))
}

/// Handles POST /api/cart/items.
pub async fn add_item(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Json(req): Json<AddCartItem>,
) -> Result<(StatusCode, Json<CartView>), ApiError> {
	let view = state
		.engine
		.add_cart_item(&actor, req)
		.await
		.map_err(into_api_error)?;
	Ok((StatusCode::CREATED, Json(view)))
}

/// Handles PUT /api/cart/items/{id}.
pub async fn update_item(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
	Json(req): Json<UpdateCartItem>,
) -> Result<Json<CartView>, ApiError> {
	let view = state
		.engine
		.update_cart_item(&actor, &id, req)
		.await
		.map_err(into_api_error)?;
	Ok(Json(view))
}

/// Handles DELETE /api/cart/items/{id}.
pub async fn remove_item(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
	let view = state
		.engine
		.remove_cart_item(&actor, &id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(view))
}

/// Handles DELETE /api/cart.
pub async fn clear_cart(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
) -> Result<Json<CartView>, ApiError> {
	let view = state
		.engine
		.clear_cart(&actor)
		.await
		.map_err(into_api_error)?;
	Ok(Json(view))
}
