//! Handlers for checkout and the order lifecycle.

use crate::apis::into_api_error;
use crate::auth::AuthActor;
use crate::server::AppState;
use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::Json,
};
use std::collections::BTreeSet;
use store_types::{
	ApiError, CheckoutRequest, Order, OrderQuery, OrderStatus, Paginated, StatusUpdateRequest,
};

/// Handles POST /api/orders (checkout).
pub async fn checkout(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
	let order = state
		.engine
		.checkout(&actor, req)
		.await
		.map_err(into_api_error)?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders.
pub async fn list_orders(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Query(query): Query<OrderQuery>,
) -> Result<Json<Paginated<Order>>, ApiError> {
	let page = state
		.engine
		.list_orders(&actor, &query)
		.await
		.map_err(into_api_error)?;
	Ok(Json(page))
}

/// Handles GET /api/orders/{id}.
pub async fn get_order(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.get_order(&actor, &id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(order))
}

/// Handles PUT /api/orders/{id}/status.
pub async fn update_status(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
	Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.update_order_status(&actor, &id, req.status)
		.await
		.map_err(into_api_error)?;
	Ok(Json(order))
}

/// Handles POST /api/orders/{id}/cancel.
pub async fn cancel(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
	let order = state
		.engine
		.cancel_order(&actor, &id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(order))
}

/// Handles GET /api/orders/{id}/transitions.
pub async fn transitions(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
) -> Result<Json<BTreeSet<OrderStatus>>, ApiError> {
	let next = state
		.engine
		.allowed_transitions(&actor, &id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(next))
}
