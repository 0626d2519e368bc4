//! Handlers for the product catalog.
//!
//! Browsing is public; creating and editing listings requires a seller or
//! admin session.

use crate::apis::into_api_error;
use crate::auth::AuthActor;
use crate::server::AppState;
use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::Json,
};
use store_types::{ApiError, NewProduct, Paginated, Product, ProductPatch, ProductQuery};

/// Handles GET /api/products.
pub async fn list_products(
	State(state): State<AppState>,
	Query(query): Query<ProductQuery>,
) -> Result<Json<Paginated<Product>>, ApiError> {
	let page = state
		.engine
		.list_products(&query)
		.await
		.map_err(into_api_error)?;
	Ok(Json(page))
}

/// Handles GET /api/products/{id}.
pub async fn get_product(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
	let product = state
		.engine
		.get_product(&id)
		.await
		.map_err(into_api_error)?;
	Ok(Json(product))
}

/// Handles POST /api/products.
pub async fn create_product(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
	let product = state
		.engine
		.create_product(&actor, req)
		.await
		.map_err(into_api_error)?;
	Ok((StatusCode::CREATED, Json(product)))
}

/// Handles PUT /api/products/{id}.
pub async fn update_product(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
	Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>, ApiError> {
	let product = state
		.engine
		.update_product(&actor, &id, patch)
		.await
		.map_err(into_api_error)?;
	Ok(Json(product))
}

/// Handles DELETE /api/products/{id}.
pub async fn delete_product(
	State(state): State<AppState>,
	AuthActor(actor): AuthActor,
	Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
	state
		.engine
		.delete_product(&actor, &id)
		.await
		.map_err(into_api_error)?;
	Ok(StatusCode::NO_CONTENT)
}
