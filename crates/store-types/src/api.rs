//! API types for the storefront HTTP API.
//!
//! This module defines the request and response types for the storefront
//! API endpoints, plus the structured error type handlers use to map
//! domain failures onto HTTP status codes.

use crate::{OrderStatus, Role, UserProfile};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for POST /auth/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
	pub username: String,
	pub password: String,
	pub role: Role,
}

/// Request body for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
	pub username: String,
	pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
	pub access_token: String,
	pub user: UserProfile,
}

/// Request body for creating a catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
	pub model_name: String,
	pub manufacturer: String,
	pub price: Decimal,
	pub stock_quantity: u32,
	#[serde(default)]
	pub specifications: Option<String>,
}

/// Partial update of a catalog listing; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
	pub model_name: Option<String>,
	pub manufacturer: Option<String>,
	pub price: Option<Decimal>,
	pub stock_quantity: Option<u32>,
	pub specifications: Option<String>,
}

impl ProductPatch {
	/// Returns true if the patch carries no fields at all.
	pub fn is_empty(&self) -> bool {
		self.model_name.is_none()
			&& self.manufacturer.is_none()
			&& self.price.is_none()
			&& self.stock_quantity.is_none()
			&& self.specifications.is_none()
	}
}

/// Request body for adding a line to the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItem {
	pub product_id: String,
	pub quantity: u32,
}

/// Request body for changing a cart line's quantity.
///
/// A quantity of zero or less removes the line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItem {
	pub quantity: i64,
}

/// Request body for POST /orders (checkout).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
	pub shipping_address: String,
}

/// Request body for PUT /orders/{id}/status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
	pub status: OrderStatus,
}

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	Asc,
	Desc,
}

/// Sortable fields of the product catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
	Id,
	ModelName,
	Manufacturer,
	Price,
	StockQuantity,
}

/// Sortable fields of the order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortField {
	Id,
	CreatedAt,
	UpdatedAt,
	TotalAmount,
	Status,
}

/// Query parameters for GET /products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductQuery {
	/// Case-insensitive substring match on the manufacturer.
	pub manufacturer: Option<String>,
	/// Case-insensitive substring match on the model name.
	pub model_name_contains: Option<String>,
	pub price_min: Option<Decimal>,
	pub price_max: Option<Decimal>,
	pub sort_by: Option<ProductSortField>,
	pub order: Option<SortOrder>,
	pub page: Option<u64>,
	pub per_page: Option<u64>,
}

/// Query parameters for GET /orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderQuery {
	pub status: Option<OrderStatus>,
	pub sort_by: Option<OrderSortField>,
	pub order: Option<SortOrder>,
	pub page: Option<u64>,
	pub per_page: Option<u64>,
}

/// Pagination bookkeeping attached to every list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
	pub page: u64,
	pub per_page: u64,
	pub total_items: u64,
	pub total_pages: u64,
}

/// A page of results with its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
	pub data: Vec<T>,
	pub meta: PageMeta,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Stable machine-readable error code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
	/// Additional structured context, e.g. per-line stock violations.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed or invalid request input (400).
	BadRequest(String),
	/// Missing or invalid credentials (401).
	Unauthorized(String),
	/// Authenticated but not permitted (403).
	Forbidden(String),
	/// Target resource does not exist (404).
	NotFound(String),
	/// Conflicts with existing state, e.g. duplicate username (409).
	Conflict(String),
	/// Business rule rejection with optional structured details (422).
	UnprocessableEntity {
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Internal server error (500).
	Internal(String),
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest(_) => 400,
			ApiError::Unauthorized(_) => 401,
			ApiError::Forbidden(_) => 403,
			ApiError::NotFound(_) => 404,
			ApiError::Conflict(_) => 409,
			ApiError::UnprocessableEntity { .. } => 422,
			ApiError::Internal(_) => 500,
		}
	}

	/// Stable machine-readable code for this error.
	pub fn error_code(&self) -> &'static str {
		match self {
			ApiError::BadRequest(_) => "BAD_REQUEST",
			ApiError::Unauthorized(_) => "UNAUTHORIZED",
			ApiError::Forbidden(_) => "FORBIDDEN",
			ApiError::NotFound(_) => "NOT_FOUND",
			ApiError::Conflict(_) => "CONFLICT",
			ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
			ApiError::Internal(_) => "INTERNAL_ERROR",
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (message, details) = match self {
			ApiError::UnprocessableEntity { message, details } => {
				(message.clone(), details.clone())
			},
			ApiError::BadRequest(m)
			| ApiError::Unauthorized(m)
			| ApiError::Forbidden(m)
			| ApiError::NotFound(m)
			| ApiError::Conflict(m)
			| ApiError::Internal(m) => (m.clone(), None),
		};
		ErrorResponse {
			error: self.error_code().to_string(),
			message,
			details,
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: {}",
			self.error_code(),
			self.to_error_response().message
		)
	}
}

impl std::error::Error for ApiError {}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}
