//! Request handlers for the storefront API, grouped by resource.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

use store_core::StoreError;
use store_policy::PolicyError;
use store_types::ApiError;

/// Maps an engine error onto the HTTP error surface.
///
/// Policy rejections surface as 422 so clients can distinguish a rule
/// violation from malformed input, except a role that may not use the
/// operation at all, which is a plain 403. Storage failures are logged and
/// reported without internal detail.
pub(crate) fn into_api_error(err: StoreError) -> ApiError {
	match err {
		StoreError::Storage(message) => {
			tracing::error!("Storage failure: {}", message);
			ApiError::Internal("internal storage error".into())
		},
		StoreError::Policy(PolicyError::Unauthorized(role)) => {
			ApiError::Forbidden(format!("role '{}' may not update order status", role))
		},
		StoreError::Policy(policy_err) => ApiError::UnprocessableEntity {
			message: policy_err.to_string(),
			details: None,
		},
		StoreError::StockInsufficient(violations) => ApiError::UnprocessableEntity {
			message: format!("insufficient stock for {} cart line(s)", violations.len()),
			details: serde_json::to_value(&violations).ok(),
		},
		StoreError::NotFound(message) => ApiError::NotFound(message),
		StoreError::Forbidden(message) => ApiError::Forbidden(message),
		StoreError::Conflict(message) => ApiError::Conflict(message),
		StoreError::Validation(message) => ApiError::BadRequest(message),
		StoreError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use store_policy::StockViolation;
	use store_types::{OrderStatus, Role};

	#[test]
	fn policy_rejections_map_to_422() {
		let err = into_api_error(StoreError::Policy(PolicyError::TerminalOrder(
			OrderStatus::Delivered,
		)));
		assert_eq!(err.status_code(), 422);
	}

	#[test]
	fn unauthorized_role_maps_to_403() {
		let err = into_api_error(StoreError::Policy(PolicyError::Unauthorized(Role::Buyer)));
		assert_eq!(err.status_code(), 403);
	}

	#[test]
	fn stock_rejection_carries_per_line_details() {
		let err = into_api_error(StoreError::StockInsufficient(vec![StockViolation {
			product_id: "p1".into(),
			requested: 5,
			available: 2,
		}]));
		assert_eq!(err.status_code(), 422);
		let body = err.to_error_response();
		let details = body.details.expect("details present");
		assert_eq!(details[0]["product_id"], "p1");
		assert_eq!(details[0]["available"], 2);
	}

	#[test]
	fn credential_failure_maps_to_401() {
		assert_eq!(into_api_error(StoreError::InvalidCredentials).status_code(), 401);
	}

	#[test]
	fn storage_failure_hides_detail() {
		let err = into_api_error(StoreError::Storage("disk on fire".into()));
		assert_eq!(err.status_code(), 500);
		assert!(!err.to_error_response().message.contains("disk"));
	}
}
