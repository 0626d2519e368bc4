//! Session tokens and the authenticated-request extractor.
//!
//! Sessions are stateless JWTs signed with the configured HMAC secret. The
//! token carries the user id and role; handlers receive both through the
//! [`AuthActor`] extractor and never look at headers themselves.

use crate::server::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use store_config::AuthConfig;
use store_types::{Actor, ApiError, Role};

/// Claims carried by a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	/// User id of the session owner.
	pub sub: String,
	/// Role fixed at login time.
	pub role: Role,
	/// Expiry as a unix timestamp.
	pub exp: i64,
}

/// Issues a signed session token for the given actor.
pub fn issue_token(actor: &Actor, auth: &AuthConfig) -> Result<String, ApiError> {
	let expires_at = Utc::now() + chrono::Duration::minutes(auth.token_ttl_minutes as i64);
	let claims = Claims {
		sub: actor.id.clone(),
		role: actor.role,
		exp: expires_at.timestamp(),
	};
	encode(
		&Header::default(),
		&claims,
		&EncodingKey::from_secret(auth.secret.as_bytes()),
	)
	.map_err(|e| ApiError::Internal(format!("failed to sign session token: {}", e)))
}

/// Verifies a session token and recovers the actor it was issued for.
pub fn verify_token(token: &str, secret: &str) -> Result<Actor, ApiError> {
	let data = decode::<Claims>(
		token,
		&DecodingKey::from_secret(secret.as_bytes()),
		&Validation::default(),
	)
	.map_err(|_| ApiError::Unauthorized("invalid or expired session token".into()))?;
	Ok(Actor::new(data.claims.sub, data.claims.role))
}

/// Extractor that authenticates a request from its bearer token.
pub struct AuthActor(pub Actor);

impl FromRequestParts<AppState> for AuthActor {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let header_value = parts
			.headers
			.get(header::AUTHORIZATION)
			.and_then(|v| v.to_str().ok())
			.ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

		let token = header_value
			.strip_prefix("Bearer ")
			.ok_or_else(|| ApiError::Unauthorized("expected a bearer token".into()))?;

		let actor = verify_token(token, &state.engine.config().auth.secret)?;
		Ok(AuthActor(actor))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn auth_config(ttl_minutes: u64) -> AuthConfig {
		AuthConfig {
			secret: "test-secret".into(),
			token_ttl_minutes: ttl_minutes,
		}
	}

	#[test]
	fn token_round_trip_preserves_identity() {
		let auth = auth_config(60);
		let actor = Actor::new("u-1", Role::Seller);

		let token = issue_token(&actor, &auth).unwrap();
		let back = verify_token(&token, &auth.secret).unwrap();
		assert_eq!(back, actor);
	}

	#[test]
	fn wrong_secret_is_rejected() {
		let auth = auth_config(60);
		let token = issue_token(&Actor::new("u-1", Role::Buyer), &auth).unwrap();
		assert!(matches!(
			verify_token(&token, "other-secret"),
			Err(ApiError::Unauthorized(_))
		));
	}

	#[test]
	fn tampered_token_is_rejected() {
		let auth = auth_config(60);
		let token = issue_token(&Actor::new("u-1", Role::Buyer), &auth).unwrap();
		let mut tampered = token.clone();
		tampered.pop();
		assert!(verify_token(&tampered, &auth.secret).is_err());
	}

	#[test]
	fn expired_token_is_rejected() {
		let auth = auth_config(60);
		let claims = Claims {
			sub: "u-1".into(),
			role: Role::Buyer,
			exp: (Utc::now() - chrono::Duration::hours(2)).timestamp(),
		};
		let token = encode(
			&Header::default(),
			&claims,
			&EncodingKey::from_secret(auth.secret.as_bytes()),
		)
		.unwrap();
		assert!(matches!(
			verify_token(&token, &auth.secret),
			Err(ApiError::Unauthorized(_))
		));
	}
}
