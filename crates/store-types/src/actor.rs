//! Actor and account types for role-based authorization.
//!
//! Every operation that needs authorization receives an explicit [`Actor`]
//! from the caller rather than reading ambient session state. An actor is
//! characterized, for policy purposes, solely by its role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of an authenticated user.
///
/// Exactly one role per session; changing role requires a fresh login.
/// Represented as a closed enumeration so unrecognized values are rejected
/// at the deserialization boundary instead of silently matching nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Places orders and manages a cart.
	Buyer,
	/// Lists products and drives fulfillment of orders containing them.
	Seller,
	/// Operational override across the whole store.
	Admin,
}

impl Role {
	/// Returns the lowercase wire representation of the role.
	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Buyer => "buyer",
			Role::Seller => "seller",
			Role::Admin => "admin",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Role {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"buyer" => Ok(Role::Buyer),
			"seller" => Ok(Role::Seller),
			"admin" => Ok(Role::Admin),
			_ => Err(()),
		}
	}
}

/// An authenticated caller, passed explicitly into every authorized operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	/// Unique identifier of the user behind this session.
	pub id: String,
	/// Role fixed for the lifetime of the session.
	pub role: Role,
}

impl Actor {
	pub fn new(id: impl Into<String>, role: Role) -> Self {
		Self {
			id: id.into(),
			role,
		}
	}
}

/// A stored user account.
///
/// The password hash is part of the persisted record; API responses use
/// [`UserProfile`] instead so the hash never leaves the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
	/// Unique identifier for this account.
	pub id: String,
	/// Login name, unique across the store.
	pub username: String,
	/// Salted password hash (never exposed through the API).
	pub password_hash: String,
	/// Role assigned at registration.
	pub role: Role,
	/// Timestamp when the account was created.
	pub created_at: DateTime<Utc>,
}

impl User {
	/// Returns the actor identity for this account.
	pub fn actor(&self) -> Actor {
		Actor::new(self.id.clone(), self.role)
	}
}

/// Public view of a user account, safe to return from API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
	pub id: String,
	pub username: String,
	pub role: Role,
}

impl From<&User> for UserProfile {
	fn from(user: &User) -> Self {
		Self {
			id: user.id.clone(),
			username: user.username.clone(),
			role: user.role,
		}
	}
}
