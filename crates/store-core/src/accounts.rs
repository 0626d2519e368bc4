//! Account registration and credential verification.
//!
//! Passwords are stored as `salt$hash` with a per-account random salt.
//! Admin accounts cannot be created through public registration; they are
//! provisioned out of band.

use crate::{StoreEngine, StoreError};
use chrono::Utc;
use sha2::{Digest, Sha256};
use store_storage::StorageError;
use store_types::{RegisterRequest, Role, StoreKey, User, UserProfile};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_USERNAME_LEN: usize = 32;

/// Hashes a password with a fresh random salt.
fn hash_password(password: &str) -> String {
	let salt = Uuid::new_v4();
	let digest = Sha256::new()
		.chain_update(salt.as_bytes())
		.chain_update(password.as_bytes())
		.finalize();
	format!("{}${}", hex::encode(salt.as_bytes()), hex::encode(digest))
}

/// Verifies a password against a stored `salt$hash` string.
fn verify_password(password: &str, stored: &str) -> bool {
	let Some((salt_hex, hash_hex)) = stored.split_once('$') else {
		return false;
	};
	let Ok(salt) = hex::decode(salt_hex) else {
		return false;
	};
	let digest = Sha256::new()
		.chain_update(&salt)
		.chain_update(password.as_bytes())
		.finalize();
	hex::encode(digest) == hash_hex
}

fn validate_username(username: &str) -> Result<(), StoreError> {
	if username.len() < 3 || username.len() > MAX_USERNAME_LEN {
		return Err(StoreError::Validation(format!(
			"username must be between 3 and {} characters",
			MAX_USERNAME_LEN
		)));
	}
	if !username
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
	{
		return Err(StoreError::Validation(
			"username may only contain letters, digits, '-', '_' and '.'".into(),
		));
	}
	Ok(())
}

impl StoreEngine {
	/// Registers a new buyer or seller account.
	pub async fn register(&self, req: RegisterRequest) -> Result<UserProfile, StoreError> {
		validate_username(&req.username)?;
		if req.password.len() < MIN_PASSWORD_LEN {
			return Err(StoreError::Validation(format!(
				"password must be at least {} characters",
				MIN_PASSWORD_LEN
			)));
		}
		if req.role == Role::Admin {
			return Err(StoreError::Forbidden(
				"admin accounts cannot be self-registered".into(),
			));
		}

		// Locked across the exists check and the two stores so a concurrent
		// registration cannot claim the same username.
		let _write = self.write_lock.lock().await;

		if self
			.storage()
			.exists(StoreKey::Usernames.as_str(), &req.username)
			.await?
		{
			return Err(StoreError::Conflict(format!(
				"username '{}' is already taken",
				req.username
			)));
		}

		let user = User {
			id: Uuid::new_v4().to_string(),
			username: req.username.clone(),
			password_hash: hash_password(&req.password),
			role: req.role,
			created_at: Utc::now(),
		};

		self.storage()
			.store(StoreKey::Users.as_str(), &user.id, &user)
			.await?;
		self.storage()
			.store(StoreKey::Usernames.as_str(), &req.username, &user.id)
			.await?;

		tracing::info!(username = %user.username, role = %user.role, "Registered account");
		Ok(UserProfile::from(&user))
	}

	/// Verifies login credentials, returning the account on success.
	///
	/// Both unknown usernames and wrong passwords produce the same error.
	pub async fn verify_credentials(
		&self,
		username: &str,
		password: &str,
	) -> Result<User, StoreError> {
		let user_id: String = match self
			.storage()
			.retrieve(StoreKey::Usernames.as_str(), username)
			.await
		{
			Ok(id) => id,
			Err(StorageError::NotFound) => return Err(StoreError::InvalidCredentials),
			Err(e) => return Err(e.into()),
		};

		let user: User = self
			.storage()
			.retrieve(StoreKey::Users.as_str(), &user_id)
			.await?;

		if !verify_password(password, &user.password_hash) {
			return Err(StoreError::InvalidCredentials);
		}
		Ok(user)
	}

	/// Loads a user account by id.
	pub async fn get_user(&self, id: &str) -> Result<User, StoreError> {
		match self.storage().retrieve(StoreKey::Users.as_str(), id).await {
			Ok(user) => Ok(user),
			Err(StorageError::NotFound) => {
				Err(StoreError::NotFound(format!("user '{}' not found", id)))
			},
			Err(e) => Err(e.into()),
		}
	}
}
