//! Core engine of the storefront system.
//!
//! The [`StoreEngine`] owns the storage service and implements the store's
//! behavior: account registration, catalog management, cart mutation,
//! checkout, and order lifecycle management. Every status change and every
//! checkout is gated by the pure decision logic in `store-policy`; this
//! crate persists the outcomes and enforces ownership and visibility.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod orders;

mod paging;

use std::sync::Arc;
use store_config::Config;
use store_policy::{PolicyError, StockViolation};
use store_storage::{StorageError, StorageService};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors produced by engine operations.
///
/// All variants except `Storage` are recoverable, user-facing conditions
/// the API layer reports back to the client.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Error raised by the storage backend.
	#[error("Storage error: {0}")]
	Storage(String),
	/// A status change rejected by the lifecycle policy.
	#[error(transparent)]
	Policy(#[from] PolicyError),
	/// One or more cart lines exceed the available stock.
	#[error("insufficient stock for {} cart line(s)", .0.len())]
	StockInsufficient(Vec<StockViolation>),
	/// The target record does not exist or is not visible to the caller.
	#[error("{0}")]
	NotFound(String),
	/// The caller is authenticated but not permitted to do this.
	#[error("{0}")]
	Forbidden(String),
	/// The request conflicts with existing state.
	#[error("{0}")]
	Conflict(String),
	/// The request input is invalid.
	#[error("{0}")]
	Validation(String),
	/// Login failed; deliberately does not say which part was wrong.
	#[error("invalid username or password")]
	InvalidCredentials,
}

impl From<StorageError> for StoreError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound => StoreError::NotFound("record not found".into()),
			other => StoreError::Storage(other.to_string()),
		}
	}
}

/// The storefront engine.
///
/// Cheap to share: wrap it in an `Arc` and clone handles freely.
pub struct StoreEngine {
	storage: Arc<StorageService>,
	config: Config,
	/// Serializes read-modify-write sequences (registration, checkout,
	/// cancellation, status updates). The storage backends offer no
	/// transactions, so without this two concurrent checkouts could both
	/// read the same stock level and both persist decrements from the
	/// stale read.
	write_lock: Mutex<()>,
}

impl StoreEngine {
	/// Creates a new engine over the given storage service.
	pub fn new(storage: Arc<StorageService>, config: Config) -> Self {
		Self {
			storage,
			config,
			write_lock: Mutex::new(()),
		}
	}

	/// Returns the service configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns the underlying storage service.
	pub fn storage(&self) -> &StorageService {
		&self.storage
	}
}

#[cfg(test)]
pub(crate) mod testutil {
	use super::*;
	use store_storage::implementations::memory::MemoryStorage;
	use store_types::{Actor, Role};

	pub const TEST_CONFIG: &str = r#"
[store]
id = "test-store"
default_page_size = 5

[storage]
primary = "memory"
[storage.implementations.memory]

[auth]
secret = "test-secret"

[api]
"#;

	pub fn engine() -> StoreEngine {
		let config: Config = TEST_CONFIG.parse().expect("test config parses");
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		StoreEngine::new(storage, config)
	}

	pub fn buyer(id: &str) -> Actor {
		Actor::new(id, Role::Buyer)
	}

	pub fn seller(id: &str) -> Actor {
		Actor::new(id, Role::Seller)
	}

	pub fn admin(id: &str) -> Actor {
		Actor::new(id, Role::Admin)
	}
}
