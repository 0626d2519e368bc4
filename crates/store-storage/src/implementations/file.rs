//! File-based storage backend implementation for the storefront service.
//!
//! Persists each entry as one JSON file under a configured directory, with
//! a subdirectory per namespace. Suited for single-process deployments and
//! local development; it performs no cross-process locking.

use crate::{StorageError, StorageInterface};
use async_trait::async_trait;
use std::path::PathBuf;
use store_types::{ConfigSchema, Field, FieldType, Schema, ValidationError};
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Root directory for all namespaces.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at the given directory.
	pub fn new(base_path: impl Into<PathBuf>) -> Self {
		Self {
			base_path: base_path.into(),
		}
	}

	/// Splits a `namespace:id` key into a relative file path.
	///
	/// Ids are restricted to filesystem-safe characters so a key can never
	/// escape the base directory.
	fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
		let (namespace, id) = key
			.split_once(':')
			.ok_or_else(|| StorageError::Backend(format!("Malformed storage key: {}", key)))?;

		let safe = |s: &str| {
			!s.is_empty()
				&& s.chars()
					.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
				&& s != "." && s != ".."
		};
		if !safe(namespace) || !safe(id) {
			return Err(StorageError::Backend(format!(
				"Storage key contains unsafe characters: {}",
				key
			)));
		}

		Ok(self.base_path.join(namespace).join(format!("{}.json", id)))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.path_for(key)?;
		match fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		let path = self.path_for(key)?;
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		// Write to a temp file then rename, so readers never observe a
		// partially written entry.
		let tmp = path.with_extension("json.tmp");
		fs::write(&tmp, &value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		Ok(())
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		let path = self.path_for(key)?;
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		let path = self.path_for(key)?;
		Ok(fs::try_exists(&path).await.unwrap_or(false))
	}

	async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
		let namespace = prefix.strip_suffix(':').unwrap_or(prefix);
		let (namespace, id_prefix) = match namespace.split_once(':') {
			Some((ns, rest)) => (ns, rest),
			None => (namespace, ""),
		};

		let dir = self.base_path.join(namespace);
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut keys = Vec::new();
		while let Some(entry) = entries
			.next_entry()
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
		{
			let name = entry.file_name();
			let name = name.to_string_lossy();
			if let Some(id) = name.strip_suffix(".json") {
				if id.starts_with(id_prefix) {
					keys.push(format!("{}:{}", namespace, id));
				}
			}
		}
		keys.sort();
		Ok(keys)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(vec![Field::new("storage_path", FieldType::String)], vec![]);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: directory to store data files in (required)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("storage_path must be a string".into()))?;

	Ok(Box::new(FileStorage::new(path)))
}
