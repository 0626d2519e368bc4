//! Configuration module for the storefront system.
//!
//! This module provides structures and utilities for managing service
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` environment-variable resolution and validates that all
//! required values are properly set before the service starts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the storefront service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this store instance.
	pub store: StoreConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for session tokens.
	pub auth: AuthConfig,
	/// Configuration for the HTTP API server.
	pub api: ApiConfig,
}

/// Configuration specific to this store instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
	/// Unique identifier for this store instance.
	pub id: String,
	/// Default page size for list endpoints when the client sends none.
	#[serde(default = "default_page_size")]
	pub default_page_size: u64,
}

/// Returns the default page size for list endpoints.
fn default_page_size() -> u64 {
	10
}

/// Upper bound on per_page accepted from clients.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for session tokens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
	/// HMAC secret for signing session tokens.
	pub secret: String,
	/// Token lifetime in minutes.
	#[serde(default = "default_token_ttl_minutes")]
	pub token_ttl_minutes: u64,
}

/// Returns the default session token lifetime in minutes.
fn default_token_ttl_minutes() -> u64 {
	60
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default = "default_api_enabled")]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

fn default_api_enabled() -> bool {
	true
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).expect("capture 0 always present");
		let var_name = cap.get(1).expect("group 1 always present").as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)))
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file with environment variable
	/// resolution, then validates it.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		raw.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.store.id.is_empty() {
			return Err(ConfigError::Validation("Store ID cannot be empty".into()));
		}
		if self.store.default_page_size == 0 || self.store.default_page_size > MAX_PAGE_SIZE {
			return Err(ConfigError::Validation(format!(
				"default_page_size must be between 1 and {}",
				MAX_PAGE_SIZE
			)));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if self.auth.secret.is_empty() {
			return Err(ConfigError::Validation(
				"Auth secret cannot be empty".into(),
			));
		}
		if self.auth.token_ttl_minutes == 0 {
			return Err(ConfigError::Validation(
				"token_ttl_minutes must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Implementation of FromStr for Config to enable parsing from a string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
