//! Main entry point for the storefront service.
//!
//! This binary wires the configured storage backend into the store engine
//! and serves the HTTP API: account registration and login, catalog
//! browsing and management, carts, checkout, and the order lifecycle.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use store_config::Config;
use store_core::StoreEngine;
use store_storage::{get_all_implementations, StorageService};

mod apis;
mod auth;
mod server;

/// Command-line arguments for the storefront service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started storefront service");

	let config = Config::from_file(args.config.to_str().ok_or("invalid config path")?).await?;
	tracing::info!("Loaded configuration [{}]", config.store.id);

	let engine = Arc::new(build_engine(config)?);

	if engine.config().api.enabled {
		server::start_server(engine).await?;
	} else {
		tracing::warn!("API server disabled by configuration; nothing to serve");
	}

	tracing::info!("Stopped storefront service");
	Ok(())
}

/// Builds the store engine over the storage backend named in configuration.
fn build_engine(config: Config) -> Result<StoreEngine, Box<dyn std::error::Error>> {
	let primary = config.storage.primary.clone();
	let factory = get_all_implementations()
		.into_iter()
		.find(|(name, _)| *name == primary)
		.map(|(_, factory)| factory)
		.ok_or_else(|| format!("unknown storage backend '{}'", primary))?;

	let empty = toml::Value::Table(toml::map::Map::new());
	let backend_config = config
		.storage
		.implementations
		.get(&primary)
		.unwrap_or(&empty);
	let backend = factory(backend_config)?;

	tracing::info!("Using '{}' storage backend", primary);
	let storage = Arc::new(StorageService::new(backend));
	Ok(StoreEngine::new(storage, config))
}
