//! HTTP server for the storefront API.
//!
//! Builds the axum router over the engine and serves it. Handlers live in
//! the `apis` modules; this module only wires routes, state and middleware.

use axum::{
	routing::{get, post, put},
	Router,
};
use std::sync::Arc;
use store_core::StoreEngine;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::apis;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the store engine for processing requests.
	pub engine: Arc<StoreEngine>,
}

/// Builds the full API router over the given engine.
pub fn build_router(engine: Arc<StoreEngine>) -> Router {
	let state = AppState { engine };

	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/auth/register", post(apis::auth::register))
				.route("/auth/login", post(apis::auth::login))
				.route("/auth/profile", get(apis::auth::profile))
				.route(
					"/products",
					get(apis::catalog::list_products).post(apis::catalog::create_product),
				)
				.route(
					"/products/{id}",
					get(apis::catalog::get_product)
						.put(apis::catalog::update_product)
						.delete(apis::catalog::delete_product),
				)
				.route(
					"/cart",
					get(apis::cart::view_cart).delete(apis::cart::clear_cart),
				)
				.route("/cart/items", post(apis::cart::add_item))
				.route(
					"/cart/items/{id}",
					put(apis::cart::update_item).delete(apis::cart::remove_item),
				)
				.route(
					"/orders",
					get(apis::orders::list_orders).post(apis::orders::checkout),
				)
				.route("/orders/{id}", get(apis::orders::get_order))
				.route("/orders/{id}/status", put(apis::orders::update_status))
				.route("/orders/{id}/cancel", post(apis::orders::cancel))
				.route("/orders/{id}/transitions", get(apis::orders::transitions)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Starts the HTTP server and serves requests until shutdown.
pub async fn start_server(engine: Arc<StoreEngine>) -> Result<(), Box<dyn std::error::Error>> {
	let api_config = engine.config().api.clone();
	let app = build_router(engine);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Storefront API server starting on {}", bind_address);

	axum::serve(listener, app).await?;
	Ok(())
}
