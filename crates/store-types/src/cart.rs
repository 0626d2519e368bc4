//! Shopping cart types.
//!
//! A cart belongs to exactly one buyer and is mutated freely until checkout,
//! at which point the engine clears it as a side effect of order creation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single requested line in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
	/// Unique within the owning cart.
	pub id: String,
	/// Catalog product this line refers to.
	pub product_id: String,
	/// Requested quantity; always positive while the line exists.
	pub quantity: u32,
}

/// A buyer's cart as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
	/// Unique identifier for this cart.
	pub id: String,
	/// The buyer owning this cart.
	pub buyer_id: String,
	/// Current requested lines.
	pub items: Vec<CartItem>,
	/// Timestamp of the last mutation.
	pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its current catalog data, for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemView {
	pub id: String,
	pub product_id: String,
	pub model_name: String,
	pub unit_price: Decimal,
	pub quantity: u32,
	pub line_total: Decimal,
}

/// A cart with priced lines and a computed total, for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
	pub id: String,
	pub items: Vec<CartItemView>,
	pub total_price: Decimal,
	pub updated_at: DateTime<Utc>,
}
