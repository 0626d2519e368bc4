//! Product catalog types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalog listing owned by a seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
	/// Unique identifier for this listing.
	pub id: String,
	/// Product model name.
	pub model_name: String,
	/// Manufacturer name.
	pub manufacturer: String,
	/// Current unit price; never negative.
	pub price: Decimal,
	/// Units currently available for purchase.
	pub stock_quantity: u32,
	/// Free-form specification text.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub specifications: Option<String>,
	/// The seller (or admin) who listed this product.
	pub seller_id: String,
}
