//! Order lifecycle types for the storefront system.
//!
//! An order is created from a buyer's cart at checkout and carries a copy of
//! each purchased line at the price in effect at purchase time, so later
//! catalog edits do not rewrite history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of an order in the storefront system.
///
/// `Pending` is the sole initial status. `Delivered`, `Cancelled` and
/// `Failed` are terminal: no outgoing transition is permitted from them for
/// any role. `Failed` is reserved for a system/payment failure path and is
/// never selectable through the status-update operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// Order has been created and awaits fulfillment.
	Pending,
	/// A seller has started fulfilling the order.
	Processing,
	/// The order has left the warehouse.
	Shipped,
	/// The buyer has received the order (terminal).
	Delivered,
	/// The order was cancelled before shipping (terminal).
	Cancelled,
	/// Payment or system failure (terminal).
	Failed,
}

impl OrderStatus {
	/// Returns true if no outgoing transition is permitted from this status.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::Failed
		)
	}

	/// Returns the lowercase wire representation of the status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Pending => "pending",
			OrderStatus::Processing => "processing",
			OrderStatus::Shipped => "shipped",
			OrderStatus::Delivered => "delivered",
			OrderStatus::Cancelled => "cancelled",
			OrderStatus::Failed => "failed",
		}
	}

	/// Returns an iterator over all status variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Pending,
			Self::Processing,
			Self::Shipped,
			Self::Delivered,
			Self::Cancelled,
			Self::Failed,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for OrderStatus {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"processing" => Ok(Self::Processing),
			"shipped" => Ok(Self::Shipped),
			"delivered" => Ok(Self::Delivered),
			"cancelled" => Ok(Self::Cancelled),
			"failed" => Ok(Self::Failed),
			_ => Err(()),
		}
	}
}

/// A purchased line within an order.
///
/// Captures the product price and the listing seller at purchase time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
	/// Catalog product this line refers to.
	pub product_id: String,
	/// Quantity purchased; always positive.
	pub quantity: u32,
	/// Unit price at the moment the order was created.
	pub price_at_purchase: Decimal,
	/// Seller who listed the product, for fulfillment scoping.
	pub seller_id: String,
}

/// A buyer's order with its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier, assigned at creation.
	pub id: String,
	/// The buyer who placed the order.
	pub buyer_id: String,
	/// Sum over all lines of quantity times price at purchase.
	pub total_amount: Decimal,
	/// Current lifecycle status.
	pub status: OrderStatus,
	/// Delivery address supplied at checkout.
	pub shipping_address: String,
	/// Purchased lines, fixed at checkout.
	pub items: Vec<OrderItem>,
	/// Timestamp when this order was created.
	pub created_at: DateTime<Utc>,
	/// Timestamp when this order was last updated.
	pub updated_at: DateTime<Utc>,
}

impl Order {
	/// Returns true if any line of this order was listed by the given seller.
	pub fn involves_seller(&self, seller_id: &str) -> bool {
		self.items.iter().any(|item| item.seller_id == seller_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terminal_statuses_are_exactly_three() {
		let terminal: Vec<_> = OrderStatus::all().filter(|s| s.is_terminal()).collect();
		assert_eq!(
			terminal,
			vec![
				OrderStatus::Delivered,
				OrderStatus::Cancelled,
				OrderStatus::Failed
			]
		);
	}

	#[test]
	fn status_serializes_lowercase() {
		for status in OrderStatus::all() {
			let json = serde_json::to_string(&status).unwrap();
			assert_eq!(json, format!("\"{}\"", status.as_str()));
			let back: OrderStatus = json.trim_matches('"').parse().unwrap();
			assert_eq!(back, status);
		}
	}

	#[test]
	fn unknown_status_is_rejected() {
		assert!("returned".parse::<OrderStatus>().is_err());
		let result: Result<OrderStatus, _> = serde_json::from_str("\"returned\"");
		assert!(result.is_err());
	}
}
