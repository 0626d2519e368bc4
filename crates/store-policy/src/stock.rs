//! Pre-checkout stock-sufficiency check.
//!
//! An optimistic, client-visible check only: it compares requested
//! quantities against the last-fetched stock snapshot and is inherently
//! racy against concurrent purchases. Whoever creates the order remains
//! the authority and must re-validate against live stock; this check
//! exists to give fast feedback with every violation reported at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One cart line joined with the stock level known at check time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
	/// Catalog product the line refers to.
	pub product_id: String,
	/// Quantity the buyer requested.
	pub requested: u32,
	/// Stock available per the latest snapshot.
	pub available: u32,
}

/// A cart line whose requested quantity exceeds the available stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockViolation {
	pub product_id: String,
	pub requested: u32,
	pub available: u32,
}

impl fmt::Display for StockViolation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"product '{}': requested {}, only {} available",
			self.product_id, self.requested, self.available
		)
	}
}

/// Verifies that no cart line requests more than its product's known stock.
///
/// Returns every violation, not just the first, so callers can report them
/// together. An empty cart is vacuously satisfied.
pub fn check_cart_against_stock(lines: &[CartLine]) -> Result<(), Vec<StockViolation>> {
	let violations: Vec<StockViolation> = lines
		.iter()
		.filter(|line| line.requested > line.available)
		.map(|line| StockViolation {
			product_id: line.product_id.clone(),
			requested: line.requested,
			available: line.available,
		})
		.collect();

	if violations.is_empty() {
		Ok(())
	} else {
		Err(violations)
	}
}
