//! Order lifecycle policy for the storefront system.
//!
//! This crate holds the pure decision logic the rest of the system gates
//! mutations on: which order-status transitions are legal for which role,
//! and whether a cart can be checked out against the currently known stock
//! levels. Nothing in here performs I/O; callers supply the current state
//! and persist the outcome themselves.

pub mod stock;
pub mod transition;

pub use stock::{check_cart_against_stock, CartLine, StockViolation};
pub use transition::{allowed_next_statuses, can_cancel, validate_transition, PolicyError};
