//! Common types module for the storefront system.
//!
//! This module defines the core data types and structures shared by the
//! storefront services. It provides a centralized location for domain
//! entities, API payloads, and validation helpers to ensure consistency
//! across all components.

/// Actor and account types for role-based authorization.
pub mod actor;
/// API request/response types and HTTP error mapping.
pub mod api;
/// Shopping cart types.
pub mod cart;
/// Product catalog types.
pub mod catalog;
/// Order lifecycle types.
pub mod order;
/// Storage namespace keys.
pub mod storage;
/// Configuration validation types for ensuring type-safe configurations.
pub mod validation;

// Re-export all types for convenient access
pub use actor::*;
pub use api::*;
pub use cart::*;
pub use catalog::*;
pub use order::*;
pub use storage::*;
pub use validation::*;
