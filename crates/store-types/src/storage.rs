//! Storage-related types for the storefront system.

/// Storage keys for the different data collections.
///
/// This enum provides type safety for storage operations by replacing
/// string literals with strongly typed variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
	/// Key for storing user accounts by id
	Users,
	/// Key for mapping usernames to user ids
	Usernames,
	/// Key for storing catalog products
	Products,
	/// Key for storing carts, one per buyer
	Carts,
	/// Key for storing orders
	Orders,
}

impl StoreKey {
	/// Returns the string representation of the storage key.
	pub fn as_str(&self) -> &'static str {
		match self {
			StoreKey::Users => "users",
			StoreKey::Usernames => "usernames",
			StoreKey::Products => "products",
			StoreKey::Carts => "carts",
			StoreKey::Orders => "orders",
		}
	}
}
