//! Shopping cart operations.
//!
//! Carts are keyed by the owning buyer, one cart per buyer. Mutations check
//! the requested quantity against current stock so a buyer gets early
//! feedback, but stock is only reserved at checkout.

use crate::{StoreEngine, StoreError};
use chrono::Utc;
use rust_decimal::Decimal;
use store_storage::StorageError;
use store_types::{
	Actor, AddCartItem, Cart, CartItem, CartItemView, CartView, Role, StoreKey, UpdateCartItem,
};
use uuid::Uuid;

fn require_buyer(actor: &Actor) -> Result<(), StoreError> {
	if actor.role == Role::Buyer {
		Ok(())
	} else {
		Err(StoreError::Forbidden("only buyers have a cart".into()))
	}
}

impl StoreEngine {
	/// Returns the actor's cart with current prices and a computed total.
	pub async fn view_cart(&self, actor: &Actor) -> Result<CartView, StoreError> {
		require_buyer(actor)?;
		let cart = self.load_or_new_cart(&actor.id).await?;
		self.render_cart(cart).await
	}

	/// Adds a product to the actor's cart, merging with an existing line
	/// for the same product.
	pub async fn add_cart_item(
		&self,
		actor: &Actor,
		req: AddCartItem,
	) -> Result<CartView, StoreError> {
		require_buyer(actor)?;
		if req.quantity == 0 {
			return Err(StoreError::Validation("quantity must be positive".into()));
		}

		let product = self.get_product(&req.product_id).await?;
		let mut cart = self.load_or_new_cart(&actor.id).await?;

		let requested = match cart.items.iter().find(|i| i.product_id == req.product_id) {
			Some(line) => line.quantity.saturating_add(req.quantity),
			None => req.quantity,
		};
		if requested > product.stock_quantity {
			return Err(StoreError::Validation(format!(
				"requested {} of product '{}' but only {} in stock",
				requested, product.id, product.stock_quantity
			)));
		}

		match cart
			.items
			.iter_mut()
			.find(|i| i.product_id == req.product_id)
		{
			Some(line) => line.quantity = requested,
			None => cart.items.push(CartItem {
				id: Uuid::new_v4().to_string(),
				product_id: req.product_id,
				quantity: req.quantity,
			}),
		}

		self.save_cart(&mut cart).await?;
		self.render_cart(cart).await
	}

	/// Sets a cart line's quantity. Zero or negative removes the line.
	pub async fn update_cart_item(
		&self,
		actor: &Actor,
		item_id: &str,
		req: UpdateCartItem,
	) -> Result<CartView, StoreError> {
		require_buyer(actor)?;
		let mut cart = self.load_or_new_cart(&actor.id).await?;

		let Some(position) = cart.items.iter().position(|i| i.id == item_id) else {
			return Err(StoreError::NotFound(format!(
				"cart item '{}' not found",
				item_id
			)));
		};

		if req.quantity <= 0 {
			cart.items.remove(position);
		} else {
			let quantity = u32::try_from(req.quantity)
				.map_err(|_| StoreError::Validation("quantity out of range".into()))?;
			let product = self.get_product(&cart.items[position].product_id).await?;
			if quantity > product.stock_quantity {
				return Err(StoreError::Validation(format!(
					"requested {} of product '{}' but only {} in stock",
					quantity, product.id, product.stock_quantity
				)));
			}
			cart.items[position].quantity = quantity;
		}

		self.save_cart(&mut cart).await?;
		self.render_cart(cart).await
	}

	/// Removes a single line from the actor's cart.
	pub async fn remove_cart_item(
		&self,
		actor: &Actor,
		item_id: &str,
	) -> Result<CartView, StoreError> {
		require_buyer(actor)?;
		let mut cart = self.load_or_new_cart(&actor.id).await?;

		let before = cart.items.len();
		cart.items.retain(|i| i.id != item_id);
		if cart.items.len() == before {
			return Err(StoreError::NotFound(format!(
				"cart item '{}' not found",
				item_id
			)));
		}

		self.save_cart(&mut cart).await?;
		self.render_cart(cart).await
	}

	/// Empties the actor's cart.
	pub async fn clear_cart(&self, actor: &Actor) -> Result<CartView, StoreError> {
		require_buyer(actor)?;
		let mut cart = self.load_or_new_cart(&actor.id).await?;
		cart.items.clear();
		self.save_cart(&mut cart).await?;
		self.render_cart(cart).await
	}

	/// Loads the buyer's persisted cart, or creates an empty one in memory.
	pub(crate) async fn load_or_new_cart(&self, buyer_id: &str) -> Result<Cart, StoreError> {
		match self
			.storage()
			.retrieve(StoreKey::Carts.as_str(), buyer_id)
			.await
		{
			Ok(cart) => Ok(cart),
			Err(StorageError::NotFound) => Ok(Cart {
				id: Uuid::new_v4().to_string(),
				buyer_id: buyer_id.to_string(),
				items: Vec::new(),
				updated_at: Utc::now(),
			}),
			Err(e) => Err(e.into()),
		}
	}

	pub(crate) async fn save_cart(&self, cart: &mut Cart) -> Result<(), StoreError> {
		cart.updated_at = Utc::now();
		self.storage()
			.store(StoreKey::Carts.as_str(), &cart.buyer_id, cart)
			.await?;
		Ok(())
	}

	/// Joins cart lines with current catalog data. Lines whose product has
	/// been deleted since they were added are silently dropped from the view.
	pub(crate) async fn render_cart(&self, cart: Cart) -> Result<CartView, StoreError> {
		let mut items = Vec::with_capacity(cart.items.len());
		let mut total_price = Decimal::ZERO;

		for line in &cart.items {
			let product = match self.get_product(&line.product_id).await {
				Ok(product) => product,
				Err(StoreError::NotFound(_)) => continue,
				Err(e) => return Err(e),
			};
			let line_total = product.price * Decimal::from(line.quantity);
			total_price += line_total;
			items.push(CartItemView {
				id: line.id.clone(),
				product_id: line.product_id.clone(),
				model_name: product.model_name,
				unit_price: product.price,
				quantity: line.quantity,
				line_total,
			});
		}

		Ok(CartView {
			id: cart.id,
			items,
			total_price,
			updated_at: cart.updated_at,
		})
	}
}
