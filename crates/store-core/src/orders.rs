//! Checkout and order lifecycle operations.
//!
//! Checkout snapshots the cart against current stock, decrements stock,
//! creates a pending order with prices fixed at purchase time, and clears
//! the cart. Every later status change goes through the transition policy,
//! and a move into `Cancelled` puts the purchased quantities back on the
//! shelf.

use crate::paging::{paginate, resolve_page};
use crate::{StoreEngine, StoreError};
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use store_policy::{can_cancel, check_cart_against_stock, validate_transition, CartLine};
use store_storage::StorageError;
use store_types::{
	Actor, CheckoutRequest, Order, OrderItem, OrderQuery, OrderSortField, OrderStatus, Paginated,
	Product, Role, SortOrder, StoreKey,
};
use uuid::Uuid;

impl StoreEngine {
	/// Converts the buyer's cart into a pending order.
	///
	/// Every cart line is checked against current stock in one pass; if any
	/// line cannot be satisfied the whole checkout is rejected with the full
	/// list of offending lines and nothing is modified.
	pub async fn checkout(&self, actor: &Actor, req: CheckoutRequest) -> Result<Order, StoreError> {
		if actor.role != Role::Buyer {
			return Err(StoreError::Forbidden("only buyers may check out".into()));
		}
		if req.shipping_address.trim().is_empty() {
			return Err(StoreError::Validation(
				"shipping_address must not be empty".into(),
			));
		}

		// Holds the write lock across the stock check and the decrements so
		// a concurrent checkout cannot act on the same stock snapshot.
		let _write = self.write_lock.lock().await;

		let mut cart = self.load_or_new_cart(&actor.id).await?;
		// Lines whose product vanished since they were added do not block
		// checkout; they are dropped along with the rest of the cart.
		let mut products: Vec<(usize, Product)> = Vec::new();
		let mut lines: Vec<CartLine> = Vec::new();
		for (idx, item) in cart.items.iter().enumerate() {
			let product = match self.get_product(&item.product_id).await {
				Ok(product) => product,
				Err(StoreError::NotFound(_)) => continue,
				Err(e) => return Err(e),
			};
			lines.push(CartLine {
				product_id: product.id.clone(),
				requested: item.quantity,
				available: product.stock_quantity,
			});
			products.push((idx, product));
		}
		if lines.is_empty() {
			return Err(StoreError::Validation(
				"cannot check out an empty cart".into(),
			));
		}

		check_cart_against_stock(&lines).map_err(StoreError::StockInsufficient)?;

		let mut items = Vec::with_capacity(products.len());
		let mut total_amount = Decimal::ZERO;
		for (idx, mut product) in products {
			let quantity = cart.items[idx].quantity;
			product.stock_quantity -= quantity;
			self.storage()
				.update(StoreKey::Products.as_str(), &product.id, &product)
				.await?;

			total_amount += product.price * Decimal::from(quantity);
			items.push(OrderItem {
				product_id: product.id,
				quantity,
				price_at_purchase: product.price,
				seller_id: product.seller_id,
			});
		}

		let now = Utc::now();
		let order = Order {
			id: Uuid::new_v4().to_string(),
			buyer_id: actor.id.clone(),
			total_amount,
			status: OrderStatus::Pending,
			shipping_address: req.shipping_address,
			items,
			created_at: now,
			updated_at: now,
		};
		self.storage()
			.store(StoreKey::Orders.as_str(), &order.id, &order)
			.await?;

		cart.items.clear();
		self.save_cart(&mut cart).await?;

		tracing::info!(
			order_id = %order.id,
			buyer = %actor.id,
			total = %order.total_amount,
			"Order placed"
		);
		Ok(order)
	}

	/// Loads an order the actor is allowed to see.
	///
	/// Buyers see their own orders, sellers see orders containing one of
	/// their listings, admins see everything. Invisible orders report as
	/// not found rather than forbidden.
	pub async fn get_order(&self, actor: &Actor, id: &str) -> Result<Order, StoreError> {
		let order: Order = match self.storage().retrieve(StoreKey::Orders.as_str(), id).await {
			Ok(order) => order,
			Err(StorageError::NotFound) => {
				return Err(StoreError::NotFound(format!("order '{}' not found", id)))
			},
			Err(e) => return Err(e.into()),
		};
		if !Self::order_visible(actor, &order) {
			return Err(StoreError::NotFound(format!("order '{}' not found", id)));
		}
		Ok(order)
	}

	/// Lists the orders visible to the actor, filtered, sorted and paginated.
	pub async fn list_orders(
		&self,
		actor: &Actor,
		query: &OrderQuery,
	) -> Result<Paginated<Order>, StoreError> {
		let (page, per_page) = resolve_page(
			query.page,
			query.per_page,
			self.config().store.default_page_size,
		)?;

		let mut orders: Vec<Order> = self
			.storage()
			.retrieve_all(StoreKey::Orders.as_str())
			.await?;
		orders.retain(|o| {
			Self::order_visible(actor, o) && query.status.is_none_or(|s| o.status == s)
		});

		let field = query.sort_by.unwrap_or(OrderSortField::CreatedAt);
		orders.sort_by(|a, b| match field {
			OrderSortField::Id => a.id.cmp(&b.id),
			OrderSortField::CreatedAt => a.created_at.cmp(&b.created_at),
			OrderSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
			OrderSortField::TotalAmount => a.total_amount.cmp(&b.total_amount),
			OrderSortField::Status => a.status.cmp(&b.status),
		});
		if query.order == Some(SortOrder::Desc) {
			orders.reverse();
		}

		Ok(paginate(orders, page, per_page))
	}

	/// Applies a policy-checked status change to an order.
	///
	/// Sellers may only touch orders that contain one of their listings.
	/// A transition into `Cancelled` restores the purchased stock.
	pub async fn update_order_status(
		&self,
		actor: &Actor,
		id: &str,
		proposed: OrderStatus,
	) -> Result<Order, StoreError> {
		let _write = self.write_lock.lock().await;

		let mut order = self.get_order(actor, id).await?;
		validate_transition(order.status, proposed, actor.role)?;

		let previous = order.status;
		order.status = proposed;
		order.updated_at = Utc::now();
		if proposed == OrderStatus::Cancelled {
			self.restore_stock(&order).await?;
		}
		self.storage()
			.update(StoreKey::Orders.as_str(), id, &order)
			.await?;

		tracing::info!(
			order_id = %order.id,
			from = %previous,
			to = %proposed,
			role = %actor.role,
			"Order status changed"
		);
		Ok(order)
	}

	/// Cancels an order on the dedicated cancellation path.
	///
	/// Open to buyers as well, unlike the status-update operation, but only
	/// while the order has not yet shipped. Buyers may only cancel their own
	/// orders, which visibility already guarantees.
	pub async fn cancel_order(&self, actor: &Actor, id: &str) -> Result<Order, StoreError> {
		let _write = self.write_lock.lock().await;

		let mut order = self.get_order(actor, id).await?;
		if !can_cancel(order.status, actor.role) {
			return Err(StoreError::Conflict(format!(
				"order in status '{}' can no longer be cancelled",
				order.status
			)));
		}

		let previous = order.status;
		order.status = OrderStatus::Cancelled;
		order.updated_at = Utc::now();
		self.restore_stock(&order).await?;
		self.storage()
			.update(StoreKey::Orders.as_str(), id, &order)
			.await?;

		tracing::info!(
			order_id = %order.id,
			from = %previous,
			role = %actor.role,
			"Order cancelled"
		);
		Ok(order)
	}

	/// Returns the statuses the actor may currently move the order to.
	pub async fn allowed_transitions(
		&self,
		actor: &Actor,
		id: &str,
	) -> Result<BTreeSet<OrderStatus>, StoreError> {
		let order = self.get_order(actor, id).await?;
		Ok(store_policy::allowed_next_statuses(order.status, actor.role))
	}

	/// Puts the purchased quantities of a cancelled order back on the shelf.
	///
	/// Lines whose product has been deleted since purchase are skipped.
	async fn restore_stock(&self, order: &Order) -> Result<(), StoreError> {
		for item in &order.items {
			let mut product = match self.get_product(&item.product_id).await {
				Ok(product) => product,
				Err(StoreError::NotFound(_)) => continue,
				Err(e) => return Err(e),
			};
			product.stock_quantity = product.stock_quantity.saturating_add(item.quantity);
			self.storage()
				.update(StoreKey::Products.as_str(), &item.product_id, &product)
				.await?;
		}
		Ok(())
	}

	fn order_visible(actor: &Actor, order: &Order) -> bool {
		match actor.role {
			Role::Admin => true,
			Role::Buyer => order.buyer_id == actor.id,
			Role::Seller => order.involves_seller(&actor.id),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testutil::{admin, buyer, engine, seller};
	use store_policy::PolicyError;
	use store_types::{AddCartItem, NewProduct};

	async fn seed_product(engine: &StoreEngine, owner: &Actor, stock: u32, price: u64) -> String {
		engine
			.create_product(
				owner,
				NewProduct {
					model_name: "X1".into(),
					manufacturer: "Acme".into(),
					price: Decimal::from(price),
					stock_quantity: stock,
					specifications: None,
				},
			)
			.await
			.unwrap()
			.id
	}

	async fn fill_cart(engine: &StoreEngine, actor: &Actor, product_id: &str, quantity: u32) {
		engine
			.add_cart_item(
				actor,
				AddCartItem {
					product_id: product_id.into(),
					quantity,
				},
			)
			.await
			.unwrap();
	}

	fn checkout_req() -> CheckoutRequest {
		CheckoutRequest {
			shipping_address: "1 Example Way".into(),
		}
	}

	#[tokio::test]
	async fn checkout_decrements_stock_and_clears_cart() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 3).await;

		let order = engine.checkout(&actor, checkout_req()).await.unwrap();
		assert_eq!(order.status, OrderStatus::Pending);
		assert_eq!(order.total_amount, Decimal::from(300));
		assert_eq!(order.items.len(), 1);
		assert_eq!(order.items[0].price_at_purchase, Decimal::from(100));
		assert_eq!(order.items[0].seller_id, owner.id);

		let product = engine.get_product(&product_id).await.unwrap();
		assert_eq!(product.stock_quantity, 7);

		let cart = engine.view_cart(&actor).await.unwrap();
		assert!(cart.items.is_empty());
	}

	#[tokio::test]
	async fn empty_cart_cannot_check_out() {
		let engine = engine();
		let result = engine.checkout(&buyer("b1"), checkout_req()).await;
		assert!(matches!(result, Err(StoreError::Validation(_))));
	}

	#[tokio::test]
	async fn blank_shipping_address_is_rejected() {
		let engine = engine();
		let result = engine
			.checkout(
				&buyer("b1"),
				CheckoutRequest {
					shipping_address: "   ".into(),
				},
			)
			.await;
		assert!(matches!(result, Err(StoreError::Validation(_))));
	}

	#[tokio::test]
	async fn oversold_checkout_reports_every_offending_line() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let scarce = seed_product(&engine, &owner, 5, 100).await;
		let plenty = seed_product(&engine, &owner, 50, 10).await;
		fill_cart(&engine, &actor, &scarce, 5).await;
		fill_cart(&engine, &actor, &plenty, 2).await;

		// Another buyer takes the scarce stock after the cart was filled.
		let rival = buyer("b2");
		fill_cart(&engine, &rival, &scarce, 5).await;
		engine.checkout(&rival, checkout_req()).await.unwrap();

		let result = engine.checkout(&actor, checkout_req()).await;
		let Err(StoreError::StockInsufficient(violations)) = result else {
			panic!("expected stock rejection, got {:?}", result);
		};
		assert_eq!(violations.len(), 1);
		assert_eq!(violations[0].product_id, scarce);
		assert_eq!(violations[0].available, 0);

		// Nothing was committed: cart intact, plentiful stock untouched.
		let cart = engine.view_cart(&actor).await.unwrap();
		assert_eq!(cart.items.len(), 2);
		let product = engine.get_product(&plenty).await.unwrap();
		assert_eq!(product.stock_quantity, 50);
	}

	#[tokio::test]
	async fn price_at_purchase_survives_catalog_edits() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		engine
			.update_product(
				&owner,
				&product_id,
				store_types::ProductPatch {
					price: Some(Decimal::from(999)),
					..Default::default()
				},
			)
			.await
			.unwrap();

		let fetched = engine.get_order(&actor, &order.id).await.unwrap();
		assert_eq!(fetched.items[0].price_at_purchase, Decimal::from(100));
		assert_eq!(fetched.total_amount, Decimal::from(100));
	}

	#[tokio::test]
	async fn visibility_scopes_orders_per_role() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		assert!(engine.get_order(&actor, &order.id).await.is_ok());
		assert!(engine.get_order(&owner, &order.id).await.is_ok());
		assert!(engine.get_order(&admin("a1"), &order.id).await.is_ok());

		// Strangers of either role see nothing, not a 403.
		assert!(matches!(
			engine.get_order(&buyer("b2"), &order.id).await,
			Err(StoreError::NotFound(_))
		));
		assert!(matches!(
			engine.get_order(&seller("s2"), &order.id).await,
			Err(StoreError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn list_orders_filters_by_status() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;

		fill_cart(&engine, &actor, &product_id, 1).await;
		let first = engine.checkout(&actor, checkout_req()).await.unwrap();
		fill_cart(&engine, &actor, &product_id, 1).await;
		engine.checkout(&actor, checkout_req()).await.unwrap();

		engine
			.update_order_status(&owner, &first.id, OrderStatus::Processing)
			.await
			.unwrap();

		let query = OrderQuery {
			status: Some(OrderStatus::Pending),
			..Default::default()
		};
		let page = engine.list_orders(&actor, &query).await.unwrap();
		assert_eq!(page.meta.total_items, 1);
		assert_ne!(page.data[0].id, first.id);
	}

	#[tokio::test]
	async fn seller_moves_order_through_fulfillment() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		let order = engine
			.update_order_status(&owner, &order.id, OrderStatus::Processing)
			.await
			.unwrap();
		assert_eq!(order.status, OrderStatus::Processing);

		let order = engine
			.update_order_status(&owner, &order.id, OrderStatus::Shipped)
			.await
			.unwrap();
		assert_eq!(order.status, OrderStatus::Shipped);

		// Shipped is a dead end for sellers.
		let result = engine
			.update_order_status(&owner, &order.id, OrderStatus::Delivered)
			.await;
		assert!(matches!(
			result,
			Err(StoreError::Policy(PolicyError::InvalidTransition { .. }))
		));
	}

	#[tokio::test]
	async fn buyer_cannot_use_status_update_path() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		let result = engine
			.update_order_status(&actor, &order.id, OrderStatus::Cancelled)
			.await;
		assert!(matches!(
			result,
			Err(StoreError::Policy(PolicyError::Unauthorized(Role::Buyer)))
		));
	}

	#[tokio::test]
	async fn unrelated_seller_cannot_update_status() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		let result = engine
			.update_order_status(&seller("s2"), &order.id, OrderStatus::Processing)
			.await;
		assert!(matches!(result, Err(StoreError::NotFound(_))));
	}

	#[tokio::test]
	async fn cancellation_restores_stock() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 4).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			6
		);

		let order = engine.cancel_order(&actor, &order.id).await.unwrap();
		assert_eq!(order.status, OrderStatus::Cancelled);
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			10
		);
	}

	#[tokio::test]
	async fn status_update_to_cancelled_also_restores_stock() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 4).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		engine
			.update_order_status(&owner, &order.id, OrderStatus::Cancelled)
			.await
			.unwrap();
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			10
		);
	}

	#[tokio::test]
	async fn shipped_order_cannot_be_cancelled() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();
		engine
			.update_order_status(&owner, &order.id, OrderStatus::Shipped)
			.await
			.unwrap();

		let result = engine.cancel_order(&actor, &order.id).await;
		assert!(matches!(result, Err(StoreError::Conflict(_))));
	}

	#[tokio::test]
	async fn repeated_cancellation_is_rejected() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 2).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		engine.cancel_order(&actor, &order.id).await.unwrap();
		let result = engine.cancel_order(&actor, &order.id).await;
		assert!(matches!(result, Err(StoreError::Conflict(_))));
		// Stock restored exactly once.
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			10
		);
	}

	#[tokio::test]
	async fn no_op_status_update_is_rejected_even_when_terminal() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();
		engine
			.update_order_status(&owner, &order.id, OrderStatus::Cancelled)
			.await
			.unwrap();

		let result = engine
			.update_order_status(&owner, &order.id, OrderStatus::Cancelled)
			.await;
		assert!(matches!(
			result,
			Err(StoreError::Policy(PolicyError::NoOpTransition(
				OrderStatus::Cancelled
			)))
		));
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_checkouts_cannot_oversell() {
		let engine = std::sync::Arc::new(engine());
		let owner = seller("s1");
		let product_id = seed_product(&engine, &owner, 3, 100).await;

		// Eight buyers race for three units, one unit each.
		let buyers: Vec<Actor> = (0..8).map(|i| buyer(&format!("b{}", i))).collect();
		for actor in &buyers {
			fill_cart(&engine, actor, &product_id, 1).await;
		}

		let mut handles = Vec::new();
		for actor in buyers {
			let engine = std::sync::Arc::clone(&engine);
			handles.push(tokio::spawn(async move {
				engine.checkout(&actor, checkout_req()).await
			}));
		}

		let mut placed = 0;
		let mut rejected = 0;
		for handle in handles {
			match handle.await.unwrap() {
				Ok(order) => {
					assert_eq!(order.items[0].quantity, 1);
					placed += 1;
				},
				Err(StoreError::StockInsufficient(violations)) => {
					assert_eq!(violations[0].product_id, product_id);
					rejected += 1;
				},
				Err(e) => panic!("unexpected checkout failure: {:?}", e),
			}
		}

		assert_eq!(placed, 3);
		assert_eq!(rejected, 5);
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			0
		);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn concurrent_cancellations_restore_stock_once() {
		let engine = std::sync::Arc::new(engine());
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 5, 100).await;
		fill_cart(&engine, &actor, &product_id, 2).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		let mut handles = Vec::new();
		for _ in 0..4 {
			let engine = std::sync::Arc::clone(&engine);
			let actor = actor.clone();
			let order_id = order.id.clone();
			handles.push(tokio::spawn(async move {
				engine.cancel_order(&actor, &order_id).await
			}));
		}

		let cancelled = count_successful_cancellations(handles).await;
		assert_eq!(cancelled, 1);
		assert_eq!(
			engine.get_product(&product_id).await.unwrap().stock_quantity,
			5
		);
	}

	async fn count_successful_cancellations(
		handles: Vec<tokio::task::JoinHandle<Result<Order, StoreError>>>,
	) -> usize {
		let mut ok = 0;
		for handle in handles {
			match handle.await.unwrap() {
				Ok(_) => ok += 1,
				Err(StoreError::Conflict(_)) => {},
				Err(e) => panic!("unexpected failure: {:?}", e),
			}
		}
		ok
	}

	#[tokio::test]
	async fn allowed_transitions_reflect_role_and_status() {
		let engine = engine();
		let owner = seller("s1");
		let actor = buyer("b1");
		let product_id = seed_product(&engine, &owner, 10, 100).await;
		fill_cart(&engine, &actor, &product_id, 1).await;
		let order = engine.checkout(&actor, checkout_req()).await.unwrap();

		let seller_next = engine.allowed_transitions(&owner, &order.id).await.unwrap();
		assert_eq!(
			seller_next,
			BTreeSet::from([
				OrderStatus::Processing,
				OrderStatus::Shipped,
				OrderStatus::Cancelled
			])
		);

		let buyer_next = engine.allowed_transitions(&actor, &order.id).await.unwrap();
		assert!(buyer_next.is_empty());

		let admin_next = engine
			.allowed_transitions(&admin("a1"), &order.id)
			.await
			.unwrap();
		assert!(!admin_next.contains(&OrderStatus::Failed));
		assert!(admin_next.contains(&OrderStatus::Delivered));
	}
}
