//! Product catalog management.
//!
//! Sellers and admins list products; anyone may browse. Browsing supports
//! substring filters, price bounds, sorting and pagination, all applied
//! in-process over the namespace scan.

use crate::paging::{paginate, resolve_page};
use crate::{StoreEngine, StoreError};
use rust_decimal::Decimal;
use store_storage::StorageError;
use store_types::{
	Actor, NewProduct, Paginated, Product, ProductPatch, ProductQuery, ProductSortField, Role,
	SortOrder, StoreKey,
};
use uuid::Uuid;

fn require_lister(actor: &Actor) -> Result<(), StoreError> {
	match actor.role {
		Role::Seller | Role::Admin => Ok(()),
		Role::Buyer => Err(StoreError::Forbidden(
			"only sellers and admins may manage catalog listings".into(),
		)),
	}
}

fn require_price_non_negative(price: Decimal) -> Result<(), StoreError> {
	if price < Decimal::ZERO {
		return Err(StoreError::Validation("price must not be negative".into()));
	}
	Ok(())
}

impl StoreEngine {
	/// Creates a catalog listing owned by the acting seller or admin.
	pub async fn create_product(
		&self,
		actor: &Actor,
		req: NewProduct,
	) -> Result<Product, StoreError> {
		require_lister(actor)?;
		require_price_non_negative(req.price)?;
		if req.model_name.trim().is_empty() || req.manufacturer.trim().is_empty() {
			return Err(StoreError::Validation(
				"model_name and manufacturer must not be empty".into(),
			));
		}

		let product = Product {
			id: Uuid::new_v4().to_string(),
			model_name: req.model_name,
			manufacturer: req.manufacturer,
			price: req.price,
			stock_quantity: req.stock_quantity,
			specifications: req.specifications,
			seller_id: actor.id.clone(),
		};

		self.storage()
			.store(StoreKey::Products.as_str(), &product.id, &product)
			.await?;
		tracing::info!(product_id = %product.id, seller = %actor.id, "Created product");
		Ok(product)
	}

	/// Loads a single product by id.
	pub async fn get_product(&self, id: &str) -> Result<Product, StoreError> {
		match self
			.storage()
			.retrieve(StoreKey::Products.as_str(), id)
			.await
		{
			Ok(product) => Ok(product),
			Err(StorageError::NotFound) => {
				Err(StoreError::NotFound(format!("product '{}' not found", id)))
			},
			Err(e) => Err(e.into()),
		}
	}

	/// Applies a partial update to a listing the actor owns.
	///
	/// Admins may edit any listing; sellers only their own.
	pub async fn update_product(
		&self,
		actor: &Actor,
		id: &str,
		patch: ProductPatch,
	) -> Result<Product, StoreError> {
		require_lister(actor)?;
		let mut product = self.get_product(id).await?;
		self.require_listing_owner(actor, &product)?;

		if patch.is_empty() {
			return Err(StoreError::Validation(
				"no fields provided to update".into(),
			));
		}
		if let Some(price) = patch.price {
			require_price_non_negative(price)?;
			product.price = price;
		}
		if let Some(model_name) = patch.model_name {
			product.model_name = model_name;
		}
		if let Some(manufacturer) = patch.manufacturer {
			product.manufacturer = manufacturer;
		}
		if let Some(stock_quantity) = patch.stock_quantity {
			product.stock_quantity = stock_quantity;
		}
		if let Some(specifications) = patch.specifications {
			product.specifications = Some(specifications);
		}

		self.storage()
			.update(StoreKey::Products.as_str(), id, &product)
			.await?;
		Ok(product)
	}

	/// Deletes a listing the actor owns. Existing orders keep their copied
	/// line data; carts still referencing the product lose the line at the
	/// next view or checkout.
	pub async fn delete_product(&self, actor: &Actor, id: &str) -> Result<(), StoreError> {
		require_lister(actor)?;
		let product = self.get_product(id).await?;
		self.require_listing_owner(actor, &product)?;

		self.storage()
			.remove(StoreKey::Products.as_str(), id)
			.await?;
		tracing::info!(product_id = %id, "Deleted product");
		Ok(())
	}

	/// Browses the catalog with filters, sorting and pagination.
	pub async fn list_products(
		&self,
		query: &ProductQuery,
	) -> Result<Paginated<Product>, StoreError> {
		if query.price_min.is_some_and(|p| p < Decimal::ZERO)
			|| query.price_max.is_some_and(|p| p < Decimal::ZERO)
		{
			return Err(StoreError::Validation(
				"price bounds must not be negative".into(),
			));
		}
		if let (Some(min), Some(max)) = (query.price_min, query.price_max) {
			if max < min {
				return Err(StoreError::Validation(
					"price_max must be greater than or equal to price_min".into(),
				));
			}
		}
		let (page, per_page) = resolve_page(
			query.page,
			query.per_page,
			self.config().store.default_page_size,
		)?;

		let mut products: Vec<Product> = self
			.storage()
			.retrieve_all(StoreKey::Products.as_str())
			.await?;

		let contains = |haystack: &str, needle: &str| {
			haystack.to_lowercase().contains(&needle.to_lowercase())
		};
		products.retain(|p| {
			query
				.manufacturer
				.as_deref()
				.is_none_or(|m| contains(&p.manufacturer, m))
				&& query
					.model_name_contains
					.as_deref()
					.is_none_or(|m| contains(&p.model_name, m))
				&& query.price_min.is_none_or(|min| p.price >= min)
				&& query.price_max.is_none_or(|max| p.price <= max)
		});

		let field = query.sort_by.unwrap_or(ProductSortField::Id);
		products.sort_by(|a, b| match field {
			ProductSortField::Id => a.id.cmp(&b.id),
			ProductSortField::ModelName => a.model_name.cmp(&b.model_name),
			ProductSortField::Manufacturer => a.manufacturer.cmp(&b.manufacturer),
			ProductSortField::Price => a.price.cmp(&b.price),
			ProductSortField::StockQuantity => a.stock_quantity.cmp(&b.stock_quantity),
		});
		if query.order == Some(SortOrder::Desc) {
			products.reverse();
		}

		Ok(paginate(products, page, per_page))
	}

	fn require_listing_owner(&self, actor: &Actor, product: &Product) -> Result<(), StoreError> {
		if actor.role == Role::Admin || product.seller_id == actor.id {
			Ok(())
		} else {
			Err(StoreError::Forbidden(
				"you do not own this catalog listing".into(),
			))
		}
	}
}
