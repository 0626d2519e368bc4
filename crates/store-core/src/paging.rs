//! Pagination helpers shared by the list operations.

use crate::StoreError;
use store_config::MAX_PAGE_SIZE;
use store_types::{PageMeta, Paginated};

/// Resolves client-supplied page parameters against the configured default.
///
/// `per_page` is silently capped at [`MAX_PAGE_SIZE`]; zero values are
/// rejected.
pub(crate) fn resolve_page(
	page: Option<u64>,
	per_page: Option<u64>,
	default_per_page: u64,
) -> Result<(u64, u64), StoreError> {
	let page = page.unwrap_or(1);
	let per_page = per_page.unwrap_or(default_per_page).min(MAX_PAGE_SIZE);
	if page == 0 || per_page == 0 {
		return Err(StoreError::Validation(
			"'page' and 'per_page' must be positive".into(),
		));
	}
	Ok((page, per_page))
}

/// Slices an already-filtered, already-sorted result set into one page.
pub(crate) fn paginate<T>(items: Vec<T>, page: u64, per_page: u64) -> Paginated<T> {
	let total_items = items.len() as u64;
	let total_pages = total_items.div_ceil(per_page);
	let start = (page - 1).saturating_mul(per_page);

	let data = items
		.into_iter()
		.skip(start as usize)
		.take(per_page as usize)
		.collect();

	Paginated {
		data,
		meta: PageMeta {
			page,
			per_page,
			total_items,
			total_pages,
		},
	}
}
