//! Role-based order-status transition policy.
//!
//! Sellers and admins drive fulfillment forward; buyers may only cancel,
//! and only before the order ships. `Failed` belongs to a system/payment
//! path and is never reachable through the status-update operation. The
//! whole policy is a pure function of `(current status, role)` so it can
//! be enforced identically wherever a status change is proposed.

use std::collections::BTreeSet;
use store_types::{OrderStatus, Role};
use thiserror::Error;

/// Rejections produced by the transition policy.
///
/// All of these are recoverable, user-facing conditions; the policy itself
/// has no fatal failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
	/// The proposed status equals the current one. Rejected rather than
	/// silently accepted so a UI that never selected a real change fails
	/// loudly instead of masking the bug.
	#[error("order is already '{0}'; a status update must select a different status")]
	NoOpTransition(OrderStatus),
	/// The order sits in a status with no outgoing transitions.
	#[error("order in terminal status '{0}' cannot change status")]
	TerminalOrder(OrderStatus),
	/// The role has no access to the status-update operation at all.
	#[error("role '{0}' may not update order status")]
	Unauthorized(Role),
	/// The proposed status is not reachable from the current one for this role.
	#[error("role '{role}' may not move an order from '{from}' to '{to}'")]
	InvalidTransition {
		from: OrderStatus,
		to: OrderStatus,
		role: Role,
	},
}

/// Returns the set of statuses the given role may propose as the next
/// status of an order currently in `current`.
///
/// Buyers always get the empty set; they cancel through [`can_cancel`],
/// not the status-update path. Terminal statuses and `Shipped` have no
/// outgoing transitions for any role.
pub fn allowed_next_statuses(current: OrderStatus, role: Role) -> BTreeSet<OrderStatus> {
	use OrderStatus::*;

	match role {
		Role::Buyer => BTreeSet::new(),
		Role::Seller => match current {
			Pending => BTreeSet::from([Processing, Shipped, Cancelled]),
			Processing => BTreeSet::from([Shipped, Cancelled]),
			_ => BTreeSet::new(),
		},
		// Admins may jump ahead (operational override) but may not resurrect
		// a terminal order, revert to pending, or hand-pick failed.
		Role::Admin => match current {
			Pending | Processing => OrderStatus::all()
				.filter(|s| *s != current && !matches!(s, Pending | Failed))
				.collect(),
			_ => BTreeSet::new(),
		},
	}
}

/// Validates a proposed status change before it is applied.
///
/// A same-status update is rejected first, for every status and role, so
/// the caller can distinguish "nothing selected" from a genuinely illegal
/// move.
pub fn validate_transition(
	current: OrderStatus,
	proposed: OrderStatus,
	role: Role,
) -> Result<(), PolicyError> {
	if proposed == current {
		return Err(PolicyError::NoOpTransition(current));
	}
	if current.is_terminal() {
		return Err(PolicyError::TerminalOrder(current));
	}
	if role == Role::Buyer {
		return Err(PolicyError::Unauthorized(role));
	}
	if !allowed_next_statuses(current, role).contains(&proposed) {
		return Err(PolicyError::InvalidTransition {
			from: current,
			to: proposed,
			role,
		});
	}
	Ok(())
}

/// Returns true if the given role may cancel an order currently in `current`.
///
/// Cancellation is open to every role but only while the order has not yet
/// shipped; anything later belongs to a returns process outside this policy.
pub fn can_cancel(current: OrderStatus, _role: Role) -> bool {
	matches!(current, OrderStatus::Pending | OrderStatus::Processing)
}

#[cfg(test)]
mod tests {
	use super::*;
	use OrderStatus::*;
	use Role::*;

	const TERMINAL: [OrderStatus; 3] = [Delivered, Cancelled, Failed];
	const ROLES: [Role; 3] = [Buyer, Seller, Admin];

	#[test]
	fn terminal_statuses_allow_nothing_for_any_role() {
		for status in TERMINAL {
			for role in ROLES {
				assert!(
					allowed_next_statuses(status, role).is_empty(),
					"{status} should allow nothing for {role}"
				);
			}
		}
	}

	#[test]
	fn shipped_allows_nothing_for_any_role() {
		for role in ROLES {
			assert!(allowed_next_statuses(Shipped, role).is_empty());
		}
	}

	#[test]
	fn same_status_update_is_rejected_for_every_status_and_role() {
		for status in OrderStatus::all() {
			for role in ROLES {
				assert_eq!(
					validate_transition(status, status, role),
					Err(PolicyError::NoOpTransition(status))
				);
			}
		}
	}

	#[test]
	fn seller_options_from_pending() {
		assert_eq!(
			allowed_next_statuses(Pending, Seller),
			BTreeSet::from([Processing, Shipped, Cancelled])
		);
	}

	#[test]
	fn seller_options_from_processing() {
		assert_eq!(
			allowed_next_statuses(Processing, Seller),
			BTreeSet::from([Shipped, Cancelled])
		);
	}

	#[test]
	fn admin_options_exclude_pending_failed_and_current() {
		assert_eq!(
			allowed_next_statuses(Pending, Admin),
			BTreeSet::from([Processing, Shipped, Delivered, Cancelled])
		);
		assert_eq!(
			allowed_next_statuses(Processing, Admin),
			BTreeSet::from([Shipped, Delivered, Cancelled])
		);
	}

	#[test]
	fn buyer_gets_no_status_update_options() {
		for status in OrderStatus::all() {
			assert!(allowed_next_statuses(status, Buyer).is_empty());
		}
	}

	#[test]
	fn buyer_status_update_is_unauthorized() {
		assert_eq!(
			validate_transition(Pending, Processing, Buyer),
			Err(PolicyError::Unauthorized(Buyer))
		);
	}

	#[test]
	fn admin_may_skip_processing() {
		assert_eq!(validate_transition(Pending, Shipped, Admin), Ok(()));
	}

	#[test]
	fn no_backward_transition_even_for_admin() {
		assert_eq!(
			validate_transition(Shipped, Processing, Admin),
			Err(PolicyError::InvalidTransition {
				from: Shipped,
				to: Processing,
				role: Admin,
			})
		);
	}

	#[test]
	fn failed_is_never_manually_selectable() {
		for role in [Seller, Admin] {
			for current in [Pending, Processing] {
				assert!(matches!(
					validate_transition(current, Failed, role),
					Err(PolicyError::InvalidTransition { .. })
				));
			}
		}
	}

	#[test]
	fn terminal_order_error_takes_precedence_over_invalid_transition() {
		assert_eq!(
			validate_transition(Delivered, Shipped, Admin),
			Err(PolicyError::TerminalOrder(Delivered))
		);
	}

	#[test]
	fn cancel_window_closes_at_shipping() {
		assert!(can_cancel(Pending, Buyer));
		assert!(can_cancel(Processing, Seller));
		assert!(!can_cancel(Shipped, Buyer));
		assert!(!can_cancel(Delivered, Admin));
		assert!(!can_cancel(Cancelled, Admin));
		assert!(!can_cancel(Failed, Seller));
	}

	#[test]
	fn seller_transition_to_delivered_is_rejected() {
		assert_eq!(
			validate_transition(Processing, Delivered, Seller),
			Err(PolicyError::InvalidTransition {
				from: Processing,
				to: Delivered,
				role: Seller,
			})
		);
	}
}
