//! # Stock Arithmetic
//!
//! Pure quantity changes for the list's "sale" button and the editor's
//! +/- buttons. Nothing here touches storage: the caller takes the
//! outcome and, if `changed`, issues the update.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity = 3 ──sale──► 2 ──sale──► 1 ──sale──► 0 ──sale──► 0          │
//! │                 changed      changed      changed      NOT changed      │
//! │                                                                         │
//! │  Never below zero. An unchanged outcome means "nothing to write".      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Units removed by one press of the sale button.
pub const SALE_UNIT: i64 = 1;

/// Result of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleOutcome {
    /// The quantity after the change (clamped).
    pub quantity: i64,
    /// False when there is nothing to write.
    pub changed: bool,
}

impl SaleOutcome {
    fn between(before: i64, after: i64) -> Self {
        SaleOutcome {
            quantity: after,
            changed: before != after,
        }
    }
}

/// Removes `amount` units, clamping at zero.
///
/// ## Example
/// ```rust
/// use stockroom_core::stock::{apply_sale, SALE_UNIT};
///
/// let outcome = apply_sale(3, SALE_UNIT);
/// assert_eq!(outcome.quantity, 2);
/// assert!(outcome.changed);
///
/// let outcome = apply_sale(0, SALE_UNIT);
/// assert_eq!(outcome.quantity, 0);
/// assert!(!outcome.changed);
/// ```
pub fn apply_sale(current: i64, amount: i64) -> SaleOutcome {
    let current = current.max(0);
    if amount <= 0 {
        return SaleOutcome::between(current, current);
    }
    SaleOutcome::between(current, current.saturating_sub(amount).max(0))
}

/// Adds `amount` units (saturating). Non-positive amounts change nothing.
pub fn apply_restock(current: i64, amount: i64) -> SaleOutcome {
    let current = current.max(0);
    if amount <= 0 {
        return SaleOutcome::between(current, current);
    }
    SaleOutcome::between(current, current.saturating_add(amount))
}

// =============================================================================
// Unit Tests
// =============================================================================
