//! Quantity rules for salon trade orders.
//!
//! Trade pricing is limited to a small number of units per order. The rule is
//! applied to the total across all line items, not per variant.

use crate::types::LineItem;

/// Maximum number of units a single trade order may contain.
pub const MAX_UNITS_PER_ORDER: u64 = 2;

/// Why a set of line items was rejected.
///
/// The `Display` text is customer-facing: it is returned in the API response
/// and emailed to the salon.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// More units than the trade limit allows.
    #[error(
        "Total quantity ({total}) exceeds maximum of {max}. Please resubmit with {max} or fewer items."
    )]
    ExceedsMaximum {
        /// Units requested across all line items.
        total: u64,
        /// The limit that was exceeded.
        max: u64,
    },

    /// Nothing was actually requested.
    #[error("Please select at least 1 item.")]
    NoItems,
}

/// Check the total quantity of `items` against the trade limit.
///
/// Returns the total on success. An empty slice totals zero and is rejected.
///
/// # Errors
///
/// - [`QuantityError::ExceedsMaximum`] if the total is above
///   [`MAX_UNITS_PER_ORDER`].
/// - [`QuantityError::NoItems`] if the total is zero.
///
/// ```
/// use restyla_trade_core::{LineItem, validate_quantity};
///
/// let items = [LineItem::new("v1", 1), LineItem::new("v2", 1)];
/// assert_eq!(validate_quantity(&items), Ok(2));
/// ```
pub fn validate_quantity(items: &[LineItem]) -> Result<u64, QuantityError> {
    let total: u64 = items.iter().map(|item| u64::from(item.quantity)).sum();

    if total > MAX_UNITS_PER_ORDER {
        return Err(QuantityError::ExceedsMaximum {
            total,
            max: MAX_UNITS_PER_ORDER,
        });
    }

    if total == 0 {
        return Err(QuantityError::NoItems);
    }

    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn items(quantities: &[u32]) -> Vec<LineItem> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| LineItem::new(format!("v{i}"), q))
            .collect()
    }

    #[test]
    fn test_empty_is_rejected() {
        assert_eq!(validate_quantity(&[]), Err(QuantityError::NoItems));
    }

    #[test]
    fn test_all_zero_is_rejected() {
        assert_eq!(validate_quantity(&items(&[0, 0])), Err(QuantityError::NoItems));
    }

    #[test]
    fn test_limit_is_inclusive() {
        assert_eq!(validate_quantity(&items(&[1, 1])), Ok(2));
        assert_eq!(validate_quantity(&items(&[2])), Ok(2));
        assert_eq!(validate_quantity(&items(&[1])), Ok(1));
    }

    #[test]
    fn test_over_limit_is_rejected() {
        assert_eq!(
            validate_quantity(&items(&[1, 2])),
            Err(QuantityError::ExceedsMaximum { total: 3, max: 2 })
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        assert_eq!(
            validate_quantity(&items(&[2, 0, 1])),
            validate_quantity(&items(&[1, 2, 0]))
        );
        assert_eq!(
            validate_quantity(&items(&[0, 1])),
            validate_quantity(&items(&[1, 0]))
        );
    }

    #[test]
    fn test_is_repeatable() {
        let input = items(&[1, 1, 1]);
        assert_eq!(validate_quantity(&input), validate_quantity(&input));
    }

    #[test]
    fn test_large_quantities_do_not_overflow() {
        assert_eq!(
            validate_quantity(&items(&[u32::MAX, u32::MAX])),
            Err(QuantityError::ExceedsMaximum {
                total: u64::from(u32::MAX) * 2,
                max: 2,
            })
        );
    }

    #[test]
    fn test_messages() {
        let err = validate_quantity(&items(&[3])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Total quantity (3) exceeds maximum of 2. Please resubmit with 2 or fewer items."
        );
        assert_eq!(
            QuantityError::NoItems.to_string(),
            "Please select at least 1 item."
        );
    }
}
