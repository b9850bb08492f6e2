//! # Change Decomposition
//!
//! The denomination table and the greedy change decomposer.
//!
//! ## How Decomposition Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  decompose(40)                                                          │
//! │                                                                         │
//! │  100 ──► 40 / 100 = 0   (skip)                                         │
//! │   50 ──► 40 /  50 = 0   (skip)                                         │
//! │   25 ──► 40 /  25 = 1   take (25, 1), remaining 15                     │
//! │   20 ──► 15 /  20 = 0   (skip)                                         │
//! │   10 ──► 15 /  10 = 1   take (10, 1), remaining 5                      │
//! │    5 ──►  5 /   5 = 1   take (5, 1), remaining 0                       │
//! │    1 ──►  0 /   1 = 0   (skip)                                         │
//! │                                                                         │
//! │  Result: [(25, 1), (10, 1), (5, 1)]                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The smallest denomination is 1, so every non-negative amount is fully
//! representable: the weighted sum of the output always equals the input.
//! The output order (descending by denomination) is part of the contract;
//! the machine dispenses and displays change largest-first.

use serde::{Deserialize, Serialize};

/// The cash units the machine accepts and dispenses, ascending.
///
/// Fixed set; the greedy decomposer is only guaranteed exact for a table
/// whose smallest entry is 1, and is only used with this table.
pub const DENOMINATIONS: [u32; 7] = [1, 5, 10, 20, 25, 50, 100];

/// Checks whether a whole-unit amount is a single accepted bill or coin.
#[inline]
pub fn is_valid_denomination(units: u32) -> bool {
    DENOMINATIONS.contains(&units)
}

/// One denomination line of a change breakdown: `count` pieces of
/// `denomination` units each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLine {
    pub denomination: u32,
    pub count: u32,
}

/// Decomposes a whole-unit amount into denomination lines, greedily,
/// largest denomination first.
///
/// ## Guarantees
/// - `sum(denomination * count) == amount` for every input
/// - Output is strictly descending by denomination
/// - No zero-count lines; `decompose(0)` is empty
///
/// ## Example
/// ```rust
/// use vendo_core::change::{decompose, ChangeLine};
///
/// let lines = decompose(40);
/// assert_eq!(
///     lines,
///     vec![
///         ChangeLine { denomination: 25, count: 1 },
///         ChangeLine { denomination: 10, count: 1 },
///         ChangeLine { denomination: 5, count: 1 },
///     ]
/// );
/// ```
pub fn decompose(amount: u64) -> Vec<ChangeLine> {
    let mut remaining = amount;
    let mut breakdown = Vec::new();

    for &denomination in DENOMINATIONS.iter().rev() {
        if remaining >= denomination as u64 {
            let count = remaining / denomination as u64;
            breakdown.push(ChangeLine {
                denomination,
                count: count as u32,
            });
            remaining -= denomination as u64 * count;
        }
    }

    breakdown
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted_sum(lines: &[ChangeLine]) -> u64 {
        lines
            .iter()
            .map(|l| l.denomination as u64 * l.count as u64)
            .sum()
    }

    #[test]
    fn test_decompose_zero_is_empty() {
        assert!(decompose(0).is_empty());
    }

    #[test]
    fn test_decompose_exact_bill() {
        assert_eq!(
            decompose(100),
            vec![ChangeLine {
                denomination: 100,
                count: 1
            }]
        );
    }

    #[test]
    fn test_decompose_forty() {
        // 40 breaks greedily as 25 + 10 + 5, largest first
        assert_eq!(
            decompose(40),
            vec![
                ChangeLine {
                    denomination: 25,
                    count: 1
                },
                ChangeLine {
                    denomination: 10,
                    count: 1
                },
                ChangeLine {
                    denomination: 5,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_decompose_repeated_denomination() {
        // 200 = two 100s in a single line
        assert_eq!(
            decompose(200),
            vec![ChangeLine {
                denomination: 100,
                count: 2
            }]
        );
    }

    #[test]
    fn test_sum_invariant_holds_for_small_amounts() {
        for amount in 0..=500 {
            assert_eq!(weighted_sum(&decompose(amount)), amount, "amount {amount}");
        }
    }

    #[test]
    fn test_output_strictly_descending_no_zero_counts() {
        for amount in 0..=500 {
            let lines = decompose(amount);
            for pair in lines.windows(2) {
                assert!(pair[0].denomination > pair[1].denomination);
            }
            assert!(lines.iter().all(|l| l.count > 0));
        }
    }

    #[test]
    fn test_valid_denominations() {
        for units in DENOMINATIONS {
            assert!(is_valid_denomination(units));
        }
        assert!(!is_valid_denomination(0));
        assert!(!is_valid_denomination(2));
        assert!(!is_valid_denomination(75));
        assert!(!is_valid_denomination(500));
    }
}
