//! Error types surfaced by the book.

use thiserror::Error;

use crate::types::price;

/// Errors that can occur while querying the mirrored book.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    /// The highest resident bid is at or above the lowest resident ask.
    ///
    /// A crossed book indicates upstream feed corruption or a logic
    /// defect; the mirror's guarantees no longer hold and the session
    /// should be torn down.
    #[error(
        "crossed book: highest bid {} is not below lowest ask {}",
        price::from_fixed_trimmed(*.bid),
        price::from_fixed_trimmed(*.ask)
    )]
    Crossed {
        /// Highest resident bid price, fixed-point
        bid: u64,
        /// Lowest resident ask price, fixed-point
        ask: u64,
    },
}

// ============================================================================
// Unit Tests
// ============================================================================
