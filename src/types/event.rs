//! Decoded feed events.
//!
//! ## Boundary
//!
//! The transport layer owns the socket and the deserializer turns raw
//! messages into these variants, quantizing every price and size through
//! [`crate::types::price`] on the way in. The core consumes exactly one
//! decoded event per call and nothing else crosses the boundary.
//!
//! ## Sequencing
//!
//! Only book-mutating events (`Open`, `Done`, `Change`, `Match`) carry a
//! sequence number and participate in gap detection. `Heartbeat` and
//! `Error` are exempt.

use std::time::Instant;

use crate::types::Side;

/// One decoded upstream message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Liveness-only event; `at` is the transport's receive stamp.
    Heartbeat {
        at: Instant,
    },

    /// A new order became resident on the upstream book.
    Open {
        order_id: String,
        side: Side,
        /// Remaining size, fixed-point
        size: u64,
        /// Fixed-point, quantized to 2 digits
        price: u64,
        sequence: u64,
    },

    /// An order left the upstream book (filled or canceled).
    Done {
        order_id: String,
        side: Side,
        sequence: u64,
    },

    /// An order's price and/or size changed in place.
    ///
    /// The price fields travel together: a price change is applied only
    /// when both `old_price` and `new_price` are present. A size change is
    /// applied only when `new_size` is present and differs from
    /// `old_size`.
    Change {
        order_id: String,
        side: Side,
        sequence: u64,
        old_price: Option<u64>,
        new_price: Option<u64>,
        old_size: Option<u64>,
        new_size: Option<u64>,
    },

    /// A trade consumed (part of) a resident maker order.
    ///
    /// `side` is the **taker's** side; the resident maker order lives on
    /// `side.opposite()`. A Sell-tagged match hits a resident bid.
    Match {
        maker_order_id: String,
        side: Side,
        /// Traded size, fixed-point
        size: u64,
        sequence: u64,
    },

    /// Upstream error notification.
    Error {
        message: String,
    },
}

impl FeedEvent {
    /// The event's sequence number, if it is a sequence-bearing kind.
    pub fn sequence(&self) -> Option<u64> {
        match self {
            FeedEvent::Open { sequence, .. }
            | FeedEvent::Done { sequence, .. }
            | FeedEvent::Change { sequence, .. }
            | FeedEvent::Match { sequence, .. } => Some(*sequence),
            FeedEvent::Heartbeat { .. } | FeedEvent::Error { .. } => None,
        }
    }

    /// Whether this event participates in sequence checking.
    pub fn is_sequenced(&self) -> bool {
        self.sequence().is_some()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequenced_kinds() {
        let open = FeedEvent::Open {
            order_id: "a".into(),
            side: Side::Buy,
            size: 1,
            price: 1,
            sequence: 7,
        };
        let done = FeedEvent::Done {
            order_id: "a".into(),
            side: Side::Buy,
            sequence: 8,
        };

        assert_eq!(open.sequence(), Some(7));
        assert_eq!(done.sequence(), Some(8));
        assert!(open.is_sequenced());
    }

    #[test]
    fn test_exempt_kinds() {
        let heartbeat = FeedEvent::Heartbeat { at: Instant::now() };
        let error = FeedEvent::Error {
            message: "oops".into(),
        };

        assert_eq!(heartbeat.sequence(), None);
        assert_eq!(error.sequence(), None);
        assert!(!heartbeat.is_sequenced());
        assert!(!error.is_sequenced());
    }
}
