//! Feed event processing: the composition root in front of the book.
//!
//! ## Control Flow
//!
//! One decoded event enters [`FeedProcessor::process`] at a time:
//!
//! 1. Sequence-bearing events run the [`SequenceGuard`] first; stale and
//!    gapped events are discarded before they can touch the book.
//! 2. Accepted events mutate the [`OrderBook`]; references to orders the
//!    mirror never saw are silently skipped.
//! 3. Every applied mutation is followed by an O(1) crossed-book check.
//! 4. Heartbeats feed the [`LivenessMonitor`]; upstream error
//!    notifications count against the fault budget.
//!
//! Every failure is returned as an [`Outcome`] value. Nothing in here
//! terminates the process or closes the connection; the session layer
//! owns those decisions and watches [`FeedProcessor::fault_budget_exhausted`]
//! to make them.

use std::time::Duration;

use tracing::warn;

use crate::error::BookError;
use crate::feed::{LivenessMonitor, SeqStatus, SequenceGuard};
use crate::orderbook::{BookSnapshot, OrderBook};
use crate::types::FeedEvent;

/// Default number of tolerated faults before the session should end.
pub const DEFAULT_FAULT_BUDGET: u32 = 5;

/// Default per-side order capacity hint.
pub const DEFAULT_ORDER_CAPACITY: usize = 10_000;

// ============================================================================
// Configuration
// ============================================================================

/// Tunables for one feed session.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum time between heartbeats before a timeout is signaled
    pub liveness_threshold: Duration,

    /// Faults (gaps, upstream errors, crossings) tolerated before
    /// [`FeedProcessor::fault_budget_exhausted`] turns true
    pub fault_budget: u32,

    /// Per-side slab pre-allocation hint
    pub order_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            liveness_threshold: crate::feed::liveness::DEFAULT_THRESHOLD,
            fault_budget: DEFAULT_FAULT_BUDGET,
            order_capacity: DEFAULT_ORDER_CAPACITY,
        }
    }
}

// ============================================================================
// Processing outcome
// ============================================================================

/// What happened to one processed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event passed all guards and its effect (if any) is in the book.
    Applied,

    /// Discarded: the sequence number was at or below the cursor.
    Stale {
        /// The cursor at observation time
        last: u64,
        /// The observed number
        seq: u64,
    },

    /// Discarded: events were lost between the cursor and this one.
    Gap {
        /// The number the guard expected
        expected: u64,
        /// How many events went missing
        missing: u64,
    },

    /// The heartbeat arrived too late; the feed may be dead.
    Timeout {
        /// Time since the previous heartbeat
        elapsed: Duration,
    },

    /// The mutation left the highest bid at or above the lowest ask;
    /// the mirror no longer reflects a valid upstream state.
    Crossed {
        /// Highest resident bid price, fixed-point
        bid: u64,
        /// Lowest resident ask price, fixed-point
        ask: u64,
    },

    /// The event referenced no resident order (or carried no effective
    /// change); nothing was touched.
    Ignored,

    /// The feed delivered an error notification.
    UpstreamError,
}

impl Outcome {
    /// Whether continued use of this session is unsafe.
    ///
    /// A crossed book means the mirror's guarantees are gone; a liveness
    /// timeout means the feed itself may be. Both call for teardown.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Outcome::Timeout { .. } | Outcome::Crossed { .. })
    }
}

// ============================================================================
// Processor
// ============================================================================

/// Drives one instrument's book from its feed session.
#[derive(Debug)]
pub struct FeedProcessor {
    book: OrderBook,
    guard: SequenceGuard,
    liveness: LivenessMonitor,
    faults: u32,
    fault_budget: u32,
}

impl Default for FeedProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedProcessor {
    /// Create a processor with default configuration
    pub fn new() -> Self {
        Self::with_config(FeedConfig::default())
    }

    /// Create a processor from explicit configuration
    pub fn with_config(config: FeedConfig) -> Self {
        Self {
            book: OrderBook::with_capacity(config.order_capacity),
            guard: SequenceGuard::new(),
            liveness: LivenessMonitor::new(config.liveness_threshold),
            faults: 0,
            fault_budget: config.fault_budget,
        }
    }

    /// Process one decoded event to completion.
    pub fn process(&mut self, event: FeedEvent) -> Outcome {
        if let Some(seq) = event.sequence() {
            match self.guard.observe(seq) {
                SeqStatus::InOrder => {}
                SeqStatus::Stale { last, seq } => return Outcome::Stale { last, seq },
                SeqStatus::Gap { expected, missing } => {
                    self.faults += 1;
                    return Outcome::Gap { expected, missing };
                }
            }
        }

        match event {
            FeedEvent::Heartbeat { at } => match self.liveness.observe(at) {
                Some(elapsed) => Outcome::Timeout { elapsed },
                None => Outcome::Applied,
            },

            FeedEvent::Error { message } => {
                warn!(%message, "upstream feed error");
                self.faults += 1;
                Outcome::UpstreamError
            }

            FeedEvent::Open {
                order_id,
                side,
                size,
                price,
                ..
            } => {
                let touched = self.book.insert(&order_id, size, price, side);
                self.after_mutation(touched)
            }

            FeedEvent::Done { order_id, side, .. } => {
                let touched = self.book.delete(&order_id, side);
                self.after_mutation(touched)
            }

            FeedEvent::Change {
                order_id,
                side,
                old_price,
                new_price,
                old_size,
                new_size,
                ..
            } => {
                let mut touched = false;
                if let (Some(old), Some(new)) = (old_price, new_price) {
                    touched |= self.book.change_price(&order_id, old, new, side);
                }
                if let Some(new) = new_size {
                    if old_size != Some(new) {
                        touched |= self.book.change_size(&order_id, new, side);
                    }
                }
                self.after_mutation(touched)
            }

            FeedEvent::Match {
                maker_order_id,
                side,
                size,
                ..
            } => {
                // The event carries the taker's side; the resident maker
                // order lives on the opposite one.
                let touched = self.book.match_order(&maker_order_id, size, side.opposite());
                self.after_mutation(touched)
            }
        }
    }

    /// Classify an applied mutation, running the crossed-book check.
    fn after_mutation(&mut self, touched: bool) -> Outcome {
        if !touched {
            return Outcome::Ignored;
        }
        match self.book.crossed() {
            Some((bid, ask)) => {
                self.faults += 1;
                Outcome::Crossed { bid, ask }
            }
            None => Outcome::Applied,
        }
    }

    /// Top-N view of both sides with the non-crossing check
    pub fn snapshot(&self, n: usize) -> Result<BookSnapshot, BookError> {
        self.book.snapshot(n)
    }

    /// Read access to the mirrored book
    #[inline]
    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    /// The last accepted sequence number
    #[inline]
    pub fn sequence(&self) -> Option<u64> {
        self.guard.cursor()
    }

    /// Faults recorded so far (gaps, crossings, upstream errors)
    #[inline]
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Whether the session has burned through its fault budget and
    /// should be torn down by the caller.
    #[inline]
    pub fn fault_budget_exhausted(&self) -> bool {
        self.faults > self.fault_budget
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
