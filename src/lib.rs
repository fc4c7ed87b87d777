//! # l2book
//!
//! Level-2 limit order book reconstruction from a real-time feed.
//!
//! ## Architecture
//!
//! The core consists of:
//! - **Types**: fixed-point prices/sizes, orders, decoded feed events
//! - **OrderBook**: slab-backed book with per-side id and price indexes
//! - **Feed**: sequence-gap guard, liveness monitor, event processor
//!
//! ## Design Principles
//!
//! 1. **No Floating Point**: prices and sizes are exact decimals carried
//!    as fixed-point u64 (10^8 scaling), quantized once at the ingestion
//!    boundary
//! 2. **Passive Mirror**: the book replays an upstream matching engine's
//!    lifecycle events; it never matches orders itself
//! 3. **Failures As Values**: stale events, gaps, timeouts and crossed
//!    books come back as [`feed::Outcome`] / [`error::BookError`] values
//!    for the session layer to act on; the core never panics or exits
//! 4. **Synchronous Execution**: one event processed to completion at a
//!    time; no internal parallelism, no locks
//!
//! ## Example
//!
//! ```
//! use l2book::feed::FeedProcessor;
//! use l2book::types::price::{quantize_price, quantize_size};
//! use l2book::types::{FeedEvent, Side};
//!
//! let mut processor = FeedProcessor::new();
//!
//! processor.process(FeedEvent::Open {
//!     order_id: "d50ec984".into(),
//!     side: Side::Buy,
//!     size: quantize_size("0.5").unwrap(),
//!     price: quantize_price("200.01").unwrap(),
//!     sequence: 1,
//! });
//!
//! let snapshot = processor.snapshot(5).unwrap();
//! assert_eq!(snapshot.bids.len(), 1);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: prices, orders, feed events
pub mod types;

/// Order book: slab-backed bid/ask sides with top-N queries
pub mod orderbook;

/// Feed guards: sequencing, liveness, and the event processor
pub mod feed;

/// Error values
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use error::BookError;
pub use feed::{FeedConfig, FeedProcessor, LivenessMonitor, Outcome, SeqStatus, SequenceGuard};
pub use orderbook::{BookSnapshot, OrderBook, OrderNode, OrderTable, PriceLadder, PriceLevel, TopEntry};
pub use types::{FeedEvent, Order, Side};
