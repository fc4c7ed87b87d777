//! Feed-consistency guards and the event processor.
//!
//! ## Components
//!
//! - [`SequenceGuard`]: proves the event stream is neither reordered nor
//!   incomplete before anything touches the book
//! - [`LivenessMonitor`]: proves the feed connection is still alive
//! - [`FeedProcessor`]: routes one decoded event at a time through the
//!   guards into the [`crate::orderbook::OrderBook`]
//!
//! The transport (socket management, reconnection, framing) and the
//! deserializer are external collaborators; they hand this module
//! well-formed [`crate::types::FeedEvent`] values, one at a time, in
//! arrival order.

pub mod liveness;
pub mod processor;
pub mod sequence;

pub use liveness::LivenessMonitor;
pub use processor::{FeedConfig, FeedProcessor, Outcome};
pub use sequence::{SeqStatus, SequenceGuard};
