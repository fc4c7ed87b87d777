//! The Level-2 order book: per-side composition of identity-keyed and
//! price-keyed views over one logical order set.
//!
//! ## Architecture
//!
//! Each [`BookSide`] pairs an [`OrderTable`] (slab arena + id index) with
//! a [`PriceLadder`] (ascending price map of FIFO levels). [`OrderBook`]
//! holds one side for bids and one for asks; an id lookup never crosses
//! sides.
//!
//! ## Tolerance Policy
//!
//! The book is a passive mirror of an upstream matching engine. The feed
//! may reference orders this mirror never saw (late subscription), so
//! every mutation on a missing order id is a deliberate silent no-op
//! returning `false`, never an error. Do not harden these paths: the
//! session layer relies on the book absorbing upstream inconsistencies.
//!
//! ## Example
//!
//! ```
//! use l2book::orderbook::OrderBook;
//! use l2book::types::price::{quantize_price, quantize_size};
//! use l2book::types::Side;
//!
//! let mut book = OrderBook::new();
//! let price = quantize_price("200.01").unwrap();
//! let size = quantize_size("0.5").unwrap();
//!
//! book.insert("order-1", size, price, Side::Buy);
//! assert_eq!(book.best_bid(), Some(price));
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::error::BookError;
use crate::orderbook::{OrderNode, OrderTable, PriceLadder};
use crate::types::price::from_fixed_trimmed;
use crate::types::{Order, Side};

// ============================================================================
// Top-of-book entries
// ============================================================================

/// One `(price, size)` entry of a top-N query.
///
/// Entries are per order, not per level: a level with three resident
/// orders contributes three entries in queue (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopEntry {
    /// Price in fixed-point (scaled by 10^8)
    pub price: u64,
    /// Remaining size in fixed-point (scaled by 10^8)
    pub size: u64,
}

impl fmt::Display for TopEntry {
    /// Renders as `size@price`, the upstream display convention.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}",
            from_fixed_trimmed(self.size),
            from_fixed_trimmed(self.price)
        )
    }
}

/// Top-N view of both sides, best price first on each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSnapshot {
    /// Best (highest) bid first
    pub bids: Vec<TopEntry>,
    /// Best (lowest) ask first
    pub asks: Vec<TopEntry>,
}

// ============================================================================
// One side of the book
// ============================================================================

/// One side's resident order set: identity-keyed table + price-keyed
/// ladder over the same orders.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    table: OrderTable,
    ladder: PriceLadder,
}

impl BookSide {
    /// Create a new empty side
    pub fn new(side: Side) -> Self {
        Self {
            side,
            table: OrderTable::new(),
            ladder: PriceLadder::new(),
        }
    }

    /// Create a side with pre-allocated order capacity
    pub fn with_capacity(side: Side, capacity: usize) -> Self {
        Self {
            side,
            table: OrderTable::with_capacity(capacity),
            ladder: PriceLadder::new(),
        }
    }

    /// Number of resident orders on this side
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if this side is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of distinct resident prices on this side
    #[inline]
    pub fn level_count(&self) -> usize {
        self.ladder.len()
    }

    /// Check if an order id is resident on this side
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.table.contains(id)
    }

    /// The best resident price on this side
    #[inline]
    pub fn best(&self) -> Option<u64> {
        self.ladder.best(self.side)
    }

    /// Make an order resident: record it in the table and append it to
    /// its price level's queue.
    ///
    /// Returns `false` (no-op) if the id is already resident; a second
    /// open for a live id would double-link it and corrupt the queue.
    pub fn insert(&mut self, id: &str, size: u64, price: u64) -> bool {
        if self.table.contains(id) {
            debug!(order_id = id, "duplicate open for resident order, ignoring");
            return false;
        }

        let key = self.table.insert(Order::new(id, self.side, price, size));
        self.ladder.upsert(price).push_back(key, self.table.nodes_mut());
        true
    }

    /// Remove an order: unlink it from its level (dropping the level if
    /// emptied) and erase it from the table.
    ///
    /// Returns `false` (no-op) if the id is not resident.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(key) = self.table.key_of(id) else {
            return false;
        };
        let Some(price) = self.table.get(key).map(OrderNode::price) else {
            return false;
        };

        if let Some(level) = self.ladder.get_mut(price) {
            level.remove(key, self.table.nodes_mut());
        }
        self.ladder.remove_if_empty(price);
        self.table.remove(key);
        true
    }

    /// Move an order to a new price level, appending it at the back of
    /// the new level's queue (it loses its time priority). The old level
    /// is dropped if emptied.
    ///
    /// The resident price is authoritative; `old_price` is what the feed
    /// reported and is only cross-checked.
    ///
    /// Returns `false` (no-op) if the id is not resident.
    pub fn change_price(&mut self, id: &str, old_price: u64, new_price: u64) -> bool {
        let Some(key) = self.table.key_of(id) else {
            return false;
        };
        let Some(resident_price) = self.table.get(key).map(OrderNode::price) else {
            return false;
        };

        if resident_price != old_price {
            debug!(
                order_id = id,
                reported = %from_fixed_trimmed(old_price),
                resident = %from_fixed_trimmed(resident_price),
                "price change old price differs from resident price"
            );
        }

        if let Some(level) = self.ladder.get_mut(resident_price) {
            level.remove(key, self.table.nodes_mut());
        }
        self.ladder.remove_if_empty(resident_price);

        if let Some(node) = self.table.get_mut(key) {
            node.order.price = new_price;
        }
        self.ladder.upsert(new_price).push_back(key, self.table.nodes_mut());
        true
    }

    /// Overwrite an order's remaining size. Level membership and queue
    /// position are untouched.
    ///
    /// Returns `false` (no-op) if the id is not resident.
    pub fn change_size(&mut self, id: &str, new_size: u64) -> bool {
        let Some(key) = self.table.key_of(id) else {
            return false;
        };
        match self.table.get_mut(key) {
            Some(node) => {
                node.order.size = new_size;
                true
            }
            None => false,
        }
    }

    /// Consume `traded` from an order's remaining size.
    ///
    /// An exact fill deletes the order entirely; a partial fill reduces
    /// the size in place. A trade exceeding the remaining size is an
    /// upstream inconsistency: the order is left untouched (warned, not
    /// raised); reconciliation is the sequence guard's job.
    ///
    /// Returns `false` (no-op) if the id is not resident or the trade
    /// overfills.
    pub fn match_order(&mut self, id: &str, traded: u64) -> bool {
        let Some(key) = self.table.key_of(id) else {
            return false;
        };
        let Some(remaining) = self.table.get(key).map(OrderNode::size) else {
            return false;
        };

        if traded == remaining {
            self.delete(id)
        } else if traded < remaining {
            if let Some(node) = self.table.get_mut(key) {
                node.order.size = remaining - traded;
            }
            true
        } else {
            warn!(
                order_id = id,
                traded = %from_fixed_trimmed(traded),
                remaining = %from_fixed_trimmed(remaining),
                "match exceeds remaining size, ignoring"
            );
            false
        }
    }

    /// Up to `n` `(price, size)` entries walking levels best-first,
    /// flattening each level's queue in insertion order.
    pub fn top(&self, n: usize) -> Vec<TopEntry> {
        let mut entries = Vec::with_capacity(n.min(self.table.len()));
        'levels: for (price, level) in self.ladder.iter_from_best(self.side) {
            for node in level.iter(self.table.nodes()) {
                if entries.len() == n {
                    break 'levels;
                }
                entries.push(TopEntry {
                    price,
                    size: node.size(),
                });
            }
        }
        entries
    }
}

// ============================================================================
// The full book
// ============================================================================

/// Level-2 order book: a bid side and an ask side, independent except
/// for the non-crossing invariant.
#[derive(Debug)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBook {
    /// Create a new empty book
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(Side::Buy),
            asks: BookSide::new(Side::Sell),
        }
    }

    /// Create a book with pre-allocated per-side order capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bids: BookSide::with_capacity(Side::Buy, capacity),
            asks: BookSide::with_capacity(Side::Sell, capacity),
        }
    }

    #[inline]
    fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    // ========================================================================
    // Mutations (tolerant: `false` means the id was not resident)
    // ========================================================================

    /// Make an order resident on `side`.
    pub fn insert(&mut self, id: &str, size: u64, price: u64, side: Side) -> bool {
        self.side_mut(side).insert(id, size, price)
    }

    /// Remove an order from `side`.
    pub fn delete(&mut self, id: &str, side: Side) -> bool {
        self.side_mut(side).delete(id)
    }

    /// Move an order on `side` to a new price level.
    pub fn change_price(&mut self, id: &str, old_price: u64, new_price: u64, side: Side) -> bool {
        self.side_mut(side).change_price(id, old_price, new_price)
    }

    /// Overwrite an order's remaining size on `side`.
    pub fn change_size(&mut self, id: &str, new_size: u64, side: Side) -> bool {
        self.side_mut(side).change_size(id, new_size)
    }

    /// Consume `traded` from a resident maker order on `side`.
    ///
    /// `side` is the maker's book side; callers translating a match
    /// event pass the taker side's [`Side::opposite`].
    pub fn match_order(&mut self, id: &str, traded: u64, side: Side) -> bool {
        self.side_mut(side).match_order(id, traded)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The best (highest) resident bid price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.bids.best()
    }

    /// The best (lowest) resident ask price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.asks.best()
    }

    /// The crossed pair `(best_bid, best_ask)` if the book is crossed.
    ///
    /// A book is crossed when the highest resident bid is at or above
    /// the lowest resident ask; a crossed book means the mirror no
    /// longer reflects a valid upstream state.
    pub fn crossed(&self) -> Option<(u64, u64)> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if bid >= ask => Some((bid, ask)),
            _ => None,
        }
    }

    /// Up to `n` best-first `(price, size)` entries for `side`.
    pub fn top(&self, n: usize, side: Side) -> Vec<TopEntry> {
        self.side(side).top(n)
    }

    /// Top-N view of both sides with the non-crossing check.
    ///
    /// Returns [`BookError::Crossed`] when the highest returned bid is
    /// at or above the lowest returned ask. The check is skipped when
    /// either side returns empty (no crossing is possible).
    pub fn snapshot(&self, n: usize) -> Result<BookSnapshot, BookError> {
        let bids = self.bids.top(n);
        let asks = self.asks.top(n);

        if let (Some(best_bid), Some(best_ask)) = (bids.first(), asks.first()) {
            if best_bid.price >= best_ask.price {
                return Err(BookError::Crossed {
                    bid: best_bid.price,
                    ask: best_ask.price,
                });
            }
        }

        Ok(BookSnapshot { bids, asks })
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Total number of resident orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Number of resident bid orders
    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// Number of resident ask orders
    #[inline]
    pub fn ask_count(&self) -> usize {
        self.asks.len()
    }

    /// Number of distinct bid prices
    #[inline]
    pub fn bid_level_count(&self) -> usize {
        self.bids.level_count()
    }

    /// Number of distinct ask prices
    #[inline]
    pub fn ask_level_count(&self) -> usize {
        self.asks.level_count()
    }

    /// Check if the book is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Check if an order id is resident on `side`
    #[inline]
    pub fn contains(&self, id: &str, side: Side) -> bool {
        self.side(side).contains(id)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
