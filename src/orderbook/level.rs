//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `PriceLevel` represents all resident orders at a single price point.
//! Orders are maintained in a doubly-linked list for FIFO ordering
//! (time priority at the level, used by the top-N query).
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Any order can be removed in O(1) using its slab key
//! - Iteration walks head to tail (insertion order)

use slab::Slab;

use crate::orderbook::OrderNode;

/// A price level containing orders at a single price.
///
/// Orders are stored in a FIFO queue (doubly-linked list). The actual
/// order data lives in the slab; this struct only holds the queue
/// metadata.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level (fixed-point, scaled by 10^8)
    pub price: u64,

    /// Head of the order queue (oldest order, slab key)
    pub head: Option<usize>,

    /// Tail of the order queue (newest order, slab key)
    /// New orders are appended here
    pub tail: Option<usize>,

    /// Number of orders at this price level
    pub order_count: usize,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: u64) -> Self {
        Self {
            price,
            head: None,
            tail: None,
            order_count: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order_count == 0
    }

    /// Add an order to the tail of the queue
    ///
    /// This maintains FIFO ordering: the oldest orders iterate first.
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn push_back(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = slab.get_mut(key).expect("invalid slab key");

        // Update linked list pointers
        node.prev = self.tail;
        node.next = None;

        if let Some(tail_key) = self.tail {
            // Link the old tail to the new node
            let tail_node = slab.get_mut(tail_key).expect("invalid tail key");
            tail_node.next = Some(key);
        } else {
            // Empty list - this is also the head
            self.head = Some(key);
        }

        self.tail = Some(key);
        self.order_count += 1;
    }

    /// Remove an order from the queue by slab key
    ///
    /// # Panics
    ///
    /// Panics if the key doesn't exist in the slab
    pub fn remove(&mut self, key: usize, slab: &mut Slab<OrderNode>) {
        let node = slab.get(key).expect("invalid slab key");
        let prev_key = node.prev;
        let next_key = node.next;

        // Update the previous node's next pointer
        if let Some(prev) = prev_key {
            let prev_node = slab.get_mut(prev).expect("invalid prev key");
            prev_node.next = next_key;
        } else {
            // This was the head
            self.head = next_key;
        }

        // Update the next node's prev pointer
        if let Some(next) = next_key {
            let next_node = slab.get_mut(next).expect("invalid next key");
            next_node.prev = prev_key;
        } else {
            // This was the tail
            self.tail = prev_key;
        }

        // Clear the removed node's pointers
        let node = slab.get_mut(key).expect("invalid slab key");
        node.prev = None;
        node.next = None;

        self.order_count -= 1;
    }

    /// Iterate the level's orders head to tail (insertion order).
    pub fn iter<'a>(&self, slab: &'a Slab<OrderNode>) -> LevelIter<'a> {
        LevelIter {
            slab,
            cursor: self.head,
        }
    }
}

/// Iterator over a price level's orders in queue (insertion) order.
#[derive(Debug)]
pub struct LevelIter<'a> {
    slab: &'a Slab<OrderNode>,
    cursor: Option<usize>,
}

impl<'a> Iterator for LevelIter<'a> {
    type Item = &'a OrderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor?;
        let node = self.slab.get(key)?;
        self.cursor = node.next;
        Some(node)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
