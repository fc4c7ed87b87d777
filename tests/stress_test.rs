//! Stress tests for the feed processor and book.
//!
//! These tests verify:
//! 1. The book's two views stay consistent over long random sessions
//! 2. Replay is deterministic (same seed = same book)
//! 3. The guard keeps disordered events away from the book under load
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::collections::BTreeSet;
use std::time::Instant;

use l2book::{FeedEvent, FeedProcessor, Outcome, Side};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Number of events for the stress replay
const STRESS_EVENT_COUNT: usize = 200_000;

// ============================================================================
// HELPER: deterministic session generation
// ============================================================================

/// One live order as the generator tracks it (the expected book state).
#[derive(Debug, Clone)]
struct LiveOrder {
    id: String,
    side: Side,
    size: u64,
    price: u64,
}

/// Generates a valid feed session: sequences are contiguous, every
/// referenced order is resident, and bid/ask price ranges never overlap
/// so the book cannot cross.
struct SessionGen {
    rng: ChaCha8Rng,
    sequence: u64,
    next_id: u64,
    live: Vec<LiveOrder>,
}

impl SessionGen {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            sequence: 0,
            next_id: 0,
            live: Vec::new(),
        }
    }

    /// Bids price in [100.00, 199.99], asks in [200.01, 300.00]
    fn random_price(&mut self, side: Side) -> u64 {
        let cents: u64 = match side {
            Side::Buy => self.rng.gen_range(10_000..=19_999),
            Side::Sell => self.rng.gen_range(20_001..=30_000),
        };
        cents * 1_000_000
    }

    /// Sizes in (0, 1.0] fixed-point
    fn random_size(&mut self) -> u64 {
        self.rng.gen_range(1..=100_000_000)
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn next_event(&mut self) -> FeedEvent {
        let roll: u32 = self.rng.gen_range(0..100);

        if roll < 55 || self.live.is_empty() {
            // Open a fresh order
            let side = if self.rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
            let price = self.random_price(side);
            let size = self.random_size();
            self.next_id += 1;
            let id = format!("ord-{}", self.next_id);
            self.live.push(LiveOrder {
                id: id.clone(),
                side,
                size,
                price,
            });
            FeedEvent::Open {
                order_id: id,
                side,
                size,
                price,
                sequence: self.next_sequence(),
            }
        } else if roll < 70 {
            // Cancel a random live order
            let idx = self.rng.gen_range(0..self.live.len());
            let order = self.live.swap_remove(idx);
            FeedEvent::Done {
                order_id: order.id,
                side: order.side,
                sequence: self.next_sequence(),
            }
        } else if roll < 85 {
            // Trade against a random live maker
            let idx = self.rng.gen_range(0..self.live.len());
            let traded = self.rng.gen_range(1..=self.live[idx].size);
            let (id, resident_side) = (self.live[idx].id.clone(), self.live[idx].side);
            if traded == self.live[idx].size {
                self.live.swap_remove(idx);
            } else {
                self.live[idx].size -= traded;
            }
            FeedEvent::Match {
                maker_order_id: id,
                side: resident_side.opposite(),
                size: traded,
                sequence: self.next_sequence(),
            }
        } else {
            // Amend a random live order (price or size)
            let idx = self.rng.gen_range(0..self.live.len());
            if self.rng.gen_bool(0.5) {
                let old_price = self.live[idx].price;
                let side = self.live[idx].side;
                let new_price = self.random_price(side);
                self.live[idx].price = new_price;
                FeedEvent::Change {
                    order_id: self.live[idx].id.clone(),
                    side,
                    sequence: self.next_sequence(),
                    old_price: Some(old_price),
                    new_price: Some(new_price),
                    old_size: None,
                    new_size: None,
                }
            } else {
                let old_size = self.live[idx].size;
                let mut new_size = self.random_size();
                if new_size == old_size {
                    // An amend to the same size would be a no-op
                    new_size = if new_size == 1 { 2 } else { new_size - 1 };
                }
                self.live[idx].size = new_size;
                FeedEvent::Change {
                    order_id: self.live[idx].id.clone(),
                    side: self.live[idx].side,
                    sequence: self.next_sequence(),
                    old_price: None,
                    new_price: None,
                    old_size: Some(old_size),
                    new_size: Some(new_size),
                }
            }
        }
    }
}

/// Check the processor's book against the generator's expected state.
fn verify_against_expected(processor: &FeedProcessor, live: &[LiveOrder]) {
    let book = processor.book();

    for side in [Side::Buy, Side::Sell] {
        let expected: Vec<&LiveOrder> = live.iter().filter(|o| o.side == side).collect();
        let count = match side {
            Side::Buy => book.bid_count(),
            Side::Sell => book.ask_count(),
        };
        assert_eq!(count, expected.len(), "order count mismatch on {side:?}");

        // Every live order is resident
        for order in &expected {
            assert!(book.contains(&order.id, side), "missing order {}", order.id);
        }

        // A full walk yields exactly the resident orders, best-first
        let entries = book.top(usize::MAX, side);
        assert_eq!(entries.len(), expected.len(), "top walk length on {side:?}");

        let prices: Vec<u64> = entries.iter().map(|e| e.price).collect();
        let mut sorted = prices.clone();
        match side {
            Side::Buy => sorted.sort_by(|a, b| b.cmp(a)),
            Side::Sell => sorted.sort(),
        }
        assert_eq!(prices, sorted, "top walk not best-first on {side:?}");

        let expected_volume: u64 = expected.iter().map(|o| o.size).sum();
        let walked_volume: u64 = entries.iter().map(|e| e.size).sum();
        assert_eq!(walked_volume, expected_volume, "volume mismatch on {side:?}");

        // Distinct prices in the walk match the ladder's level count
        let distinct: BTreeSet<u64> = prices.iter().copied().collect();
        let level_count = match side {
            Side::Buy => book.bid_level_count(),
            Side::Sell => book.ask_level_count(),
        };
        assert_eq!(distinct.len(), level_count, "level count mismatch on {side:?}");

        let best = match side {
            Side::Buy => book.best_bid(),
            Side::Sell => book.best_ask(),
        };
        let expected_best = match side {
            Side::Buy => expected.iter().map(|o| o.price).max(),
            Side::Sell => expected.iter().map(|o| o.price).min(),
        };
        assert_eq!(best, expected_best, "best price mismatch on {side:?}");
    }
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Main stress test: replay a long random session and verify the book
/// matches the independently tracked expected state throughout.
#[test]
fn stress_replay_invariants() {
    println!("\n=== STRESS TEST: {} events ===\n", STRESS_EVENT_COUNT);

    let mut generator = SessionGen::new(42);
    let mut processor = FeedProcessor::new();

    let start = Instant::now();
    for _ in 0..STRESS_EVENT_COUNT {
        let event = generator.next_event();
        let outcome = processor.process(event);
        assert_eq!(outcome, Outcome::Applied, "valid session event rejected");
    }
    let elapsed = start.elapsed();

    let throughput = STRESS_EVENT_COUNT as f64 / elapsed.as_secs_f64();
    println!("Processed in {:.2?} ({:.0} events/sec)", elapsed, throughput);
    println!(
        "Resident orders: {}, levels: {}/{}",
        processor.book().order_count(),
        processor.book().bid_level_count(),
        processor.book().ask_level_count()
    );

    assert_eq!(processor.sequence(), Some(STRESS_EVENT_COUNT as u64));
    assert_eq!(processor.faults(), 0);
    verify_against_expected(&processor, &generator.live);

    // The snapshot is well-formed: the generated price ranges can't cross
    let snapshot = processor.snapshot(10).expect("book must not be crossed");
    assert!(snapshot.bids.len() <= 10);
    assert!(snapshot.asks.len() <= 10);

    // Drain every remaining order; the book must come back empty
    let remaining = generator.live.clone();
    for order in remaining {
        let outcome = processor.process(FeedEvent::Done {
            order_id: order.id,
            side: order.side,
            sequence: generator.next_sequence(),
        });
        assert_eq!(outcome, Outcome::Applied);
    }
    assert!(processor.book().is_empty());
    assert_eq!(processor.book().bid_level_count(), 0);
    assert_eq!(processor.book().ask_level_count(), 0);
}

/// Same seed, same book: replay must be fully deterministic.
#[test]
fn stress_determinism() {
    let run = |seed: u64| {
        let mut generator = SessionGen::new(seed);
        let mut processor = FeedProcessor::new();
        for _ in 0..50_000 {
            let event = generator.next_event();
            processor.process(event);
        }
        (
            processor.book().order_count(),
            processor.book().top(10, Side::Buy),
            processor.book().top(10, Side::Sell),
        )
    };

    let first = run(7);
    let second = run(7);
    assert_eq!(first, second, "replay must be deterministic");

    let other_seed = run(8);
    assert_ne!(first.1, other_seed.1, "different seeds should diverge");
}

/// Disordered events never reach the book, even mid-session.
#[test]
fn stress_guard_rejects_disorder() {
    let mut generator = SessionGen::new(99);
    let mut processor = FeedProcessor::new();
    for _ in 0..10_000 {
        let event = generator.next_event();
        processor.process(event);
    }

    let before_bids = processor.book().top(25, Side::Buy);
    let before_asks = processor.book().top(25, Side::Sell);
    let cursor = processor.sequence().unwrap();

    // A replayed old event is stale
    let outcome = processor.process(FeedEvent::Open {
        order_id: "intruder-1".into(),
        side: Side::Buy,
        size: 1_000_000,
        price: 15_000_000_000,
        sequence: 1,
    });
    assert_eq!(outcome, Outcome::Stale { last: cursor, seq: 1 });

    // An event from the future is a gap
    let outcome = processor.process(FeedEvent::Open {
        order_id: "intruder-2".into(),
        side: Side::Buy,
        size: 1_000_000,
        price: 15_000_000_000,
        sequence: cursor + 11,
    });
    assert_eq!(
        outcome,
        Outcome::Gap {
            expected: cursor + 1,
            missing: 10,
        }
    );

    // Neither intruder touched the book, the cursor held
    assert!(!processor.book().contains("intruder-1", Side::Buy));
    assert!(!processor.book().contains("intruder-2", Side::Buy));
    assert_eq!(processor.book().top(25, Side::Buy), before_bids);
    assert_eq!(processor.book().top(25, Side::Sell), before_asks);
    assert_eq!(processor.sequence(), Some(cursor));
    assert_eq!(processor.faults(), 1);
}
