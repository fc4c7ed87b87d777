//! l2book - Binary Entry Point
//!
//! Replays a small synthetic feed session through the processor and
//! prints the resulting top-5 book, serving as a simple verification
//! that the crate builds and the pipeline works end to end.

use l2book::feed::{FeedProcessor, Outcome};
use l2book::types::price::{quantize_price, quantize_size};
use l2book::types::{FeedEvent, Side};

fn open(id: &str, side: Side, size: &str, price: &str, sequence: u64) -> FeedEvent {
    FeedEvent::Open {
        order_id: id.into(),
        side,
        size: quantize_size(size).expect("valid size"),
        price: quantize_price(price).expect("valid price"),
        sequence,
    }
}

fn main() {
    println!("===========================================");
    println!("  l2book - feed replay demo");
    println!("===========================================");
    println!();

    let mut processor = FeedProcessor::new();

    let session = vec![
        open("1", Side::Buy, "0.0001", "200.01", 1),
        open("2", Side::Buy, "0.0001", "200.01", 2),
        open("3", Side::Buy, "0.0001", "200.1", 3),
        open("4", Side::Buy, "0.0001", "200.01", 4),
        open("5", Side::Buy, "0.0001", "201", 5),
        open("6", Side::Sell, "0.0001", "201.1", 6),
        open("7", Side::Sell, "0.0001", "201.1", 7),
        open("8", Side::Sell, "0.0001", "201.2", 8),
        open("9", Side::Sell, "0.0001", "201.11", 9),
        open("10", Side::Sell, "0.0001", "201.11", 10),
        open("11", Side::Sell, "0.0001", "201.12", 11),
        // Taker buys consume the front of the ask queue
        FeedEvent::Match {
            maker_order_id: "6".into(),
            side: Side::Buy,
            size: quantize_size("0.0001").expect("valid size"),
            sequence: 12,
        },
    ];

    println!("Replaying {} events...", session.len());
    for event in session {
        let outcome = processor.process(event);
        if !matches!(outcome, Outcome::Applied) {
            println!("  outcome: {:?}", outcome);
        }
    }
    println!();

    match processor.snapshot(5) {
        Ok(snapshot) => {
            // Asks print highest-of-the-top first, bids best first
            for entry in snapshot.asks.iter().rev() {
                println!("{entry}");
            }
            println!("----------------------");
            for entry in &snapshot.bids {
                println!("{entry}");
            }
        }
        Err(err) => println!("book integrity lost: {err}"),
    }

    println!();
    println!(
        "orders resident: {}, last sequence: {:?}",
        processor.book().order_count(),
        processor.sequence()
    );
}
