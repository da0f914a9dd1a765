//! Minimal end-to-end run: a two-stage shelf line, scheduled and verified.
//!
//! Run with: `cargo run --package stockflow-core --example shelf_line`

use std::collections::BTreeMap;
use std::time::Duration;

use stockflow_core::catalog::{Catalog, Process};
use stockflow_core::engine::Engine;
use stockflow_core::inventory::Inventory;
use stockflow_core::verify::verify_trace;

fn quantities(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
    entries
        .iter()
        .map(|&(item, qty)| (item.to_string(), qty))
        .collect()
}

fn main() {
    let catalog = Catalog::new(vec![
        Process::new(
            "cut",
            quantities(&[("wood", 1)]),
            quantities(&[("board", 2)]),
            2,
        ),
        Process::new(
            "assemble",
            quantities(&[("board", 3), ("nail", 4)]),
            quantities(&[("shelf", 1)]),
            5,
        ),
    ])
    .expect("definitions are valid");

    let initial: Inventory = [("wood".to_string(), 6), ("nail".to_string(), 20)]
        .into_iter()
        .collect();

    let mut engine = Engine::new(catalog, initial.clone(), &["shelf".to_string()]);
    let outcome = engine.run(Duration::from_secs(10));

    for entry in engine.trace().entries() {
        println!("{entry}");
    }
    println!("{outcome}");

    println!("Stock:");
    for (item, qty) in engine.inventory().iter_sorted() {
        println!(" {item} => {qty}");
    }

    let report = verify_trace(engine.catalog(), &initial, engine.trace())
        .expect("own trace replays cleanly");
    println!("Verified {} entries.", report.entries_checked);
}
