//! Shared test helpers for unit tests, integration tests, and benchmarks
//! (via the `test-utils` feature).

use crate::catalog::{Catalog, Process};
use crate::engine::Engine;
use crate::inventory::Inventory;
use std::collections::BTreeMap;

/// Build a quantity map from `(item, qty)` pairs.
pub fn counts(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
    entries
        .iter()
        .map(|&(item, qty)| (item.to_string(), qty))
        .collect()
}

/// Build a process definition from slices.
pub fn process(name: &str, needs: &[(&str, u64)], results: &[(&str, u64)], delay: u64) -> Process {
    Process::new(name, counts(needs), counts(results), delay)
}

/// Build an inventory from `(item, qty)` pairs (zero quantities skipped).
pub fn stocks(entries: &[(&str, u64)]) -> Inventory {
    entries
        .iter()
        .map(|&(item, qty)| (item.to_string(), qty))
        .collect()
}

/// Owned name list from string literals.
pub fn names(targets: &[&str]) -> Vec<String> {
    targets.iter().map(|t| t.to_string()).collect()
}

/// Assemble an engine from literal stocks, definitions, and targets.
/// Panics on an invalid catalog; tests construct valid ones.
pub fn engine(initial: &[(&str, u64)], defs: Vec<Process>, targets: &[&str]) -> Engine {
    let catalog = Catalog::new(defs).expect("test catalog is valid");
    Engine::new(catalog, stocks(initial), &names(targets))
}
