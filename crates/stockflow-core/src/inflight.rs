//! Running process instances awaiting completion.

use crate::catalog::{Catalog, ProcessId};
use crate::inventory::Inventory;

/// One running instance. `remaining >= 1` from admission until completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InFlightEntry {
    process: ProcessId,
    remaining: u64,
}

/// The pool of running instances. Entries are created on admission and
/// destroyed on completion, when their results are committed to the
/// inventory.
#[derive(Debug, Clone, Default)]
pub struct InFlightPool {
    entries: Vec<InFlightEntry>,
}

impl InFlightPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a running instance. A zero delay is clamped to 1 so results
    /// become visible to the *next* cycle's completion phase, never the
    /// admitting cycle's.
    pub fn push(&mut self, process: ProcessId, delay: u64) {
        self.entries.push(InFlightEntry {
            process,
            remaining: delay.max(1),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance one cycle: decrement every entry, commit the results of
    /// entries reaching zero, and drop them. Must run before any admission
    /// in the same cycle.
    pub fn tick_and_complete(&mut self, catalog: &Catalog, inventory: &mut Inventory) {
        self.entries.retain_mut(|entry| {
            entry.remaining -= 1;
            if entry.remaining == 0 {
                if let Some(p) = catalog.get(entry.process) {
                    inventory.produce(&p.results);
                }
                false
            } else {
                true
            }
        });
    }
}
