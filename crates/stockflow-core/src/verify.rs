//! Trace replay verification.
//!
//! Replays a trace against the catalog and initial inventory it was
//! produced from, confirming every admission was feasible at the cycle it
//! ran. Pending productions are kept in a ledger keyed by due cycle and
//! applied before consumption, so completions are always visible to later
//! admissions. Optimality is not checked.

use crate::catalog::Catalog;
use crate::inventory::Inventory;
use crate::trace::{Trace, TraceEntry};
use std::collections::BTreeMap;

/// A violation found during replay. Both kinds are fatal and carry the
/// cycle and the offending identifier.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("unknown process '{name}' at cycle {cycle}")]
    UnknownProcess { cycle: u64, name: String },
    #[error(
        "insufficient stock for '{process}' at cycle {cycle}: need {need} {item}, have {have}"
    )]
    InsufficientStock {
        cycle: u64,
        process: String,
        item: String,
        need: u64,
        have: u64,
    },
}

/// Outcome of a successful replay.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    /// Number of trace entries replayed.
    pub entries_checked: usize,
    /// Inventory after the last entry, with all remaining pending
    /// productions flushed.
    pub final_inventory: Inventory,
}

/// Replay `trace` from `initial`, failing on the first infeasible entry.
pub fn verify_trace(
    catalog: &Catalog,
    initial: &Inventory,
    trace: &Trace,
) -> Result<VerifyReport, VerifyError> {
    let mut inventory = initial.snapshot();

    // due cycle -> accumulated productions.
    let mut pending: BTreeMap<u64, BTreeMap<String, u64>> = BTreeMap::new();

    for TraceEntry { cycle, name } in trace.entries() {
        // Production before consumption: everything due at or before this
        // entry's cycle lands first.
        while let Some((&due, _)) = pending.first_key_value() {
            if due > *cycle {
                break;
            }
            if let Some((_, results)) = pending.pop_first() {
                inventory.produce(&results);
            }
        }

        let process = catalog
            .id_of(name)
            .and_then(|id| catalog.get(id))
            .ok_or_else(|| VerifyError::UnknownProcess {
                cycle: *cycle,
                name: name.clone(),
            })?;

        for (item, &need) in &process.needs {
            let have = inventory.get(item);
            if have < need {
                return Err(VerifyError::InsufficientStock {
                    cycle: *cycle,
                    process: name.clone(),
                    item: item.clone(),
                    need,
                    have,
                });
            }
        }

        inventory.consume(&process.needs);

        let due = cycle + process.delay;
        let slot = pending.entry(due).or_default();
        for (item, &qty) in &process.results {
            *slot.entry(item.clone()).or_insert(0) += qty;
        }
    }

    // Flush whatever is still in flight.
    for (_, results) in pending {
        inventory.produce(&results);
    }

    Ok(VerifyReport {
        entries_checked: trace.len(),
        final_inventory: inventory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::test_utils::*;

    fn shelf_catalog() -> Catalog {
        Catalog::new(vec![
            process("cut", &[("wood", 1)], &[("board", 1)], 1),
            process("make", &[("board", 1)], &[("shelf", 1)], 1),
        ])
        .unwrap()
    }

    #[test]
    fn accepts_feasible_trace() {
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 2)]);
        let trace = Trace::parse("0:cut\n0:cut\n1:make\n1:make");

        let report = verify_trace(&catalog, &initial, &trace).unwrap();

        assert_eq!(report.entries_checked, 4);
        assert_eq!(report.final_inventory.get("shelf"), 2);
        assert_eq!(report.final_inventory.get("wood"), 0);
    }

    #[test]
    fn rejects_unknown_process() {
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 1)]);
        let trace = Trace::parse("0:cut\n1:polish");

        match verify_trace(&catalog, &initial, &trace) {
            Err(VerifyError::UnknownProcess { cycle, name }) => {
                assert_eq!(cycle, 1);
                assert_eq!(name, "polish");
            }
            other => panic!("expected UnknownProcess, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_overdrawn_stock() {
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 1)]);
        let trace = Trace::parse("0:cut\n0:cut");

        match verify_trace(&catalog, &initial, &trace) {
            Err(VerifyError::InsufficientStock {
                cycle,
                process,
                item,
                need,
                have,
            }) => {
                assert_eq!(cycle, 0);
                assert_eq!(process, "cut");
                assert_eq!(item, "wood");
                assert_eq!(need, 1);
                assert_eq!(have, 0);
            }
            other => panic!("expected InsufficientStock, got: {other:?}"),
        }
    }

    #[test]
    fn rejects_consumption_before_completion() {
        // make at cycle 0 would need the board that cut only delivers at
        // cycle 1.
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 1)]);
        let trace = Trace::parse("0:cut\n0:make");

        assert!(matches!(
            verify_trace(&catalog, &initial, &trace),
            Err(VerifyError::InsufficientStock { .. })
        ));
    }

    #[test]
    fn completion_at_entry_cycle_is_visible() {
        // cut admitted at 0 with delay 1 is due at cycle 1; an entry at
        // cycle 1 consumes its board.
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 1)]);
        let trace = Trace::parse("0:cut\n1:make");

        let report = verify_trace(&catalog, &initial, &trace).unwrap();
        assert_eq!(report.final_inventory.get("shelf"), 1);
    }

    #[test]
    fn flushes_pending_productions_after_last_entry() {
        let catalog = Catalog::new(vec![process(
            "grow",
            &[("seed", 1)],
            &[("tree", 1)],
            100,
        )])
        .unwrap();
        let initial = stocks(&[("seed", 1)]);
        let trace = Trace::parse("0:grow");

        let report = verify_trace(&catalog, &initial, &trace).unwrap();
        assert_eq!(report.final_inventory.get("tree"), 1);
    }

    #[test]
    fn empty_trace_verifies_to_initial_inventory() {
        let catalog = shelf_catalog();
        let initial = stocks(&[("wood", 7)]);

        let report = verify_trace(&catalog, &initial, &Trace::new()).unwrap();
        assert_eq!(report.entries_checked, 0);
        assert_eq!(report.final_inventory, initial);
    }
}
