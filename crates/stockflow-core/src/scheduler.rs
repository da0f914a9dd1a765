//! Per-cycle admission: greedy parallel dispatch.
//!
//! Once per cycle, after completions, the dispatcher admits as many process
//! instances as the inventory can support. Candidates are ordered by rank
//! (ascending) then name (descending), and filled to a fixed point against
//! a private snapshot of the inventory; the snapshot's mutation is what
//! enforces conservation across competing candidates. Only then are the
//! admissions committed: real consumption, in-flight entries, trace
//! entries, in that candidate order.

use crate::catalog::{Catalog, Process, ProcessId};
use crate::inflight::InFlightPool;
use crate::inventory::Inventory;
use crate::priority::PriorityMap;
use crate::trace::Trace;

/// Admit a maximal set of process instances for `cycle`.
///
/// Returns the number of instances admitted. A process whose needs multiply
/// satisfy is launched multiple times in the same cycle; a process with no
/// needs is launched at most once per cycle (it consumes nothing, so the
/// fill would otherwise never terminate).
pub fn dispatch_cycle(
    catalog: &Catalog,
    priorities: &PriorityMap,
    inventory: &mut Inventory,
    in_flight: &mut InFlightPool,
    trace: &mut Trace,
    cycle: u64,
) -> u64 {
    let mut candidates: Vec<(ProcessId, &Process)> = catalog
        .iter()
        .filter(|(_, p)| inventory.can_satisfy(&p.needs))
        .collect();

    candidates.sort_by(|(a, pa), (b, pb)| {
        priorities
            .rank(*a)
            .cmp(&priorities.rank(*b))
            .then_with(|| pb.name.cmp(&pa.name))
    });

    // Fill to a fixed point on a private copy. Names are unique, so the
    // comparator above is a total order and the fill is deterministic.
    let mut snapshot = inventory.snapshot();
    let mut admit_count = vec![0u64; candidates.len()];
    loop {
        let mut progressed = false;
        for (slot, (_, p)) in candidates.iter().enumerate() {
            if p.needs.is_empty() {
                if admit_count[slot] == 0 {
                    admit_count[slot] = 1;
                    progressed = true;
                }
                continue;
            }
            while snapshot.can_satisfy(&p.needs) {
                snapshot.consume(&p.needs);
                admit_count[slot] += 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    // Commit in candidate order.
    let mut admitted = 0;
    for (slot, (id, p)) in candidates.iter().enumerate() {
        for _ in 0..admit_count[slot] {
            inventory.consume(&p.needs);
            in_flight.push(*id, p.delay);
            trace.record(cycle, &p.name);
            admitted += 1;
        }
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::test_utils::*;

    fn dispatch(
        catalog: &Catalog,
        targets: &[&str],
        inventory: &mut Inventory,
        cycle: u64,
    ) -> (Trace, InFlightPool, u64) {
        let priorities = PriorityMap::compute(catalog, &names(targets));
        let mut in_flight = InFlightPool::new();
        let mut trace = Trace::new();
        let admitted = dispatch_cycle(
            catalog,
            &priorities,
            inventory,
            &mut in_flight,
            &mut trace,
            cycle,
        );
        (trace, in_flight, admitted)
    }

    #[test]
    fn multiply_satisfied_needs_admit_repeatedly() {
        let catalog = Catalog::new(vec![process(
            "mk_shelf",
            &[("board", 1)],
            &[("shelf", 1)],
            10,
        )])
        .unwrap();
        let mut inv = stocks(&[("board", 10)]);

        let (trace, in_flight, admitted) = dispatch(&catalog, &["shelf"], &mut inv, 0);

        assert_eq!(admitted, 10);
        assert_eq!(in_flight.len(), 10);
        assert_eq!(inv.get("board"), 0);
        assert_eq!(trace.render(), vec!["0:mk_shelf"; 10].join("\n"));
    }

    #[test]
    fn higher_rank_wins_contention() {
        let catalog = Catalog::new(vec![
            process("p", &[("a", 1)], &[("x", 1)], 1),
            process("q", &[("a", 1)], &[("y", 1)], 1),
        ])
        .unwrap();
        let mut inv = stocks(&[("a", 1)]);

        let (trace, _, admitted) = dispatch(&catalog, &["x"], &mut inv, 0);

        assert_eq!(admitted, 1);
        assert_eq!(trace.render(), "0:p");
    }

    #[test]
    fn rank_tie_breaks_by_name_descending() {
        let catalog = Catalog::new(vec![
            process("p", &[("a", 1)], &[("x", 1)], 1),
            process("q", &[("a", 1)], &[("x", 1)], 1),
        ])
        .unwrap();
        let mut inv = stocks(&[("a", 1)]);

        let (trace, _, _) = dispatch(&catalog, &["x"], &mut inv, 0);

        assert_eq!(trace.render(), "0:q");
    }

    #[test]
    fn preferred_candidate_drains_shared_input_first() {
        // Both consume "a"; p outranks q and takes everything it can
        // before q is considered.
        let catalog = Catalog::new(vec![
            process("p", &[("a", 2)], &[("x", 1)], 1),
            process("q", &[("a", 1)], &[("y", 1)], 1),
        ])
        .unwrap();
        let mut inv = stocks(&[("a", 5)]);

        let (trace, _, admitted) = dispatch(&catalog, &["x"], &mut inv, 0);

        // p twice (4 units), q once with the remainder.
        assert_eq!(admitted, 3);
        assert_eq!(trace.render(), "0:p\n0:p\n0:q");
        assert!(inv.is_empty());
    }

    #[test]
    fn free_process_admits_once_per_cycle() {
        let catalog = Catalog::new(vec![process("harvest", &[], &[("wheat", 1)], 3)]).unwrap();
        let mut inv = stocks(&[]);

        let (trace, in_flight, admitted) = dispatch(&catalog, &["wheat"], &mut inv, 7);

        assert_eq!(admitted, 1);
        assert_eq!(in_flight.len(), 1);
        assert_eq!(trace.render(), "7:harvest");
    }

    #[test]
    fn nothing_admissible_admits_nothing() {
        let catalog = Catalog::new(vec![process("p", &[("a", 1)], &[("x", 1)], 1)]).unwrap();
        let mut inv = stocks(&[]);

        let (trace, in_flight, admitted) = dispatch(&catalog, &["x"], &mut inv, 0);

        assert_eq!(admitted, 0);
        assert!(in_flight.is_empty());
        assert!(trace.is_empty());
    }

    #[test]
    fn real_inventory_matches_snapshot_after_commit() {
        let catalog = Catalog::new(vec![
            process("glue", &[("resin", 1), ("board", 1)], &[("panel", 1)], 1),
            process("saw", &[("board", 2)], &[("plank", 1)], 1),
        ])
        .unwrap();
        let mut inv = stocks(&[("board", 5), ("resin", 1)]);

        let (_, _, admitted) = dispatch(&catalog, &["panel"], &mut inv, 0);

        // glue once (resin exhausted), saw twice with the remaining boards.
        assert_eq!(admitted, 3);
        assert_eq!(inv.get("board"), 0);
        assert_eq!(inv.get("resin"), 0);
    }
}
