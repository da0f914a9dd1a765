//! The driver loop: owns the simulation state and the wall-clock budget.
//!
//! # Per-cycle order
//!
//! Each iteration runs, in this order:
//! 1. **Budget check** — a monotonic clock is polled once per cycle; an
//!    exhausted budget ends the run before anything else happens.
//! 2. **Completions** — in-flight instances tick; results of finished
//!    instances land in the inventory *before* any admission this cycle.
//! 3. **Dispatch** — the greedy parallel dispatcher admits a maximal set
//!    of instances, appending to the trace and the in-flight pool.
//! 4. **Quiescence check** — nothing admitted, nothing in flight, and
//!    nothing admissible on the now-stable inventory ends the run.

use crate::catalog::Catalog;
use crate::inflight::InFlightPool;
use crate::inventory::Inventory;
use crate::priority::PriorityMap;
use crate::scheduler::dispatch_cycle;
use crate::trace::Trace;
use std::fmt;
use std::time::{Duration, Instant};

/// Why a run ended. Both outcomes are informational, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing running, nothing admissible.
    Quiesced { cycle: u64 },
    /// The wall-clock budget expired at a cycle boundary.
    BudgetExhausted { cycle: u64 },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Quiesced { cycle } => {
                write!(f, "no more process doable at cycle {cycle}")
            }
            RunOutcome::BudgetExhausted { cycle } => {
                write!(f, "time limit exceeded at cycle {cycle}")
            }
        }
    }
}

/// The scheduler/simulator. Owns the catalog, the priority map computed
/// once at construction, and all mutable run state.
#[derive(Debug)]
pub struct Engine {
    catalog: Catalog,
    priorities: PriorityMap,
    inventory: Inventory,
    in_flight: InFlightPool,
    trace: Trace,
    cycle: u64,
}

impl Engine {
    /// Create an engine over a catalog and initial inventory. Priorities
    /// are assigned here, once, from the optimization targets.
    pub fn new(catalog: Catalog, inventory: Inventory, targets: &[String]) -> Self {
        let priorities = PriorityMap::compute(&catalog, targets);
        Self {
            catalog,
            priorities,
            inventory,
            in_flight: InFlightPool::new(),
            trace: Trace::new(),
            cycle: 0,
        }
    }

    /// Run until the budget expires or the system quiesces.
    pub fn run(&mut self, budget: Duration) -> RunOutcome {
        let start = Instant::now();
        loop {
            if start.elapsed() >= budget {
                return RunOutcome::BudgetExhausted { cycle: self.cycle };
            }

            let at = self.cycle;
            let admitted = self.step();

            if admitted == 0 && self.in_flight.is_empty() && !self.any_admissible() {
                return RunOutcome::Quiesced { cycle: at };
            }
        }
    }

    /// One cycle: completions, then dispatch, then the cycle counter
    /// advances. Returns the number of instances admitted.
    pub fn step(&mut self) -> u64 {
        self.in_flight
            .tick_and_complete(&self.catalog, &mut self.inventory);
        let admitted = dispatch_cycle(
            &self.catalog,
            &self.priorities,
            &mut self.inventory,
            &mut self.in_flight,
            &mut self.trace,
            self.cycle,
        );
        self.cycle += 1;
        admitted
    }

    fn any_admissible(&self) -> bool {
        self.catalog
            .iter()
            .any(|(_, p)| self.inventory.can_satisfy(&p.needs))
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}
