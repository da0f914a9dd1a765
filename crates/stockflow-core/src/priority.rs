//! Priority assignment: backward reachability from optimization targets.
//!
//! Ranks are assigned by a breadth-first walk against the consumer→producer
//! direction of the catalog: processes whose results include a target get
//! rank 0, processes producing what those consume get rank 1, and so on.
//! Lower rank = scheduled first. A process reached again at greater depth
//! is *raised* to that depth; there is no visited gate. Substituting a
//! minimum-depth rule here would produce different schedules.

use crate::catalog::{Catalog, ProcessId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Per-process scheduling rank. Lower is preferred.
#[derive(Debug, Clone)]
pub struct PriorityMap {
    ranks: Vec<u64>,
}

impl PriorityMap {
    /// Compute ranks for every process in the catalog.
    ///
    /// Every declared target seeds the walk, whether or not the initial
    /// inventory carries it. Processes unreachable from any target fall
    /// back to one past the largest assigned rank.
    pub fn compute(catalog: &Catalog, targets: &[String]) -> Self {
        let target_set: HashSet<&str> = targets.iter().map(String::as_str).collect();

        // item -> processes producing it, built once.
        let mut producers: HashMap<&str, Vec<ProcessId>> = HashMap::new();
        for (id, p) in catalog.iter() {
            for item in p.results.keys() {
                producers.entry(item.as_str()).or_default().push(id);
            }
        }

        let mut assigned: Vec<Option<u64>> = vec![None; catalog.len()];
        let mut queue: VecDeque<(ProcessId, u64)> = VecDeque::new();

        for (id, p) in catalog.iter() {
            if p.results.keys().any(|item| target_set.contains(item.as_str())) {
                assigned[id.0 as usize] = Some(0);
                queue.push_back((id, 0));
            }
        }

        // A raise past the catalog size could only come from a producer
        // cycle; dropping it keeps the walk finite without touching any
        // acyclic propagation.
        let max_rank = catalog.len() as u64;

        while let Some((id, depth)) = queue.pop_front() {
            let Some(p) = catalog.get(id) else {
                continue;
            };
            for need in p.needs.keys() {
                let Some(upstream) = producers.get(need.as_str()) else {
                    continue;
                };
                for &q in upstream {
                    let current = assigned[q.0 as usize].unwrap_or(0);
                    let raised = depth + 1;
                    if current < raised && raised <= max_rank {
                        assigned[q.0 as usize] = Some(raised);
                        queue.push_back((q, raised));
                    }
                }
            }
        }

        let max_assigned = assigned.iter().flatten().copied().max().unwrap_or(0);
        let ranks = assigned
            .into_iter()
            .map(|rank| rank.unwrap_or(max_assigned + 1))
            .collect();

        Self { ranks }
    }

    pub fn rank(&self, id: ProcessId) -> u64 {
        self.ranks[id.0 as usize]
    }
}
