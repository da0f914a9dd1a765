//! Process definitions and the immutable catalog.
//!
//! A [`Process`] is a named transformation: it consumes a multiset of items
//! (`needs`), and a fixed number of cycles later (`delay`) credits another
//! multiset (`results`). The [`Catalog`] is built once from an ordered list
//! of definitions and frozen; iteration preserves definition order, which
//! the scheduler relies on for deterministic candidate collection.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Identifies a process in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u32);

/// A named transformation rule.
///
/// Quantities in `needs` and `results` are strictly positive; a definition
/// carrying a zero-quantity entry is rejected at catalog construction.
/// `delay` is the number of cycles between admission and completion. A
/// delay of 0 still completes on the next cycle (see the in-flight pool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub needs: BTreeMap<String, u64>,
    pub results: BTreeMap<String, u64>,
    pub delay: u64,
}

impl Process {
    pub fn new(
        name: impl Into<String>,
        needs: BTreeMap<String, u64>,
        results: BTreeMap<String, u64>,
        delay: u64,
    ) -> Self {
        Self {
            name: name.into(),
            needs,
            results,
            delay,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable process catalog. Frozen after construction.
#[derive(Debug, Clone)]
pub struct Catalog {
    processes: Vec<Process>,
    name_to_id: HashMap<String, ProcessId>,
}

impl Catalog {
    /// Build a catalog from definitions in declaration order.
    ///
    /// Validates every definition: non-empty unique names, no zero-quantity
    /// entries, and no shape that would admit infinitely (a process with no
    /// needs must have a positive delay and produce something).
    pub fn new(defs: Vec<Process>) -> Result<Self, CatalogError> {
        let mut name_to_id = HashMap::with_capacity(defs.len());

        for (index, p) in defs.iter().enumerate() {
            validate(p)?;
            let id = ProcessId(index as u32);
            if name_to_id.insert(p.name.clone(), id).is_some() {
                return Err(CatalogError::DuplicateProcess(p.name.clone()));
            }
        }

        Ok(Self {
            processes: defs,
            name_to_id,
        })
    }

    /// Lookup a process by id.
    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.0 as usize)
    }

    /// Lookup a process id by name.
    pub fn id_of(&self, name: &str) -> Option<ProcessId> {
        self.name_to_id.get(name).copied()
    }

    /// Iterate processes in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (ProcessId, &Process)> {
        self.processes
            .iter()
            .enumerate()
            .map(|(i, p)| (ProcessId(i as u32), p))
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

fn validate(p: &Process) -> Result<(), CatalogError> {
    if p.name.is_empty() {
        return Err(CatalogError::InvalidProcess {
            name: "<unnamed>".to_string(),
            reason: "empty name",
        });
    }
    for (item, &qty) in p.needs.iter().chain(p.results.iter()) {
        if qty == 0 {
            return Err(CatalogError::ZeroQuantity {
                process: p.name.clone(),
                item: item.clone(),
            });
        }
    }
    if p.needs.is_empty() && p.results.is_empty() {
        return Err(CatalogError::InvalidProcess {
            name: p.name.clone(),
            reason: "consumes nothing and produces nothing",
        });
    }
    if p.needs.is_empty() && p.delay == 0 {
        // Admissible every cycle at no cost and completing instantly:
        // the schedule would never terminate.
        return Err(CatalogError::InvalidProcess {
            name: p.name.clone(),
            reason: "consumes nothing and has no delay",
        });
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate process '{0}'")]
    DuplicateProcess(String),
    #[error("invalid process '{name}': {reason}")]
    InvalidProcess { name: String, reason: &'static str },
    #[error("invalid process '{process}': zero quantity for '{item}'")]
    ZeroQuantity { process: String, item: String },
}
