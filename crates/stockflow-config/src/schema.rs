//! Parsed configuration data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stockflow_core::catalog::Process;
use stockflow_core::inventory::Inventory;

/// Everything a configuration file declares: initial stock quantities,
/// process definitions in declaration order, and optimization targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    pub stocks: HashMap<String, u64>,
    pub processes: Vec<Process>,
    pub optimize_targets: Vec<String>,
}

impl ConfigData {
    /// The starting inventory. Zero-quantity stock lines are legal in the
    /// file but are not stored.
    pub fn initial_inventory(&self) -> Inventory {
        self.stocks
            .iter()
            .map(|(item, &qty)| (item.clone(), qty))
            .collect()
    }
}
