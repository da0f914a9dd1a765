//! Configuration loading for the stockflow scheduler and checker.
//!
//! The format is line-oriented:
//!
//! ```text
//! # initial stock
//! wood:4
//! # name:(needs):(results):cycles
//! cut:(wood:1):(board:1):1
//! make:(board:1):(shelf:1):1
//! optimize:(shelf)
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. At most one
//! `optimize:` line may appear.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_budget, parse_config, BudgetError, ConfigError};
pub use schema::ConfigData;
