//! Line-oriented configuration parsing.

use crate::schema::ConfigData;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use stockflow_core::catalog::Process;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while reading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {number}: unrecognized line format: {line}")]
    Unrecognized { number: usize, line: String },
    #[error("line {number}: invalid stock entry: {line}")]
    Stock { number: usize, line: String },
    #[error("line {number}: invalid process definition: {line}")]
    ProcessDef { number: usize, line: String },
    #[error("line {number}: invalid quantity '{value}'")]
    Quantity { number: usize, value: String },
    #[error("line {number}: multiple optimize declarations")]
    DuplicateOptimize { number: usize },
}

/// The wait budget did not parse as a non-negative whole number of seconds.
#[derive(Debug, thiserror::Error)]
#[error("invalid wait budget '{0}': expected a non-negative whole number of seconds")]
pub struct BudgetError(pub String);

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read and parse a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigData, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parse configuration text.
pub fn parse_config(text: &str) -> Result<ConfigData, ConfigError> {
    let mut config = ConfigData::default();
    let mut optimize_seen: Option<usize> = None;

    for (index, raw) in text.lines().enumerate() {
        let number = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parse_line(&mut config, &mut optimize_seen, line, number)?;
    }

    Ok(config)
}

/// Parse the scheduler's wall-clock budget: whole seconds, digits only.
pub fn parse_budget(value: &str) -> Result<Duration, BudgetError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BudgetError(value.to_string()));
    }
    let seconds: u64 = trimmed.parse().map_err(|_| BudgetError(value.to_string()))?;
    Ok(Duration::from_secs(seconds))
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

fn parse_line(
    config: &mut ConfigData,
    optimize_seen: &mut Option<usize>,
    line: &str,
    number: usize,
) -> Result<(), ConfigError> {
    // Stock entries carry a colon but no parentheses.
    if !line.contains('(') && line.contains(':') && !line.starts_with("optimize:") {
        return parse_stock(config, line, number);
    }

    if line.starts_with("optimize:") {
        if optimize_seen.is_some() {
            return Err(ConfigError::DuplicateOptimize { number });
        }
        *optimize_seen = Some(number);
        return parse_optimize(config, line);
    }

    if line.contains('(') && line.contains(')') {
        return parse_process(config, line, number);
    }

    Err(ConfigError::Unrecognized {
        number,
        line: line.to_string(),
    })
}

fn parse_stock(config: &mut ConfigData, line: &str, number: usize) -> Result<(), ConfigError> {
    let parts: Vec<&str> = line.split(':').collect();
    let [name, quantity] = parts.as_slice() else {
        return Err(ConfigError::Stock {
            number,
            line: line.to_string(),
        });
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::Stock {
            number,
            line: line.to_string(),
        });
    }
    let quantity: u64 = quantity.trim().parse().map_err(|_| ConfigError::Quantity {
        number,
        value: quantity.trim().to_string(),
    })?;

    config.stocks.insert(name.to_string(), quantity);
    Ok(())
}

fn parse_optimize(config: &mut ConfigData, line: &str) -> Result<(), ConfigError> {
    let targets = line
        .strip_prefix("optimize:")
        .unwrap_or(line)
        .trim_matches(['(', ')']);

    for target in targets.split(';') {
        let target = target.trim();
        if !target.is_empty() {
            config.optimize_targets.push(target.to_string());
        }
    }
    Ok(())
}

fn parse_process(config: &mut ConfigData, line: &str, number: usize) -> Result<(), ConfigError> {
    let malformed = || ConfigError::ProcessDef {
        number,
        line: line.to_string(),
    };

    let (name, rest) = line.split_once(':').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }

    // "(needs):(results):cycles" splits on the group terminators.
    let parts: Vec<&str> = rest.split("):").collect();
    let [needs, results, delay] = parts.as_slice() else {
        return Err(malformed());
    };

    let needs = parse_resource_list(needs, number)?;
    let results = parse_resource_list(results, number)?;
    let delay: u64 = delay.trim().parse().map_err(|_| ConfigError::Quantity {
        number,
        value: delay.trim().to_string(),
    })?;

    config
        .processes
        .push(Process::new(name, needs, results, delay));
    Ok(())
}

/// Parse `(name:qty;name:qty;...)`; surrounding parentheses optional by the
/// time the caller has split the line. Duplicate names keep the last
/// quantity.
fn parse_resource_list(block: &str, number: usize) -> Result<BTreeMap<String, u64>, ConfigError> {
    let mut resources = BTreeMap::new();
    let block = block.trim().trim_matches(['(', ')']);
    if block.is_empty() {
        return Ok(resources);
    }

    for item in block.split(';') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let parts: Vec<&str> = item.split(':').collect();
        let [name, quantity] = parts.as_slice() else {
            return Err(ConfigError::Unrecognized {
                number,
                line: item.to_string(),
            });
        };
        let quantity: u64 = quantity.trim().parse().map_err(|_| ConfigError::Quantity {
            number,
            value: quantity.trim().to_string(),
        })?;
        resources.insert(name.trim().to_string(), quantity);
    }
    Ok(resources)
}

// ===========================================================================
// Tests
// ===========================================================================
