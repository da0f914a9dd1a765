//! The execution trace: the ordered sequence of admissions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One admission: the cycle it was scheduled at and the process name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub cycle: u64,
    pub name: String,
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.cycle, self.name)
    }
}

/// A line did not match the `<cycle>:<name>` shape.
#[derive(Debug, thiserror::Error)]
#[error("malformed trace entry")]
pub struct MalformedEntry;

impl FromStr for TraceEntry {
    type Err = MalformedEntry;

    /// Parses `<cycle>:<name>` with surrounding whitespace tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cycle, name) = s.split_once(':').ok_or(MalformedEntry)?;
        let cycle = cycle.trim().parse::<u64>().map_err(|_| MalformedEntry)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(MalformedEntry);
        }
        Ok(TraceEntry {
            cycle,
            name: name.to_string(),
        })
    }
}

/// Append-only sequence of trace entries in emission order, which is
/// non-decreasing in cycle by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, cycle: u64, name: &str) {
        self.entries.push(TraceEntry {
            cycle,
            name: name.to_string(),
        });
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as one entry per line, newline-separated, no trailing
    /// newline.
    pub fn render(&self) -> String {
        let lines: Vec<String> = self.entries.iter().map(TraceEntry::to_string).collect();
        lines.join("\n")
    }

    /// Parse a log leniently: lines that do not match `<cycle>:<name>` are
    /// skipped, so a log interleaved with stray output still replays.
    pub fn parse(text: &str) -> Trace {
        let entries = text
            .lines()
            .filter_map(|line| line.parse::<TraceEntry>().ok())
            .collect();
        Trace { entries }
    }
}
