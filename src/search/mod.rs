pub mod and_or;
pub mod graph;
pub mod serial;

pub use self::and_or::{and_or_graph_search, ConditionalPlan};
pub use self::graph::graph_search;
pub use self::serial::serial_graph_search;

use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::time::Instant;

use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

use crate::actions::Plan;
use crate::memory;

/// Resource bounds and reporting cadence for a single search run.
#[derive(Debug, Clone, Copy)]
pub struct SearchLimits {
    /// Maximum resident set size in bytes before the search aborts.
    pub max_memory: u64,
    /// Print a status line every this many expanded states.
    pub status_interval: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_memory: memory::DEFAULT_MAX_USAGE,
            status_interval: 10_000,
        }
    }
}

/// Per-depth counters of the search, where depth is the path cost of a state.
pub struct Stats {
    created: Vec<u64>,
    expanded: Vec<u64>,
    started: Instant,
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            created: vec![],
            expanded: vec![],
            started: Instant::now(),
        }
    }

    pub fn total_created(&self) -> u64 {
        self.created.iter().sum()
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded.iter().sum()
    }

    /// Returns true when the search reached this depth for the first time.
    pub fn add_created(&mut self, depth: u32) -> bool {
        Self::add(&mut self.created, depth)
    }

    pub fn add_expanded(&mut self, depth: u32) -> bool {
        Self::add(&mut self.expanded, depth)
    }

    fn add(counts: &mut Vec<u64>, depth: u32) -> bool {
        let mut ret = false;

        // while because depths can be skipped when duplicates are pruned
        while depth as usize >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth as usize] += 1;
        ret
    }

    /// Folds another run's counters into this one. Used by serial search to
    /// report totals across sub-searches.
    pub fn merge(&mut self, other: &Stats) {
        for (depth, &count) in other.created.iter().enumerate() {
            while depth >= self.created.len() {
                self.created.push(0);
            }
            self.created[depth] += count;
        }
        for (depth, &count) in other.expanded.iter().enumerate() {
            while depth >= self.expanded.len() {
                self.expanded.push(0);
            }
            self.expanded[depth] += count;
        }
    }

    pub fn status_line(&self, frontier_size: usize) -> String {
        format!(
            "expanded: {}, created: {}, frontier: {}, memory: {} MiB, time: {} ms",
            self.total_expanded().separated_string(),
            self.total_created().separated_string(),
            frontier_size.separated_string(),
            memory::usage() / 1024 / 1024,
            (self.started.elapsed().as_millis() as u64).separated_string(), // separator doesn't support u128
        )
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "States created total: {}",
            self.total_created().separated_string()
        )?;
        writeln!(
            f,
            "States expanded total: {}",
            self.total_expanded().separated_string()
        )?;
        writeln!(f)?;

        let mut table = Table::new();
        table.set_format(*FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Created"),
            Cell::new("Expanded"),
        ]));
        for depth in 0..self.created.len() {
            let expanded = self.expanded.get(depth).copied().unwrap_or(0);
            table.add_row(Row::new(vec![
                Cell::new(&depth.to_string()),
                Cell::new(&self.created[depth].separated_string()),
                Cell::new(&expanded.separated_string()),
            ]));
        }
        write!(f, "{}", table)
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "created by depth: {:?}", self.created)?;
        writeln!(f, "expanded by depth: {:?}", self.expanded)
    }
}

/// Result of a completed search: the plan if one was found, plus counters.
pub struct SearchOutcome {
    pub plan: Option<Plan>,
    pub stats: Stats,
}

impl Debug for SearchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.plan {
            Some(plan) => writeln!(f, "plan of length {}", plan.len())?,
            None => writeln!(f, "no plan")?,
        }
        write!(f, "{:?}", self.stats)
    }
}
