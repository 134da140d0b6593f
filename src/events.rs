use std::fmt;

use crate::board::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Placed { row: usize, col: usize },
    Removed { row: usize, col: usize },
}

/// A complete placement, one 1-indexed row per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub rows: Vec<usize>,
    /// Running solution count, including this one.
    pub count: usize,
}

impl Solution {
    pub fn transcript(&self) -> String {
        format!("Number of solutions found: {}\n{}\n", self.count, self)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self.rows.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", rows.join(" "))
    }
}

/// Everything the solver thread tells its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BoardChanged { snapshot: Snapshot, change: Move },
    SolutionFound(Solution),
    RunComplete { solutions: usize },
}
