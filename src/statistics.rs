use crate::grid::Cell;
use std::fmt;
use thiserror::Error;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    GoalReached,
    OpenSetExhausted,
    IterationLimit,
    Cancelled,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::GoalReached => "goal reached",
            Termination::OpenSetExhausted => "open set exhausted",
            Termination::IterationLimit => "iteration limit hit",
            Termination::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Outcome of one planning query.
///
/// `path` is empty unless `termination` is [`Termination::GoalReached`];
/// partial paths are never returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanReport {
    pub path: Vec<Cell>,
    pub termination: Termination,
    /// Loop iterations run, one per expanded state plus the final goal check.
    pub iterations: usize,
}

impl PlanReport {
    pub(crate) fn failed(termination: Termination, iterations: usize) -> Self {
        PlanReport {
            path: Vec::new(),
            termination,
            iterations,
        }
    }

    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Time steps taken, zero when start and goal coincide or no path exists.
    pub fn moves(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Moves beyond the Manhattan distance between the path's endpoints.
    pub fn detour(&self) -> usize {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => self.moves().saturating_sub(first.manhattan(*last)),
            _ => 0,
        }
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Outcome: {}", self.termination)?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        if let (Some(first), Some(last)) = (self.path.first(), self.path.last()) {
            writeln!(f, "Path: {} -> {} in {} moves", first, last, self.moves())?;
            writeln!(f, "Detour: {} moves", self.detour())?;
        }
        Ok(())
    }
}

/// First problem found by [`crate::Planner::validate_path`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathViolation {
    #[error("step {index}: {cell} is outside the grid")]
    OutOfBounds { index: usize, cell: Cell },

    #[error("step {index}: {from} -> {to} is not an allowed move")]
    NotAdjacent { index: usize, from: Cell, to: Cell },

    #[error("step {index}: {cell} is too close to a static obstacle")]
    StaticClearance { index: usize, cell: Cell },

    #[error("step {index}: {cell} is too close to another agent")]
    DynamicClearance { index: usize, cell: Cell },
}
