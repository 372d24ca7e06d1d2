//! Error types for the planner

use thiserror::Error;

/// Planner construction error.
///
/// Searching never fails: an unreachable goal is reported as an empty path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("grid size must be positive, got {0}")]
    InvalidGridSize(usize),

    #[error("robot radius must be a finite non-negative number, got {0}")]
    InvalidRobotRadius(f64),

    #[error("static obstacle #{index} has a non-finite coordinate ({x}, {y})")]
    MalformedObstacle { index: usize, x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, PlannerError>;
