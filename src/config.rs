use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Movement pattern used when expanding a search state.
///
/// Both patterns cost one unit per time step, so the Manhattan heuristic
/// stays admissible and consistent. An 8-connected pattern would need a
/// different heuristic and is not offered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// West, east, north and south.
    #[default]
    FourWay,
    /// The four moves plus staying on the current cell for one step.
    FourWayWithWait,
}

impl Connectivity {
    pub fn allows_wait(self) -> bool {
        matches!(self, Connectivity::FourWayWithWait)
    }
}

/// Static planner parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Side length of the square grid, in cells.
    pub grid_size: usize,

    /// Robot radius in cell units. Static clearance must exceed it,
    /// clearance to other agents must exceed twice it.
    #[serde(default)]
    pub robot_radius: f64,

    /// Node expansions allowed per query (default: 1000)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    #[serde(default)]
    pub connectivity: Connectivity,
}

fn default_max_iterations() -> usize {
    1000
}

impl PlannerConfig {
    pub fn new(grid_size: usize, robot_radius: f64) -> Self {
        Self {
            grid_size,
            robot_radius,
            max_iterations: default_max_iterations(),
            connectivity: Connectivity::default(),
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Reject a zero-sized grid and negative or non-finite radii.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(PlannerError::InvalidGridSize(self.grid_size));
        }
        if !self.robot_radius.is_finite() || self.robot_radius < 0.0 {
            return Err(PlannerError::InvalidRobotRadius(self.robot_radius));
        }
        Ok(())
    }
}
