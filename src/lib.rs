//! Space-time A* path planning for a point robot on a square grid.
//!
//! The robot avoids fixed obstacles, kept at a clearance of more than its
//! radius, and other agents whose positions are known per time step, kept
//! at more than twice its radius. A [`Planner`] is built once from the static
//! world and answers any number of [`Planner::plan`] queries.
//!
//! ```
//! use spacetime_planner::{DynamicObstacleTable, Planner};
//!
//! let planner = Planner::new(10, 0.0, &[(4, 4)]).unwrap();
//! let agents = DynamicObstacleTable::new().with(1, [(1, 0)]);
//! let path = planner.plan((0, 0), (5, 5), &agents, 1000, false);
//! assert_eq!(path.first().map(|c| (c.x, c.y)), Some((0, 0)));
//! assert_eq!(path.last().map(|c| (c.x, c.y)), Some((5, 5)));
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod grid;
pub mod neighbour_table;
pub mod obstacles;
pub mod statistics;

pub use algorithms::space_time_a_star::Planner;
pub use algorithms::state::SearchState;
pub use config::{Connectivity, PlannerConfig};
pub use error::{PlannerError, Result};
pub use grid::{Cell, Grid, Point};
pub use neighbour_table::NeighbourTable;
pub use obstacles::{DynamicObstacleTable, StaticObstacleIndex};
pub use statistics::{PathViolation, PlanReport, Termination};
