use crate::algorithms::common::{heuristic, reconstruct_path, ParentMap};
use crate::algorithms::state::{OpenEntry, SearchState};
use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::grid::{Cell, Grid, Point};
use crate::neighbour_table::NeighbourTable;
use crate::obstacles::{DynamicObstacleTable, StaticObstacleIndex};
use crate::statistics::{PathViolation, PlanReport, Termination};
use rustc_hash::FxHashSet;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Progress notices: `info` when the caller asked for debug output,
/// `trace` otherwise.
macro_rules! notice {
    ($debug:expr, $($arg:tt)+) => {
        if $debug {
            tracing::info!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    };
}

/// Space-time A* planner for a single robot.
///
/// The grid, neighbour table and static obstacle index are built once and
/// never change, so one planner can serve many queries, including from
/// several threads at once. Each query keeps its own open set, closed set
/// and parent map.
pub struct Planner {
    config: PlannerConfig,
    grid: Grid,
    neighbours: NeighbourTable,
    static_obstacles: StaticObstacleIndex,
}

impl Planner {
    /// Creates a planner with default iteration budget and connectivity.
    ///
    /// The obstacle list must contain any workspace boundary the caller
    /// wants enforced.
    pub fn new<P>(grid_size: usize, robot_radius: f64, static_obstacles: &[P]) -> Result<Self>
    where
        P: Into<Point> + Copy,
    {
        Self::from_config(PlannerConfig::new(grid_size, robot_radius), static_obstacles)
    }

    pub fn from_config<P>(config: PlannerConfig, static_obstacles: &[P]) -> Result<Self>
    where
        P: Into<Point> + Copy,
    {
        config.validate()?;
        let obstacles: Vec<Point> = static_obstacles.iter().map(|&p| p.into()).collect();
        if let Some((index, bad)) = obstacles.iter().enumerate().find(|(_, p)| !p.is_finite()) {
            return Err(PlannerError::MalformedObstacle {
                index,
                x: bad.x,
                y: bad.y,
            });
        }

        let grid = Grid::new(config.grid_size, &obstacles);
        let neighbours = NeighbourTable::new(&grid, config.connectivity);
        let static_obstacles = StaticObstacleIndex::new(&obstacles, config.robot_radius);

        tracing::debug!(
            grid_size = config.grid_size,
            robot_radius = config.robot_radius,
            obstacles = obstacles.len(),
            free_cells = grid.free_cell_count(),
            "planner built"
        );

        Ok(Planner {
            config,
            grid,
            neighbours,
            static_obstacles,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn neighbour_table(&self) -> &NeighbourTable {
        &self.neighbours
    }

    pub fn static_obstacles(&self) -> &StaticObstacleIndex {
        &self.static_obstacles
    }

    /// Static and dynamic clearance of `cell` at time step `time`.
    pub fn is_safe(&self, cell: Cell, time: usize, dynamic_obstacles: &DynamicObstacleTable) -> bool {
        self.static_obstacles.is_safe(cell)
            && dynamic_obstacles.is_safe(cell, time, self.config.robot_radius)
    }

    /// Finds a collision-free path from `start` to `goal`.
    ///
    /// # Arguments
    ///
    /// * `start`, `goal` - Raw coordinates, snapped to the grid first.
    /// * `dynamic_obstacles` - Other agents' positions per time step.
    /// * `max_iterations` - Expansion budget for this query.
    /// * `debug` - Log progress at `info` level instead of `trace`.
    ///
    /// # Returns
    ///
    /// One cell per time step from the snapped start to the snapped goal, or
    /// an empty vector if the goal was not reached within the budget.
    pub fn plan(
        &self,
        start: impl Into<Point>,
        goal: impl Into<Point>,
        dynamic_obstacles: &DynamicObstacleTable,
        max_iterations: usize,
        debug: bool,
    ) -> Vec<Cell> {
        self.plan_detailed(start, goal, dynamic_obstacles, max_iterations, debug)
            .path
    }

    /// [`Planner::plan`] with the configured iteration budget and no debug output.
    pub fn plan_with_defaults(
        &self,
        start: impl Into<Point>,
        goal: impl Into<Point>,
        dynamic_obstacles: &DynamicObstacleTable,
    ) -> Vec<Cell> {
        self.plan(start, goal, dynamic_obstacles, self.config.max_iterations, false)
    }

    /// Like [`Planner::plan`], but also reports why the search stopped.
    pub fn plan_detailed(
        &self,
        start: impl Into<Point>,
        goal: impl Into<Point>,
        dynamic_obstacles: &DynamicObstacleTable,
        max_iterations: usize,
        debug: bool,
    ) -> PlanReport {
        self.search(
            start.into(),
            goal.into(),
            dynamic_obstacles,
            max_iterations,
            debug,
            None,
        )
    }

    /// Like [`Planner::plan_detailed`], stopping early once `cancel` is set.
    /// The flag is polled once per iteration.
    pub fn plan_with_cancel(
        &self,
        start: impl Into<Point>,
        goal: impl Into<Point>,
        dynamic_obstacles: &DynamicObstacleTable,
        max_iterations: usize,
        debug: bool,
        cancel: &AtomicBool,
    ) -> PlanReport {
        self.search(
            start.into(),
            goal.into(),
            dynamic_obstacles,
            max_iterations,
            debug,
            Some(cancel),
        )
    }

    fn search(
        &self,
        start: Point,
        goal: Point,
        dynamic_obstacles: &DynamicObstacleTable,
        max_iterations: usize,
        debug: bool,
        cancel: Option<&AtomicBool>,
    ) -> PlanReport {
        let start = self.grid.snap_to_grid(start);
        let goal = self.grid.snap_to_grid(goal);
        notice!(debug, %start, %goal, max_iterations, "planning");

        let mut open_set = BinaryHeap::new();
        let mut open_members: FxHashSet<SearchState> = FxHashSet::default();
        let mut closed_set: FxHashSet<SearchState> = FxHashSet::default();
        let mut came_from = ParentMap::default();
        let mut sequence: u64 = 0;

        let initial = SearchState::new(start, 0, 0, heuristic(start, goal));
        open_set.push(OpenEntry {
            state: initial,
            sequence,
        });
        open_members.insert(initial);

        let mut iterations = 0;
        let termination = loop {
            let Some(&OpenEntry { state: current, .. }) = open_set.peek() else {
                break Termination::OpenSetExhausted;
            };
            if iterations >= max_iterations {
                break Termination::IterationLimit;
            }
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                break Termination::Cancelled;
            }
            iterations += 1;

            if current.position == goal {
                notice!(debug, iterations, time = current.time, "path found after {} iterations", iterations);
                return PlanReport {
                    path: reconstruct_path(&came_from, current),
                    termination: Termination::GoalReached,
                    iterations,
                };
            }

            open_set.pop();
            open_members.remove(&current);
            closed_set.insert(current);

            let epoch = current.time + 1;
            for &neighbour in self.neighbours.lookup(current.position) {
                let candidate = SearchState::new(
                    neighbour,
                    epoch,
                    current.g_score + 1,
                    heuristic(neighbour, goal),
                );
                if closed_set.contains(&candidate) {
                    continue;
                }
                if !self.is_safe(neighbour, epoch, dynamic_obstacles) {
                    continue;
                }
                // The first path to reach a (position, time) node keeps it.
                // Every path to a node has g == time, so nothing cheaper is lost.
                if open_members.contains(&candidate) {
                    continue;
                }
                came_from.insert(candidate, current);
                sequence += 1;
                open_set.push(OpenEntry {
                    state: candidate,
                    sequence,
                });
                open_members.insert(candidate);
            }
        };

        match termination {
            Termination::OpenSetExhausted => {
                notice!(debug, iterations, "open set is empty, no path found")
            }
            Termination::IterationLimit => {
                notice!(debug, iterations, "iteration limit of {} reached, no path found", max_iterations)
            }
            Termination::Cancelled => notice!(debug, iterations, "search cancelled"),
            Termination::GoalReached => {}
        }
        PlanReport::failed(termination, iterations)
    }

    /// Checks a path against the grid, the configured moves and clearances.
    ///
    /// Index `i` is checked against the dynamic obstacles at time `i`. The
    /// first cell is only checked for bounds: the search never rejects its
    /// own start. An empty path is valid.
    pub fn validate_path(
        &self,
        path: &[Cell],
        dynamic_obstacles: &DynamicObstacleTable,
    ) -> std::result::Result<(), PathViolation> {
        for (index, &cell) in path.iter().enumerate() {
            if !self.grid.contains(cell.x as i64, cell.y as i64) {
                return Err(PathViolation::OutOfBounds { index, cell });
            }
            if index == 0 {
                continue;
            }
            let from = path[index - 1];
            if !self.neighbours.lookup(from).contains(&cell) {
                return Err(PathViolation::NotAdjacent {
                    index,
                    from,
                    to: cell,
                });
            }
            if !self.static_obstacles.is_safe(cell) {
                return Err(PathViolation::StaticClearance { index, cell });
            }
            if !dynamic_obstacles.is_safe(cell, index, self.config.robot_radius) {
                return Err(PathViolation::DynamicClearance { index, cell });
            }
        }
        Ok(())
    }
}
