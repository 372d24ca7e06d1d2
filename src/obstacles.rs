//! Obstacle clearance checks.
//!
//! Static obstacles live in an R-tree for nearest-neighbour queries. Other
//! agents are scanned directly at each time step.

use rstar::RTree;
use rustc_hash::FxHashMap;
use std::collections::HashMap;

use crate::grid::{Cell, Point};

/// Nearest-neighbour index over static obstacle coordinates.
#[derive(Clone)]
pub struct StaticObstacleIndex {
    tree: RTree<[f64; 2]>,
    robot_radius: f64,
}

impl StaticObstacleIndex {
    pub fn new(obstacles: &[Point], robot_radius: f64) -> Self {
        let points: Vec<[f64; 2]> = obstacles.iter().map(|p| [p.x, p.y]).collect();
        Self {
            tree: RTree::bulk_load(points),
            robot_radius,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Distance to the closest static obstacle, `None` when there are none.
    pub fn clearance(&self, cell: Cell) -> Option<f64> {
        self.tree
            .nearest_neighbor(&[cell.x as f64, cell.y as f64])
            .map(|&[x, y]| cell.distance_to(Point::new(x, y)))
    }

    /// True iff the nearest obstacle is strictly farther than the robot radius.
    pub fn is_safe(&self, cell: Cell) -> bool {
        self.clearance(cell)
            .map_or(true, |distance| distance > self.robot_radius)
    }
}

/// Positions of other agents, keyed by discrete time step.
///
/// A time step with no entry has no agents. Agents share the robot's
/// radius, so a cell is safe only if every agent centre is strictly
/// farther than twice the radius. A non-finite agent coordinate makes
/// every cell unsafe at that time step.
#[derive(Clone, Debug, Default)]
pub struct DynamicObstacleTable {
    by_time: FxHashMap<usize, Vec<Point>>,
}

impl DynamicObstacleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append agent positions for `time`.
    pub fn insert<I, P>(&mut self, time: usize, positions: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        self.by_time
            .entry(time)
            .or_default()
            .extend(positions.into_iter().map(Into::into));
    }

    pub fn with<I, P>(mut self, time: usize, positions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        self.insert(time, positions);
        self
    }

    pub fn at(&self, time: usize) -> &[Point] {
        self.by_time.get(&time).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_time.values().all(Vec::is_empty)
    }

    pub fn is_safe(&self, cell: Cell, time: usize, robot_radius: f64) -> bool {
        let min_separation = 2.0 * robot_radius;
        self.at(time)
            .iter()
            .all(|agent| cell.distance_to(*agent) > min_separation)
    }
}

impl<P: Into<Point>> From<HashMap<usize, Vec<P>>> for DynamicObstacleTable {
    fn from(map: HashMap<usize, Vec<P>>) -> Self {
        let mut table = DynamicObstacleTable::new();
        for (time, positions) in map {
            table.insert(time, positions);
        }
        table
    }
}

impl<P: Into<Point>> FromIterator<(usize, Vec<P>)> for DynamicObstacleTable {
    fn from_iter<T: IntoIterator<Item = (usize, Vec<P>)>>(iter: T) -> Self {
        let mut table = DynamicObstacleTable::new();
        for (time, positions) in iter {
            table.insert(time, positions);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_index_is_always_safe() {
        let index = StaticObstacleIndex::new(&[], 100.0);
        assert!(index.is_empty());
        assert!(index.is_safe(Cell::new(0, 0)));
        assert_eq!(index.clearance(Cell::new(3, 3)), None);
    }

    #[test]
    fn test_static_clearance_is_strict() {
        let index = StaticObstacleIndex::new(&[Point::new(0.0, 0.0)], 1.0);
        assert!(!index.is_safe(Cell::new(1, 0)));
        assert!(index.is_safe(Cell::new(1, 1)));
        assert!(index.is_safe(Cell::new(2, 0)));
    }

    #[test]
    fn test_static_duplicates() {
        let obstacles = [Point::new(4.0, 4.0), Point::new(4.0, 4.0), Point::new(9.0, 9.0)];
        let index = StaticObstacleIndex::new(&obstacles, 0.0);
        assert_eq!(index.len(), 3);
        assert!(!index.is_safe(Cell::new(4, 4)));
        assert_eq!(index.clearance(Cell::new(4, 7)), Some(3.0));
    }

    #[test]
    fn test_zero_radius_only_rejects_exact_hits() {
        let index = StaticObstacleIndex::new(&[Point::new(2.0, 2.0)], 0.0);
        assert!(!index.is_safe(Cell::new(2, 2)));
        assert!(index.is_safe(Cell::new(2, 3)));
    }

    #[test]
    fn test_dynamic_missing_time_is_free() {
        let table = DynamicObstacleTable::new().with(3, [(1, 1)]);
        assert!(table.at(2).is_empty());
        assert!(table.is_safe(Cell::new(1, 1), 2, 1.0));
        assert!(!table.is_safe(Cell::new(1, 1), 3, 1.0));
    }

    #[test]
    fn test_dynamic_uses_twice_the_radius() {
        let table = DynamicObstacleTable::new().with(0, [(3, 3)]);
        assert!(!table.is_safe(Cell::new(5, 3), 0, 1.0));
        assert!(table.is_safe(Cell::new(5, 4), 0, 1.0));
        assert!(table.is_safe(Cell::new(4, 3), 0, 0.0));
        assert!(!table.is_safe(Cell::new(3, 3), 0, 0.0));
    }

    #[test]
    fn test_dynamic_from_map() {
        let mut map: HashMap<usize, Vec<(f64, f64)>> = HashMap::new();
        map.insert(1, vec![(2.0, 2.0), (5.0, 5.0)]);
        let table = DynamicObstacleTable::from(map);
        assert_eq!(table.at(1).len(), 2);
        assert!(!table.is_empty());
        assert!(DynamicObstacleTable::new().with(0, Vec::<Point>::new()).is_empty());
    }

    #[test]
    fn test_dynamic_nan_blocks_time_step() {
        let table = DynamicObstacleTable::new().with(0, [(f64::NAN, 0.0)]);
        assert!(!table.is_safe(Cell::new(7, 7), 0, 0.0));
    }
}
