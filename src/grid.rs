use pathfinding::grid::Grid as FreeCells;
use std::fmt;

/// Integer grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }

    /// L1 distance, the search heuristic.
    pub fn manhattan(self, other: Cell) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance from the cell centre to a raw coordinate.
    pub fn distance_to(self, point: Point) -> f64 {
        (self.x as f64 - point.x).hypot(self.y as f64 - point.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Raw workspace coordinate, not yet snapped to the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

impl From<Cell> for Point {
    fn from(cell: Cell) -> Self {
        Point {
            x: cell.x as f64,
            y: cell.y as f64,
        }
    }
}

/// Square occupancy grid covering `[0, size) x [0, size)`.
///
/// Static obstacles whose rounded coordinate falls inside the grid mark
/// that cell as obstructed. Obstacles outside the grid (boundary walls
/// placed at -1 or `size`) only matter for clearance checks.
pub struct Grid {
    size: usize,
    free: FreeCells,
}

impl Grid {
    pub fn new(size: usize, static_obstacles: &[Point]) -> Self {
        let mut free = FreeCells::new(size, size);
        free.fill();
        for obstacle in static_obstacles {
            if let Some(cell) = Self::cell_at(size, *obstacle) {
                free.remove_vertex((cell.x, cell.y));
            }
        }
        Grid { size, free }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell containing the point, if the point lies inside the grid.
    fn cell_at(size: usize, point: Point) -> Option<Cell> {
        let (x, y) = (point.x.round(), point.y.round());
        let limit = size as f64;
        if x >= 0.0 && x < limit && y >= 0.0 && y < limit {
            Some(Cell::new(x as usize, y as usize))
        } else {
            None
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Out-of-bounds cells count as obstructed.
    pub fn is_obstructed(&self, cell: Cell) -> bool {
        !self.free.has_vertex((cell.x, cell.y))
    }

    pub fn free_cell_count(&self) -> usize {
        self.free.vertices_len()
    }

    fn clamp_axis(&self, value: f64) -> usize {
        // NaN saturates to 0.
        value.round().max(0.0).min((self.size - 1) as f64) as usize
    }

    /// Snap a raw coordinate to the nearest free cell.
    ///
    /// Coordinates outside the workspace are clamped into range rather than
    /// rejected. If the rounded cell is obstructed, square rings around it
    /// are scanned outward until no farther ring can hold a closer cell, and
    /// the free cell closest to `point` wins, ties going to the lower `x` and
    /// then the lower `y`. Non-finite axes are measured from the clamped
    /// cell. A grid with no free cell returns the clamped cell.
    pub fn snap_to_grid(&self, point: Point) -> Cell {
        let nearest = Cell::new(self.clamp_axis(point.x), self.clamp_axis(point.y));
        if !self.is_obstructed(nearest) {
            return nearest;
        }

        let finite_or = |value: f64, fallback: usize| {
            if value.is_finite() {
                value
            } else {
                fallback as f64
            }
        };
        let target = Point::new(finite_or(point.x, nearest.x), finite_or(point.y, nearest.y));
        // Every cell on ring r is at least r - offset away from `target`.
        let offset = (target.x - nearest.x as f64)
            .abs()
            .max((target.y - nearest.y as f64).abs());

        let mut best: Option<(f64, Cell)> = None;
        for radius in 1..self.size {
            if let Some((distance, _)) = best {
                if radius as f64 - offset > distance {
                    break;
                }
            }
            for cell in self.ring(nearest, radius).filter(|c| !self.is_obstructed(*c)) {
                let distance = cell.distance_to(target);
                let closer = best.map_or(true, |(d, b)| {
                    distance.total_cmp(&d).then_with(|| cell.cmp(&b)).is_lt()
                });
                if closer {
                    best = Some((distance, cell));
                }
            }
        }
        best.map_or(nearest, |(_, cell)| cell)
    }

    /// In-bounds cells at Chebyshev distance exactly `radius` from `center`.
    fn ring(&self, center: Cell, radius: usize) -> impl Iterator<Item = Cell> + '_ {
        let (cx, cy, r) = (center.x as i64, center.y as i64, radius as i64);
        (cx - r..=cx + r)
            .flat_map(move |x| (cy - r..=cy + r).map(move |y| (x, y)))
            .filter(move |&(x, y)| (x - cx).abs().max((y - cy).abs()) == r)
            .filter(|&(x, y)| self.contains(x, y))
            .map(|(x, y)| Cell::new(x as usize, y as usize))
    }
}
