use crate::config::Connectivity;
use crate::grid::{Cell, Grid};

// West, east, north, south.
const MOVES: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Successor cells for every grid cell, computed once.
///
/// Entries exclude out-of-bounds and statically obstructed cells and keep
/// the order of `MOVES`. With [`Connectivity::FourWayWithWait`] a free cell
/// also lists itself last.
pub struct NeighbourTable {
    size: usize,
    table: Vec<Vec<Cell>>,
}

impl NeighbourTable {
    pub fn new(grid: &Grid, connectivity: Connectivity) -> Self {
        let size = grid.size();
        let mut table = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                let cell = Cell::new(x, y);
                let mut neighbours: Vec<Cell> = MOVES
                    .iter()
                    .map(|(dx, dy)| (x as i64 + dx, y as i64 + dy))
                    .filter(|&(nx, ny)| grid.contains(nx, ny))
                    .map(|(nx, ny)| Cell::new(nx as usize, ny as usize))
                    .filter(|n| !grid.is_obstructed(*n))
                    .collect();
                if connectivity.allows_wait() && !grid.is_obstructed(cell) {
                    neighbours.push(cell);
                }
                table.push(neighbours);
            }
        }
        NeighbourTable { size, table }
    }

    /// Empty for cells outside the grid.
    pub fn lookup(&self, cell: Cell) -> &[Cell] {
        if cell.x >= self.size || cell.y >= self.size {
            return &[];
        }
        &self.table[cell.y * self.size + cell.x]
    }
}
