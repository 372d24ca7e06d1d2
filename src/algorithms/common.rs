use crate::algorithms::state::SearchState;
use crate::grid::Cell;
use rustc_hash::FxHashMap;

/// Parent links recorded during a search.
pub type ParentMap = FxHashMap<SearchState, SearchState>;

/// Manhattan distance, ignoring obstacles and time.
///
/// Admissible and consistent only for unit-cost four-way moves (with or
/// without waiting). Diagonal moves would break that.
pub fn heuristic(from: Cell, goal: Cell) -> usize {
    from.manhattan(goal)
}

/// Walk parent links back from `goal_state` to the state with no parent
/// and return the positions in start-to-goal order.
pub fn reconstruct_path(came_from: &ParentMap, goal_state: SearchState) -> Vec<Cell> {
    let mut path = vec![goal_state.position];
    let mut current = goal_state;
    while let Some(&parent) = came_from.get(&current) {
        path.push(parent.position);
        current = parent;
    }
    path.reverse();
    path
}
