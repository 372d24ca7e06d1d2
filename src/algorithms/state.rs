use crate::grid::Cell;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// "The robot is at `position` at time step `time`."
///
/// Equality and hashing only look at `(position, time)`, so the open set,
/// closed set and parent map treat two states reaching the same place at
/// the same step as one node whatever their scores. Priority ordering is
/// kept separately in [`OpenEntry`].
#[derive(Clone, Copy, Debug)]
pub struct SearchState {
    pub position: Cell,
    pub time: usize,
    pub g_score: usize,
    pub h_score: usize,
}

impl SearchState {
    pub fn new(position: Cell, time: usize, g_score: usize, h_score: usize) -> Self {
        SearchState {
            position,
            time,
            g_score,
            h_score,
        }
    }

    pub fn f_score(&self) -> usize {
        self.g_score + self.h_score
    }
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.time == other.time
    }
}

impl Eq for SearchState {}

impl Hash for SearchState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.time.hash(state);
    }
}

/// Open-set entry. `BinaryHeap` is a max-heap, so the comparison is
/// reversed: lowest f first, then lowest h (closest to the goal), then
/// the entry pushed earliest.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OpenEntry {
    pub state: SearchState,
    pub sequence: u64,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .state
            .f_score()
            .cmp(&self.state.f_score())
            .then_with(|| other.state.h_score.cmp(&self.state.h_score))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
