use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::state::State;

/// What is known about a state visited in the current iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The smallest number of moves from the root with which the state was reached.
    pub depth: u16,
    /// The move that led to the state along that path, `None` for the root.
    pub entered_by: Option<Move>
}

/// States visited during one bounded iteration of the search.
#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<State, Entry>
}

impl TranspositionTable {
    #[inline] pub fn new() -> Self { Self::default() }

    #[inline] pub fn get(&self, state: &State) -> Option<Entry> {
        self.entries.get(state).copied()
    }

    /// Records that `state` was reached with `depth` moves, the last of them being `entered_by`.
    /// Returns `false` (and changes nothing) if `state` was already reached with no more moves.
    pub fn try_record(&mut self, state: State, depth: u16, entered_by: Option<Move>) -> bool {
        match self.entries.get_mut(&state) {
            Some(entry) if entry.depth <= depth => false,
            Some(entry) => { *entry = Entry { depth, entered_by }; true }
            None => { self.entries.insert(state, Entry { depth, entered_by }); true }
        }
    }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Returns the moves that lead from the root to `state`, following the recorded entering moves.
    /// Returns `None` if `state` (or any state on the way back) is not recorded.
    ///
    /// Depth strictly decreases along the way back, so the result has no more than `depth` moves.
    pub fn path_to_root(&self, mut state: State) -> Option<Vec<Move>> {
        let mut moves = Vec::new();
        while let Some(mv) = self.entries.get(&state)?.entered_by {
            moves.push(mv);
            state = state.moved(mv.opposite())?;
        }
        moves.reverse();
        Some(moves)
    }
}

/// Slot for the solution found by one of the concurrent searches.
/// Only the first committed path is kept.
#[derive(Default)]
pub struct SharedSolution {
    found: AtomicBool,
    path: Mutex<Option<Vec<Move>>>
}

impl SharedSolution {
    #[inline] pub fn new() -> Self { Self::default() }

    /// Returns `true` if any solution was committed. Searches check this to stop early.
    #[inline] pub fn is_found(&self) -> bool { self.found.load(Ordering::Acquire) }

    /// Commits `path` unless another one was committed before. Returns `true` if `path` was accepted.
    pub fn try_commit(&self, path: Vec<Move>) -> bool {
        let mut slot = self.path.lock();
        if slot.is_some() { return false; }
        *slot = Some(path);
        self.found.store(true, Ordering::Release);
        true
    }

    /// Takes the committed solution, if any.
    pub fn take(&self) -> Option<Vec<Move>> {
        self.path.lock().take()
    }
}
