//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::OnceLock;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use crate::conf::SolverConf;
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::state::{Grid, State};
use crate::solver::SlidingPuzzleSolver;

/// Solved by moving the blank right.
pub const ALMOST_SOLVED: Grid = [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 0, 15]];
pub const FOURTEEN_MOVES: Grid = [[5, 1, 2, 4], [9, 6, 3, 8], [13, 15, 10, 11], [14, 0, 7, 12]];
pub const TWENTY_EIGHT_MOVES: Grid = [[10, 1, 3, 4], [5, 0, 2, 6], [13, 7, 15, 11], [14, 9, 8, 12]];
pub const THIRTY_TWO_MOVES: Grid = [[5, 1, 0, 3], [9, 13, 2, 6], [14, 11, 15, 7], [10, 8, 12, 4]];

/// Installs logger that prints to the test output (`RUST_LOG` selects the level).
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Returns the solver with default configuration, built once for all tests.
pub fn shared_solver() -> &'static SlidingPuzzleSolver {
    static SOLVER: OnceLock<SlidingPuzzleSolver> = OnceLock::new();
    SOLVER.get_or_init(|| {
        init_logger();
        SlidingPuzzleSolver::new(SolverConf::default()).unwrap()
    })
}

/// Makes `moves` random moves starting from the goal (never undoing the previous move).
pub fn random_walk(rng: &mut ChaCha8Rng, moves: usize) -> State {
    let mut state = State::goal();
    let mut last = None;
    for _ in 0..moves {
        let (next, mv) = *state.neighbors(last).choose(rng).unwrap();
        state = next;
        last = Some(mv);
    }
    state
}

/// Returns all states within `max_distance` moves from the goal, with their exact distances (breadth-first search).
pub fn distances_from_goal(max_distance: u8) -> HashMap<State, u8> {
    let mut distances = HashMap::from([(State::goal(), 0)]);
    let mut current = vec![State::goal()];
    for distance in 1..=max_distance {
        let mut next = Vec::new();
        for state in current {
            for (neighbor, _) in state.neighbors(None) {
                distances.entry(neighbor).or_insert_with(|| { next.push(neighbor); distance });
            }
        }
        current = next;
    }
    distances
}

/// Applies moves of the blank to `grid`, returns `None` if any of them is illegal.
pub fn replay_on_grid(grid: &Grid, moves: &[Move]) -> Option<Grid> {
    let internal: Vec<Move> = moves.iter().map(|mv| mv.opposite()).collect();
    Some(State::from_grid(grid).ok()?.apply(&internal)?.to_grid())
}
