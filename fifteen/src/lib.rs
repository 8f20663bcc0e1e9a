#![doc = include_str!("../README.md")]

pub mod error;
pub mod conf;
pub mod stats;
pub mod pattern_db;
pub mod puzzle_sliding16;
pub mod transposition;
pub mod solver;
pub mod bidirectional;
pub mod parallel;

#[cfg(test)] pub(crate) mod test_utils;

pub use conf::{SearchMethod, SolverConf};
pub use error::SolveError;
pub use puzzle_sliding16::neighbors::Move;
pub use puzzle_sliding16::state::{Grid, State};
pub use solver::SlidingPuzzleSolver;
