//! The 4x4 sliding puzzle: board state, moves, patterns and heuristics.

pub mod utils;
pub mod neighbors;
pub mod state;
pub mod pattern;
pub mod heuristic;
