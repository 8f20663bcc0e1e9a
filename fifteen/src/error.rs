/// Errors reported by the solver.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The grid has a tile out of range, a duplicated or a missing tile.
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(String),

    /// The grid is well-formed, but its permutation parity makes the goal unreachable.
    #[error("puzzle is not solvable")]
    UnsolvablePuzzle,

    /// Iterative deepening ran out of nodes to expand without reaching the goal.
    /// Cannot happen for a solvable puzzle.
    #[error("search space exhausted without reaching the goal")]
    SearchExhausted,

    /// The statistics collector asked to stop (e.g. node limit of `Limited` was hit).
    #[error("search interrupted before a solution was found")]
    Interrupted,

    /// The solver configuration cannot be used (e.g. wrong pattern database tiles).
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),
}
