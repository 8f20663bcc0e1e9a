use log::debug;
use crate::error::SolveError;
use crate::pattern_db::PatternDBManager;
use crate::puzzle_sliding16::heuristic::{Estimator, TileMetric};
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::state::State;
use crate::solver::{Pass, SlidingPuzzleSolver};
use crate::stats::{Counted, SearchStatsCollector};
use crate::transposition::{SharedSolution, TranspositionTable};

/// Direction of a half of bidirectional search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    /// From the start towards the goal.
    Forward,
    /// From the goal towards the start.
    Backward
}

/// Returns the moves that undo `path`.
fn undo(path: &[Move]) -> impl Iterator<Item=Move> + '_ {
    path.iter().rev().map(|mv| mv.opposite())
}

impl Direction {
    /// Returns the solution (from the start to the goal) that goes through a state
    /// reached with `own_path` in this direction and with `other_path` in the other direction.
    fn join(self, own_path: &[Move], other_path: &[Move]) -> Vec<Move> {
        let (to_meeting, from_goal) = match self {
            Direction::Forward => (own_path, other_path),
            Direction::Backward => (other_path, own_path)
        };
        to_meeting.iter().copied().chain(undo(from_goal)).collect()
    }
}

/// State of one half of bidirectional search during one bounded iteration.
struct Half<'a, E: Estimator, S: SearchStatsCollector> {
    direction: Direction,
    /// Estimates distance to the root of the other half.
    estimator: &'a E,
    bound: u16,
    /// States visited by this half in this iteration.
    table: TranspositionTable,
    /// States visited by the other half in its latest iteration.
    other: &'a TranspositionTable,
    path: Vec<Move>,
    solution: &'a SharedSolution,
    stats: Counted<'a, S>
}

impl<'a, E: Estimator, S: SearchStatsCollector> Half<'a, E, S> {
    fn new(direction: Direction, estimator: &'a E, bound: u16, other: &'a TranspositionTable, solution: &'a SharedSolution, stats: &'a mut S) -> Self {
        Self { direction, estimator, bound, table: TranspositionTable::new(), other, path: Vec::with_capacity(64), solution, stats: Counted::new(stats) }
    }

    fn commit(&mut self, other_path: &[Move]) -> Pass {
        self.stats.leaf();
        self.solution.try_commit(self.direction.join(&self.path, other_path));
        Pass::Found
    }

    fn search(&mut self, state: State, g: u16) -> Pass {
        let h = self.estimator.estimate(state);
        let f = g + h as u16;
        if f > self.bound {
            if !self.stats.leaf() { return Pass::Stopped; }
            return Pass::Exceeded(f);
        }
        if h == 0 { return self.commit(&[]); }
        if let Some(met) = self.other.get(&state) {
            // the path through the meeting state must fit in the bound to be a shortest one
            if g + met.depth <= self.bound {
                if let Some(other_path) = self.other.path_to_root(state) {
                    return self.commit(&other_path);
                }
            }
        }
        let last_move = self.path.last().copied();
        if !self.table.try_record(state, g, last_move) {
            if !self.stats.leaf() { return Pass::Stopped; }
            return Pass::Exhausted;
        }
        self.stats.internal();
        let mut result = Pass::Exhausted;
        for (neighbor, mv) in state.neighbors(last_move) {
            self.path.push(mv);
            match self.search(neighbor, g + 1) {
                Pass::Found => return Pass::Found,
                Pass::Stopped => { self.path.pop(); return Pass::Stopped; }
                other => result = result.min(other)
            }
            self.path.pop();
        }
        result
    }
}

impl<PDBM: PatternDBManager> SlidingPuzzleSolver<PDBM> {
    /// Finds a shortest solution of `start` (in the goal `0, 1, ..., 15` numbering) with bidirectional IDA*.
    ///
    /// Each iteration runs a bounded search from `start` towards the goal, and then a bounded search
    /// from the goal towards `start`; each direction has its own bound.
    /// The search stops when it reaches its target or a state visited by the other direction in its latest iteration.
    /// Collect statistics during search. Unsolvable `start` gives `SolveError::UnsolvablePuzzle`.
    pub fn bidirectional_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        if !start.is_solvable() { return Err(SolveError::UnsolvablePuzzle); }
        if start.is_goal() { return Ok(Vec::new()); }
        let goal = State::goal();
        let towards_start = TileMetric::towards(start);
        let solution = SharedSolution::new();
        let mut forward_bound = self.heuristic.estimate(start) as u16;
        let mut backward_bound = towards_start.estimate(goal) as u16;
        let mut backward_table = TranspositionTable::new();
        loop {
            let mut forward = Half::new(Direction::Forward, &self.heuristic, forward_bound, &backward_table, &solution, &mut *stats);
            let forward_pass = forward.search(start, 0);
            debug!("bidirectional forward bound {}: {} nodes visited, {} states in table",
                   forward_bound, forward.stats.counts.visits(), forward.table.len());
            let forward_table = forward.table;
            forward_bound = match forward_pass {
                Pass::Found => return solution.take().ok_or(SolveError::SearchExhausted),
                Pass::Exceeded(next) => next,
                Pass::Exhausted => return Err(SolveError::SearchExhausted),
                Pass::Stopped => return Err(SolveError::Interrupted)
            };

            let mut backward = Half::new(Direction::Backward, &towards_start, backward_bound, &forward_table, &solution, &mut *stats);
            let backward_pass = backward.search(goal, 0);
            debug!("bidirectional backward bound {}: {} nodes visited, {} states in table",
                   backward_bound, backward.stats.counts.visits(), backward.table.len());
            let new_backward_table = backward.table;
            backward_bound = match backward_pass {
                Pass::Found => return solution.take().ok_or(SolveError::SearchExhausted),
                Pass::Exceeded(next) => next,
                Pass::Exhausted => return Err(SolveError::SearchExhausted),
                Pass::Stopped => return Err(SolveError::Interrupted)
            };
            backward_table = new_backward_table;
        }
    }

    /// Finds a shortest solution of `start` with bidirectional IDA*.
    #[inline] pub fn bidirectional(&self, start: State) -> Result<Vec<Move>, SolveError> {
        self.bidirectional_stats(start, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Limited, SearchAllStats};
    use crate::test_utils::{shared_solver, random_walk, FOURTEEN_MOVES, TWENTY_EIGHT_MOVES};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn join() {
        let own = [Move::Up, Move::Left];
        let other = [Move::Right, Move::Down];
        assert_eq!(Direction::Forward.join(&own, &other), [Move::Up, Move::Left, Move::Up, Move::Left]);
        assert_eq!(Direction::Backward.join(&own, &other), [Move::Right, Move::Down, Move::Right, Move::Down]);
        assert_eq!(Direction::Backward.join(&own, &[]), [Move::Right, Move::Down]);
        assert_eq!(Direction::Forward.join(&own, &[]), own);
    }

    fn check(solver: &SlidingPuzzleSolver, start: State) {
        let expected = solver.ida_star(start).unwrap();
        let mut stats = SearchAllStats::default();
        let found = solver.bidirectional_stats(start, &mut stats).unwrap();
        assert_eq!(found.len(), expected.len(), "{:?}", start);
        assert_eq!(start.apply(&found), Some(State::goal()));
        if !found.is_empty() { assert!(stats.visits() > 0); }
    }

    #[test]
    fn known_puzzles() {
        let solver = shared_solver();
        check(solver, State::goal());
        check(solver, State::goal().moved(Move::Right).unwrap());
        check(solver, State::from_grid(&FOURTEEN_MOVES).unwrap());
        check(solver, State::from_grid(&TWENTY_EIGHT_MOVES).unwrap());
    }

    #[test]
    fn random_puzzles() {
        let solver = shared_solver();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for walk_len in [5, 12, 20, 30, 30, 40] {
            check(solver, random_walk(&mut rng, walk_len));
        }
    }

    #[test]
    fn interrupted() {
        let start = State::from_grid(&TWENTY_EIGHT_MOVES).unwrap();
        assert_eq!(shared_solver().bidirectional_stats(start, &mut Limited::with_limit(0)), Err(SolveError::Interrupted));
    }

    #[test]
    fn unsolvable() {
        let odd: State = [0, 1, 2, 3, 4, 7, 6, 5, 8, 9, 10, 11, 12, 13, 14, 15].iter().cloned().collect();
        assert_eq!(shared_solver().bidirectional(odd), Err(SolveError::UnsolvablePuzzle));
    }
}
