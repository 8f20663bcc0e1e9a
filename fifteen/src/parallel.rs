use log::{debug, trace};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use crate::error::SolveError;
use crate::pattern_db::PatternDBManager;
use crate::puzzle_sliding16::heuristic::Estimator;
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::state::State;
use crate::solver::{Pass, SlidingPuzzleSolver};
use crate::stats::{SearchAllStats, SearchStatsCollector};
use crate::transposition::{SharedSolution, TranspositionTable};

/// Result of searching with a single bound by all workers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatched {
    /// Solution found by the fastest worker.
    Solved(Vec<Move>),
    /// No worker found a solution; the argument is the bound for the next try.
    Exceeded(u16),
    /// No worker found a solution and no bound helps.
    Exhausted
}

impl<PDBM: PatternDBManager> SlidingPuzzleSolver<PDBM> where PDBM::PatternDB: Sync {
    /// Searches for a solution of `start` with no more than `bound` moves.
    ///
    /// The subtree of each legal first move is searched by a separate task run in `pool`,
    /// with its own transposition table. The first task that reaches the goal commits its path,
    /// the others notice it and stop. Visits made by all tasks are added to `stats`.
    pub fn dispatch(&self, pool: &ThreadPool, start: State, bound: u16, stats: &mut SearchAllStats) -> Dispatched {
        if start.is_goal() { return Dispatched::Solved(Vec::new()); }
        let solution = SharedSolution::new();
        let first_moves = start.neighbors(None);
        let results: Vec<(Pass, SearchAllStats)> = pool.install(|| {
            first_moves.as_slice().par_iter().map(|&(state, mv)| {
                trace!("worker for first move {} started, bound {}", mv, bound);
                let mut path = Vec::with_capacity(128);
                path.push(mv);
                let mut table = TranspositionTable::new();
                let mut worker_stats = SearchAllStats::default();
                let pass = self.search_rec(state, 1, bound, &mut path, &mut table, &mut worker_stats, Some(&solution));
                if pass == Pass::Found && solution.try_commit(path) {
                    trace!("worker for first move {} committed solution", mv);
                }
                trace!("worker for first move {} finished with {:?}, {} nodes visited", mv, pass, worker_stats.visits());
                (pass, worker_stats)
            }).collect()
        });
        for (_, worker_stats) in results.iter() { *stats += *worker_stats; }
        if let Some(path) = solution.take() { return Dispatched::Solved(path); }
        match results.iter()
            .map(|(pass, _)| *pass)
            .filter(|pass| matches!(pass, Pass::Exceeded(_) | Pass::Exhausted))
            .fold(Pass::Exhausted, Pass::min)
        {
            Pass::Exceeded(next) => Dispatched::Exceeded(next),
            _ => Dispatched::Exhausted
        }
    }

    /// Finds a shortest solution of `start` (in the goal `0, 1, ..., 15` numbering)
    /// with IDA* whose iterations are dispatched to `SolverConf::workers` threads.
    /// Collect statistics during search; the collector is informed after each iteration.
    pub fn parallel_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        if !start.is_solvable() { return Err(SolveError::UnsolvablePuzzle); }
        if start.is_goal() { return Ok(Vec::new()); }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.conf.workers)
            .thread_name(|i| format!("fifteen-worker-{}", i))
            .build()
            .map_err(|e| SolveError::InvalidConfig(format!("failed to build thread pool: {}", e)))?;
        let mut bound = self.heuristic.estimate(start) as u16;
        loop {
            let mut iteration_stats = SearchAllStats::default();
            let dispatched = self.dispatch(&pool, start, bound, &mut iteration_stats);
            debug!("parallel IDA* bound {}: {} nodes visited by {} workers", bound, iteration_stats.visits(), self.conf.workers);
            let go_on = stats.add_visits(iteration_stats.internal, iteration_stats.leaves);
            match dispatched {
                Dispatched::Solved(path) => return Ok(path),
                Dispatched::Exceeded(_) if !go_on => return Err(SolveError::Interrupted),
                Dispatched::Exceeded(next) => bound = next,
                Dispatched::Exhausted => return Err(SolveError::SearchExhausted)
            }
        }
    }

    /// Finds a shortest solution of `start` with parallel IDA*.
    #[inline] pub fn parallel(&self, start: State) -> Result<Vec<Move>, SolveError> {
        self.parallel_stats(start, &mut ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{SearchMethod, SolverConf};
    use crate::stats::Limited;
    use crate::test_utils::{shared_solver, random_walk, replay_on_grid, FOURTEEN_MOVES, TWENTY_EIGHT_MOVES, THIRTY_TWO_MOVES};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pool(workers: usize) -> ThreadPool {
        ThreadPoolBuilder::new().num_threads(workers).build().unwrap()
    }

    #[test]
    fn same_length_as_ida_star() {
        let solver = shared_solver();
        for grid in [FOURTEEN_MOVES, TWENTY_EIGHT_MOVES, THIRTY_TWO_MOVES] {
            let start = State::from_grid(&grid).unwrap();
            let found = solver.parallel(start).unwrap();
            assert_eq!(found.len(), solver.ida_star(start).unwrap().len());
            assert_eq!(start.apply(&found), Some(State::goal()));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for walk_len in [3, 15, 25, 35] {
            let start = random_walk(&mut rng, walk_len);
            assert_eq!(solver.parallel(start).unwrap().len(), solver.ida_star(start).unwrap().len());
        }
    }

    #[test]
    fn dispatch_single_bound() {
        let solver = shared_solver();
        let start = State::from_grid(&TWENTY_EIGHT_MOVES).unwrap();
        let pool = pool(2);
        let mut stats = SearchAllStats::default();
        match solver.dispatch(&pool, start, 20, &mut stats) {
            Dispatched::Exceeded(next) => assert!(next > 20 && next <= 28),
            other => panic!("unexpected {:?}", other)
        }
        assert!(stats.visits() > 0);
        match solver.dispatch(&pool, start, 28, &mut stats) {
            Dispatched::Solved(path) => {
                assert_eq!(path.len(), 28);
                assert_eq!(start.apply(&path), Some(State::goal()));
            }
            other => panic!("unexpected {:?}", other)
        }
        assert_eq!(solver.dispatch(&pool, State::goal(), 0, &mut stats), Dispatched::Solved(Vec::new()));
    }

    #[test]
    fn single_worker() {
        let solver = shared_solver();
        let start = State::from_grid(&FOURTEEN_MOVES).unwrap();
        let mut stats = SearchAllStats::default();
        match solver.dispatch(&pool(1), start, 14, &mut stats) {
            Dispatched::Solved(path) => assert_eq!(start.apply(&path), Some(State::goal())),
            other => panic!("unexpected {:?}", other)
        }
        assert_eq!(solver.dispatch(&pool(1), start, 12, &mut stats), Dispatched::Exceeded(14));
    }

    #[test]
    fn solve_with_parallel_method() {
        let solver = SlidingPuzzleSolver::new(SolverConf::default()
            .with_method(SearchMethod::Parallel).with_workers(3).with_pattern_tiles(vec![vec![1, 2, 3], vec![4, 5, 6]])).unwrap();
        let solution = solver.solve(&FOURTEEN_MOVES).unwrap();
        assert_eq!(solution.len(), 14);
        assert!(replay_on_grid(&FOURTEEN_MOVES, &solution).is_some());
    }

    #[test]
    fn interrupted() {
        let start = State::from_grid(&TWENTY_EIGHT_MOVES).unwrap();
        assert_eq!(shared_solver().parallel_stats(start, &mut Limited::with_limit(1)), Err(SolveError::Interrupted));
    }

    #[test]
    fn unsolvable() {
        let odd: State = [0, 1, 2, 3, 4, 7, 6, 5, 8, 9, 10, 11, 12, 13, 14, 15].iter().cloned().collect();
        assert_eq!(shared_solver().parallel(odd), Err(SolveError::UnsolvablePuzzle));
        assert_eq!(shared_solver().parallel_stats(odd, &mut SearchAllStats::default()), Err(SolveError::UnsolvablePuzzle));
    }
}
