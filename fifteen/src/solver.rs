use std::time::Instant;
use log::{debug, info};
use crate::conf::{SearchMethod, SolverConf};
use crate::error::SolveError;
use crate::pattern_db::{PatternDBManager, UseHashMap};
use crate::puzzle_sliding16::heuristic::{Estimator, Heuristic};
use crate::puzzle_sliding16::neighbors::Move;
use crate::puzzle_sliding16::state::{Grid, State};
use crate::stats::{Counted, SearchStatsCollector};
use crate::transposition::{SharedSolution, TranspositionTable};

/// Result of a depth-first search limited by a bound on the number of moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pass {
    /// The goal was reached, the path to it is left in the path vector.
    Found,
    /// The goal was not reached; the argument is the smallest cost that exceeded the bound,
    /// i.e. the bound for the next iteration.
    Exceeded(u16),
    /// The goal was not reached and nothing exceeded the bound, so no larger bound helps.
    Exhausted,
    /// The search was cancelled by statistics collector or because a solution was found elsewhere.
    Stopped
}

impl Pass {
    /// Combines the results of sibling subtrees, neither of which is `Found` or `Stopped`.
    #[inline] pub fn min(self, other: Pass) -> Pass {
        match (self, other) {
            (Pass::Exceeded(a), Pass::Exceeded(b)) => Pass::Exceeded(a.min(b)),
            (Pass::Exhausted, other) => other,
            (result, _) => result
        }
    }
}

/// Solver of the 15-puzzle that finds shortest solutions.
///
/// Pattern databases are built when the solver is constructed and then shared by all searches,
/// so a single solver should be used for many puzzles.
pub struct SlidingPuzzleSolver<PDBM: PatternDBManager = UseHashMap> {
    pub heuristic: Heuristic<PDBM>,
    pub conf: SolverConf
}

impl SlidingPuzzleSolver<UseHashMap> {
    /// Constructs the solver that stores pattern databases in hash maps.
    pub fn new(conf: SolverConf) -> Result<Self, SolveError> {
        Self::with_manager(conf, UseHashMap)
    }
}

impl<PDBM: PatternDBManager> SlidingPuzzleSolver<PDBM> {
    /// Constructs the solver that stores pattern databases with `pdbm`.
    pub fn with_manager(conf: SolverConf, pdbm: PDBM) -> Result<Self, SolveError> where PDBM: Clone {
        conf.validate()?;
        if !pdbm.is_lossless() {
            return Err(SolveError::InvalidConfig("pattern database storage must be lossless to keep the heuristic admissible".to_owned()));
        }
        let start = Instant::now();
        let heuristic = Heuristic::new(conf.pattern_tiles.iter().map(|g| g.iter().copied()), pdbm);
        info!("solver ready in {:.2?}: {} pattern databases, {} bytes", start.elapsed(),
              heuristic.pattern_dbs.len(), heuristic.pattern_dbs.iter().map(|db| db.size_bytes()).sum::<usize>());
        Ok(Self { heuristic, conf })
    }

    /// Implementation of DFS with limited depth that is a part of IDA*.
    ///
    /// # Arguments
    /// * `state` - position to evaluate, reached with `g` moves,
    /// * `bound` - limit to the number of moves from the initial to the goal state,
    /// * `path` - moves that lead to `state`, on `Pass::Found` it is extended to the goal,
    /// * `table` - states visited in this iteration, the state reached again with no fewer moves is pruned,
    /// * `stats` - collects search statistics, can stop the search,
    /// * `stop` - the search unwinds when a solution is committed there.
    pub(crate) fn search_rec<S: SearchStatsCollector + ?Sized>(&self, state: State, g: u16, bound: u16, path: &mut Vec<Move>,
        table: &mut TranspositionTable, stats: &mut S, stop: Option<&SharedSolution>) -> Pass
    {
        if stop.map_or(false, |s| s.is_found()) { return Pass::Stopped; }
        let h = self.heuristic.estimate(state);
        let f = g + h as u16;
        if f > bound {
            if !stats.leaf() { return Pass::Stopped; }
            return Pass::Exceeded(f);
        }
        if h == 0 {
            stats.leaf();
            return Pass::Found;
        }
        let last_move = path.last().copied();
        if !table.try_record(state, g, last_move) {
            if !stats.leaf() { return Pass::Stopped; }
            return Pass::Exhausted;
        }
        stats.internal();
        let mut result = Pass::Exhausted;
        for (neighbor, mv) in state.neighbors(last_move) {
            path.push(mv);
            match self.search_rec(neighbor, g + 1, bound, path, table, stats, stop) {
                Pass::Found => return Pass::Found,
                Pass::Stopped => { path.pop(); return Pass::Stopped; }
                other => result = result.min(other)
            }
            path.pop();
        }
        result
    }

    /// Finds a shortest solution of `state` (in the goal `0, 1, ..., 15` numbering) with IDA*.
    /// Collect statistics during search. Returns `SolveError::UnsolvablePuzzle` if `state` cannot reach the goal.
    pub fn ida_star_stats(&self, state: State, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        if !state.is_solvable() { return Err(SolveError::UnsolvablePuzzle); }
        let mut bound = self.heuristic.estimate(state) as u16;
        let mut path = Vec::with_capacity(128);
        loop {
            let mut table = TranspositionTable::new();
            let mut counted = Counted::new(&mut *stats);
            let pass = self.search_rec(state, 0, bound, &mut path, &mut table, &mut counted, None);
            debug!("IDA* bound {}: {} nodes visited, {} states in table", bound, counted.counts.visits(), table.len());
            match pass {
                Pass::Found => return Ok(path),
                Pass::Exceeded(next) => bound = next,
                Pass::Exhausted => return Err(SolveError::SearchExhausted),
                Pass::Stopped => return Err(SolveError::Interrupted)
            }
        }
    }

    /// Finds a shortest solution of `state` with IDA*.
    #[inline] pub fn ida_star(&self, state: State) -> Result<Vec<Move>, SolveError> {
        self.ida_star_stats(state, &mut ())
    }
}

impl<PDBM: PatternDBManager> SlidingPuzzleSolver<PDBM> where PDBM::PatternDB: Sync {
    /// Finds a shortest solution of `state` (in the goal `0, 1, ..., 15` numbering) with the configured method.
    /// Collect statistics during search.
    pub fn solve_state_stats(&self, state: State, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        if !state.is_solvable() { return Err(SolveError::UnsolvablePuzzle); }
        if state.is_goal() { return Ok(Vec::new()); }
        match self.conf.method {
            SearchMethod::IdaStar => self.ida_star_stats(state, stats),
            SearchMethod::Bidirectional => self.bidirectional_stats(state, stats),
            SearchMethod::Parallel => self.parallel_stats(state, stats)
        }
    }

    /// Finds a shortest solution of `state` with the configured method.
    #[inline] pub fn solve_state(&self, state: State) -> Result<Vec<Move>, SolveError> {
        self.solve_state_stats(state, &mut ())
    }

    /// Returns a shortest sequence of moves of the blank that solves `grid`.
    /// Collect statistics during search.
    pub fn solve_stats(&self, grid: &Grid, stats: &mut impl SearchStatsCollector) -> Result<Vec<Move>, SolveError> {
        let start = Instant::now();
        let state = State::from_grid(grid)?;
        // moving the blank in the goal 0..15 numbering is the opposite move on the grid
        let solution: Vec<Move> = self.solve_state_stats(state, stats)?.into_iter().map(Move::opposite).collect();
        info!("solved with {} in {} moves, {:.2?}", self.conf.method, solution.len(), start.elapsed());
        Ok(solution)
    }

    /// Returns a shortest sequence of moves of the blank that solves `grid`.
    #[inline] pub fn solve(&self, grid: &Grid) -> Result<Vec<Move>, SolveError> {
        self.solve_stats(grid, &mut ())
    }
}
