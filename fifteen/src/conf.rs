use std::fmt;
use std::str::FromStr;
use crate::error::SolveError;
use crate::puzzle_sliding16::pattern::MAX_PATTERN_LEN;
use crate::puzzle_sliding16::utils::BOARD_SIZE;

/// Search algorithm used by the solver.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchMethod {
    /// Single-threaded IDA* with transposition table.
    #[default]
    IdaStar,
    /// IDA* from both the start and the goal, meeting in the middle.
    Bidirectional,
    /// IDA* with the subtrees of the first moves searched by a thread pool.
    Parallel
}

impl FromStr for SearchMethod {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ida" | "ida*" | "idastar" => Ok(Self::IdaStar),
            "bidirectional" | "bi" => Ok(Self::Bidirectional),
            "parallel" => Ok(Self::Parallel),
            other => Err(SolveError::InvalidConfig(format!("unknown search method {:?}", other)))
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::IdaStar => "ida",
            Self::Bidirectional => "bidirectional",
            Self::Parallel => "parallel"
        })
    }
}

/// Configuration of `SlidingPuzzleSolver`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConf {
    pub method: SearchMethod,

    /// Number of threads used by `SearchMethod::Parallel`.
    pub workers: usize,

    /// Groups of tiles (in the numbering with goal `0, 1, ..., 15`) tracked by pattern databases,
    /// one database per group. The blank is tracked by every database.
    pub pattern_tiles: Vec<Vec<u8>>
}

impl Default for SolverConf {
    fn default() -> Self {
        Self {
            method: SearchMethod::default(),
            workers: 4,
            pattern_tiles: vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7], vec![8, 9, 10, 11]]
        }
    }
}

impl SolverConf {
    #[inline] pub fn with_method(mut self, method: SearchMethod) -> Self { self.method = method; self }

    #[inline] pub fn with_workers(mut self, workers: usize) -> Self { self.workers = workers; self }

    #[inline] pub fn with_pattern_tiles(mut self, pattern_tiles: Vec<Vec<u8>>) -> Self {
        self.pattern_tiles = pattern_tiles;
        self
    }

    /// Checks whether `self` can be used to construct the solver.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.workers == 0 {
            return Err(SolveError::InvalidConfig("at least one worker is needed".to_owned()));
        }
        for group in self.pattern_tiles.iter() {
            let mut seen = [false; BOARD_SIZE];
            for &tile in group {
                let seen_tile = seen.get_mut(tile as usize).ok_or_else(||
                    SolveError::InvalidConfig(format!("pattern tile {} is out of range 0..={}", tile, BOARD_SIZE-1)))?;
                if *seen_tile {
                    return Err(SolveError::InvalidConfig(format!("pattern tile {} occurs more than once in {:?}", tile, group)));
                }
                *seen_tile = true;
            }
            let tracked = group.iter().filter(|t| **t != 0).count();
            if tracked >= MAX_PATTERN_LEN {
                return Err(SolveError::InvalidConfig(format!(
                    "pattern {:?} has {} tiles, at most {} are supported", group, tracked, MAX_PATTERN_LEN-1)));
            }
        }
        Ok(())
    }
}
