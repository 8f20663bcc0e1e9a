use std::collections::HashMap;
use std::time::Instant;
use csf::{fp, GetSize};
use csf::fp::{CollisionSolverBuilder, LoMemAcceptEquals};
use ph::{BuildSeededHasher, BuildDefaultSeededHasher};
use log::info;
use crate::puzzle_sliding16::pattern::{PatternManipulator, build_pattern_db};
use crate::puzzle_sliding16::state::State;

/// Representation of pattern -> distance to goal map, which can be compressed.
pub trait PatternDBManager {

    type PatternDB;

    /// Get from `db` and returns heuristic value for given `pattern` or `0` if `pattern` is not in `db`.
    /// Heuristic value is equal to or lower than `pattern`'s distance to goal.
    fn heuristic_value(db: &Self::PatternDB, pattern: u32) -> u8;

    /// Constructs (compressed) representation of database with given distances to goal (`data`).
    /// i-th vector in `data` contains all patterns with distance to goal equal i
    fn construct(self, data: Vec::<Vec::<u32>>) -> Self::PatternDB;

    /// Returns the size of `db` in bytes.
    fn size_bytes(db: &Self::PatternDB) -> usize;

    /// Returns `true` if `construct` produces the database which are lossless for positions given as argument.
    fn is_lossless(&self) -> bool { true }
}

/// Fake `PatternDBManager` implementation that discards all data and always returns `0` as heuristic value.
impl PatternDBManager for () {
    type PatternDB = ();
    #[inline(always)] fn heuristic_value(_db: &Self::PatternDB, _pattern: u32) -> u8 { 0 }
    #[inline(always)] fn construct(self, _data: Vec<Vec<u32>>) -> Self::PatternDB { () }
    #[inline(always)] fn size_bytes(_db: &Self::PatternDB) -> usize { 0 }
}

#[derive(Default, Copy, Clone)]
pub struct UseHashMap;

impl PatternDBManager for UseHashMap {
    type PatternDB = HashMap<u32, u8>;

    #[inline(always)] fn heuristic_value(db: &Self::PatternDB, pattern: u32) -> u8 {
        *db.get(&pattern).unwrap_or(&0)
    }

    fn construct(self, data: Vec<Vec<u32>>) -> Self::PatternDB {
        let mut result = HashMap::with_capacity(data.iter().map(|v|v.len()).sum());
        for (distance, positions) in data.into_iter().enumerate() {
            result.extend(positions.into_iter().map(|p| (p, distance as u8)));
        }
        result
    }

    fn size_bytes(db: &Self::PatternDB) -> usize { 5*db.len() }
}

/// Stores the database in a compressed static function (fingerprint-based map from `csf`).
/// Lookups of patterns absent from the database give arbitrary values,
/// which is harmless as every reachable pattern is stored.
#[derive(Clone)]
pub struct UseFPMap<
    LSC = fp::OptimalLevelSize,
    CSB: CollisionSolverBuilder = LoMemAcceptEquals,
    S: BuildSeededHasher = BuildDefaultSeededHasher
> {
    pub conf: fp::MapConf<LSC, CSB, S>
}

impl Default for UseFPMap<fp::OptimalLevelSize, LoMemAcceptEquals, BuildDefaultSeededHasher> {
    fn default() -> Self {
        Self {conf: Default::default()}
    }
}

impl<LSC, CSB, S> From<fp::MapConf<LSC, CSB, S>> for UseFPMap<LSC, CSB, S>
    where CSB: CollisionSolverBuilder, S: BuildSeededHasher
{
    fn from(conf: fp::MapConf<LSC, CSB, S>) -> Self {
        Self { conf }
    }
}

impl<LSC: fp::SimpleLevelSizeChooser, CS: CollisionSolverBuilder, S: BuildSeededHasher> PatternDBManager for UseFPMap<LSC, CS, S> {
    type PatternDB = fp::Map<S>;

    #[inline(always)] fn heuristic_value(db: &Self::PatternDB, pattern: u32) -> u8 {
        db.get(&pattern).unwrap_or(0) as u8
    }

    fn construct(self, data: Vec<Vec<u32>>) -> Self::PatternDB {
        Self::PatternDB::with_map_conf(&UseHashMap.construct(data), self.conf, &mut ())
    }

    fn size_bytes(db: &Self::PatternDB) -> usize { db.size_bytes() }

    fn is_lossless(&self) -> bool { self.conf.collision_solver.is_lossless() }
}

/// Pattern database: distances to the goal of all patterns over a subset of tiles (blank always included).
pub struct PatternDB<PDBM: PatternDBManager = UseHashMap> {
    pub pattern_manipulator: PatternManipulator,
    pub db: PDBM::PatternDB,
    /// Number of patterns stored.
    pub len: usize,
    /// The largest distance to goal stored.
    pub max_distance: u8
}

impl<PDBM: PatternDBManager> PatternDB<PDBM> {
    /// Builds the database for given `important_tiles` and stores it with `pdbm`.
    pub fn build(important_tiles: impl IntoIterator<Item=u8>, pdbm: PDBM) -> Self {
        let start = Instant::now();
        let (data, pattern_manipulator) = build_pattern_db(important_tiles);
        let len = data.iter().map(|v| v.len()).sum();
        let max_distance = data.len().saturating_sub(1) as u8;
        let db = pdbm.construct(data);
        info!("pattern database for tiles {:?}: {} patterns, max distance {}, {} bytes, built in {:.2?}",
              pattern_manipulator.tiles().collect::<Vec<_>>(), len, max_distance, PDBM::size_bytes(&db), start.elapsed());
        Self { pattern_manipulator, db, len, max_distance }
    }

    /// Returns the distance to goal of the pattern of `state` (lower bound of the moves needed to solve `state`).
    #[inline] pub fn lookup(&self, state: State) -> u8 {
        PDBM::heuristic_value(&self.db, self.pattern_manipulator.pattern_for(state))
    }

    #[inline] pub fn size_bytes(&self) -> usize { PDBM::size_bytes(&self.db) }
}
