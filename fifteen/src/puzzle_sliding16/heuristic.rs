use crate::pattern_db::{PatternDB, PatternDBManager, UseHashMap};
use crate::puzzle_sliding16::utils::{BOARD_SIZE, COLS, ROWS, col_row};
use crate::puzzle_sliding16::neighbors::cell_nr;
use crate::puzzle_sliding16::state::State;
use arrayvec::ArrayVec;

/// Admissible estimation of the number of moves needed to reach some fixed target state.
pub trait Estimator {
    /// Returns the lower bound of the number of moves from `state` to the target. It is `0` only for the target.
    fn estimate(&self, state: State) -> u8;
}

/// Distances between all pair of cells.
pub type CellMetric = [[u8; BOARD_SIZE]; BOARD_SIZE];

/// Returns Manhattan metric for the 4x4 board.
pub fn manhattan_metric() -> CellMetric {
    let mut cell_distances = [[0u8; BOARD_SIZE]; BOARD_SIZE];
    for first_r in 0..ROWS {
        for first_c in 0..COLS {
            let first_cell = cell_nr(first_c, first_r) as usize;
            for second_r in 0..ROWS {
                let row_dist = first_r.abs_diff(second_r);
                for second_c in first_c..COLS {
                    let second_cell = cell_nr(second_c, second_r) as usize;
                    let distance = row_dist + second_c - first_c;
                    cell_distances[first_cell][second_cell] = distance;
                    cell_distances[second_cell][first_cell] = distance;
                }
            }
        }
    }
    cell_distances
}

/// Returns the number of tiles that must leave their line to put the rest (given by their target
/// coordinates along the line, in the current order) in the right order.
/// That is the length of the sequence minus its longest increasing subsequence.
fn tiles_out_of_order(targets: &[u8]) -> u8 {
    let mut longest = [1u8; COLS as usize];
    for i in 0..targets.len() {
        for j in 0..i {
            if targets[j] < targets[i] && longest[j] + 1 > longest[i] { longest[i] = longest[j] + 1; }
        }
    }
    targets.len() as u8 - longest[..targets.len()].iter().copied().max().unwrap_or(0)
}

/// Manhattan distance with linear conflicts, towards an arbitrary target state.
#[derive(Clone)]
pub struct TileMetric {
    /// Indexed by tile number and cell, gives the Manhattan distance between the cell and the target cell of the tile.
    distance: CellMetric,
    /// Target cell of each tile.
    target_of: [u8; BOARD_SIZE]
}

impl TileMetric {
    /// Constructs metric that measures distance to `target`.
    pub fn towards(target: State) -> Self {
        let metric = manhattan_metric();
        let mut target_of = [0u8; BOARD_SIZE];
        for (cell, tile) in target.iter().enumerate() { target_of[tile as usize] = cell as u8; }
        let mut distance = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        for tile in 1..BOARD_SIZE {
            distance[tile] = metric[target_of[tile] as usize];
        }
        Self { distance, target_of }
    }

    /// Constructs metric that measures distance to the goal state.
    #[inline] pub fn goal() -> Self { Self::towards(State::goal()) }

    /// Returns the sum of Manhattan distances of all tiles (except blank) to their target cells.
    pub fn manhattan(&self, state: State) -> u8 {
        state.iter().enumerate().map(|(i, t)| self.distance[t as usize][i]).sum()
    }

    /// Returns the extra moves caused by linear conflicts.
    ///
    /// Tiles that are in their target row (column), but in a wrong order, must leave the row (column)
    /// to let the others pass. Each tile that leaves needs 2 moves not counted by Manhattan distance.
    pub fn linear_conflict(&self, state: State) -> u8 {
        let tiles: ArrayVec<u8, BOARD_SIZE> = state.iter().collect();
        let mut result = 0;
        for line in 0..ROWS {
            let mut in_row = ArrayVec::<u8, {COLS as usize}>::new();
            let mut in_col = ArrayVec::<u8, {ROWS as usize}>::new();
            for along in 0..COLS {
                let tile = tiles[cell_nr(along, line) as usize];
                if tile != 0 {
                    let (target_c, target_r) = col_row(self.target_of[tile as usize]);
                    if target_r == line { in_row.push(target_c); }
                }
                let tile = tiles[cell_nr(line, along) as usize];
                if tile != 0 {
                    let (target_c, target_r) = col_row(self.target_of[tile as usize]);
                    if target_c == line { in_col.push(target_r); }
                }
            }
            result += 2 * (tiles_out_of_order(&in_row) + tiles_out_of_order(&in_col));
        }
        result
    }

    /// Returns Manhattan distance increased by linear conflicts.
    #[inline] pub fn value(&self, state: State) -> u8 {
        self.manhattan(state) + self.linear_conflict(state)
    }
}

impl Estimator for TileMetric {
    #[inline(always)] fn estimate(&self, state: State) -> u8 { self.value(state) }
}

/// Admissible estimation of the number of moves to the goal:
/// maximum of Manhattan distance with linear conflicts and values from pattern databases.
pub struct Heuristic<PDBM: PatternDBManager = UseHashMap> {
    pub metric: TileMetric,
    pub pattern_dbs: Vec<PatternDB<PDBM>>
}

impl<PDBM: PatternDBManager> Heuristic<PDBM> {
    /// Builds one pattern database for each group of `pattern_tiles`.
    pub fn new<G: IntoIterator<Item=u8>>(pattern_tiles: impl IntoIterator<Item=G>, pdbm: PDBM) -> Self where PDBM: Clone {
        Self {
            metric: TileMetric::goal(),
            pattern_dbs: pattern_tiles.into_iter().map(|tiles| PatternDB::build(tiles, pdbm.clone())).collect()
        }
    }

    /// Returns the maximum of values for `state` from all pattern databases.
    #[inline] pub fn pattern_value(&self, state: State) -> u8 {
        self.pattern_dbs.iter().map(|db| db.lookup(state)).max().unwrap_or(0)
    }
}

impl<PDBM: PatternDBManager> Estimator for Heuristic<PDBM> {
    /// Returns the estimated number of moves needed to solve `state`. Never overestimates.
    #[inline] fn estimate(&self, state: State) -> u8 {
        self.metric.value(state).max(self.pattern_value(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_sliding16::neighbors::Move;
    use crate::test_utils::{shared_solver, distances_from_goal};

    fn state(tiles: [u8; 16]) -> State { tiles.iter().cloned().collect() }

    #[test]
    fn test_manhattan_metric() {
        let metric = manhattan_metric();
        assert_eq!(metric[0][0], 0);
        assert_eq!(metric[0][1], 1);    assert_eq!(metric[1][0], 1);
        assert_eq!(metric[0][5], 2);    assert_eq!(metric[5][0], 2);
        assert_eq!(metric[0][15], 6);   assert_eq!(metric[15][0], 6);
        assert_eq!(metric[3][12], 6);
        assert_eq!(metric[6][9], 2);
        assert_eq!(metric[7][7], 0);
    }

    #[test]
    fn test_manhattan() {
        let goal = TileMetric::goal();
        assert_eq!(goal.manhattan(State::goal()), 0);
        // tiles 1 and 4 swapped with blank in turn
        assert_eq!(goal.manhattan(state([4, 1, 2, 3, 0, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])), 1);
        assert_eq!(goal.manhattan(state([15, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 0])), 6);
    }

    #[test]
    fn test_linear_conflict() {
        let goal = TileMetric::goal();
        assert_eq!(goal.linear_conflict(State::goal()), 0);
        // 1 and 2 reversed in their row
        assert_eq!(goal.linear_conflict(state([0, 2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])), 2);
        // 4 and 8 reversed in their column
        assert_eq!(goal.linear_conflict(state([0, 1, 2, 3, 8, 5, 6, 7, 4, 9, 10, 11, 12, 13, 14, 15])), 2);
        // 5, 6, 7 fully reversed: only two of them must leave the row
        assert_eq!(goal.linear_conflict(state([0, 1, 2, 3, 4, 7, 6, 5, 8, 9, 10, 11, 12, 13, 14, 15])), 4);
        // 13, 14, 15 and 12 rotated: only 12 must leave
        assert_eq!(goal.linear_conflict(state([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 14, 15, 12])), 2);
    }

    /// Number of pairs of tiles in their target line whose order is inverted.
    fn inverted_pairs(targets: &[u8]) -> u8 {
        let mut result = 0;
        for i in 0..targets.len() {
            for j in i+1..targets.len() {
                if targets[i] > targets[j] { result += 1; }
            }
        }
        result
    }

    #[test]
    fn test_linear_conflict_counts_leaving_tiles_not_pairs() {
        let goal = TileMetric::goal();
        // 4, 5, 6, 7 fully reversed: 6 inverted pairs, but 3 tiles leaving the row suffice
        let reversed = state([0, 1, 2, 3, 7, 6, 5, 4, 8, 9, 10, 11, 12, 13, 14, 15]);
        assert!(reversed.is_solvable());
        assert_eq!(inverted_pairs(&[3, 2, 1, 0]), 6);
        assert_eq!(goal.manhattan(reversed), 8);
        assert_eq!(goal.linear_conflict(reversed), 6);
        assert_eq!(goal.value(reversed), 14);
        // 5, 6, 7 fully reversed: 3 inverted pairs, 2 tiles leaving
        assert_eq!(inverted_pairs(&[3, 2, 1]), 3);
        assert_eq!(goal.linear_conflict(state([0, 1, 2, 3, 4, 7, 6, 5, 8, 9, 10, 11, 12, 13, 14, 15])), 4);
        // for a single inverted pair both counts agree
        assert_eq!(inverted_pairs(&[1, 0]), 1);
        assert_eq!(goal.linear_conflict(state([0, 2, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15])), 2);
        assert_eq!(shared_solver().ida_star(reversed).map(|s| s.len()), Ok(26));
    }

    #[test]
    fn test_tiles_out_of_order() {
        assert_eq!(tiles_out_of_order(&[]), 0);
        assert_eq!(tiles_out_of_order(&[2]), 0);
        assert_eq!(tiles_out_of_order(&[0, 1, 2, 3]), 0);
        assert_eq!(tiles_out_of_order(&[3, 2, 1, 0]), 3);
        assert_eq!(tiles_out_of_order(&[1, 3, 0, 2]), 2);
    }

    #[test]
    fn test_towards_other_target() {
        let target = State::goal().apply(&[Move::Right, Move::Down, Move::Down]).unwrap();
        let metric = TileMetric::towards(target);
        assert_eq!(metric.value(target), 0);
        assert_eq!(metric.manhattan(State::goal()), 3);
        assert!(metric.value(State::goal()) <= 3);
    }

    #[test]
    fn test_estimate() {
        let heuristic = &shared_solver().heuristic;
        assert_eq!(heuristic.estimate(State::goal()), 0);
        assert_eq!(heuristic.pattern_dbs.len(), 3);
        let s = state([4, 8, 7, 2, 5, 1, 9, 3, 10, 14, 0, 11, 12, 13, 15, 6]);
        assert_eq!(heuristic.metric.value(s), 20);
        assert_eq!(heuristic.estimate(s), 20);
        assert_eq!(heuristic.estimate(s), heuristic.estimate(s));
        for (s, _) in State::goal().neighbors(None) {
            assert_eq!(heuristic.estimate(s), 1);
        }
    }

    #[test]
    fn test_admissible() {
        let heuristic = &shared_solver().heuristic;
        for (state, distance) in distances_from_goal(12) {
            assert!(heuristic.metric.value(state) <= distance, "{:?}: {} > {}", state, heuristic.metric.value(state), distance);
            for db in heuristic.pattern_dbs.iter() {
                assert!(db.lookup(state) <= distance);
            }
            assert_eq!(heuristic.estimate(state) % 2, distance % 2);
        }
    }
}
