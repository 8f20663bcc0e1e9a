use crate::puzzle_sliding16::utils::{DENIED, BOARD_SIZE, BITS_PER_CELL, BITS_PER_CELL_MASK32};
use crate::puzzle_sliding16::state::State;
use arrayvec::ArrayVec;

/// Maximum number of tiles (blank included) that fit in a pattern encoded in `u32`.
pub const MAX_PATTERN_LEN: usize = 32 / BITS_PER_CELL as usize;

/// Manipulate patterns.
///
/// Pattern is a vector of positions of tiles important for pattern.
/// The blank is always important and it is the 0-th important tile;
/// the other important tiles are numbered from 1 (see index_of_tile_in_pattern) and these numbers
/// are indices of the pattern vector.
/// Pattern is encoded in u32 and uses BITS_PER_CELL bits per important tile to store its position.
#[derive(Clone, Copy)]
pub struct PatternManipulator {
    /// Convert: tile number (index) -> 4 * number of important tile or DENIED if the tile is not important
    index_of_tile_in_pattern: [u8; BOARD_SIZE],

    /// Number of important tiles in pattern.
    pattern_len: u8
}

impl PatternManipulator {
    /// Returns pattern manipulator and the goal pattern for given list of numbers of important tiles.
    /// The blank is added to the important tiles if it is not listed. Duplicates are ignored.
    ///
    /// Panics if there are more than `MAX_PATTERN_LEN` important tiles (blank included) or any of them is out of board.
    pub fn new(important_tiles: impl IntoIterator<Item=u8>) -> (Self, u32) {
        let mut goal_pattern = 0u32;
        let mut index_of_tile_in_pattern = [DENIED; BOARD_SIZE];
        let mut index_of_important = 0u8;
        for tile_nr in std::iter::once(0).chain(important_tiles) {
            if index_of_tile_in_pattern[tile_nr as usize] != DENIED { continue; }
            assert!((index_of_important / BITS_PER_CELL) < MAX_PATTERN_LEN as u8, "too many important tiles");
            // in the goal state, tile_nr occupies cell number tile_nr
            goal_pattern |= (tile_nr as u32) << index_of_important;
            index_of_tile_in_pattern[tile_nr as usize] = index_of_important;
            index_of_important += BITS_PER_CELL;
        }
        (Self { index_of_tile_in_pattern, pattern_len: index_of_important/BITS_PER_CELL }, goal_pattern)
    }

    /// Returns number of important tiles, including blank.
    #[inline] pub fn len(&self) -> u8 { self.pattern_len }

    /// Returns `true` if `tile_nr` is tracked by patterns.
    #[inline] pub fn is_important(&self, tile_nr: u8) -> bool {
        self.index_of_tile_in_pattern[tile_nr as usize] != DENIED
    }

    /// Returns iterator over numbers of important tiles (blank first).
    pub fn tiles(&self) -> impl Iterator<Item=u8> + '_ {
        let mut result = ArrayVec::<u8, MAX_PATTERN_LEN>::new();
        for tile_nr in 0..BOARD_SIZE as u8 {
            if self.is_important(tile_nr) { result.push(tile_nr); }
        }
        result.sort_unstable_by_key(|t| self.index_of_tile_in_pattern[*t as usize]);
        result.into_iter()
    }

    /// Returns the position (field number) of tile with given number `tile_nr` in `pattern`.
    pub fn position_of(&self, pattern: u32, tile_nr: u8) -> u8 {
        let index = self.index_of_tile_in_pattern[tile_nr as usize];
        if index == DENIED {
            DENIED
        } else {
            ((pattern >> index) & BITS_PER_CELL_MASK32) as u8
        }
    }

    /// Returns the pattern which the given `state` matches to.
    pub fn pattern_for(&self, state: State) -> u32 {
        let mut pattern = 0;
        for (position, tile_nr) in state.iter().enumerate() {
            self.init_position(&mut pattern, tile_nr, position as u8);
        }
        pattern
    }

    /// Modifies `pattern` by setting position (which must be `0` before this call) of tile with given number `tile_nr` to `new_position`.
    /// Does nothing if tile_nr is not important for pattern.
    pub fn init_position(&self, pattern: &mut u32, tile_nr: u8, new_position: u8) {
        let index = self.index_of_tile_in_pattern[tile_nr as usize];
        if index != DENIED {
            *pattern |= (new_position as u32) << index;
        }
    }

    /// Returns position of blank in given `pattern`.
    #[inline(always)]
    pub fn blank_position(pattern: u32) -> u8 {
        (pattern & BITS_PER_CELL_MASK32) as u8
    }

    /// Returns a state that matches `pattern`.
    ///
    /// Important tiles are put in their positions, the remaining cells are filled,
    /// in ascending order of positions, with unimportant tiles in ascending order.
    pub fn expand(&self, pattern: u32) -> State {
        let mut cells = [DENIED; BOARD_SIZE];
        for tile_nr in self.tiles() {
            cells[self.position_of(pattern, tile_nr) as usize] = tile_nr;
        }
        let mut fill = (0..BOARD_SIZE as u8).filter(|t| !self.is_important(*t));
        cells.iter().map(|c| if *c == DENIED { fill.next().unwrap_or(DENIED) } else { *c }).collect()
    }

    /// Returns all patterns that can be obtained from `pattern` by swapping blank with a neighbor tile.
    pub fn neighbors(&self, pattern: u32) -> ArrayVec::<u32, 4> {
        self.expand(pattern).neighbors(None).into_iter()
            .map(|(neighbor, _)| self.pattern_for(neighbor))
            .collect()
    }
}

/// Returns pattern database for given `important_tiles`.
///
/// The database is built by BFS starting from the goal pattern;
/// i-th vector of the result contains (sorted) all patterns with distance to goal equal i.
pub fn build_pattern_db(important_tiles: impl IntoIterator<Item=u8>) -> (Vec::<Vec::<u32>>, PatternManipulator) {
    let (pattern_manipulator, goal) = PatternManipulator::new(important_tiles);
    let mut pattern_db = Vec::<Vec::<u32>>::new();
    let mut current = vec![goal];
    while !current.is_empty() {
        let prev = pattern_db.last().map_or(&[][..], |v| v.as_slice());
        let mut next = Vec::new();
        for pattern in current.iter() {
            for n in pattern_manipulator.neighbors(*pattern) {
                // in BFS, neighbors of the current level are in prev, current or next level
                if prev.binary_search(&n).is_err() && current.binary_search(&n).is_err() {
                    next.push(n);
                }
            }
        }
        next.sort_unstable();
        next.dedup();
        next.shrink_to_fit();
        pattern_db.push(std::mem::replace(&mut current, next));
    }
    (pattern_db, pattern_manipulator)
}
