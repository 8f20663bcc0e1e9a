use crate::error::SolveError;
use crate::puzzle_sliding16::neighbors::{Move, neighbors_of, target_cell};
use crate::puzzle_sliding16::utils::{BITS_PER_CELL, BITS_PER_CELL_MASK64, BOARD_SIZE, COLS, ROWS};
use arrayvec::ArrayVec;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

/// The 4x4 board in the conventional layout: rows from top to bottom,
/// solved when it reads `1, 2, ..., 15` followed by the blank (`0`) in the bottom-right corner.
pub type Grid = [[u8; COLS as usize]; ROWS as usize];

/// Board state.
///
/// Tiles are numbered so that the goal state is `0, 1, ..., 15` in row-major order
/// (blank in the top-left corner). Use [`State::from_grid`] and [`State::to_grid`]
/// to convert from and to the conventional layout (see [`from_bottom_right_format`]).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct State {
    /// Indexed by board indices, gives tiles numbers that occupy given board cell.
    pub board: u64
}

impl FromIterator<u8> for State {
    fn from_iter<T: IntoIterator<Item=u8>>(tiles: T) -> Self {
        let mut board = 0u64;
        let mut index = 0;
        for t in tiles {
            board |= (t as u64) << index;
            index += BITS_PER_CELL;
        }
        Self { board }
    }
}

/// Translate `tile` number from bottom-right format that assumes blank to be in the bottom-right corner of the goal state.
/// The translation is an involution.
#[inline] pub fn from_bottom_right_format(tile: u8, board_size: u8) -> u8 {
    if tile == 0 { 0 } else {board_size-tile}
}

/// Checks that `tiles` contains each of the numbers `0..16` exactly once.
pub fn validate_tiles(tiles: &[u8]) -> Result<(), SolveError> {
    if tiles.len() != BOARD_SIZE {
        return Err(SolveError::InvalidPuzzle(format!("expected {} tiles, got {}", BOARD_SIZE, tiles.len())));
    }
    let mut seen = [false; BOARD_SIZE];
    for &t in tiles {
        let seen_t = seen.get_mut(t as usize).ok_or_else(||
            SolveError::InvalidPuzzle(format!("tile {} is out of range 0..={}", t, BOARD_SIZE-1)))?;
        if *seen_t {
            return Err(SolveError::InvalidPuzzle(format!("tile {} occurs more than once", t)));
        }
        *seen_t = true;
    }
    match seen.iter().position(|s| !s) {
        Some(missing) => Err(SolveError::InvalidPuzzle(format!("tile {} is missing", missing))),
        None => Ok(())
    }
}

/// Returns the number of pairs of non-blank tiles that are in reversed order.
fn inversions(tiles: impl IntoIterator<Item=u8>) -> u32 {
    let tiles: ArrayVec<u8, BOARD_SIZE> = tiles.into_iter().filter(|t| *t != 0).collect();
    let mut result = 0;
    for (i, first) in tiles.iter().enumerate() {
        result += tiles[i+1..].iter().filter(|second| first > second).count() as u32;
    }
    result
}

impl State {

    /// Constructs the goal state.
    pub fn goal() -> Self {
        (0..BOARD_SIZE as u8).collect()
    }

    #[inline] pub fn is_goal(&self) -> bool {
        *self == Self::goal()
    }

    /// Swap blank with the tile that occupy new_blank_position.
    /// Returns number of this tile.
    pub fn move_blank(&mut self, current_blank_position: u8, new_blank_position: u8) -> u8 {
        let new_blank_index = new_blank_position * BITS_PER_CELL;
        let result = (self.board >> new_blank_index) & BITS_PER_CELL_MASK64;
        self.board &= !(BITS_PER_CELL_MASK64 << new_blank_index);       // clear cell which should be blank
        self.board |= result << (current_blank_position * BITS_PER_CELL);    // set old blank cell to result
        result as u8
    }

    /// Constructs `State` from data given in format that assumes blank to be in the bottom-right corner of the goal state.
    pub fn from_bottom_right_format(tiles: &[u8]) -> Self {
        let s = tiles.len() as u8;
        tiles.iter().rev().map(|t| from_bottom_right_format(*t, s)).collect()
    }

    /// Validates `grid` and converts it to `State`.
    pub fn from_grid(grid: &Grid) -> Result<Self, SolveError> {
        let tiles: ArrayVec<u8, BOARD_SIZE> = grid.iter().flatten().copied().collect();
        validate_tiles(&tiles)?;
        Ok(Self::from_bottom_right_format(&tiles))
    }

    /// Converts `self` to the conventional layout (inverse of `from_grid`).
    pub fn to_grid(&self) -> Grid {
        let mut grid = [[0; COLS as usize]; ROWS as usize];
        let mut tiles = self.iter().collect::<ArrayVec<u8, BOARD_SIZE>>().into_iter().rev();
        for cell in grid.iter_mut().flatten() {
            *cell = from_bottom_right_format(tiles.next().unwrap_or(0), BOARD_SIZE as u8);
        }
        grid
    }

    /// Returns the number of the tile at `position`.
    pub fn tile_at(&self, position: u8) -> u8 {
        ((self.board >> (position * BITS_PER_CELL)) & BITS_PER_CELL_MASK64) as u8
    }

    /// Returns the position (cell number) of the blank.
    pub fn blank_position(&self) -> u8 {
        (0..BOARD_SIZE as u8).find(|p| self.tile_at(*p) == 0).unwrap_or(0)
    }

    /// Returns the state obtained by moving blank with `mv` or `None` if the move leaves the board.
    pub fn moved(&self, mv: Move) -> Option<Self> {
        let blank = self.blank_position();
        let mut result = *self;
        result.move_blank(blank, target_cell(blank, mv)?);
        Some(result)
    }

    /// Applies all `moves` in order. Returns `None` if any of them is illegal.
    pub fn apply<'m>(&self, moves: impl IntoIterator<Item=&'m Move>) -> Option<Self> {
        moves.into_iter().try_fold(*self, |state, mv| state.moved(*mv))
    }

    /// Returns states reachable with one move, together with these moves, in the order: up, down, left, right.
    /// The move that reverses `last_move` is skipped, as going straight back is never a part of a shortest solution.
    pub fn neighbors(&self, last_move: Option<Move>) -> ArrayVec<(State, Move), 4> {
        let blank = self.blank_position();
        let mut result = ArrayVec::new();
        for (neighbor_cell, mv) in neighbors_of(blank) {
            if last_move.map_or(false, |last| last.opposite() == mv) { continue; }
            let mut neighbor = *self;
            neighbor.move_blank(blank, neighbor_cell);
            result.push((neighbor, mv));
        }
        result
    }

    /// Checks whether the goal can be reached from `self`.
    ///
    /// In the conventional layout, the state is solvable iff the blank's row counted from
    /// the bottom (starting from 1) is even and the number of inversions among
    /// non-blank tiles is odd, or the row is odd and the number of inversions is even.
    pub fn is_solvable(&self) -> bool {
        let grid = self.to_grid();
        let inversions = inversions(grid.iter().flatten().copied());
        let blank_row_from_top = grid.iter().position(|row| row.contains(&0)).unwrap_or(0) as u8;
        let blank_row_from_bottom = ROWS - blank_row_from_top;
        (blank_row_from_bottom % 2 == 0 && inversions % 2 == 1) ||
            (blank_row_from_bottom % 2 == 1 && inversions % 2 == 0)
    }

    #[inline] pub fn iter(&self) -> TilesIterator {
        TilesIterator::new(self.board)
    }
}

impl TryFrom<&[u8]> for State {
    type Error = SolveError;

    /// Validates `tiles` (given in the internal numbering, goal is `0..16`) and converts them to `State`.
    fn try_from(tiles: &[u8]) -> Result<Self, Self::Error> {
        validate_tiles(tiles)?;
        Ok(tiles.iter().copied().collect())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.iter().enumerate() {
            if t == 0 { f.write_str(" .")?; } else { write!(f, "{:2}", t)?; }
            f.write_str(if (i + 1) % COLS as usize == 0 { "\n" } else { " " })?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone)]
pub struct TilesIterator {
    rest: u64,
    seen_blank: bool
}

impl TilesIterator {
    #[inline] pub fn new(board: u64) -> Self {
        Self { rest: board, seen_blank: false }
    }
}

impl Iterator for TilesIterator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest == 0 {
            if self.seen_blank {
                None
            } else {
                self.seen_blank = true;
                Some(0)
            }
        } else {
            let result = (self.rest & BITS_PER_CELL_MASK64) as u8;
            if result == 0 { self.seen_blank = true; }
            self.rest >>= BITS_PER_CELL;
            Some(result)
        }
    }
}

impl FusedIterator for TilesIterator {}
