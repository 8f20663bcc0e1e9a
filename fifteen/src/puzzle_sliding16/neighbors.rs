use crate::puzzle_sliding16::utils::{BOARD_SIZE, COLS, ROWS, DENIED};
use arrayvec::ArrayVec;
use std::fmt;

/// Direction in which the blank moves (the slid tile moves the opposite way).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Move {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3
}

impl Move {
    /// All moves, in the order they are tried during search.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Returns the move that undoes `self`.
    #[inline(always)] pub const fn opposite(self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left
        }
    }

    #[inline(always)] pub const fn index(self) -> usize { self as usize }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right"
        })
    }
}

/// Stores indices of neighbors (or DENIED in the case of no neighbor) and is indexed by (in order): index of the cell and the move of the blank.
pub type Neighbors = [[u8; 4]; BOARD_SIZE];

/// Returns index of cell with given (c, r) coordinates.
#[inline(always)] pub const fn cell_nr(c: u8, r: u8) -> u8 { r * COLS + c }

/// Constructs neighbors matrix for the 4x4 board.
pub const fn construct_neighbors() -> Neighbors {
    let mut neighbors = [[DENIED; 4]; BOARD_SIZE];
    let mut r = 0;
    while r < ROWS {
        let mut c = 0;
        while c < COLS {
            let cell = cell_nr(c, r) as usize;
            if r != 0 { neighbors[cell][Move::Up.index()] = cell_nr(c, r-1); }
            if r+1 != ROWS { neighbors[cell][Move::Down.index()] = cell_nr(c, r+1); }
            if c != 0 { neighbors[cell][Move::Left.index()] = cell_nr(c-1, r); }
            if c+1 != COLS { neighbors[cell][Move::Right.index()] = cell_nr(c+1, r); }
            c += 1;
        }
        r += 1;
    }
    neighbors
}

/// Neighbors of all cells of the 4x4 board.
pub const NEIGHBORS: Neighbors = construct_neighbors();

/// Returns the cell the blank reaches from `cell` with `mv`, if it stays on the board.
#[inline(always)] pub fn target_cell(cell: u8, mv: Move) -> Option<u8> {
    let target = NEIGHBORS[cell as usize][mv.index()];
    (target != DENIED).then_some(target)
}

/// Returns neighbors (cell numbers) of the given `cell` together with the moves leading to them.
pub fn neighbors_of(cell: u8) -> ArrayVec::<(u8, Move), 4> {
    let mut result = ArrayVec::<(u8, Move), 4>::new();
    for mv in Move::ALL {
        if let Some(neighbor_pos) = target_cell(cell, mv) {
            result.push((neighbor_pos, mv));
        }
    }
    result
}
