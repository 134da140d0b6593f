use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{Result, SolverError};

const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Returns true if a queen at `(row, col)` would not be attacked by any queen
/// in `cells`. Out-of-range squares are never safe.
pub fn is_safe_in(cells: &[Vec<bool>], row: usize, col: usize) -> bool {
    let n = cells.len();
    if row >= n || col >= n {
        return false;
    }
    if cells[row].iter().any(|&q| q) {
        return false;
    }
    if cells.iter().any(|r| r[col]) {
        return false;
    }
    !DIAGONALS
        .iter()
        .any(|&(dr, dc)| diagonal_attack(cells, row, col, dr, dc))
}

fn diagonal_attack(cells: &[Vec<bool>], row: usize, col: usize, dr: isize, dc: isize) -> bool {
    let n = cells.len() as isize;
    let (mut i, mut j) = (row as isize + dr, col as isize + dc);
    while i >= 0 && i < n && j >= 0 && j < n {
        if cells[i as usize][j as usize] {
            return true;
        }
        i += dr;
        j += dc;
    }
    false
}

struct Grid {
    size: usize,
    cells: Vec<Vec<bool>>,
    solution_found: bool,
}

impl Grid {
    fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![false; size]; size],
            solution_found: false,
        }
    }

    fn in_range(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }
}

/// The shared N×N board.
///
/// Occupancy and the solution-found flag live behind one mutex. The solution
/// counter is a separate atomic so polling it never contends with the solver's
/// geometry queries.
pub struct Board {
    grid: Mutex<Grid>,
    solution_count: AtomicUsize,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            grid: Mutex::new(Grid::empty(8)),
            solution_count: AtomicUsize::new(0),
        }
    }
}

impl Board {
    pub fn new(size: usize) -> Result<Self> {
        let board = Self::default();
        board.reset(size)?;
        Ok(board)
    }

    fn lock(&self) -> MutexGuard<'_, Grid> {
        self.grid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the board to an empty `size`×`size` grid and zeroes the count.
    pub fn reset(&self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(SolverError::InvalidSize);
        }
        *self.lock() = Grid::empty(size);
        self.solution_count.store(0, Ordering::SeqCst);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.lock().size
    }

    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        is_safe_in(&self.lock().cells, row, col)
    }

    pub fn place(&self, row: usize, col: usize) {
        self.set(row, col, true);
    }

    pub fn remove(&self, row: usize, col: usize) {
        self.set(row, col, false);
    }

    fn set(&self, row: usize, col: usize, queen: bool) {
        let mut grid = self.lock();
        if grid.solution_found || !grid.in_range(row, col) {
            return;
        }
        grid.cells[row][col] = queen;
    }

    pub fn mark_solution_found(&self) {
        self.lock().solution_found = true;
    }

    pub fn clear_solution_found(&self) {
        self.lock().solution_found = false;
    }

    pub fn is_solution_found(&self) -> bool {
        self.lock().solution_found
    }

    pub fn snapshot(&self) -> Snapshot {
        let grid = self.lock();
        Snapshot {
            size: grid.size,
            cells: grid.cells.clone(),
        }
    }

    /// Returns the new count.
    pub fn increment_solution_count(&self) -> usize {
        self.solution_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn solution_count(&self) -> usize {
        self.solution_count.load(Ordering::SeqCst)
    }

    pub fn queen_row_in_column(&self, col: usize) -> Option<usize> {
        let grid = self.lock();
        if col >= grid.size {
            return None;
        }
        grid.cells.iter().position(|r| r[col])
    }
}

/// An owned copy of the board, safe to hand to another thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    size: usize,
    cells: Vec<Vec<bool>>,
}

impl Snapshot {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![false; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_queen(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row][col]
    }

    /// True if some queen other than one standing on `(row, col)` attacks it.
    pub fn is_attacked(&self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        let mut cells = self.cells.clone();
        cells[row][col] = false;
        !is_safe_in(&cells, row, col)
    }

    /// Queens as `(row, col)` pairs in row-major order.
    pub fn queens(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &q)| q)
                .map(move |(c, _)| (r, c))
        })
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------------------------------")?;
        write!(f, "   ")?;
        for c in 0..self.size {
            write!(f, " {} ", c + 1)?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, " {} ", r + 1)?;
            for &q in row {
                write!(f, "|{}|", if q { 'Q' } else { ' ' })?;
            }
            writeln!(f)?;
        }
        writeln!(f, "------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_clears_everything() {
        let board = Board::new(4).unwrap();
        board.place(1, 2);
        board.increment_solution_count();
        board.mark_solution_found();

        board.reset(5).unwrap();
        assert_eq!(board.size(), 5);
        assert_eq!(board.snapshot(), Snapshot::empty(5));
        assert_eq!(board.solution_count(), 0);
        assert!(!board.is_solution_found());
    }

    #[test]
    fn reset_rejects_zero() {
        let board = Board::new(4).unwrap();
        board.place(0, 0);
        assert_eq!(board.reset(0), Err(SolverError::InvalidSize));
        assert!(board.snapshot().has_queen(0, 0));
        assert!(Board::new(0).is_err());
    }

    #[test]
    fn safety_covers_row_column_and_diagonals() {
        let board = Board::new(5).unwrap();
        board.place(2, 2);
        for i in 0..5 {
            assert!(!board.is_safe(2, i));
            assert!(!board.is_safe(i, 2));
        }
        assert!(!board.is_safe(0, 0));
        assert!(!board.is_safe(4, 4));
        assert!(!board.is_safe(0, 4));
        assert!(!board.is_safe(4, 0));
        assert!(!board.is_safe(1, 3));
        assert!(board.is_safe(0, 1));
        assert!(board.is_safe(3, 0));
        assert!(board.is_safe(4, 3));
    }

    #[test]
    fn out_of_range_is_unsafe_and_ignored() {
        let board = Board::new(3).unwrap();
        assert!(!board.is_safe(3, 0));
        assert!(!board.is_safe(0, 3));
        board.place(3, 3);
        board.remove(7, 0);
        assert_eq!(board.snapshot(), Snapshot::empty(3));
        assert_eq!(board.queen_row_in_column(9), None);
    }

    #[test]
    fn place_and_remove_are_idempotent() {
        let board = Board::new(4).unwrap();
        board.place(1, 1);
        let once = board.snapshot();
        board.place(1, 1);
        assert_eq!(board.snapshot(), once);

        board.remove(1, 1);
        board.remove(1, 1);
        assert_eq!(board.snapshot(), Snapshot::empty(4));
    }

    #[test]
    fn solution_flag_freezes_mutation_until_cleared() {
        let board = Board::new(4).unwrap();
        board.place(0, 0);
        board.mark_solution_found();
        board.remove(0, 0);
        board.place(3, 3);
        assert!(board.snapshot().has_queen(0, 0));
        assert!(!board.snapshot().has_queen(3, 3));

        board.clear_solution_found();
        board.remove(0, 0);
        assert!(!board.snapshot().has_queen(0, 0));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let board = Board::new(4).unwrap();
        let before = board.snapshot();
        board.place(2, 1);
        assert!(!before.has_queen(2, 1));
        assert_eq!(board.queen_row_in_column(1), Some(2));
        assert_eq!(board.queen_row_in_column(0), None);
    }

    #[test]
    fn snapshot_threats_skip_the_queen_itself() {
        let board = Board::new(4).unwrap();
        board.place(1, 0);
        let snap = board.snapshot();
        assert!(!snap.is_attacked(1, 0));
        assert!(snap.is_attacked(1, 3));
        assert!(snap.is_attacked(0, 1));
        assert!(!snap.is_attacked(3, 1));
        assert_eq!(snap.queens().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn display_draws_queens() {
        let board = Board::new(2).unwrap();
        board.place(1, 0);
        let text = board.snapshot().to_string();
        assert!(text.contains("    1  2 \n"));
        assert!(text.contains(" 1 | || |\n"));
        assert!(text.contains(" 2 |Q|| |\n"));
    }
}
