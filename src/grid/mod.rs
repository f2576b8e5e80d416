//! Grid storage.
//!
//! Every grid is a single contiguous row-major buffer where cell `(i, j)`
//! lives at linear index `i * cols + j` and holds `i + j`. The strategies
//! differ only in where that buffer lives and how its base address is
//! aligned, which is what the alignment probe measures.

mod aligned;
mod heap;
mod stack;
mod unaligned;

pub use aligned::{check_boundary, AlignedGrid};
pub use heap::HeapGrid;
pub use stack::{with_stack_grid, StackGrid, StackUnavailable, STACK_CAPACITY};
pub use unaligned::{check_offset, UnalignedGrid};

use std::fmt;
use std::mem::size_of;

use crate::error::{Error, Result};

/// Bytes per cell.
pub const CELL_BYTES: usize = size_of::<i32>();

/// Validated grid dimensions; both sides are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    rows: usize,
    cols: usize,
}

impl Dims {
    /// Returns `None` when either side is zero.
    pub fn new(rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells. Fails when `rows * cols` overflows `usize`.
    pub fn cells(&self) -> Result<usize> {
        self.rows.checked_mul(self.cols).ok_or_else(|| self.overflow())
    }

    /// Byte footprint of the cells, capped at `isize::MAX` like any Rust allocation.
    pub fn bytes(&self) -> Result<usize> {
        self.cells()?
            .checked_mul(CELL_BYTES)
            .filter(|bytes| *bytes <= isize::MAX as usize)
            .ok_or_else(|| self.overflow())
    }

    /// Checks that the largest cell value, `(rows - 1) + (cols - 1)`, fits in `i32`.
    pub fn check_values(&self) -> Result<()> {
        (self.rows - 1)
            .checked_add(self.cols - 1)
            .filter(|max| *max <= i32::MAX as usize)
            .map(|_| ())
            .ok_or(Error::CellRange {
                rows: self.rows,
                cols: self.cols,
            })
    }

    fn overflow(&self) -> Error {
        Error::SizeOverflow {
            rows: self.rows,
            cols: self.cols,
        }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.rows, self.cols)
    }
}

/// Read access shared by every storage strategy.
///
/// Both traversal orders go through this trait, so the only thing that
/// changes between strategies is the memory behind `get`.
pub trait Grid {
    fn dims(&self) -> Dims;

    /// Value at `(row, col)`. Panics when out of bounds.
    fn get(&self, row: usize, col: usize) -> i32;
}

/// Initial value of cell `(row, col)`. Callers check [`Dims::check_values`]
/// first, so the cast never truncates.
#[inline(always)]
pub(crate) fn cell_value(row: usize, col: usize) -> i32 {
    (row + col) as i32
}

/// Calls `write(index, value)` once per cell in row-major order.
#[inline]
pub(crate) fn fill_row_major(dims: Dims, mut write: impl FnMut(usize, i32)) {
    let mut index = 0;
    for row in 0..dims.rows {
        for col in 0..dims.cols {
            write(index, cell_value(row, col));
            index += 1;
        }
    }
}
