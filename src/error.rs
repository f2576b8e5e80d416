//! Error types for argument validation and grid allocation.

use thiserror::Error;

/// Everything that can stop a run before a table is printed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Neither `--row_size` nor `--col_size` was given.
    #[error("please write --row_size parameter.")]
    MissingSize,

    /// A size flag was zero or negative.
    #[error("Row and column values must be greater than 0 ({flag} was {value}).")]
    NonPositiveSize { flag: &'static str, value: i64 },

    /// Alignment boundary is not a power of two or is below `i32` alignment.
    #[error("Invalid alignment: {0} (must be a power of two and at least 4)")]
    InvalidAlignment(usize),

    /// Offset for the unaligned strategy would leave cells aligned.
    #[error("Invalid unaligned offset: {offset} (must not be a multiple of 4 and must be below {cache_line})")]
    InvalidOffset { offset: usize, cache_line: usize },

    /// Largest cell value `i + j` does not fit in `i32`.
    #[error("A {rows} x {cols} grid holds values beyond i32::MAX.")]
    CellRange { rows: usize, cols: usize },

    /// The allocator refused the request.
    #[error("Allocation failed: could not reserve {bytes} bytes")]
    Allocation { bytes: usize },

    /// The grid's byte size does not fit in the address space.
    #[error("Allocation failed: a {rows} x {cols} grid does not fit in the address space")]
    SizeOverflow { rows: usize, cols: usize },
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Allocation { .. } | Error::SizeOverflow { .. } => 2,
            _ => 1,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
