use tracing::debug;

use super::{fill_row_major, Dims, Grid};
use crate::error::{Error, Result};

/// Grid backed by a `Vec`, at whatever alignment the global allocator hands out.
pub struct HeapGrid {
    dims: Dims,
    cells: Vec<i32>,
}

impl HeapGrid {
    pub fn new(dims: Dims) -> Result<Self> {
        let len = dims.cells()?;
        let bytes = dims.bytes()?;
        dims.check_values()?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { bytes })?;
        fill_row_major(dims, |_, value| cells.push(value));

        debug!(%dims, bytes, addr = ?cells.as_ptr(), "heap grid allocated");
        Ok(Self { dims, cells })
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.cells
    }
}

impl Grid for HeapGrid {
    fn dims(&self) -> Dims {
        self.dims
    }

    #[inline(always)]
    fn get(&self, row: usize, col: usize) -> i32 {
        assert!(col < self.dims.cols(), "column {col} out of bounds");
        self.cells[row * self.dims.cols() + col]
    }
}
