use std::mem::align_of;
use std::ptr;

use tracing::debug;

use super::aligned::{check_boundary, Block};
use super::{fill_row_major, Dims, Grid, CELL_BYTES};
use crate::error::{Error, Result};

/// Validates the byte shift applied to the unaligned grid.
pub fn check_offset(offset: usize, cache_line: usize) -> Result<usize> {
    if offset % align_of::<i32>() != 0 && offset < cache_line {
        Ok(offset)
    } else {
        Err(Error::InvalidOffset { offset, cache_line })
    }
}

/// Grid whose cells start `offset` bytes past a cache-line boundary, so no
/// cell is naturally aligned and some straddle two lines.
pub struct UnalignedGrid {
    dims: Dims,
    len: usize,
    offset: usize,
    block: Block,
}

impl UnalignedGrid {
    pub fn new(dims: Dims, cache_line: usize, offset: usize) -> Result<Self> {
        let cache_line = check_boundary(cache_line)?;
        let offset = check_offset(offset, cache_line)?;
        let len = dims.cells()?;
        let bytes = dims.bytes()?;
        dims.check_values()?;
        let total = bytes
            .checked_add(offset)
            .ok_or(Error::Allocation { bytes })?;

        let block = Block::alloc(total, cache_line)?;
        // Safety: offset < total, so the shifted pointer stays inside the block
        let first = unsafe { block.as_ptr().add(offset) };
        fill_row_major(dims, |index, value| {
            // Safety: offset + (index + 1) * CELL_BYTES <= total
            unsafe { ptr::write_unaligned(first.add(index * CELL_BYTES).cast::<i32>(), value) }
        });

        debug!(%dims, bytes, cache_line, offset, addr = ?first, "unaligned grid allocated");
        Ok(Self {
            dims,
            len,
            offset,
            block,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Address of cell (0, 0).
    pub fn first_cell_addr(&self) -> usize {
        self.block.as_ptr() as usize + self.offset
    }
}

impl Grid for UnalignedGrid {
    fn dims(&self) -> Dims {
        self.dims
    }

    #[inline(always)]
    fn get(&self, row: usize, col: usize) -> i32 {
        assert!(col < self.dims.cols(), "column {col} out of bounds");
        let index = row * self.dims.cols() + col;
        assert!(index < self.len, "row {row} out of bounds");
        // Safety: index is in bounds and every cell was written in new()
        unsafe {
            let cell = self.block.as_ptr().add(self.offset + index * CELL_BYTES);
            ptr::read_unaligned(cell.cast::<i32>())
        }
    }
}
