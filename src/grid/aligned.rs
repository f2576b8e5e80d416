use std::alloc::{self, Layout};
use std::mem::align_of;
use std::ptr::NonNull;
use std::slice;

use tracing::debug;

use super::{fill_row_major, Dims, Grid};
use crate::error::{Error, Result};

/// Validates an alignment boundary for `i32` cells.
pub fn check_boundary(boundary: usize) -> Result<usize> {
    if boundary.is_power_of_two() && boundary >= align_of::<i32>() {
        Ok(boundary)
    } else {
        Err(Error::InvalidAlignment(boundary))
    }
}

/// Raw allocation freed with the layout it was made with.
pub(crate) struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Block {
    /// `size` must be non-zero.
    pub(crate) fn alloc(size: usize, align: usize) -> Result<Self> {
        debug_assert!(size > 0);
        let layout =
            Layout::from_size_align(size, align).map_err(|_| Error::Allocation { bytes: size })?;

        // Safety: layout has nonzero size
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw).ok_or(Error::Allocation { bytes: size })?;

        Ok(Self { ptr, layout })
    }

    pub(crate) fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn align(&self) -> usize {
        self.layout.align()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // Safety: ptr came from alloc::alloc with this exact layout
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

/// Grid whose first cell sits on a chosen power-of-two boundary,
/// normally the cache line size.
pub struct AlignedGrid {
    dims: Dims,
    len: usize,
    block: Block,
}

impl AlignedGrid {
    pub fn new(dims: Dims, boundary: usize) -> Result<Self> {
        let boundary = check_boundary(boundary)?;
        let len = dims.cells()?;
        let bytes = dims.bytes()?;
        dims.check_values()?;

        let block = Block::alloc(bytes, boundary)?;
        let base = block.as_ptr().cast::<i32>();
        fill_row_major(dims, |index, value| {
            // Safety: index < len and the block holds len i32s at i32 alignment
            unsafe { base.add(index).write(value) }
        });

        debug!(%dims, bytes, boundary, addr = ?base, "aligned grid allocated");
        Ok(Self { dims, len, block })
    }

    pub fn as_slice(&self) -> &[i32] {
        // Safety: every cell was written in new() and the block outlives &self
        unsafe { slice::from_raw_parts(self.block.as_ptr().cast::<i32>(), self.len) }
    }

    pub fn boundary(&self) -> usize {
        self.block.align()
    }

    pub fn base_addr(&self) -> usize {
        self.block.as_ptr() as usize
    }
}

impl Grid for AlignedGrid {
    fn dims(&self) -> Dims {
        self.dims
    }

    #[inline(always)]
    fn get(&self, row: usize, col: usize) -> i32 {
        assert!(col < self.dims.cols(), "column {col} out of bounds");
        self.as_slice()[row * self.dims.cols() + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::testing::{assert_initialized, dims};

    #[test]
    fn base_address_honours_boundary() {
        for boundary in [4, 64, 128, 4096] {
            let grid = AlignedGrid::new(dims(9, 13), boundary).unwrap();
            assert_eq!(grid.base_addr() % boundary, 0, "boundary {boundary}");
            assert_eq!(grid.boundary(), boundary);
        }
    }

    #[test]
    fn cells_hold_row_plus_col() {
        let grid = AlignedGrid::new(dims(5, 17), 64).unwrap();
        assert_eq!(grid.as_slice().len(), 85);
        assert_initialized(&grid);
    }

    #[test]
    fn rejects_bad_boundaries() {
        assert_eq!(check_boundary(48), Err(Error::InvalidAlignment(48)));
        assert_eq!(check_boundary(2), Err(Error::InvalidAlignment(2)));
        assert_eq!(check_boundary(0), Err(Error::InvalidAlignment(0)));
        assert!(matches!(
            AlignedGrid::new(dims(2, 2), 96),
            Err(Error::InvalidAlignment(96))
        ));
    }

    #[test]
    fn oversized_request_fails_without_panicking() {
        let huge = Dims::new(1 << 30, 1 << 30).unwrap();
        assert!(matches!(
            AlignedGrid::new(huge, 64),
            Err(Error::Allocation { .. })
        ));
    }
}
