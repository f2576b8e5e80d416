use std::mem::MaybeUninit;
use std::panic;
use std::slice;
use std::thread;

use thiserror::Error;
use tracing::debug;

use super::{fill_row_major, Dims, Grid, CELL_BYTES};

/// Largest grid, in cells, that is ever built on a stack (256 MiB of `i32`).
pub const STACK_CAPACITY: usize = 1 << 26;

/// Frame sizes in cells. A grid is built in the smallest frame that holds it.
const FRAME_TIERS: [usize; 5] = [1 << 16, 1 << 20, 1 << 22, 1 << 24, STACK_CAPACITY];

/// Stack left over for the traversal and timing calls on top of the frame.
const FRAME_HEADROOM: usize = 1 << 20;

/// Why a stack grid could not be built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackUnavailable {
    #[error("> {capacity} cells")]
    TooLarge { capacity: usize },

    #[error("thread spawn failed: {0}")]
    Spawn(String),
}

/// Grid borrowed from a fixed-size array in a stack frame.
pub struct StackGrid<'a> {
    dims: Dims,
    cells: &'a [i32],
}

impl<'a> StackGrid<'a> {
    /// Whether `dims` fits in [`STACK_CAPACITY`].
    pub fn fits(dims: Dims) -> bool {
        dims.cells().map_or(false, |cells| cells <= STACK_CAPACITY)
    }

    pub fn as_slice(&self) -> &[i32] {
        self.cells
    }

    /// Address of cell (0, 0).
    pub fn base_addr(&self) -> usize {
        self.cells.as_ptr() as usize
    }
}

impl Grid for StackGrid<'_> {
    fn dims(&self) -> Dims {
        self.dims
    }

    #[inline(always)]
    fn get(&self, row: usize, col: usize) -> i32 {
        assert!(col < self.dims.cols(), "column {col} out of bounds");
        self.cells[row * self.dims.cols() + col]
    }
}

/// Builds the grid in a stack frame and hands it to `f`.
///
/// The frame lives on a single helper thread whose stack is sized to the
/// grid, so grids far beyond the main thread's stack can still be measured.
/// `f` runs on that thread; the caller blocks until it returns. A panic in
/// `f` is resumed on the calling thread.
pub fn with_stack_grid<R: Send>(
    dims: Dims,
    f: impl FnOnce(&StackGrid<'_>) -> R + Send,
) -> Result<R, StackUnavailable> {
    let too_large = || StackUnavailable::TooLarge {
        capacity: STACK_CAPACITY,
    };
    let cells = dims.cells().map_err(|_| too_large())?;
    match FRAME_TIERS.iter().position(|tier| cells <= *tier) {
        Some(0) => spawn_frame::<{ FRAME_TIERS[0] }, R>(dims, f),
        Some(1) => spawn_frame::<{ FRAME_TIERS[1] }, R>(dims, f),
        Some(2) => spawn_frame::<{ FRAME_TIERS[2] }, R>(dims, f),
        Some(3) => spawn_frame::<{ FRAME_TIERS[3] }, R>(dims, f),
        Some(_) => spawn_frame::<{ FRAME_TIERS[4] }, R>(dims, f),
        None => Err(too_large()),
    }
}

fn spawn_frame<const N: usize, R: Send>(
    dims: Dims,
    f: impl FnOnce(&StackGrid<'_>) -> R + Send,
) -> Result<R, StackUnavailable> {
    // room for an unoptimised move of the array plus the call chain above it
    let stack_size = 2 * N * CELL_BYTES + FRAME_HEADROOM;

    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("stack-grid".into())
            .stack_size(stack_size)
            .spawn_scoped(scope, move || fill_frame::<N, R>(dims, f))
            .map_err(|e| StackUnavailable::Spawn(e.to_string()))?;

        match handle.join() {
            Ok(out) => Ok(out),
            Err(payload) => panic::resume_unwind(payload),
        }
    })
}

/// `dims` must hold at most `N` cells.
#[inline(never)]
fn fill_frame<const N: usize, R>(dims: Dims, f: impl FnOnce(&StackGrid<'_>) -> R) -> R {
    let len = dims.rows() * dims.cols();
    assert!(len <= N, "{len} cells do not fit a {N}-cell frame");

    let mut storage = MaybeUninit::<[i32; N]>::uninit();
    let base = storage.as_mut_ptr().cast::<i32>();
    fill_row_major(dims, |index, value| {
        // Safety: index < len <= N
        unsafe { base.add(index).write(value) }
    });
    // Safety: the first len cells were written above and storage outlives the slice
    let cells = unsafe { slice::from_raw_parts(base.cast_const(), len) };

    let grid = StackGrid { dims, cells };
    debug!(%dims, frame_cells = N, addr = ?cells.as_ptr(), "stack grid built");
    f(&grid)
}
