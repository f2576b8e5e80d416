//! The two traversal orders.
//!
//! Both touch exactly the same cells. Row-major walks memory sequentially;
//! column-major jumps `cols * 4` bytes per step, which stops reusing the
//! loaded cache line as soon as a row is wider than one line.

use std::hint::black_box;

use crate::grid::{Dims, Grid};

/// Sums every cell, rows in the outer loop.
#[inline(never)]
pub fn row_major_sum<G: Grid + ?Sized>(grid: &G) -> u64 {
    let grid = black_box(grid);
    let dims = grid.dims();
    let mut sum = 0u64;
    for row in 0..dims.rows() {
        for col in 0..dims.cols() {
            sum = sum.wrapping_add(grid.get(row, col) as u64);
        }
    }
    black_box(sum)
}

/// Sums every cell, columns in the outer loop.
#[inline(never)]
pub fn column_major_sum<G: Grid + ?Sized>(grid: &G) -> u64 {
    let grid = black_box(grid);
    let dims = grid.dims();
    let mut sum = 0u64;
    for col in 0..dims.cols() {
        for row in 0..dims.rows() {
            sum = sum.wrapping_add(grid.get(row, col) as u64);
        }
    }
    black_box(sum)
}

/// Closed form of the sum of `i + j` over a `rows x cols` grid, mod 2^64.
pub fn expected_sum(dims: Dims) -> u64 {
    let rows = dims.rows() as u64;
    let cols = dims.cols() as u64;
    cols.wrapping_mul(triangle(rows))
        .wrapping_add(rows.wrapping_mul(triangle(cols)))
}

/// `0 + 1 + ... + (n - 1)` without overflowing the intermediate product.
fn triangle(n: u64) -> u64 {
    if n % 2 == 0 {
        (n / 2).wrapping_mul(n.wrapping_sub(1))
    } else {
        n.wrapping_mul((n - 1) / 2)
    }
}
