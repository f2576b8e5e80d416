//! Wall-clock timing of one traversal pass.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::grid::Grid;
use crate::traverse::{column_major_sum, row_major_sum};

/// One timed traversal and the sum it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub elapsed: Duration,
    pub sum: u64,
}

impl Timing {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Runs `f` once between two clock reads.
pub fn time<F: FnOnce() -> u64>(f: F) -> Timing {
    let start = Instant::now();
    let sum = f();
    let elapsed = start.elapsed();
    Timing { elapsed, sum }
}

/// Row-major and column-major timings over the same grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub row: Timing,
    pub column: Timing,
}

impl Comparison {
    /// Times row-major first, then column-major.
    pub fn measure<G: Grid + ?Sized>(grid: &G) -> Self {
        let row = time(|| row_major_sum(grid));
        let column = time(|| column_major_sum(grid));
        let comparison = Self { row, column };

        debug!(
            dims = %grid.dims(),
            row_ms = comparison.row_ms(),
            column_ms = comparison.column_ms(),
            "traversals timed"
        );
        if !comparison.sums_agree() {
            warn!(
                row_sum = row.sum,
                column_sum = column.sum,
                "traversal sums differ"
            );
        }
        comparison
    }

    pub fn row_ms(&self) -> f64 {
        self.row.millis()
    }

    pub fn column_ms(&self) -> f64 {
        self.column.millis()
    }

    /// Column time minus row time; negative when column-major won.
    pub fn difference_ms(&self) -> f64 {
        self.column_ms() - self.row_ms()
    }

    /// How many times slower column-major was. `None` if the row pass
    /// finished below clock resolution.
    pub fn speedup(&self) -> Option<f64> {
        if self.row.elapsed.is_zero() {
            return None;
        }
        Some(self.column_ms() / self.row_ms())
    }

    pub fn sums_agree(&self) -> bool {
        self.row.sum == self.column.sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::testing::dims;
    use crate::grid::HeapGrid;
    use crate::traverse::expected_sum;

    fn timing(micros: u64, sum: u64) -> Timing {
        Timing {
            elapsed: Duration::from_micros(micros),
            sum,
        }
    }

    #[test]
    fn time_returns_closure_result() {
        let t = time(|| 42);
        assert_eq!(t.sum, 42);
    }

    #[test]
    fn derived_values() {
        let cmp = Comparison {
            row: timing(2_000, 7),
            column: timing(5_000, 7),
        };
        assert!((cmp.row_ms() - 2.0).abs() < 1e-9);
        assert!((cmp.column_ms() - 5.0).abs() < 1e-9);
        assert!((cmp.difference_ms() - 3.0).abs() < 1e-9);
        assert!((cmp.speedup().unwrap() - 2.5).abs() < 1e-9);
        assert!(cmp.sums_agree());
    }

    #[test]
    fn difference_can_be_negative() {
        let cmp = Comparison {
            row: timing(4_000, 1),
            column: timing(1_000, 2),
        };
        assert!(cmp.difference_ms() < 0.0);
        assert!(!cmp.sums_agree());
    }

    #[test]
    fn zero_row_time_has_no_speedup() {
        let cmp = Comparison {
            row: timing(0, 0),
            column: timing(10, 0),
        };
        assert_eq!(cmp.speedup(), None);
    }

    #[test]
    fn measure_runs_both_orders() {
        let d = dims(64, 48);
        let grid = HeapGrid::new(d).unwrap();
        let cmp = Comparison::measure(&grid);
        assert_eq!(cmp.row.sum, expected_sum(d));
        assert_eq!(cmp.column.sum, expected_sum(d));
    }
}
