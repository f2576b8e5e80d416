//! Alignment probe: the same row/column comparison repeated over each
//! storage strategy.

use std::fmt;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::grid::{with_stack_grid, AlignedGrid, Dims, HeapGrid, UnalignedGrid};
use crate::timing::Comparison;

/// Where the grid lives for one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `Vec` with the allocator's default alignment.
    Heap,
    /// Heap block aligned to the given boundary.
    Aligned(usize),
    /// Fixed-size array in a stack frame.
    Stack,
    /// Heap block aligned to `boundary`, cells shifted by `offset` bytes.
    Unaligned { boundary: usize, offset: usize },
}

impl Strategy {
    /// Probe order used for the alignment table.
    pub fn all(config: &Config) -> [Strategy; 4] {
        [
            Strategy::Heap,
            Strategy::Aligned(config.cache_line),
            Strategy::Stack,
            Strategy::Unaligned {
                boundary: config.cache_line,
                offset: config.unaligned_offset,
            },
        ]
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Heap => f.write_str("Heap"),
            Strategy::Aligned(boundary) => write!(f, "Aligned {boundary}B"),
            Strategy::Stack => f.write_str("Stack"),
            Strategy::Unaligned { offset, .. } => write!(f, "Unaligned +{offset}B"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Measured(Comparison),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRow {
    pub strategy: Strategy,
    pub outcome: ProbeOutcome,
}

/// Builds the grid for `strategy`, times both orders, and drops the grid.
pub fn run_strategy(dims: Dims, strategy: Strategy) -> Result<ProbeOutcome> {
    let outcome = match strategy {
        Strategy::Heap => ProbeOutcome::Measured(Comparison::measure(&HeapGrid::new(dims)?)),
        Strategy::Aligned(boundary) => {
            ProbeOutcome::Measured(Comparison::measure(&AlignedGrid::new(dims, boundary)?))
        }
        Strategy::Stack => match with_stack_grid(dims, |grid| Comparison::measure(grid)) {
            Ok(comparison) => ProbeOutcome::Measured(comparison),
            Err(reason) => {
                info!(%dims, %reason, "stack grid unavailable, skipping");
                ProbeOutcome::Skipped(reason.to_string())
            }
        },
        Strategy::Unaligned { boundary, offset } => ProbeOutcome::Measured(Comparison::measure(
            &UnalignedGrid::new(dims, boundary, offset)?,
        )),
    };
    Ok(outcome)
}

/// Runs every strategy in [`Strategy::all`] order.
pub fn run_probe(config: &Config) -> Result<Vec<ProbeRow>> {
    info!(dims = %config.dims, cache_line = config.cache_line, "starting alignment probe");
    Strategy::all(config)
        .into_iter()
        .map(|strategy| {
            let outcome = run_strategy(config.dims, strategy)?;
            Ok(ProbeRow { strategy, outcome })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::grid::testing::dims;
    use crate::traverse::expected_sum;

    fn config(rows: usize, cols: usize) -> Config {
        Config {
            dims: dims(rows, cols),
            cache_line: 64,
            unaligned_offset: 1,
            probe_alignment: true,
        }
    }

    #[test]
    fn labels() {
        assert_eq!(Strategy::Heap.to_string(), "Heap");
        assert_eq!(Strategy::Aligned(64).to_string(), "Aligned 64B");
        assert_eq!(Strategy::Stack.to_string(), "Stack");
        assert_eq!(
            Strategy::Unaligned { boundary: 64, offset: 1 }.to_string(),
            "Unaligned +1B"
        );
    }

    #[test]
    fn probe_measures_every_strategy_for_small_grids() {
        let config = config(40, 30);
        let rows = run_probe(&config).unwrap();
        let strategies: Vec<_> = rows.iter().map(|r| r.strategy).collect();
        assert_eq!(strategies, Strategy::all(&config).to_vec());

        for row in rows {
            match row.outcome {
                ProbeOutcome::Measured(cmp) => {
                    assert_eq!(cmp.row.sum, expected_sum(config.dims), "{}", row.strategy);
                    assert!(cmp.sums_agree());
                }
                ProbeOutcome::Skipped(reason) => panic!("{} skipped: {reason}", row.strategy),
            }
        }
    }

    #[test]
    fn stack_is_measured_beyond_the_main_thread_frame() {
        // 4 MiB of cells, well past what fits next to the test harness frames
        let d = dims(1024, 1024);
        match run_strategy(d, Strategy::Stack).unwrap() {
            ProbeOutcome::Measured(cmp) => {
                assert_eq!(cmp.row.sum, expected_sum(d));
                assert!(cmp.sums_agree());
            }
            ProbeOutcome::Skipped(reason) => panic!("stack skipped: {reason}"),
        }
    }

    #[test]
    fn stack_is_skipped_past_capacity() {
        let outcome = run_strategy(dims(1 << 14, 1 << 13), Strategy::Stack).unwrap();
        assert_eq!(
            outcome,
            ProbeOutcome::Skipped(format!("> {} cells", crate::grid::STACK_CAPACITY))
        );
    }

    #[test]
    fn allocation_failure_propagates() {
        let huge = Dims::new(1 << 30, 1 << 30).unwrap();
        assert!(matches!(
            run_strategy(huge, Strategy::Heap),
            Err(Error::Allocation { .. })
        ));
        assert!(matches!(
            run_strategy(huge, Strategy::Aligned(64)),
            Err(Error::Allocation { .. })
        ));
    }
}
