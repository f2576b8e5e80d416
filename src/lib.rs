//! Cache locality demonstration.
//!
//! Times a row-major and a column-major pass over the same 2D `i32` grid
//! and reports how much slower the cache-hostile order is. An optional
//! alignment probe repeats the comparison over heap, cache-line aligned,
//! stack and deliberately unaligned buffers.

pub mod config;
pub mod error;
pub mod grid;
pub mod probe;
pub mod report;
pub mod timing;
pub mod traverse;

use std::fmt;

use tracing::info;

pub use config::{Cli, Config};
pub use error::{Error, Result};
pub use grid::{Dims, Grid};
pub use timing::Comparison;

/// Everything a run measured.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub dims: Dims,
    pub cache_line: usize,
    pub access: Comparison,
    pub alignment: Option<Vec<probe::ProbeRow>>,
}

/// Allocates the grid, times both orders, then runs the alignment probe
/// when requested. The main grid is dropped before the probe allocates.
pub fn run(config: &Config) -> Result<Summary> {
    let access = {
        let grid = grid::HeapGrid::new(config.dims)?;
        Comparison::measure(&grid)
    };
    info!(
        dims = %config.dims,
        row_ms = access.row_ms(),
        column_ms = access.column_ms(),
        "access comparison done"
    );

    let alignment = if config.probe_alignment {
        Some(probe::run_probe(config)?)
    } else {
        None
    };

    Ok(Summary {
        dims: config.dims,
        cache_line: config.cache_line,
        access,
        alignment,
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            report::AccessReport {
                dims: self.dims,
                comparison: &self.access,
            }
        )?;
        if let Some(rows) = &self.alignment {
            write!(
                f,
                "\n\n{}",
                report::AlignmentReport {
                    dims: self.dims,
                    cache_line: self.cache_line,
                    rows: rows.as_slice(),
                }
            )?;
        }
        Ok(())
    }
}
