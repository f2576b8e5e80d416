//! Command-line surface and the validated run configuration.

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};
use crate::grid::{check_boundary, check_offset, Dims};

/// Cache line size used when the build script could not detect one.
pub const FALLBACK_CACHE_LINE: usize = 64;

/// Cache line size detected at build time.
pub fn default_cache_line() -> usize {
    option_env!("CACHE_STRIDE_DEFAULT_LINE")
        .and_then(|raw| raw.parse::<usize>().ok())
        .and_then(|size| check_boundary(size).ok())
        .unwrap_or(FALLBACK_CACHE_LINE)
}

#[derive(Debug, Parser)]
#[command(name = "cache-stride", version)]
#[command(
    about = "Times row-major against column-major traversal of a 2D grid",
    long_about = None
)]
pub struct Cli {
    /// Number of rows (defaults to --col_size)
    #[arg(long = "row_size", value_name = "INT", allow_negative_numbers = true)]
    pub row_size: Option<i64>,

    /// Number of columns (defaults to --row_size)
    #[arg(long = "col_size", value_name = "INT", allow_negative_numbers = true)]
    pub col_size: Option<i64>,

    /// Repeat the comparison over heap, aligned, stack and unaligned buffers
    #[arg(long)]
    pub alignment: bool,

    /// Alignment boundary in bytes [default: detected cache line size]
    #[arg(long = "cache-line", value_name = "BYTES")]
    pub cache_line: Option<usize>,

    /// Byte shift used by the unaligned buffer
    #[arg(long = "unaligned-offset", value_name = "BYTES", default_value_t = 1)]
    pub unaligned_offset: usize,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: LevelFilter,
}

/// Validated parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dims: Dims,
    pub cache_line: usize,
    pub unaligned_offset: usize,
    pub probe_alignment: bool,
}

impl Config {
    /// Applies size defaulting and validation. Sizes are checked first, so a
    /// bad size is always reported before anything else. Nothing is allocated.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let rows = cli.row_size.map(|v| positive("--row_size", v)).transpose()?;
        let cols = cli.col_size.map(|v| positive("--col_size", v)).transpose()?;
        let dims = match (rows, cols) {
            (Some(rows), Some(cols)) => Dims::new(rows, cols),
            (Some(side), None) | (None, Some(side)) => Dims::new(side, side),
            (None, None) => None,
        }
        .ok_or(Error::MissingSize)?;
        dims.bytes()?;
        dims.check_values()?;

        let cache_line = check_boundary(cli.cache_line.unwrap_or_else(default_cache_line))?;
        let unaligned_offset = check_offset(cli.unaligned_offset, cache_line)?;

        Ok(Self {
            dims,
            cache_line,
            unaligned_offset,
            probe_alignment: cli.alignment,
        })
    }
}

fn positive(flag: &'static str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(Error::NonPositiveSize { flag, value });
    }
    usize::try_from(value).map_err(|_| Error::Allocation {
        bytes: usize::MAX,
    })
}
