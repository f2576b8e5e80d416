//! Text tables printed to stdout.

use std::fmt;

use crate::grid::Dims;
use crate::probe::{ProbeOutcome, ProbeRow};
use crate::timing::Comparison;

const SEPARATOR: &str = "-----------------------------------------------------------------";

fn header(f: &mut fmt::Formatter<'_>, label: &str) -> fmt::Result {
    writeln!(f, "{SEPARATOR}")?;
    writeln!(
        f,
        "{:<15}{:>9}{:>13}{:>13}{:>13}",
        label, "Row (ms)", "Column (ms)", "Speedup (x)", "Difference"
    )?;
    writeln!(f, "{SEPARATOR}")
}

fn measured_row(f: &mut fmt::Formatter<'_>, label: &str, cmp: &Comparison) -> fmt::Result {
    write!(f, "{:<15}{:>7.2}{:>12.2}", label, cmp.row_ms(), cmp.column_ms())?;
    match cmp.speedup() {
        Some(speedup) => write!(f, "{:>12.2}", speedup)?,
        None => write!(f, "{:>12}", "-")?,
    }
    writeln!(f, "{:>12.2}", cmp.difference_ms())
}

/// The row vs column comparison for one grid.
pub struct AccessReport<'a> {
    pub dims: Dims,
    pub comparison: &'a Comparison,
}

impl fmt::Display for AccessReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Array Size: {}", self.dims)?;
        header(f, "")?;
        measured_row(f, "Access Time", self.comparison)?;
        write!(f, "{SEPARATOR}")
    }
}

/// One line per storage strategy from the alignment probe.
pub struct AlignmentReport<'a> {
    pub dims: Dims,
    pub cache_line: usize,
    pub rows: &'a [ProbeRow],
}

impl fmt::Display for AlignmentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Alignment Probe: {} (cache line {} bytes)",
            self.dims, self.cache_line
        )?;
        header(f, "Allocation")?;
        for row in self.rows {
            let label = row.strategy.to_string();
            match &row.outcome {
                ProbeOutcome::Measured(cmp) => measured_row(f, &label, cmp)?,
                ProbeOutcome::Skipped(reason) => {
                    writeln!(f, "{:<15}skipped ({})", label, reason)?
                }
            }
        }
        write!(f, "{SEPARATOR}")
    }
}
