//! Table detection on layout-preserving text.
//!
//! `pdftotext -layout` and plain-text quotes keep columns aligned with runs of
//! spaces. A run of two or more consecutive lines that each split into at
//! least two cells on such gaps is treated as one table.

use crate::model::Table;
use regex::Regex;
use std::sync::LazyLock;

static COLUMN_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|\t").expect("column gap pattern is valid"));

/// Minimum number of consecutive cell rows that form a table.
pub const MIN_TABLE_ROWS: usize = 2;

/// Split a line into cells on gaps of two or more spaces (or tabs).
pub fn split_by_whitespace_gaps(line: &str) -> Vec<String> {
    COLUMN_GAP
        .split(line.trim())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Lines `start..end` of the input that were detected as one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub start_line: usize,
    pub end_line: usize,
}

/// Find runs of multi-cell lines. Any single-cell or blank line ends a run.
pub fn find_table_regions<S: AsRef<str>>(lines: &[S]) -> Vec<TableRegion> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        let is_row = split_by_whitespace_gaps(line.as_ref()).len() >= 2;
        match (is_row, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= MIN_TABLE_ROWS {
                    regions.push(TableRegion {
                        start_line: s,
                        end_line: i,
                    });
                }
                start = None;
            }
            _ => {}
        }
    }

    if let Some(s) = start {
        if lines.len() - s >= MIN_TABLE_ROWS {
            regions.push(TableRegion {
                start_line: s,
                end_line: lines.len(),
            });
        }
    }

    regions
}

/// Detect tables and return their cells.
pub fn detect_tables<S: AsRef<str>>(lines: &[S]) -> Vec<Table> {
    find_table_regions(lines)
        .into_iter()
        .map(|r| {
            lines[r.start_line..r.end_line]
                .iter()
                .map(|l| split_by_whitespace_gaps(l.as_ref()))
                .collect()
        })
        .collect()
}
