//! Trade export ingestion.
//!
//! Reads a trade export CSV and extracts one outcome per closed trade.
//! Prefers an `r_multiple` column and falls back to `close_profit`. Rows
//! flagged open (`is_open` != 0) and rows with an empty outcome cell are
//! skipped here, by this collaborator; the counts are reported so the
//! caller can see what was dropped. Everything that parses is handed to
//! the core, which rejects non-finite values instead of filtering them.

use std::path::Path;

use anyhow::{bail, Context, Result};

/// Outcomes extracted from a trade export, plus ingestion bookkeeping.
#[derive(Debug, Clone)]
pub struct LoadedTrades {
    pub outcomes: Vec<f64>,
    /// Column the outcomes came from: `r_multiple` or `close_profit`.
    pub column: String,
    pub skipped_open: usize,
    pub skipped_empty: usize,
}

/// Load trade outcomes from a CSV export.
pub fn load_outcomes(path: &Path) -> Result<LoadedTrades> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening trade export {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h == name);

    let (column, value_idx) = if let Some(idx) = position("r_multiple") {
        ("r_multiple", idx)
    } else if let Some(idx) = position("close_profit") {
        ("close_profit", idx)
    } else {
        bail!(
            "{}: expected an r_multiple or close_profit column, found: {}",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    };
    let open_idx = position("is_open");

    let mut outcomes = Vec::new();
    let mut skipped_open = 0usize;
    let mut skipped_empty = 0usize;

    for (row, record) in reader.records().enumerate() {
        // +2: one for the header line, one for 1-based numbering.
        let line = row + 2;
        let record = record.with_context(|| format!("{}: line {line}", path.display()))?;

        if let Some(idx) = open_idx {
            let cell = record.get(idx).unwrap_or("").trim();
            if !cell.is_empty() && cell != "0" {
                skipped_open += 1;
                continue;
            }
        }

        let cell = record.get(value_idx).unwrap_or("").trim();
        if cell.is_empty() {
            skipped_empty += 1;
            continue;
        }

        let value: f64 = cell.parse().with_context(|| {
            format!("{}: line {line}: invalid {column} value {cell:?}", path.display())
        })?;
        outcomes.push(value);
    }

    Ok(LoadedTrades {
        outcomes,
        column: column.to_string(),
        skipped_open,
        skipped_empty,
    })
}
