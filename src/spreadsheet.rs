// src/spreadsheet.rs
//! CSV spreadsheet import (shape B). The sheet carries ten columns:
//! company, posting age, job id, country, location, publish date,
//! salary max, salary min, salary type, title. Salary synthesis happens in
//! the normalizer, not here.

use crate::normalize::SheetRow;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

const EXPECTED_CELLS: usize = 10;

/// Read spreadsheet rows from a CSV export. The header row is skipped; rows
/// with fewer than ten cells are logged and dropped.
pub fn read_jobs(path: &Path) -> Result<Vec<SheetRow>> {
    // Flexible: short rows are handled here, not rejected by the reader.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is row 1, data starts at row 2.
        let row_number = idx + 2;
        let record = record.with_context(|| format!("Failed to read row {}", row_number))?;

        if record.len() < EXPECTED_CELLS {
            warn!(
                "Row {} has {} cells, expected {}, skipping",
                row_number,
                record.len(),
                EXPECTED_CELLS
            );
            continue;
        }

        rows.push(SheetRow {
            company: record[0].to_string(),
            posting_age: record[1].to_string(),
            job_id: record[2].to_string(),
            country: record[3].to_string(),
            location: record[4].to_string(),
            publish_date: record[5].to_string(),
            salary_max: record[6].to_string(),
            salary_min: record[7].to_string(),
            salary_type: record[8].to_string(),
            title: record[9].to_string(),
        });
    }

    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
