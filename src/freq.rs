//! Relative frequency computation for per-sample population counts.
//!
//! Converts raw counts into per-sample totals and per-(sample, population)
//! relative frequencies in percent. This is the normalization every
//! downstream comparison is built on.

use crate::data::CountRow;
use crate::error::{ImmunoError, Result};
use crate::stats::round_dp;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One sample–population pair with its relative frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeFrequencyRow {
    /// Sample label.
    pub sample: String,
    /// Total cell count across all populations of the sample.
    pub total_count: u64,
    /// Population the count belongs to.
    pub population: String,
    /// Raw count for this population.
    pub count: u64,
    /// Relative frequency in percent, rounded to 2 decimals.
    pub percentage: f64,
}

/// Relative frequency table, one row per (sample, population) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyTable {
    /// Rows in canonical (sample, population) order.
    pub rows: Vec<RelativeFrequencyRow>,
}

impl FrequencyTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &RelativeFrequencyRow> {
        self.rows.iter()
    }

    /// Total count for a sample, if the sample appears in the table.
    pub fn total_count(&self, sample: &str) -> Option<u64> {
        self.rows
            .iter()
            .find(|r| r.sample == sample)
            .map(|r| r.total_count)
    }

    /// Write the table to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "sample\ttotal_count\tpopulation\tcount\tpercentage")?;
        for r in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{:.2}",
                r.sample, r.total_count, r.population, r.count, r.percentage
            )?;
        }

        Ok(())
    }
}

/// Compute per-sample totals and relative frequencies from count rows.
///
/// Groups rows by sample, sums counts into a per-sample total, and derives
/// percentage = count / total × 100 rounded to 2 decimals. Output is sorted
/// by (sample, population, count), so the result is invariant to input row
/// order.
///
/// # Errors
/// Returns [`ImmunoError::ZeroTotalCount`] if any sample's total is zero;
/// a zero denominator never silently produces NaN rows.
pub fn compute_relative_frequencies(counts: &[CountRow]) -> Result<FrequencyTable> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for row in counts {
        *totals.entry(row.sample.as_str()).or_insert(0) += row.count;
    }

    for (sample, &total) in &totals {
        if total == 0 {
            return Err(ImmunoError::ZeroTotalCount {
                sample: (*sample).to_string(),
            });
        }
    }

    let mut rows: Vec<RelativeFrequencyRow> = counts
        .par_iter()
        .map(|row| {
            let total = totals[row.sample.as_str()];
            RelativeFrequencyRow {
                sample: row.sample.clone(),
                total_count: total,
                population: row.population.clone(),
                count: row.count,
                percentage: round_dp(row.count as f64 / total as f64 * 100.0, 2),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.sample.as_str(), a.population.as_str(), a.count)
            .cmp(&(b.sample.as_str(), b.population.as_str(), b.count))
    });

    Ok(FrequencyTable { rows })
}
