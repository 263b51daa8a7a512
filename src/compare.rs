//! Responder vs non-responder comparison of population frequencies.
//!
//! Restricts to the fixed trial cohort, normalizes counts to relative
//! frequencies, and tests each population's responder ("yes") group against
//! the non-responder ("no") group with Welch's t-test.

use crate::cohort::{filter_cohort, CohortPredicate};
use crate::data::{CountRow, Sample};
use crate::error::Result;
use crate::freq::compute_relative_frequencies;
use crate::stats::{mean, round_dp, welch_t_test};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Significance threshold for the comparison (alpha).
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Comparison result for a single population.
///
/// Undefined values (empty group, fewer than 2 observations per group) are
/// NaN, never zero, and force `significant` to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Population being compared.
    pub population: String,
    /// Mean relative frequency of responders, rounded to 2 decimals.
    pub mean_percentage_responders: f64,
    /// Mean relative frequency of non-responders, rounded to 2 decimals.
    pub mean_percentage_non_responders: f64,
    /// Responder mean minus non-responder mean, rounded to 2 decimals.
    pub difference: f64,
    /// Welch t-statistic, rounded to 4 decimals.
    pub t_statistic: f64,
    /// Two-sided p-value, rounded to 4 decimals.
    pub p_value: f64,
    /// Whether p_value < 0.05; false when the p-value is undefined.
    pub significant: bool,
}

/// Per-population comparison table, sorted by population label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonTable {
    /// One row per population present in the filtered cohort.
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    /// Number of populations compared.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn iter(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter()
    }

    /// Get the row for a specific population.
    pub fn get_population(&self, population: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.population == population)
    }

    /// Rows with a significant difference at alpha = 0.05.
    pub fn significant(&self) -> Vec<&ComparisonRow> {
        self.rows.iter().filter(|r| r.significant).collect()
    }

    /// Write the table to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "population\tmean_percentage_responders\tmean_percentage_non_responders\tdifference\tt_statistic\tp_value\tsignificant"
        )?;
        for r in &self.rows {
            writeln!(
                writer,
                "{}\t{:.2}\t{:.2}\t{:.2}\t{:.4}\t{:.4}\t{}",
                r.population,
                r.mean_percentage_responders,
                r.mean_percentage_non_responders,
                r.difference,
                r.t_statistic,
                r.p_value,
                r.significant
            )?;
        }

        Ok(())
    }
}

/// Compare responder vs non-responder relative frequencies per population.
///
/// Restricts to melanoma PBMC samples treated with miraclib, computes
/// relative frequencies over that cohort, and within each population splits
/// the percentages by response label. Samples whose response is neither
/// "yes" nor "no" are excluded from both groups, but every population seen
/// in the cohort gets an output row. Welch's t-test runs only when both
/// groups have at least 2 observations.
///
/// An entirely empty cohort yields an empty table, not an error.
///
/// # Errors
/// Propagates [`crate::error::ImmunoError::ZeroTotalCount`] from the
/// frequency step if a cohort sample has zero total counts.
pub fn compare_responders(samples: &[Sample], counts: &[CountRow]) -> Result<ComparisonTable> {
    let predicate = CohortPredicate::melanoma_pbmc_miraclib();
    let cohort = filter_cohort(samples, &predicate);
    let response_by_sample: HashMap<&str, Option<&str>> = cohort
        .iter()
        .map(|s| (s.sample.as_str(), s.response.as_deref()))
        .collect();

    let cohort_counts: Vec<CountRow> = counts
        .iter()
        .filter(|r| response_by_sample.contains_key(r.sample.as_str()))
        .cloned()
        .collect();
    if cohort_counts.is_empty() {
        return Ok(ComparisonTable { rows: Vec::new() });
    }

    let frequencies = compute_relative_frequencies(&cohort_counts)?;

    // Percentages per population, split into responder / non-responder
    let mut groups: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in &frequencies.rows {
        let entry = groups.entry(row.population.as_str()).or_default();
        match response_by_sample[row.sample.as_str()] {
            Some("yes") => entry.0.push(row.percentage),
            Some("no") => entry.1.push(row.percentage),
            _ => {}
        }
    }

    let rows: Vec<ComparisonRow> = groups
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(population, (responders, non_responders))| {
            let mean_responders = round_dp(mean(&responders), 2);
            let mean_non_responders = round_dp(mean(&non_responders), 2);
            let difference = round_dp(mean_responders - mean_non_responders, 2);

            let (t_statistic, p_value) = match welch_t_test(&responders, &non_responders) {
                Some(test) => (round_dp(test.statistic, 4), round_dp(test.p_value, 4)),
                None => (f64::NAN, f64::NAN),
            };
            // NaN compares false, so an undefined p-value is never significant
            let significant = p_value < SIGNIFICANCE_LEVEL;

            ComparisonRow {
                population: population.to_string(),
                mean_percentage_responders: mean_responders,
                mean_percentage_non_responders: mean_non_responders,
                difference,
                t_statistic,
                p_value,
                significant,
            }
        })
        .collect();

    Ok(ComparisonTable { rows })
}
