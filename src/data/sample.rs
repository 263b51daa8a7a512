//! Sample metadata and normalized count rows.

use serde::{Deserialize, Serialize};

/// Metadata for one biological sample.
///
/// Identity and project fields are always present; clinical attributes may
/// be absent, mirroring the nullability of the source schema. Samples are
/// immutable once loaded and never modified by the analysis functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Unique sample label.
    pub sample: String,
    /// Subject the sample was drawn from.
    pub subject: String,
    /// Project the sample belongs to.
    pub project: String,
    /// Disease condition (e.g. "melanoma").
    pub condition: String,
    /// Subject age at sampling.
    pub age: Option<u32>,
    /// Subject sex ("M" or "F").
    pub sex: Option<String>,
    /// Treatment the subject received.
    pub treatment: Option<String>,
    /// Treatment response: "yes", "no", or absent.
    pub response: Option<String>,
    /// Sample material (e.g. "PBMC").
    pub sample_type: Option<String>,
    /// Time from treatment start; 0 marks baseline.
    pub time_from_treatment_start: Option<i64>,
}

/// One population count for a sample, in long form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    /// Sample label the count belongs to.
    pub sample: String,
    /// Immune cell population (e.g. "b_cell").
    pub population: String,
    /// Number of cells observed.
    pub count: u64,
}
