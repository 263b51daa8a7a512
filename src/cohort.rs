//! Cohort selection predicates over sample metadata.

use crate::data::Sample;
use serde::{Deserialize, Serialize};

/// Metadata predicate selecting an analysis cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortPredicate {
    /// Required disease condition.
    pub condition: String,
    /// Required sample material.
    pub sample_type: String,
    /// Required treatment.
    pub treatment: String,
    /// When set, samples must match this timepoint exactly.
    pub time_from_treatment_start: Option<i64>,
}

impl CohortPredicate {
    /// The fixed trial cohort: melanoma PBMC samples treated with miraclib.
    pub fn melanoma_pbmc_miraclib() -> Self {
        Self {
            condition: "melanoma".to_string(),
            sample_type: "PBMC".to_string(),
            treatment: "miraclib".to_string(),
            time_from_treatment_start: None,
        }
    }

    /// Restrict the predicate to baseline samples (timepoint 0).
    pub fn at_baseline(mut self) -> Self {
        self.time_from_treatment_start = Some(0);
        self
    }

    /// Check whether a sample satisfies the predicate. Samples missing a
    /// required attribute never match.
    pub fn matches(&self, sample: &Sample) -> bool {
        if sample.condition != self.condition {
            return false;
        }
        if sample.sample_type.as_deref() != Some(self.sample_type.as_str()) {
            return false;
        }
        if sample.treatment.as_deref() != Some(self.treatment.as_str()) {
            return false;
        }
        match self.time_from_treatment_start {
            Some(t) => sample.time_from_treatment_start == Some(t),
            None => true,
        }
    }
}

/// Select the samples matching a predicate.
///
/// Pure filter with no side effects; an empty result is valid and must be
/// handled by the caller, not treated as an error.
pub fn filter_cohort<'a>(samples: &'a [Sample], predicate: &CohortPredicate) -> Vec<&'a Sample> {
    samples.iter().filter(|s| predicate.matches(s)).collect()
}
