//! Baseline cohort aggregation.
//!
//! Summarizes the trial cohort at baseline (timepoint 0): sample counts
//! grouped by project, response, and sex, plus the mean count of one
//! designated population restricted to one sex/response sub-group.

use crate::cohort::{filter_cohort, CohortPredicate};
use crate::data::{CountRow, Sample};
use crate::stats::mean;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Bucket label for samples with no recorded value in a grouping field.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Summary of the baseline cohort.
///
/// Count mappings are empty (not an error) when the baseline cohort is
/// empty, and the conditional mean is NaN — distinguishable from a mean
/// of zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSummary {
    /// Baseline sample count per project.
    pub samples_per_project: BTreeMap<String, usize>,
    /// Baseline sample count per response label; missing responses are
    /// counted under "unknown", never dropped.
    pub responders_vs_nonresponders: BTreeMap<String, usize>,
    /// Baseline sample count per sex label; missing sexes are counted
    /// under "unknown".
    pub sex_counts: BTreeMap<String, usize>,
    /// Population whose counts feed the conditional mean.
    pub population: String,
    /// Designated sex for the conditional mean.
    pub sex: String,
    /// Designated response for the conditional mean.
    pub response: String,
    /// Mean count of `population` over baseline samples with the designated
    /// sex and response; NaN when that sub-group is empty or has no
    /// recorded counts.
    pub mean_conditional_count: f64,
}

impl BaselineSummary {
    /// Number of samples in the baseline cohort.
    pub fn n_samples(&self) -> usize {
        self.samples_per_project.values().sum()
    }
}

impl fmt::Display for BaselineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Baseline cohort: {} samples", self.n_samples())?;
        writeln!(f, "Samples per project:")?;
        for (project, n) in &self.samples_per_project {
            writeln!(f, "  {}: {}", project, n)?;
        }
        writeln!(f, "Responders vs non-responders:")?;
        for (response, n) in &self.responders_vs_nonresponders {
            writeln!(f, "  {}: {}", response, n)?;
        }
        writeln!(f, "Sex counts:")?;
        for (sex, n) in &self.sex_counts {
            writeln!(f, "  {}: {}", sex, n)?;
        }
        write!(
            f,
            "Mean {} count ({}, response={}): ",
            self.population, self.sex, self.response
        )?;
        if self.mean_conditional_count.is_nan() {
            writeln!(f, "no data")?;
        } else {
            writeln!(f, "{:.2}", self.mean_conditional_count)?;
        }
        Ok(())
    }
}

/// Summarize baseline samples of the fixed trial cohort.
///
/// Applies the melanoma/PBMC/miraclib predicate at timepoint 0, counts the
/// cohort by project, response, and sex, then joins the designated
/// population's counts against the cohort (left join — a sample with no
/// recorded count contributes a missing value, not a zero) and averages
/// them over samples matching the designated sex and response.
pub fn baseline_summary(
    samples: &[Sample],
    counts: &[CountRow],
    population: &str,
    sex: &str,
    response: &str,
) -> BaselineSummary {
    let predicate = CohortPredicate::melanoma_pbmc_miraclib().at_baseline();
    let cohort = filter_cohort(samples, &predicate);

    let mut samples_per_project: BTreeMap<String, usize> = BTreeMap::new();
    let mut responders_vs_nonresponders: BTreeMap<String, usize> = BTreeMap::new();
    let mut sex_counts: BTreeMap<String, usize> = BTreeMap::new();
    for s in &cohort {
        *samples_per_project.entry(s.project.clone()).or_insert(0) += 1;
        let response_label = s.response.as_deref().unwrap_or(UNKNOWN_LABEL);
        *responders_vs_nonresponders
            .entry(response_label.to_string())
            .or_insert(0) += 1;
        let sex_label = s.sex.as_deref().unwrap_or(UNKNOWN_LABEL);
        *sex_counts.entry(sex_label.to_string()).or_insert(0) += 1;
    }

    let population_counts: HashMap<&str, u64> = counts
        .iter()
        .filter(|r| r.population == population)
        .map(|r| (r.sample.as_str(), r.count))
        .collect();
    let sub_group: Vec<f64> = cohort
        .iter()
        .filter(|s| s.sex.as_deref() == Some(sex) && s.response.as_deref() == Some(response))
        .filter_map(|s| population_counts.get(s.sample.as_str()).map(|&c| c as f64))
        .collect();

    BaselineSummary {
        samples_per_project,
        responders_vs_nonresponders,
        sex_counts,
        population: population.to_string(),
        sex: sex.to_string(),
        response: response.to_string(),
        mean_conditional_count: mean(&sub_group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(label: &str, project: &str, sex: Option<&str>, response: Option<&str>) -> Sample {
        Sample {
            sample: label.to_string(),
            subject: format!("sbj_{}", label),
            project: project.to_string(),
            condition: "melanoma".to_string(),
            age: Some(60),
            sex: sex.map(String::from),
            treatment: Some("miraclib".to_string()),
            response: response.map(String::from),
            sample_type: Some("PBMC".to_string()),
            time_from_treatment_start: Some(0),
        }
    }

    fn b_cells(sample: &str, count: u64) -> CountRow {
        CountRow {
            sample: sample.to_string(),
            population: "b_cell".to_string(),
            count,
        }
    }

    /// Two male responders (b_cell 100 and 200), one male non-responder,
    /// one female responder.
    fn reference_cohort() -> (Vec<Sample>, Vec<CountRow>) {
        let samples = vec![
            sample("s1", "prj1", Some("M"), Some("yes")),
            sample("s2", "prj1", Some("M"), Some("yes")),
            sample("s3", "prj2", Some("M"), Some("no")),
            sample("s4", "prj2", Some("F"), Some("yes")),
        ];
        let counts = vec![
            b_cells("s1", 100),
            b_cells("s2", 200),
            b_cells("s3", 400),
            b_cells("s4", 800),
        ];
        (samples, counts)
    }

    #[test]
    fn test_reference_summary() {
        let (samples, counts) = reference_cohort();
        let summary = baseline_summary(&samples, &counts, "b_cell", "M", "yes");

        assert_eq!(summary.n_samples(), 4);
        assert_eq!(summary.samples_per_project["prj1"], 2);
        assert_eq!(summary.samples_per_project["prj2"], 2);
        assert_eq!(summary.responders_vs_nonresponders["yes"], 3);
        assert_eq!(summary.responders_vs_nonresponders["no"], 1);
        assert_eq!(summary.sex_counts["M"], 3);
        assert_eq!(summary.sex_counts["F"], 1);
        assert_relative_eq!(summary.mean_conditional_count, 150.0);
    }

    #[test]
    fn test_non_baseline_samples_excluded() {
        let (mut samples, counts) = reference_cohort();
        samples[1].time_from_treatment_start = Some(14);

        let summary = baseline_summary(&samples, &counts, "b_cell", "M", "yes");

        assert_eq!(summary.n_samples(), 3);
        // s2 left the cohort, so only s1 feeds the conditional mean
        assert_relative_eq!(summary.mean_conditional_count, 100.0);
    }

    #[test]
    fn test_missing_labels_bucketed_as_unknown() {
        let (mut samples, counts) = reference_cohort();
        samples[2].response = None;
        samples[3].sex = None;

        let summary = baseline_summary(&samples, &counts, "b_cell", "M", "yes");

        assert_eq!(summary.responders_vs_nonresponders["yes"], 3);
        assert_eq!(summary.responders_vs_nonresponders[UNKNOWN_LABEL], 1);
        assert_eq!(summary.sex_counts["M"], 3);
        assert_eq!(summary.sex_counts[UNKNOWN_LABEL], 1);
    }

    #[test]
    fn test_missing_count_is_not_zero() {
        let (samples, mut counts) = reference_cohort();
        // s2 has no recorded b_cell row: left join yields a missing value
        counts.retain(|c| c.sample != "s2");

        let summary = baseline_summary(&samples, &counts, "b_cell", "M", "yes");

        assert_relative_eq!(summary.mean_conditional_count, 100.0);
    }

    #[test]
    fn test_empty_sub_group_mean_is_nan() {
        let (samples, counts) = reference_cohort();
        let summary = baseline_summary(&samples, &counts, "b_cell", "F", "no");

        assert!(summary.mean_conditional_count.is_nan());
        // The rest of the summary is still populated
        assert_eq!(summary.n_samples(), 4);
    }

    #[test]
    fn test_empty_cohort() {
        let (mut samples, counts) = reference_cohort();
        for s in &mut samples {
            s.time_from_treatment_start = Some(7);
        }

        let summary = baseline_summary(&samples, &counts, "b_cell", "M", "yes");

        assert!(summary.samples_per_project.is_empty());
        assert!(summary.responders_vs_nonresponders.is_empty());
        assert!(summary.sex_counts.is_empty());
        assert!(summary.mean_conditional_count.is_nan());
    }

    #[test]
    fn test_display_reports_no_data() {
        let summary = baseline_summary(&[], &[], "b_cell", "M", "yes");
        let text = summary.to_string();
        assert!(text.contains("0 samples"));
        assert!(text.contains("no data"));
    }
}
