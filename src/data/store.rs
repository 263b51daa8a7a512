//! CSV-backed store normalizing wide cell-count rows into samples and counts.

use crate::data::{CountRow, Sample};
use crate::error::{ImmunoError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Immune cell populations recorded as count columns in the source CSV.
pub const POPULATIONS: [&str; 5] = ["b_cell", "cd8_t_cell", "cd4_t_cell", "nk_cell", "monocyte"];

/// One wide row of the source CSV: sample metadata plus one count column
/// per population. Empty fields deserialize to `None`.
#[derive(Debug, Deserialize)]
struct WideRecord {
    project: String,
    subject: String,
    condition: String,
    age: Option<u32>,
    sex: Option<String>,
    treatment: Option<String>,
    response: Option<String>,
    sample: String,
    sample_type: Option<String>,
    time_from_treatment_start: Option<f64>,
    b_cell: u64,
    cd8_t_cell: u64,
    cd4_t_cell: u64,
    nk_cell: u64,
    monocyte: u64,
}

impl WideRecord {
    fn counts(&self) -> [(&'static str, u64); 5] {
        [
            (POPULATIONS[0], self.b_cell),
            (POPULATIONS[1], self.cd8_t_cell),
            (POPULATIONS[2], self.cd4_t_cell),
            (POPULATIONS[3], self.nk_cell),
            (POPULATIONS[4], self.monocyte),
        ]
    }
}

/// In-memory store of sample metadata and long-form population counts.
///
/// The analysis functions take plain `&[Sample]` and `&[CountRow]` slices,
/// so any producer of those rows is substitutable for this store.
#[derive(Debug, Clone, Default)]
pub struct CellCountStore {
    samples: Vec<Sample>,
    counts: Vec<CountRow>,
}

impl CellCountStore {
    /// Create a store from already-normalized rows.
    pub fn new(samples: Vec<Sample>, counts: Vec<CountRow>) -> Self {
        Self { samples, counts }
    }

    /// Load a store from a wide cell-count CSV file.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_reader(csv::Reader::from_path(path)?)
    }

    /// Load a store from any reader yielding wide CSV data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv_reader(csv::Reader::from_reader(reader))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut samples = Vec::new();
        let mut counts = Vec::new();
        let mut seen = HashSet::new();

        for (row_idx, record) in reader.deserialize().enumerate() {
            let record: WideRecord = record?;
            if record.sample.is_empty() {
                return Err(ImmunoError::MissingField {
                    row: row_idx,
                    field: "sample".to_string(),
                });
            }
            if !seen.insert(record.sample.clone()) {
                return Err(ImmunoError::DuplicateSample(record.sample));
            }

            for (population, count) in record.counts() {
                counts.push(CountRow {
                    sample: record.sample.clone(),
                    population: population.to_string(),
                    count,
                });
            }

            samples.push(Sample {
                sample: record.sample,
                subject: record.subject,
                project: record.project,
                condition: record.condition,
                age: record.age,
                sex: record.sex,
                treatment: record.treatment,
                response: record.response,
                sample_type: record.sample_type,
                // fractional timepoints in the source are truncated
                time_from_treatment_start: record.time_from_treatment_start.map(|t| t as i64),
            });
        }

        Ok(Self { samples, counts })
    }

    /// Sample metadata rows.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Long-form (sample, population, count) rows.
    pub fn count_rows(&self) -> &[CountRow] {
        &self.counts
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "project,subject,condition,age,sex,treatment,response,sample,sample_type,time_from_treatment_start,b_cell,cd8_t_cell,cd4_t_cell,nk_cell,monocyte";

    fn store_from(rows: &[&str]) -> Result<CellCountStore> {
        let mut csv_data = String::from(HEADER);
        for row in rows {
            csv_data.push('\n');
            csv_data.push_str(row);
        }
        CellCountStore::from_reader(csv_data.as_bytes())
    }

    #[test]
    fn test_load_normalizes_counts() {
        let store = store_from(&[
            "prj1,sbj1,melanoma,64,M,miraclib,yes,s1,PBMC,0,100,200,300,250,150",
            "prj1,sbj2,melanoma,58,F,miraclib,no,s2,PBMC,0,50,100,150,125,75",
        ])
        .unwrap();

        assert_eq!(store.n_samples(), 2);
        assert_eq!(store.count_rows().len(), 10);

        let s1 = &store.samples()[0];
        assert_eq!(s1.sample, "s1");
        assert_eq!(s1.age, Some(64));
        assert_eq!(s1.response.as_deref(), Some("yes"));
        assert_eq!(s1.time_from_treatment_start, Some(0));

        let b_cell = store
            .count_rows()
            .iter()
            .find(|r| r.sample == "s1" && r.population == "b_cell")
            .unwrap();
        assert_eq!(b_cell.count, 100);
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let store = store_from(&[
            "prj1,sbj1,healthy,,,,,s1,PBMC,,100,200,300,250,150",
        ])
        .unwrap();

        let s1 = &store.samples()[0];
        assert_eq!(s1.age, None);
        assert_eq!(s1.sex, None);
        assert_eq!(s1.treatment, None);
        assert_eq!(s1.response, None);
        assert_eq!(s1.time_from_treatment_start, None);
    }

    #[test]
    fn test_fractional_timepoint_truncates() {
        let store = store_from(&[
            "prj1,sbj1,melanoma,64,M,miraclib,yes,s1,PBMC,7.0,100,200,300,250,150",
        ])
        .unwrap();

        assert_eq!(store.samples()[0].time_from_treatment_start, Some(7));
    }

    #[test]
    fn test_duplicate_sample_rejected() {
        let result = store_from(&[
            "prj1,sbj1,melanoma,64,M,miraclib,yes,s1,PBMC,0,100,200,300,250,150",
            "prj1,sbj2,melanoma,58,F,miraclib,no,s1,PBMC,0,50,100,150,125,75",
        ]);

        assert!(matches!(result, Err(ImmunoError::DuplicateSample(s)) if s == "s1"));
    }

    #[test]
    fn test_empty_sample_label_rejected() {
        let result = store_from(&[
            "prj1,sbj1,melanoma,64,M,miraclib,yes,,PBMC,0,100,200,300,250,150",
        ]);

        assert!(matches!(result, Err(ImmunoError::MissingField { row: 0, .. })));
    }

    #[test]
    fn test_empty_csv_is_empty_store() {
        let store = store_from(&[]).unwrap();
        assert_eq!(store.n_samples(), 0);
        assert!(store.count_rows().is_empty());
    }
}
