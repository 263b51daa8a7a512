//! Immune cell population analysis library.
//!
//! Computes derived statistics over per-sample immune cell count data:
//! relative population frequencies, a responder vs non-responder comparison
//! per population (Welch's t-test), and baseline cohort summaries.
//!
//! # Overview
//!
//! The library is organized into small modules:
//!
//! - **data**: Sample metadata, long-form count rows, and the CSV-backed store
//! - **freq**: Relative frequency computation
//! - **cohort**: Cohort selection predicates
//! - **compare**: Responder vs non-responder comparison
//! - **baseline**: Baseline cohort aggregation
//! - **stats**: Two-sample statistics (Welch's t-test)
//!
//! Each computation reads a complete snapshot of the input rows and returns
//! a fresh result; there is no caching or shared state between calls.
//!
//! # Example
//!
//! ```no_run
//! use immunopop::prelude::*;
//!
//! // Load data
//! let store = CellCountStore::from_csv("cell-count.csv").unwrap();
//!
//! // Run the three analyses
//! let frequencies = compute_relative_frequencies(store.count_rows()).unwrap();
//! let comparison = compare_responders(store.samples(), store.count_rows()).unwrap();
//! let baseline = baseline_summary(store.samples(), store.count_rows(), "b_cell", "M", "yes");
//!
//! println!("{} significant populations", comparison.significant().len());
//! println!("{}", baseline);
//! ```

pub mod baseline;
pub mod cohort;
pub mod compare;
pub mod data;
pub mod error;
pub mod freq;
pub mod stats;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::baseline::{baseline_summary, BaselineSummary, UNKNOWN_LABEL};
    pub use crate::cohort::{filter_cohort, CohortPredicate};
    pub use crate::compare::{
        compare_responders, ComparisonRow, ComparisonTable, SIGNIFICANCE_LEVEL,
    };
    pub use crate::data::{CellCountStore, CountRow, Sample, POPULATIONS};
    pub use crate::error::{ImmunoError, Result};
    pub use crate::freq::{compute_relative_frequencies, FrequencyTable, RelativeFrequencyRow};
    pub use crate::stats::{mean, sample_variance, welch_t_test, WelchTest};
}
