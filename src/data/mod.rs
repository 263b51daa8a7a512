//! Data structures for immune population analysis.

mod sample;
mod store;

pub use sample::{CountRow, Sample};
pub use store::{CellCountStore, POPULATIONS};
