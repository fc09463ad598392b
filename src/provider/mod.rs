//! Data source adapter: polls the file endpoint and derives display views.

pub mod client;
pub mod records;

pub use client::{FileProvider, HttpProvider};
pub use records::{Record, RecordSet, labels, total_size};
