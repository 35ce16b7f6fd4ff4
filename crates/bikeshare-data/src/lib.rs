//! Data ingestion and aggregation layer for the bikeshare explorer.
//!
//! Responsible for reading city CSV datasets, detecting their schema,
//! applying month/weekday filters, and computing the four descriptive
//! statistics reports.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use bikeshare_core as core;
