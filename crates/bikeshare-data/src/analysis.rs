//! Top-level query pipeline: load, filter, aggregate.
//!
//! Every query is an isolated run: a fresh load from disk, fresh
//! aggregation, nothing cached between runs.

use std::time::Instant;

use bikeshare_core::error::Result;
use bikeshare_core::models::{FilterParams, FilteredDataset};
use bikeshare_core::registry::CityRegistry;
use tracing::info;

use crate::aggregator::{
    compute_duration_stats, compute_station_stats, compute_time_stats, compute_user_stats,
    DurationReport, StationReport, TimeReport, UserReport,
};
use crate::reader;

// ── Public types ──────────────────────────────────────────────────────────────

/// Bookkeeping produced alongside the reports.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    /// Rows read from the CSV before filtering.
    pub rows_loaded: usize,
    /// Rows remaining after the month/day filters.
    pub rows_filtered: usize,
    /// Wall-clock seconds spent loading and filtering.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent running the four aggregators.
    pub aggregate_time_seconds: f64,
}

/// The four statistics reports for one query.
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    pub time: TimeReport,
    pub stations: StationReport,
    pub durations: DurationReport,
    pub users: UserReport,
    pub metadata: AnalysisMetadata,
}

/// Everything a caller needs from one query: the reports plus the filtered
/// dataset itself for raw-row pagination.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub dataset: FilteredDataset,
    pub report: ExplorationReport,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline for one query.
///
/// 1. Resolve the city and load its dataset.
/// 2. Apply the month/day filters.
/// 3. Run the four aggregators over the filtered dataset.
///
/// Loader errors and [`ExploreError::EmptyDataset`] propagate to the caller;
/// no partial report is ever produced.
///
/// [`ExploreError::EmptyDataset`]: bikeshare_core::error::ExploreError::EmptyDataset
pub fn explore(registry: &CityRegistry, params: &FilterParams) -> Result<Exploration> {
    let load_start = Instant::now();
    let path = registry.resolve(&params.city)?;
    let (mut records, schema) = reader::load_dataset(&path)?;
    let rows_loaded = records.len();
    reader::apply_filters(&mut records, params);
    let dataset = FilteredDataset { records, schema };
    let load_time_seconds = load_start.elapsed().as_secs_f64();

    let aggregate_start = Instant::now();
    let time = compute_time_stats(&dataset, params)?;
    let stations = compute_station_stats(&dataset)?;
    let durations = compute_duration_stats(&dataset)?;
    let users = compute_user_stats(&dataset)?;
    let aggregate_time_seconds = aggregate_start.elapsed().as_secs_f64();

    info!(
        "{}: {} of {} records analyzed in {:.3}s",
        params.city,
        dataset.len(),
        rows_loaded,
        load_time_seconds + aggregate_time_seconds,
    );

    let metadata = AnalysisMetadata {
        rows_loaded,
        rows_filtered: dataset.len(),
        load_time_seconds,
        aggregate_time_seconds,
    };

    Ok(Exploration {
        report: ExplorationReport {
            time,
            stations,
            durations,
            users,
            metadata,
        },
        dataset,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
