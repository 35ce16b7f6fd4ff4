//! The four descriptive-statistics aggregators.
//!
//! Each aggregator reads the filtered dataset independently and produces its
//! own report; there is no shared state between them. Every "most frequent"
//! figure uses the first-occurrence tie-break from
//! [`bikeshare_core::calculations`]. Aggregating an empty dataset is an
//! error, never a silent default.

use bikeshare_core::calculations::{mode_with_count, value_counts};
use bikeshare_core::error::{ExploreError, Result};
use bikeshare_core::formatting::round2;
use bikeshare_core::models::{DayFilter, FilterParams, FilteredDataset, MonthFilter};
use chrono::Weekday;

const SECONDS_PER_DAY: f64 = 86_400.0;

// ── Time report ───────────────────────────────────────────────────────────────

/// Most frequent travel times. Each figure carries its trip count.
#[derive(Debug, Clone)]
pub struct TimeReport {
    /// Most frequent start month (1–12). `None` when the query was already
    /// filtered to a single month, in which case the figure is meaningless.
    pub popular_month: Option<(u32, u64)>,
    /// Most frequent start weekday. `None` when day-filtered.
    pub popular_day: Option<(Weekday, u64)>,
    /// Most frequent start hour (0–23). Always present.
    pub popular_hour: (u32, u64),
}

pub fn compute_time_stats(dataset: &FilteredDataset, params: &FilterParams) -> Result<TimeReport> {
    let records = &dataset.records;

    let popular_month = match params.month {
        MonthFilter::All => mode_with_count(records.iter().map(|r| r.month)),
        MonthFilter::Month(_) => None,
    };

    let popular_day = match params.day {
        DayFilter::All => mode_with_count(records.iter().map(|r| r.weekday)),
        DayFilter::Day(_) => None,
    };

    let popular_hour = mode_with_count(records.iter().map(|r| r.start_hour))
        .ok_or(ExploreError::EmptyDataset)?;

    Ok(TimeReport {
        popular_month,
        popular_day,
        popular_hour,
    })
}

// ── Station report ────────────────────────────────────────────────────────────

/// Most frequent stations and start→end trip, each with its trip count.
/// The trip pair is order-sensitive: A→B and B→A are distinct.
#[derive(Debug, Clone)]
pub struct StationReport {
    pub popular_start: (String, u64),
    pub popular_end: (String, u64),
    pub popular_trip: ((String, String), u64),
}

pub fn compute_station_stats(dataset: &FilteredDataset) -> Result<StationReport> {
    let records = &dataset.records;

    let popular_start = mode_with_count(records.iter().map(|r| r.start_station.clone()))
        .ok_or(ExploreError::EmptyDataset)?;
    let popular_end = mode_with_count(records.iter().map(|r| r.end_station.clone()))
        .ok_or(ExploreError::EmptyDataset)?;
    let popular_trip = mode_with_count(
        records
            .iter()
            .map(|r| (r.start_station.clone(), r.end_station.clone())),
    )
    .ok_or(ExploreError::EmptyDataset)?;

    Ok(StationReport {
        popular_start,
        popular_end,
        popular_trip,
    })
}

// ── Duration report ───────────────────────────────────────────────────────────

/// Trip-duration aggregates over the filtered dataset.
#[derive(Debug, Clone)]
pub struct DurationReport {
    pub total_seconds: f64,
    /// `total_seconds / 86400`, rounded to two decimal places.
    pub total_days: f64,
    pub mean_seconds: f64,
    pub trip_count: usize,
}

pub fn compute_duration_stats(dataset: &FilteredDataset) -> Result<DurationReport> {
    let records = &dataset.records;
    if records.is_empty() {
        // Mean of zero trips is undefined.
        return Err(ExploreError::EmptyDataset);
    }

    let total_seconds: f64 = records.iter().map(|r| r.duration_seconds).sum();
    let mean_seconds = total_seconds / records.len() as f64;

    Ok(DurationReport {
        total_seconds,
        total_days: round2(total_seconds / SECONDS_PER_DAY),
        mean_seconds,
        trip_count: records.len(),
    })
}

// ── User report ───────────────────────────────────────────────────────────────

/// Birth-year extremes and mode, reported as whole years.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
    pub most_common_count: u64,
}

/// Rider demographics. The optional sections are `None` when the dataset
/// does not carry the column (or carries no usable values in it); that is an
/// expected per-city property, not an error.
#[derive(Debug, Clone)]
pub struct UserReport {
    /// Counts per user type, descending. Open vocabulary; blank cells are
    /// excluded.
    pub user_types: Vec<(String, u64)>,
    pub genders: Option<Vec<(String, u64)>>,
    pub birth_years: Option<BirthYearStats>,
}

pub fn compute_user_stats(dataset: &FilteredDataset) -> Result<UserReport> {
    let records = &dataset.records;
    if records.is_empty() {
        return Err(ExploreError::EmptyDataset);
    }

    let user_types = value_counts(
        records
            .iter()
            .filter(|r| !r.user_type.is_empty())
            .map(|r| r.user_type.clone()),
    );

    // Branch on the schema flags, never on per-record probing.
    let genders = if dataset.schema.has_gender {
        let counts = value_counts(records.iter().filter_map(|r| r.gender.clone()));
        if counts.is_empty() {
            None
        } else {
            Some(counts)
        }
    } else {
        None
    };

    let birth_years = if dataset.schema.has_birth_year {
        birth_year_stats(records.iter().filter_map(|r| r.birth_year))
    } else {
        None
    };

    Ok(UserReport {
        user_types,
        genders,
        birth_years,
    })
}

fn birth_year_stats(years: impl Iterator<Item = i32>) -> Option<BirthYearStats> {
    let years: Vec<i32> = years.collect();
    let earliest = years.iter().copied().min()?;
    let latest = years.iter().copied().max()?;
    let (most_common, most_common_count) = mode_with_count(years)?;

    Some(BirthYearStats {
        earliest,
        latest,
        most_common,
        most_common_count,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
