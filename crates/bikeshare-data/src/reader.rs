//! CSV dataset loading, schema detection and filtering.
//!
//! Reads one city dataset fully into memory, parses the timestamp columns,
//! derives the calendar attributes, and applies the requested month/weekday
//! filters. A row that cannot be parsed aborts the whole load; no partial
//! dataset is ever returned.

use std::path::Path;

use bikeshare_core::error::{ExploreError, Result};
use bikeshare_core::models::{
    DatasetSchema, DayFilter, FilterParams, FilteredDataset, MonthFilter, TripRecord,
};
use bikeshare_core::registry::CityRegistry;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

/// Textual datetime format shared by every city dataset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Columns every dataset must provide.
const REQUIRED_COLUMNS: [&str; 6] = [
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve `params.city`, load its dataset and apply the filters.
pub fn load_filtered(registry: &CityRegistry, params: &FilterParams) -> Result<FilteredDataset> {
    let path = registry.resolve(&params.city)?;
    let (mut records, schema) = load_dataset(&path)?;
    let loaded = records.len();
    apply_filters(&mut records, params);

    debug!(
        "{}: kept {} of {} records after filtering",
        params.city,
        records.len(),
        loaded
    );

    Ok(FilteredDataset { records, schema })
}

/// Read every row of the dataset at `path`.
///
/// Verifies the required columns, detects the optional `Gender` /
/// `Birth Year` columns from the header row, parses both timestamp columns
/// and derives month / weekday / start hour for each record.
pub fn load_dataset(path: &Path) -> Result<(Vec<TripRecord>, DatasetSchema)> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, 1, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, 1, e))?.clone();
    let schema = detect_schema(path, &headers)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<RawTripRow>().enumerate() {
        // Header row is line 1, so the first data row is line 2.
        let line = index as u64 + 2;
        let raw = row.map_err(|e| csv_error(path, line, e))?;
        records.push(convert_row(path, line, raw)?);
    }

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok((records, schema))
}

/// Apply the month and day filters in place. Both are stable `retain`
/// passes, so the surviving records keep their original relative order, and
/// the two filters compose with AND semantics in either order.
pub fn apply_filters(records: &mut Vec<TripRecord>, params: &FilterParams) {
    if let MonthFilter::Month(ordinal) = params.month {
        records.retain(|r| r.month == ordinal);
    }
    if let DayFilter::Day(day) = params.day {
        records.retain(|r| r.weekday == day);
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Row shape as it appears in the CSV. Optional columns deserialize to
/// `None` both when the column is absent and when a cell is blank.
#[derive(Debug, Deserialize)]
struct RawTripRow {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: String,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // The datasets store birth years as floats, e.g. "1992.0".
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Check the required columns and record which optional ones are present.
fn detect_schema(path: &Path, headers: &csv::StringRecord) -> Result<DatasetSchema> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ExploreError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    Ok(DatasetSchema {
        has_gender: headers.iter().any(|h| h == "Gender"),
        has_birth_year: headers.iter().any(|h| h == "Birth Year"),
    })
}

fn convert_row(path: &Path, line: u64, raw: RawTripRow) -> Result<TripRecord> {
    let start_time = parse_timestamp(path, line, "Start Time", &raw.start_time)?;
    let end_time = parse_timestamp(path, line, "End Time", &raw.end_time)?;

    Ok(TripRecord::new(
        start_time,
        end_time,
        raw.trip_duration,
        raw.start_station,
        raw.end_station,
        raw.user_type,
        raw.gender.filter(|g| !g.trim().is_empty()),
        raw.birth_year.map(|y| y as i32),
    ))
}

fn parse_timestamp(path: &Path, line: u64, column: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).map_err(|e| {
        ExploreError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            message: format!("invalid {column} \"{value}\": {e}"),
        }
    })
}

/// Map a `csv::Error` onto our error kinds, keeping the reported line when
/// the error carries a position.
fn csv_error(path: &Path, fallback_line: u64, err: csv::Error) -> ExploreError {
    let line = err.position().map_or(fallback_line, csv::Position::line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ExploreError::DatasetRead {
            path: path.to_path_buf(),
            source,
        },
        _ => ExploreError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const FULL_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";
    const BARE_HEADER: &str =
        ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type";

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn params(city: &str, month: MonthFilter, day: DayFilter) -> FilterParams {
        FilterParams {
            city: city.to_string(),
            month,
            day,
        }
    }

    /// A small dataset: two January trips (Sunday 2017-01-01, Monday
    /// 2017-01-02) and one February trip (Wednesday 2017-02-01).
    fn sample_rows() -> Vec<&'static str> {
        vec![
            FULL_HEADER,
            "0,2017-01-01 09:00:00,2017-01-01 09:10:00,600,A,B,Subscriber,Male,1984.0",
            "1,2017-01-02 10:00:00,2017-01-02 10:20:00,1200,B,A,Customer,Female,1992.0",
            "2,2017-02-01 11:00:00,2017-02-01 11:05:00,300,A,C,Subscriber,,",
        ]
    }

    // ── load_dataset ──────────────────────────────────────────────────────────

    #[test]
    fn test_load_dataset_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "chicago.csv", &sample_rows());

        let (records, schema) = load_dataset(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert!(schema.has_gender);
        assert!(schema.has_birth_year);

        let first = &records[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.weekday, Weekday::Sun);
        assert_eq!(first.start_hour, 9);
        assert_eq!(first.duration_seconds, 600.0);
        assert_eq!(first.gender.as_deref(), Some("Male"));
        assert_eq!(first.birth_year, Some(1984));
    }

    #[test]
    fn test_load_dataset_blank_optional_cells_are_none() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "chicago.csv", &sample_rows());

        let (records, _) = load_dataset(&path).unwrap();
        assert_eq!(records[2].gender, None);
        assert_eq!(records[2].birth_year, None);
    }

    #[test]
    fn test_load_dataset_without_optional_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "washington.csv",
            &[
                BARE_HEADER,
                "0,2017-01-01 09:00:00,2017-01-01 09:10:00,600,A,B,Subscriber",
            ],
        );

        let (records, schema) = load_dataset(&path).unwrap();
        assert!(!schema.has_gender);
        assert!(!schema.has_birth_year);
        assert_eq!(records[0].gender, None);
        assert_eq!(records[0].birth_year, None);
    }

    #[test]
    fn test_load_dataset_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "broken.csv",
            &[
                ",Start Time,End Time,Start Station,End Station,User Type",
                "0,2017-01-01 09:00:00,2017-01-01 09:10:00,A,B,Subscriber",
            ],
        );

        let err = load_dataset(&path).unwrap_err();
        match err {
            ExploreError::MissingColumn { column, .. } => assert_eq!(column, "Trip Duration"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dataset_malformed_timestamp_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "chicago.csv",
            &[
                FULL_HEADER,
                "0,2017-01-01 09:00:00,2017-01-01 09:10:00,600,A,B,Subscriber,Male,1984.0",
                "1,not-a-date,2017-01-02 10:20:00,1200,B,A,Customer,Female,1992.0",
            ],
        );

        let err = load_dataset(&path).unwrap_err();
        match err {
            ExploreError::MalformedRecord { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("Start Time"));
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_load_dataset_non_numeric_duration_aborts() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "chicago.csv",
            &[
                FULL_HEADER,
                "0,2017-01-01 09:00:00,2017-01-01 09:10:00,lots,A,B,Subscriber,Male,1984.0",
            ],
        );

        let err = load_dataset(&path).unwrap_err();
        assert!(matches!(err, ExploreError::MalformedRecord { .. }));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ExploreError::DatasetRead { .. }));
    }

    // ── load_filtered ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_filtered_no_filters_keeps_everything() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        let dataset = load_filtered(
            &registry,
            &params("chicago", MonthFilter::All, DayFilter::All),
        )
        .unwrap();
        assert_eq!(dataset.len(), 3);
    }

    #[test]
    fn test_load_filtered_by_month() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        let dataset = load_filtered(
            &registry,
            &params("chicago", MonthFilter::Month(1), DayFilter::All),
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        assert!(dataset.records.iter().all(|r| r.month == 1));
    }

    #[test]
    fn test_load_filtered_by_day() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        let dataset = load_filtered(
            &registry,
            &params("chicago", MonthFilter::All, DayFilter::Day(Weekday::Mon)),
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].weekday, Weekday::Mon);
    }

    #[test]
    fn test_load_filtered_both_filters_intersect() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        let dataset = load_filtered(
            &registry,
            &params(
                "chicago",
                MonthFilter::Month(1),
                DayFilter::Day(Weekday::Sun),
            ),
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records[0].start_station, "A");
    }

    #[test]
    fn test_filters_commute() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "chicago.csv", &sample_rows());

        let (records, _) = load_dataset(&path).unwrap();

        let mut month_first = records.clone();
        apply_filters(
            &mut month_first,
            &params("chicago", MonthFilter::Month(1), DayFilter::All),
        );
        apply_filters(
            &mut month_first,
            &params("chicago", MonthFilter::All, DayFilter::Day(Weekday::Sun)),
        );

        let mut day_first = records;
        apply_filters(
            &mut day_first,
            &params("chicago", MonthFilter::All, DayFilter::Day(Weekday::Sun)),
        );
        apply_filters(
            &mut day_first,
            &params("chicago", MonthFilter::Month(1), DayFilter::All),
        );

        assert_eq!(month_first, day_first);
    }

    #[test]
    fn test_load_filtered_preserves_original_order() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        let dataset = load_filtered(
            &registry,
            &params("chicago", MonthFilter::Month(1), DayFilter::All),
        )
        .unwrap();
        assert!(dataset.records[0].start_time < dataset.records[1].start_time);
    }

    #[test]
    fn test_load_filtered_unknown_city() {
        let dir = TempDir::new().unwrap();
        let registry = CityRegistry::builtin(dir.path());

        let err = load_filtered(
            &registry,
            &params("atlantis", MonthFilter::All, DayFilter::All),
        )
        .unwrap_err();
        assert!(matches!(err, ExploreError::UnknownCity(_)));
    }

    #[test]
    fn test_load_filtered_can_produce_empty_dataset() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "chicago.csv", &sample_rows());
        let registry = CityRegistry::builtin(dir.path());

        // No December trips in the sample data.
        let dataset = load_filtered(
            &registry,
            &params("chicago", MonthFilter::Month(12), DayFilter::All),
        )
        .unwrap();
        assert!(dataset.is_empty());
    }
}
