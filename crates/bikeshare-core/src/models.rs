use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

// ── Canonical month / weekday names ───────────────────────────────────────────

/// The twelve canonical month names, in calendar order. Index + 1 is the
/// month ordinal used everywhere in the pipeline.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Map a canonical month name (any casing) to its 1-based ordinal.
pub fn month_ordinal(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

/// Map a 1-based month ordinal back to its canonical name.
pub fn month_name(ordinal: u32) -> Option<&'static str> {
    MONTH_NAMES.get(ordinal.checked_sub(1)? as usize).copied()
}

/// Full English name for a weekday, title-cased.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a full English weekday name (any casing).
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let day = match name.to_ascii_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

// ── Filter parameters ─────────────────────────────────────────────────────────

/// Month constraint for a query. Out-of-range ordinals are unrepresentable:
/// construction goes through [`MonthFilter::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// No month constraint.
    All,
    /// Keep only trips starting in this month (1–12).
    Month(u32),
}

impl MonthFilter {
    /// Parse `"all"` or a canonical month name. Anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        if input.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        month_ordinal(input).map(Self::Month)
    }

    /// Whether a record with the given start month passes this filter.
    pub fn matches(self, month: u32) -> bool {
        match self {
            Self::All => true,
            Self::Month(ordinal) => month == ordinal,
        }
    }
}

/// Weekday constraint for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    /// No weekday constraint.
    All,
    /// Keep only trips starting on this weekday.
    Day(Weekday),
}

impl DayFilter {
    /// Parse `"all"` or a full weekday name. Anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        if input.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        parse_weekday(input).map(Self::Day)
    }

    /// Whether a record starting on `day` passes this filter.
    pub fn matches(self, day: Weekday) -> bool {
        match self {
            Self::All => true,
            Self::Day(wanted) => day == wanted,
        }
    }
}

/// A validated query: which city to load and which filters to apply.
#[derive(Debug, Clone)]
pub struct FilterParams {
    /// Registry key of the city dataset.
    pub city: String,
    pub month: MonthFilter,
    pub day: DayFilter,
}

// ── Trip records ──────────────────────────────────────────────────────────────

/// One trip row from a city dataset, with loader-derived calendar fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    /// Trip duration in seconds, as supplied by the dataset.
    pub duration_seconds: f64,
    pub start_station: String,
    pub end_station: String,
    /// Rider category. Empty when the source cell was blank.
    pub user_type: String,
    /// `None` when the column is absent or the cell was blank.
    pub gender: Option<String>,
    /// `None` when the column is absent or the cell was blank.
    pub birth_year: Option<i32>,
    /// Start month ordinal (1–12), derived from `start_time`.
    pub month: u32,
    /// Start weekday, derived from `start_time`.
    pub weekday: Weekday,
    /// Start hour (0–23), derived from `start_time`.
    pub start_hour: u32,
}

impl TripRecord {
    /// Build a record, deriving the calendar fields from `start_time`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        duration_seconds: f64,
        start_station: String,
        end_station: String,
        user_type: String,
        gender: Option<String>,
        birth_year: Option<i32>,
    ) -> Self {
        Self {
            month: start_time.month(),
            weekday: start_time.weekday(),
            start_hour: start_time.hour(),
            start_time,
            end_time,
            duration_seconds,
            start_station,
            end_station,
            user_type,
            gender,
            birth_year,
        }
    }
}

// ── Dataset schema ────────────────────────────────────────────────────────────

/// Capability flags computed once from the CSV header row. Aggregators branch
/// on these instead of probing individual records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSchema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

// ── Filtered dataset ──────────────────────────────────────────────────────────

/// The trips matching a query, in original file order. Built fresh per query
/// and immutable afterward.
#[derive(Debug, Clone)]
pub struct FilteredDataset {
    pub records: Vec<TripRecord>,
    pub schema: DatasetSchema,
}

impl FilteredDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only slice of up to `len` records starting at `start`. Clamped to
    /// the dataset bounds, so callers can page past the end safely.
    pub fn page(&self, start: usize, len: usize) -> &[TripRecord] {
        let begin = start.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        &self.records[begin..end]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn record(start: NaiveDateTime) -> TripRecord {
        TripRecord::new(
            start,
            start + chrono::Duration::minutes(10),
            600.0,
            "A".to_string(),
            "B".to_string(),
            "Subscriber".to_string(),
            None,
            None,
        )
    }

    // ── Month names ───────────────────────────────────────────────────────────

    #[test]
    fn test_month_ordinal_canonical_names() {
        assert_eq!(month_ordinal("january"), Some(1));
        assert_eq!(month_ordinal("June"), Some(6));
        assert_eq!(month_ordinal("DECEMBER"), Some(12));
    }

    #[test]
    fn test_month_ordinal_rejects_unknown() {
        assert_eq!(month_ordinal("smarch"), None);
        assert_eq!(month_ordinal(""), None);
    }

    #[test]
    fn test_month_name_round_trip() {
        for (i, name) in MONTH_NAMES.iter().enumerate() {
            let ordinal = i as u32 + 1;
            assert_eq!(month_name(ordinal), Some(*name));
            assert_eq!(month_ordinal(name), Some(ordinal));
        }
    }

    #[test]
    fn test_month_name_out_of_range() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    // ── Weekday names ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_weekday_full_names() {
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("Sunday"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("WEDNESDAY"), Some(Weekday::Wed));
    }

    #[test]
    fn test_parse_weekday_rejects_abbreviations() {
        assert_eq!(parse_weekday("mon"), None);
        assert_eq!(parse_weekday("funday"), None);
    }

    #[test]
    fn test_weekday_name_round_trip() {
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            assert_eq!(parse_weekday(weekday_name(day)), Some(day));
        }
    }

    // ── Filters ───────────────────────────────────────────────────────────────

    #[test]
    fn test_month_filter_parse_all() {
        assert_eq!(MonthFilter::parse("all"), Some(MonthFilter::All));
        assert_eq!(MonthFilter::parse("All"), Some(MonthFilter::All));
    }

    #[test]
    fn test_month_filter_parse_name() {
        assert_eq!(MonthFilter::parse("march"), Some(MonthFilter::Month(3)));
        assert_eq!(MonthFilter::parse("nope"), None);
    }

    #[test]
    fn test_month_filter_matches() {
        assert!(MonthFilter::All.matches(7));
        assert!(MonthFilter::Month(2).matches(2));
        assert!(!MonthFilter::Month(2).matches(3));
    }

    #[test]
    fn test_day_filter_parse_and_match() {
        let filter = DayFilter::parse("friday").unwrap();
        assert_eq!(filter, DayFilter::Day(Weekday::Fri));
        assert!(filter.matches(Weekday::Fri));
        assert!(!filter.matches(Weekday::Sat));
        assert!(DayFilter::All.matches(Weekday::Sat));
    }

    // ── TripRecord ────────────────────────────────────────────────────────────

    #[test]
    fn test_trip_record_derives_calendar_fields() {
        // 2017-06-23 was a Friday.
        let rec = record(ts(2017, 6, 23, 17));
        assert_eq!(rec.month, 6);
        assert_eq!(rec.weekday, Weekday::Fri);
        assert_eq!(rec.start_hour, 17);
    }

    // ── FilteredDataset paging ────────────────────────────────────────────────

    fn dataset(n: usize) -> FilteredDataset {
        let records = (0..n)
            .map(|i| record(ts(2017, 1, 1 + i as u32, 8)))
            .collect();
        FilteredDataset {
            records,
            schema: DatasetSchema::default(),
        }
    }

    #[test]
    fn test_page_within_bounds() {
        let ds = dataset(7);
        assert_eq!(ds.page(0, 5).len(), 5);
        assert_eq!(ds.page(5, 5).len(), 2);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let ds = dataset(3);
        assert!(ds.page(3, 5).is_empty());
        assert!(ds.page(100, 5).is_empty());
    }

    #[test]
    fn test_page_preserves_order() {
        let ds = dataset(4);
        let page = ds.page(1, 2);
        assert_eq!(page[0], ds.records[1]);
        assert_eq!(page[1], ds.records[2]);
    }
}
