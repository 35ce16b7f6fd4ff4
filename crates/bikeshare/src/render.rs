//! Report rendering and raw-row pagination.
//!
//! All writers are generic over [`Write`] so tests can capture the output.

use std::io::{self, BufRead, Write};

use bikeshare_core::formatting::{format_seconds, group_thousands};
use bikeshare_core::models::{month_name, weekday_name, FilteredDataset, TripRecord};
use bikeshare_data::aggregator::{DurationReport, StationReport, TimeReport, UserReport};
use bikeshare_data::analysis::ExplorationReport;

use crate::prompt;

/// Records shown per page of raw trip data.
pub const PAGE_SIZE: usize = 5;

const DIVIDER: &str = "----------------------------------------";

// ── Statistics reports ────────────────────────────────────────────────────────

/// Print all four reports plus the run summary.
pub fn render_reports<W: Write>(out: &mut W, report: &ExplorationReport) -> io::Result<()> {
    render_time_stats(out, &report.time)?;
    render_station_stats(out, &report.stations)?;
    render_duration_stats(out, &report.durations)?;
    render_user_stats(out, &report.users)?;

    let meta = &report.metadata;
    writeln!(
        out,
        "\nAnalyzed {} of {} records in {:.3} seconds.",
        group_thousands(meta.rows_filtered as u64),
        group_thousands(meta.rows_loaded as u64),
        meta.load_time_seconds + meta.aggregate_time_seconds,
    )?;
    writeln!(out, "{DIVIDER}")
}

pub fn render_time_stats<W: Write>(out: &mut W, report: &TimeReport) -> io::Result<()> {
    writeln!(out, "\nMost Frequent Times of Travel")?;

    if let Some((month, count)) = report.popular_month {
        writeln!(
            out,
            "Most popular month: {} ({} trips)",
            month_name(month).unwrap_or("?"),
            group_thousands(count),
        )?;
    }
    if let Some((day, count)) = report.popular_day {
        writeln!(
            out,
            "Most popular day: {} ({} trips)",
            weekday_name(day),
            group_thousands(count),
        )?;
    }
    let (hour, count) = report.popular_hour;
    writeln!(
        out,
        "Most common start hour: {hour:02}:00 ({} trips)",
        group_thousands(count),
    )?;
    writeln!(out, "{DIVIDER}")
}

pub fn render_station_stats<W: Write>(out: &mut W, report: &StationReport) -> io::Result<()> {
    writeln!(out, "\nMost Popular Stations and Trip")?;

    let (station, count) = &report.popular_start;
    writeln!(out, "Most common start station: {station} ({} trips)", group_thousands(*count))?;
    let (station, count) = &report.popular_end;
    writeln!(out, "Most common end station: {station} ({} trips)", group_thousands(*count))?;
    let ((from, to), count) = &report.popular_trip;
    writeln!(out, "Most common trip: {from} -> {to} ({} trips)", group_thousands(*count))?;
    writeln!(out, "{DIVIDER}")
}

pub fn render_duration_stats<W: Write>(out: &mut W, report: &DurationReport) -> io::Result<()> {
    writeln!(out, "\nTrip Duration")?;
    writeln!(
        out,
        "Total travel time: {} seconds ({:.2} days)",
        report.total_seconds, report.total_days,
    )?;
    writeln!(
        out,
        "Mean travel time: {:.1} seconds ({})",
        report.mean_seconds,
        format_seconds(report.mean_seconds),
    )?;
    writeln!(out, "{DIVIDER}")
}

pub fn render_user_stats<W: Write>(out: &mut W, report: &UserReport) -> io::Result<()> {
    writeln!(out, "\nUser Stats")?;

    writeln!(out, "User types:")?;
    for (user_type, count) in &report.user_types {
        writeln!(out, "  {user_type}: {}", group_thousands(*count))?;
    }

    match &report.genders {
        Some(counts) => {
            writeln!(out, "Gender counts:")?;
            for (gender, count) in counts {
                writeln!(out, "  {gender}: {}", group_thousands(*count))?;
            }
        }
        None => writeln!(out, "No gender data for this city.")?,
    }

    match &report.birth_years {
        Some(stats) => {
            writeln!(out, "Earliest birth year: {}", stats.earliest)?;
            writeln!(out, "Most recent birth year: {}", stats.latest)?;
            writeln!(
                out,
                "Most common birth year: {} ({} riders)",
                stats.most_common,
                group_thousands(stats.most_common_count),
            )?;
        }
        None => writeln!(out, "No birth year data for this city.")?,
    }
    writeln!(out, "{DIVIDER}")
}

// ── Raw-row pagination ────────────────────────────────────────────────────────

/// Offer the raw records five at a time, starting at the first record,
/// until the user declines or the dataset is exhausted.
pub fn paginate_raw<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dataset: &FilteredDataset,
) -> io::Result<()> {
    if dataset.is_empty() {
        return Ok(());
    }

    let mut more = prompt::prompt_yes_no(
        input,
        output,
        "\nWould you like to see individual trip records? (yes/no)",
    )?;

    let mut start = 0;
    while more && start < dataset.len() {
        for record in dataset.page(start, PAGE_SIZE) {
            render_record(output, record, dataset)?;
            writeln!(output, "-----")?;
        }
        start += PAGE_SIZE;

        if start >= dataset.len() {
            writeln!(output, "End of data.")?;
            break;
        }
        more = prompt::prompt_yes_no(
            input,
            output,
            "Would you like to see more trip records? (yes/no)",
        )?;
    }
    Ok(())
}

fn render_record<W: Write>(
    out: &mut W,
    record: &TripRecord,
    dataset: &FilteredDataset,
) -> io::Result<()> {
    writeln!(out, "Start Time:    {}", record.start_time)?;
    writeln!(out, "End Time:      {}", record.end_time)?;
    writeln!(out, "Trip Duration: {} seconds", record.duration_seconds)?;
    writeln!(out, "Start Station: {}", record.start_station)?;
    writeln!(out, "End Station:   {}", record.end_station)?;
    writeln!(out, "User Type:     {}", record.user_type)?;
    if dataset.schema.has_gender {
        writeln!(out, "Gender:        {}", record.gender.as_deref().unwrap_or("-"))?;
    }
    if dataset.schema.has_birth_year {
        match record.birth_year {
            Some(year) => writeln!(out, "Birth Year:    {year}")?,
            None => writeln!(out, "Birth Year:    -")?,
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
