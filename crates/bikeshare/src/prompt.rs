//! Interactive input: prompt, validate, re-prompt until the answer is in the
//! allowed set. All readers are generic over [`BufRead`] so tests can drive
//! them with in-memory input.

use std::io::{self, BufRead, Write};

use bikeshare_core::models::{DayFilter, FilterParams, MonthFilter};
use bikeshare_core::registry::CityRegistry;

/// Short month names offered at the prompt, mapped to canonical names.
/// The datasets only cover the first half of the year.
const MONTH_SHORTHANDS: [(&str, &str); 6] = [
    ("jan", "january"),
    ("feb", "february"),
    ("mar", "march"),
    ("apr", "april"),
    ("may", "may"),
    ("jun", "june"),
];

/// Weekday shorthands offered at the prompt.
const DAY_SHORTHANDS: [(&str, &str); 7] = [
    ("m", "monday"),
    ("tu", "tuesday"),
    ("w", "wednesday"),
    ("th", "thursday"),
    ("f", "friday"),
    ("sa", "saturday"),
    ("su", "sunday"),
];

// ── Generic prompt loop ───────────────────────────────────────────────────────

/// Print `prompt`, read one line, and keep re-prompting with `retry` until
/// `parse` accepts the input. Errors only on I/O failure or closed input.
pub fn read_valid<R, W, T>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    retry: &str,
    mut parse: impl FnMut(&str) -> Option<T>,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
{
    let mut message = prompt;
    loop {
        writeln!(output, "{message}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        if let Some(value) = parse(line.trim()) {
            return Ok(value);
        }
        message = retry;
    }
}

/// Ask a yes/no question.
pub fn prompt_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    read_valid(
        input,
        output,
        question,
        "Please enter \"yes\" or \"no\":",
        parse_yes_no,
    )
}

// ── Filter prompts ────────────────────────────────────────────────────────────

/// Run the full filter dialogue: city, optional month, optional weekday.
pub fn prompt_filters<R: BufRead, W: Write>(
    registry: &CityRegistry,
    input: &mut R,
    output: &mut W,
) -> io::Result<FilterParams> {
    let city = read_valid(
        input,
        output,
        "Please enter the name of a city (Chicago, New York City or Washington):",
        "City not valid. Please try again:",
        |s| {
            let city = normalize_city(s);
            registry.contains(&city).then_some(city)
        },
    )?;
    writeln!(output, "\nGreat, let's see some stats for {}...\n", title_case(&city))?;

    let month = if prompt_yes_no(
        input,
        output,
        "Would you like to filter by a specific month? (yes/no)",
    )? {
        read_valid(
            input,
            output,
            "Please enter a month (Jan, Feb, Mar, Apr, May, Jun):",
            "Please enter a valid month:",
            parse_month,
        )?
    } else {
        MonthFilter::All
    };

    let day = if prompt_yes_no(
        input,
        output,
        "Would you like to filter by a specific weekday? (yes/no)",
    )? {
        read_valid(
            input,
            output,
            "Please enter a weekday (M, Tu, W, Th, F, Sa, Su):",
            "Please enter a valid day:",
            parse_day,
        )?
    } else {
        DayFilter::All
    };

    Ok(FilterParams { city, month, day })
}

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Lowercase and apply common aliases before the registry lookup.
pub fn normalize_city(input: &str) -> String {
    let city = input.trim().to_lowercase();
    if city == "new york" {
        "new york city".to_string()
    } else {
        city
    }
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Accepts the prompt shorthands (`jan`) as well as full canonical names.
fn parse_month(input: &str) -> Option<MonthFilter> {
    let lower = input.trim().to_ascii_lowercase();
    let name = MONTH_SHORTHANDS
        .iter()
        .find(|&&(short, _)| short == lower)
        .map(|&(_, full)| full)
        .unwrap_or(lower.as_str());
    MonthFilter::parse(name)
}

/// Accepts the prompt shorthands (`Tu`) as well as full weekday names.
fn parse_day(input: &str) -> Option<DayFilter> {
    let lower = input.trim().to_ascii_lowercase();
    let name = DAY_SHORTHANDS
        .iter()
        .find(|&&(short, _)| short == lower)
        .map(|&(_, full)| full)
        .unwrap_or(lower.as_str());
    DayFilter::parse(name)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
