mod bootstrap;
mod prompt;
mod render;
mod settings;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use bikeshare_core::error::ExploreError;
use bikeshare_core::models::{DayFilter, FilterParams, MonthFilter};
use bikeshare_core::registry::CityRegistry;
use bikeshare_data::analysis;
use clap::Parser;

use crate::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level)?;

    let data_dir = bootstrap::discover_data_dir(settings.data_dir.clone());
    tracing::info!("Using data directory {}", data_dir.display());
    let registry = CityRegistry::builtin(data_dir);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    if settings.city.is_some() {
        let params = params_from_flags(&registry, &settings)?;
        let exploration = analysis::explore(&registry, &params)?;
        render::render_reports(&mut output, &exploration.report)?;
        return Ok(());
    }

    run_interactive(&registry, &mut input, &mut output)
}

/// The restart loop. Each iteration is a fully isolated query: fresh load,
/// fresh aggregation, nothing carried over.
fn run_interactive<R: BufRead, W: Write>(
    registry: &CityRegistry,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;
    loop {
        let params = prompt::prompt_filters(registry, input, output)?;

        match analysis::explore(registry, &params) {
            Ok(exploration) => {
                render::render_reports(output, &exploration.report)?;
                render::paginate_raw(input, output, &exploration.dataset)?;
            }
            Err(ExploreError::EmptyDataset) => {
                writeln!(
                    output,
                    "\nNo trips match those filters. Try a different combination."
                )?;
            }
            Err(err) => {
                tracing::error!("Query failed: {err}");
                writeln!(output, "\nCould not complete the query: {err}")?;
            }
        }

        if !prompt::prompt_yes_no(input, output, "\nWould you like to restart? (yes/no)")? {
            break;
        }
    }
    Ok(())
}

/// Build query parameters from the non-interactive flags.
fn params_from_flags(registry: &CityRegistry, settings: &Settings) -> Result<FilterParams> {
    let city = prompt::normalize_city(settings.city.as_deref().unwrap_or_default());
    if !registry.contains(&city) {
        bail!(
            "unknown city \"{city}\"; expected one of: {}",
            registry.cities().collect::<Vec<_>>().join(", "),
        );
    }

    let month = MonthFilter::parse(&settings.month)
        .with_context(|| format!("invalid month \"{}\"", settings.month))?;
    let day = DayFilter::parse(&settings.day)
        .with_context(|| format!("invalid day \"{}\"", settings.day))?;

    Ok(FilterParams { city, month, day })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
