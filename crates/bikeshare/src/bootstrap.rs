use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// Logging goes to stderr; stdout is reserved for the interactive session.
/// Falls back to `"warn"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();

    Ok(())
}

// ── Data-directory discovery ───────────────────────────────────────────────────

/// Pick the directory holding the city CSV files.
///
/// Checks, in order:
/// 1. the explicit `--data-dir` / `BIKESHARE_DATA` value,
/// 2. `./data`,
/// 3. the platform-local data dir (e.g. `~/.local/share/bikeshare`),
/// 4. the current directory as a last resort.
pub fn discover_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    let mut candidates = vec![PathBuf::from("data")];
    if let Some(local) = dirs::data_local_dir() {
        candidates.push(local.join("bikeshare"));
    }

    candidates
        .into_iter()
        .find(|p| p.is_dir())
        .unwrap_or_else(|| PathBuf::from("."))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
