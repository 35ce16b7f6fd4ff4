use clap::Parser;
use std::path::PathBuf;

/// Explore US bikeshare trip data from the command line.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bikeshare",
    about = "Interactive statistics over city bikeshare trip datasets",
    version
)]
pub struct Settings {
    /// Directory containing the city CSV datasets
    #[arg(long, env = "BIKESHARE_DATA")]
    pub data_dir: Option<PathBuf>,

    /// Run one query for this city and exit instead of prompting
    #[arg(long)]
    pub city: Option<String>,

    /// Month filter for --city mode ("all" or a month name)
    #[arg(long, default_value = "all")]
    pub month: String,

    /// Weekday filter for --city mode ("all" or a weekday name)
    #[arg(long, default_value = "all")]
    pub day: String,

    /// Logging level (written to stderr)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
