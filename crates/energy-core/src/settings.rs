use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Campus energy dashboard: daily, weekly and per-building meter rollups
#[derive(Parser, Debug, Clone)]
#[command(
    name = "campus-energy",
    about = "Campus energy dashboard: daily, weekly and per-building meter rollups",
    version
)]
pub struct Settings {
    /// Directory holding one CSV file per building
    #[arg(long, env = "ENERGY_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory the cleaned data, summaries and chart are written to
    #[arg(long, env = "ENERGY_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Skip rendering the dashboard chart
    #[arg(long)]
    pub no_chart: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but over an explicit argument list.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args).map(Self::resolve)
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
