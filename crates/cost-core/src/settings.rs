use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Normalize cloud billing exports into synthetic units per asset type
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cloudcostcala",
    about = "Normalize cloud billing exports into synthetic units per asset type",
    version
)]
pub struct Settings {
    /// Path to configuration file
    #[arg(long, default_value = "config.example.json")]
    pub config: PathBuf,

    /// Output Excel file path
    #[arg(long, default_value = "cloud-assets-inventory.xlsx")]
    pub output: PathBuf,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
