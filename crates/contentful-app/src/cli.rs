use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use contentful_core::config::RunMode;

/// Contentful map/playlist picker for a signage player app.
///
/// Speaks newline-delimited JSON with its host on stdin/stdout. Logs go to
/// stderr.
#[derive(Debug, Parser)]
#[command(name = "contentful-app", version)]
pub struct Args {
    /// Where the initial config comes from. Overrides `[general] mode`.
    #[arg(long, value_enum, env = "CONTENTFUL_APP_MODE")]
    pub mode: Option<Mode>,

    /// Settings file to use instead of the per-user config.
    #[arg(long, env = "CONTENTFUL_APP_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// JSON file holding the config to start from in development mode.
    #[arg(long)]
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Start from a local fixture; no host handshake.
    Development,
    /// Wait for the host's `init` line.
    Production,
}

impl From<Mode> for RunMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Development => RunMode::Development,
            Mode::Production => RunMode::Production,
        }
    }
}
