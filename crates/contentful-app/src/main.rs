mod cli;
mod error;
mod session;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use contentful_api::ContentfulClient;
use contentful_core::config::{AppSettings, RunMode};
use contentful_core::models::SelectedConfig;

use crate::cli::Args;
use crate::error::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the host protocol.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contentful=info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "contentful-app failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let settings = match &args.settings {
        Some(path) => AppSettings::load_from(path)?,
        None => AppSettings::load()?,
    };
    let mode: RunMode = args.mode.map(Into::into).unwrap_or(settings.general.mode);
    let fixture = args.fixture.as_deref().map(load_fixture).transpose()?;
    let source = settings.config_source(mode, fixture);

    let client = ContentfulClient::with_base_url(settings.fetch.base_url.clone());
    tracing::info!(?mode, base_url = %settings.fetch.base_url, "Starting config form");

    session::run(
        source,
        &settings.fetch,
        Arc::new(client),
        tokio::io::BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

fn load_fixture(path: &Path) -> Result<SelectedConfig, AppError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Fixture(format!("{}: {e}", path.display())))
}
