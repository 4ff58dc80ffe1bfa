use anyhow::Context;
use clap::{Parser, Subcommand};
use marine_core::{
    Aggregator, Config, ProviderId, TracingProgress, job, provider::providers_from_config, zones,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "marine",
    version,
    about = "Offshore kayak outlook from three forecast providers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the 3-day report, print it and deliver it.
    Run {
        /// Print the report without checking credentials or delivering it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Store the API key for a forecast provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// List the forecast zones.
    Zones,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Run { dry_run } => run_report(dry_run).await,
            Command::Configure { provider } => configure(&provider),
            Command::Zones => {
                for zone in zones::mallorca() {
                    println!("{:<20} {:>7.2} {:>7.2}", zone.name, zone.latitude, zone.longitude);
                }
                Ok(())
            }
        }
    }
}

async fn run_report(dry_run: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let aggregator = Aggregator::new(providers_from_config(&config)?);

    let summary = job::run(
        &config,
        dry_run,
        &aggregator,
        &zones::mallorca(),
        chrono::Local::now(),
        &TracingProgress,
    )
    .await?;

    println!("{}", summary.text);
    Ok(())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    if !id.requires_api_key() {
        println!("{} does not need an API key.", id.display_name());
        return Ok(());
    }

    let mut config = Config::load_file()?;

    let api_key = inquire::Password::new(&format!("{} API key:", id.display_name()))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}
