mod dump;
mod menu;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ohill_core::AppConfig;
use ohill_scraper::CampusDishClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ohill-cli")]
#[command(about = "O'Hill dining menu scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build today's normalized menu, print it, and save it as JSON.
    Menu {
        /// File to write the menu to.
        #[arg(long, default_value = menu::DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Print only; do not write a file.
        #[arg(long)]
        no_write: bool,
    },
    /// Save the raw upstream JSON for the base page and every period.
    Dump {
        /// Output directory (defaults to `OHILL_DUMP_DIR`).
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Also write one `period_<id>.json` per period.
        #[arg(long)]
        split: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = ohill_core::load_app_config()?;

    // Logs go to stderr so stdout stays pure JSON.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Menu { output, no_write }) => {
            menu::run_menu(&config, (!no_write).then_some(output.as_path())).await?;
        }
        Some(Commands::Dump { dir, split }) => {
            let dir = dir.unwrap_or_else(|| config.dump_dir.clone());
            dump::run_dump(&config, &dir, split).await?;
        }
        None => {
            let output = PathBuf::from(menu::DEFAULT_OUTPUT);
            menu::run_menu(&config, Some(output.as_path())).await?;
        }
    }

    Ok(())
}

fn build_client(config: &AppConfig) -> anyhow::Result<CampusDishClient> {
    Ok(CampusDishClient::new(
        &config.base_url,
        &config.api_url,
        config.scraper_request_timeout_secs,
        config.scraper_api_timeout_secs,
        &config.scraper_user_agent,
    )?)
}

#[cfg(test)]
mod tests;
