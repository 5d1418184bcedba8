//! `menu` command: build, print, and optionally save the normalized menu.

use std::path::Path;

use anyhow::Context;
use ohill_core::{AppConfig, MenuDocument};
use ohill_scraper::MenuBuilder;

pub(crate) const DEFAULT_OUTPUT: &str = "ohill_menu.json";

pub(crate) async fn run_menu(config: &AppConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let overrides = ohill_core::load_station_overrides(&config.stations_path)?;
    let builder = MenuBuilder::new(crate::build_client(config)?, overrides, &config.venue)
        .with_strategy(config.period_strategy);

    let document = builder.build().await.context("menu build failed")?;
    let text = render(&document)?;
    println!("{text}");

    if let Some(path) = output {
        write_menu(&text, path)?;
        tracing::info!(path = %path.display(), items = document.item_count(), "wrote menu");
    }
    Ok(())
}

pub(crate) fn render(document: &MenuDocument) -> anyhow::Result<String> {
    serde_json::to_string_pretty(document).context("failed to serialize menu")
}

pub(crate) fn write_menu(text: &str, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
