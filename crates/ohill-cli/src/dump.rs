//! `dump` command: capture raw upstream JSON to disk.

use std::path::Path;

use anyhow::Context;
use ohill_core::AppConfig;

pub(crate) async fn run_dump(config: &AppConfig, dir: &Path, split: bool) -> anyhow::Result<()> {
    let client = crate::build_client(config)?;
    let dump = ohill_scraper::collect_raw_dump(&client)
        .await
        .context("raw dump failed")?;

    let path = ohill_scraper::write_raw_dump(&dump, dir, split)?;
    let captured = dump
        .periods
        .iter()
        .filter(|(_, p)| p.raw.is_some())
        .count();
    tracing::info!(
        path = %path.display(),
        periods = dump.periods.len(),
        captured,
        split,
        "wrote raw dump"
    );
    println!("Wrote {}", path.display());
    if split {
        println!("Also wrote individual period files in {}", dir.display());
    }
    Ok(())
}
