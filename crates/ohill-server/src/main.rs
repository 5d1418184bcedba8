mod api;
mod cache;
mod middleware;

use std::{sync::Arc, time::Duration};

use ohill_scraper::{CampusDishClient, MenuBuilder};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::MenuCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ohill_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let overrides = ohill_core::load_station_overrides(&config.stations_path)?;
    let client = CampusDishClient::new(
        &config.base_url,
        &config.api_url,
        config.scraper_request_timeout_secs,
        config.scraper_api_timeout_secs,
        &config.scraper_user_agent,
    )?;
    let builder = MenuBuilder::new(client, overrides, &config.venue)
        .with_strategy(config.period_strategy);

    let state = AppState {
        builder: Arc::new(builder),
        cache: MenuCache::new(Duration::from_secs(config.cache_ttl_secs)),
    };
    let app = build_app(state, &config.web_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        strategy = %config.period_strategy,
        web_dir = %config.web_dir.display(),
        "ohill-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
