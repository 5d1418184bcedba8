use crate::app_config::{AppConfig, Environment, PeriodStrategy};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str =
    "https://virginia.campusdish.com/en/locationsandmenus/observatoryhilldiningroom/";
pub const DEFAULT_API_URL: &str = "https://virginia.campusdish.com/api/menus/GetMenu";
pub const DEFAULT_VENUE: &str = "O'Hill";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 CleanMenuBot/1.0";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; only malformed values are rejected.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("OHILL_ENV", "development"));

    let bind_addr = or_default("OHILL_BIND_ADDR", "0.0.0.0:5173")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("OHILL_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("OHILL_LOG_LEVEL", "info");

    let base_url = or_default("OHILL_BASE_URL", DEFAULT_BASE_URL);
    let api_url = or_default("OHILL_API_URL", DEFAULT_API_URL);
    for (var, url) in [("OHILL_BASE_URL", &base_url), ("OHILL_API_URL", &api_url)] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(var, format!("\"{url}\" is not an http(s) URL")));
        }
    }

    let venue = or_default("OHILL_VENUE", DEFAULT_VENUE);
    let stations_path = PathBuf::from(or_default("OHILL_STATIONS_PATH", "./config/stations.yaml"));
    let web_dir = PathBuf::from(or_default("OHILL_WEB_DIR", "./web"));
    let period_strategy = parse_period_strategy(&or_default("OHILL_PERIOD_STRATEGY", "html"))?;
    let cache_ttl_secs = parse_u64("OHILL_CACHE_TTL_SECS", "900")?;

    let scraper_request_timeout_secs = parse_u64("OHILL_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_api_timeout_secs = parse_u64("OHILL_SCRAPER_API_TIMEOUT_SECS", "20")?;
    let scraper_user_agent = or_default("OHILL_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let dump_dir = PathBuf::from(or_default("OHILL_DUMP_DIR", "ohill_dumps"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        base_url,
        api_url,
        venue,
        stations_path,
        web_dir,
        period_strategy,
        cache_ttl_secs,
        scraper_request_timeout_secs,
        scraper_api_timeout_secs,
        scraper_user_agent,
        dump_dir,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_period_strategy(s: &str) -> Result<PeriodStrategy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "html" => Ok(PeriodStrategy::Html),
        "api_first" | "api-first" | "api" => Ok(PeriodStrategy::ApiFirst),
        other => Err(ConfigError::InvalidEnvVar {
            var: "OHILL_PERIOD_STRATEGY".to_string(),
            reason: format!("unknown strategy \"{other}\"; expected html or api_first"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
