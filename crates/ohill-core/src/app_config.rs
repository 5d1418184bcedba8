use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the menu builder fetches each declared meal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodStrategy {
    /// Only the `?periodId=` HTML page.
    #[default]
    Html,
    /// The JSON API candidates first, falling back to the HTML page.
    ApiFirst,
}

impl std::fmt::Display for PeriodStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodStrategy::Html => write!(f, "html"),
            PeriodStrategy::ApiFirst => write!(f, "api_first"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Upstream location page carrying the embedded `model:` object.
    pub base_url: String,
    /// Upstream `GetMenu` JSON endpoint.
    pub api_url: String,
    pub venue: String,
    pub stations_path: PathBuf,
    pub web_dir: PathBuf,
    pub period_strategy: PeriodStrategy,
    pub cache_ttl_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_api_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub dump_dir: PathBuf,
}
