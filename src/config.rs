//! Application configuration loaded from environment variables.

use std::fmt;
use std::str::FromStr;

use crate::source::SortOrder;

/// Kind of deployment the service runs in. Only affects default log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
    Test,
}

impl Environment {
    /// Log filter used when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        match self {
            Environment::Dev => "debug",
            Environment::Prod => "info",
            Environment::Test => "warn",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Dev => "DEV",
            Environment::Prod => "PROD",
            Environment::Test => "TEST",
        })
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEV" => Ok(Environment::Dev),
            "PROD" => Ok(Environment::Prod),
            "TEST" => Ok(Environment::Test),
            other => anyhow::bail!("unknown ENV {other:?}, expected DEV, PROD or TEST"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8000").
    pub bind_addr: String,

    /// SQLite connection string or file path for the history store.
    pub database_url: String,

    /// Subreddit used when `/random` is called without `sub`.
    pub default_subreddit: String,

    /// Listing used when `/random` is called without `listing`.
    pub default_listing: SortOrder,

    pub env: Environment,

    /// Where listings are fetched from, without a trailing slash.
    pub reddit_url: String,

    /// Prefix joined with a post's permalink to form `post_url`.
    pub permalink_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`: history database (`sqlite://history.db`, a path, or `sqlite::memory:`)
    ///
    /// Optional:
    /// - `BIND_ADDR`: Server bind address (default: "0.0.0.0:8000")
    /// - `DEFAULT_SUBREDDIT`: (default: "dankmemes")
    /// - `DEFAULT_LISTING`: one of new, hot, best, rising, top, controversial (default: "new")
    /// - `ENV`: DEV, PROD or TEST (default: "PROD")
    /// - `REDDIT_URL`: upstream base URL (default: "http://www.reddit.com")
    /// - `REDDIT_PERMALINK_BASE`: base of `post_url` (default: "https://www.reddit.com")
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let default_subreddit = std::env::var("DEFAULT_SUBREDDIT")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "dankmemes".to_string());

        let default_listing = match std::env::var("DEFAULT_LISTING") {
            Ok(value) => value.parse::<SortOrder>()?,
            Err(_) => SortOrder::New,
        };

        let env = match std::env::var("ENV") {
            Ok(value) => value.parse::<Environment>()?,
            Err(_) => Environment::Prod,
        };

        let reddit_url = std::env::var("REDDIT_URL")
            .unwrap_or_else(|_| "http://www.reddit.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let permalink_base = std::env::var("REDDIT_PERMALINK_BASE")
            .unwrap_or_else(|_| "https://www.reddit.com".to_string())
            .trim_end_matches('/')
            .to_string();

        tracing::info!(
            bind_addr = %bind_addr,
            default_subreddit = %default_subreddit,
            default_listing = %default_listing,
            env = %env,
            reddit_url = %reddit_url,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            database_url,
            default_subreddit,
            default_listing,
            env,
            reddit_url,
            permalink_base,
        })
    }
}
