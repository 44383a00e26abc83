use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default user agent for metadata requests
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) helio/",
    env!("CARGO_PKG_VERSION")
);

pub const DEFAULT_PORT: u16 = 5174;
pub const DEFAULT_DATA_PATH: &str = "data/bookmarks.json";
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(6);

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub server_port: u16,
    pub user_agent: String,
    pub metadata_timeout: Duration,
    pub static_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            server_port: DEFAULT_PORT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            static_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = lookup("BM_PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let metadata_timeout = lookup("HELIO_METADATA_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_METADATA_TIMEOUT);

        Self {
            data_path: lookup("BM_DATA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            server_port,
            user_agent: lookup("HELIO_USER_AGENT")
                .filter(|ua| !ua.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            metadata_timeout,
            static_dir: None,
        }
    }
}
