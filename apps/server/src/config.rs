use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use jurisdesk_court_data::SourceConfig;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Period of the monitoring scheduler.
    pub monitor_interval: Duration,
    /// `text` or `json`.
    pub log_format: String,
    /// JSON array of cases served by the fixture source.
    pub fixtures_path: Option<PathBuf>,
    pub sources: SourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_path: "./db/jurisdesk.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            monitor_interval: Duration::from_secs(60),
            log_format: "text".to_string(),
            fixtures_path: None,
            sources: SourceConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("JD_LISTEN_ADDR") {
            Ok(addr) => addr
                .parse()
                .with_context(|| format!("Invalid JD_LISTEN_ADDR '{}'", addr))?,
            Err(_) => defaults.listen_addr,
        };
        let db_path = std::env::var("JD_DB_PATH").unwrap_or(defaults.db_path);
        let cors_allow = std::env::var("JD_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("JD_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30_000);
        let monitor_secs: u64 = std::env::var("JD_MONITOR_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(60);
        let log_format = std::env::var("JD_LOG_FORMAT").unwrap_or(defaults.log_format);
        let fixtures_path = std::env::var("JD_FIXTURES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            monitor_interval: Duration::from_secs(monitor_secs),
            log_format,
            fixtures_path,
            sources: SourceConfig::from_env(),
        })
    }
}
