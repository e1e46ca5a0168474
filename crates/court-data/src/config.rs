//! Source configuration read from the environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_DATAJUD_BASE_URL: &str = "https://api-publica.datajud.cnj.jus.br";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Settings for the default source chain.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    pub datajud_base_url: String,
    /// Key sent as `Authorization: APIKey <key>`. Requests go out without
    /// the header when unset.
    pub datajud_api_key: Option<String>,
    /// Secondary registry. The source is left out of the chain when unset.
    pub portal_base_url: Option<String>,
    pub portal_token: Option<String>,
    pub timeout: Duration,
    pub scrape_enabled: bool,
    pub number_fallback: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            datajud_base_url: DEFAULT_DATAJUD_BASE_URL.to_string(),
            datajud_api_key: None,
            portal_base_url: None,
            portal_token: None,
            timeout: DEFAULT_TIMEOUT,
            scrape_enabled: true,
            number_fallback: true,
        }
    }
}

impl SourceConfig {
    /// Reads `JD_*` variables, falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout = env::var("JD_SOURCE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        Self {
            datajud_base_url: env::var("JD_DATAJUD_BASE_URL")
                .unwrap_or(defaults.datajud_base_url),
            datajud_api_key: non_empty_var("JD_DATAJUD_API_KEY"),
            portal_base_url: non_empty_var("JD_PORTAL_BASE_URL"),
            portal_token: non_empty_var("JD_PORTAL_TOKEN"),
            timeout,
            scrape_enabled: bool_var("JD_SCRAPE_ENABLED", defaults.scrape_enabled),
            number_fallback: bool_var("JD_NUMBER_FALLBACK", defaults.number_fallback),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn bool_var(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
