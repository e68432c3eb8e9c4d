use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

/// Quote endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetcherConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Responsive view configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    /// Media query that switches the view into compact mode.
    #[serde(default = "default_breakpoint_query")]
    pub breakpoint_query: String,

    /// CSS pixels per terminal column when the terminal is the viewport.
    #[serde(default = "default_px_per_column")]
    pub px_per_column: u32,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://financialmodelingprep.com/api/v3".to_string()
}
fn default_symbols() -> Vec<String> {
    ["AAPL", "FB", "GOOGL", "AMZN"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    format!("quote-board/{}", env!("CARGO_PKG_VERSION"))
}
fn default_breakpoint_query() -> String {
    "screen and (max-width: 900px)".to_string()
}
fn default_px_per_column() -> u32 {
    8
}
fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            symbols: default_symbols(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            breakpoint_query: default_breakpoint_query(),
            px_per_column: default_px_per_column(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::Environment::with_prefix("QUOTES")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("fetcher.symbols")
                    .try_parsing(true),
            )
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_page() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.fetcher.symbols.join(","), "AAPL,FB,GOOGL,AMZN");
        assert_eq!(cfg.view.breakpoint_query, "screen and (max-width: 900px)");
        assert_eq!(cfg.view.px_per_column, 8);
    }

    #[test]
    fn test_partial_sections_fill_in_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .set_override("fetcher.base_url", "http://localhost:9000")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.fetcher.base_url, "http://localhost:9000");
        assert_eq!(cfg.fetcher.timeout_secs, 30);
        assert_eq!(cfg.view.poll_interval_ms, 250);
    }
}
