use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the analytics server, without trailing slash
    pub base_url: String,
    /// Path of the static sample CSV relative to `base_url`
    pub sample_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub charts_per_page: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                base_url: normalize_base_url(
                    &env::var("DASHBOARD_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string()),
                ),
                sample_path: env::var("SAMPLE_DATA_PATH")
                    .unwrap_or_else(|_| "/static/sample_data.csv".to_string()),
            },
            ui: UiConfig {
                tick_rate_ms: env::var("TUI_TICK_MS")
                    .unwrap_or_else(|_| "100".to_string())
                    .parse()
                    .context("TUI_TICK_MS must be a whole number of milliseconds")?,
                charts_per_page: env::var("CHARTS_PER_PAGE")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse::<usize>()
                    .context("CHARTS_PER_PAGE must be a positive integer")?
                    .max(1),
            },
            logging: LoggingConfig {
                directory: env::var("LOG_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_log_dir()),
                filter: env::var("RUST_LOG").unwrap_or_else(|_| "sales_dashboard=info".to_string()),
            },
        })
    }

    /// Replace the server URL (from `--url`)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.server.base_url = normalize_base_url(url);
        self
    }

    pub fn with_log_dir(mut self, dir: PathBuf) -> Self {
        self.logging.directory = dir;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                sample_path: "/static/sample_data.csv".to_string(),
            },
            ui: UiConfig {
                tick_rate_ms: 100,
                charts_per_page: 4,
            },
            logging: LoggingConfig {
                directory: default_log_dir(),
                filter: "sales_dashboard=info".to_string(),
            },
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sales-dashboard")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = Config::default().with_base_url(" http://localhost:8000/ ");
        assert_eq!(config.server.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.sample_path, "/static/sample_data.csv");
        assert_eq!(config.ui.charts_per_page, 4);
        assert!(config.logging.directory.ends_with("logs"));
    }
}
