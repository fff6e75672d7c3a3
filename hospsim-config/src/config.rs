//! Service configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Build the config from environment variables.
    ///
    /// Optional:
    /// - `HOSPSIM_BIND`: listen address, default `0.0.0.0`
    /// - `HOSPSIM_PORT`: default 8080; unparsable values fall back to the default
    /// - `HOSPSIM_DATA_DIR`: directory holding the saved JSON blobs, default `data`
    /// - `HOSPSIM_STATIC_DIR`: directory served under `/`, default `static`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind: env_non_empty("HOSPSIM_BIND").unwrap_or(defaults.bind),
            port: env_non_empty("HOSPSIM_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            data_dir: env_non_empty("HOSPSIM_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            static_dir: env_non_empty("HOSPSIM_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    /// Command-line flags win over the environment.
    pub fn with_overrides(mut self, port: Option<u16>, data_dir: Option<PathBuf>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
