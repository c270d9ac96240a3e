use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "docpack.toml";
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 7878);
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration loaded from `docpack.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocpackConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address for `serve`
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` env-filter directive; `RUST_LOG` wins when set
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl DocpackConfig {
    /// Load configuration from `path`.
    ///
    /// Returns the default configuration if the file does not exist or cannot be parsed. Runs before
    /// logging is set up, so problems go straight to stderr.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!(
                        "warning: failed to parse {}: {err}. Using defaults.",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(err) => {
                eprintln!(
                    "warning: failed to read {}: {err}. Using defaults.",
                    path.display()
                );
                Self::default()
            }
        }
    }
}
