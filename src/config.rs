//! Configuration for the FactGraph client
//!
//! # Configuration File Format
//!
//! TOML format in `<config dir>/factgraph/config.toml`:
//!
//! ```toml
//! endpoint = "http://localhost:8000/analyze"
//! request_timeout_secs = 120
//! connect_timeout_secs = 5
//!
//! [input]
//! max_chars = 5000
//! limit = "reject"
//!
//! [graph]
//! color_by_group = true
//! label = "id"
//! particles = 2
//! particle_speed = 0.005
//! background = "#0f172a"
//! node_size = 6
//! link_color = "#475569"
//!
//! [tui]
//! tick_rate_ms = 100
//! notification_ttl_secs = 5
//! ```
//!
//! Every field is optional. `FACTGRAPH_ENDPOINT` and `FACTGRAPH_TIMEOUT_SECS`
//! override the file.

use crate::error::{FactGraphError, Result};
use crate::graph::{parse_hex_color, GraphHints};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable overriding the analysis endpoint
pub const ENDPOINT_ENV: &str = "FACTGRAPH_ENDPOINT";
/// Environment variable overriding the request timeout (seconds)
pub const TIMEOUT_ENV: &str = "FACTGRAPH_TIMEOUT_SECS";

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactGraphConfig {
    /// Analysis endpoint (POST)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Upper bound on one analysis call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on establishing the connection
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Input validation settings
    #[serde(default)]
    pub input: InputSettings,

    /// Presentation hints for the graph renderer
    #[serde(default)]
    pub graph: GraphHints,

    /// Terminal interface settings
    #[serde(default)]
    pub tui: TuiSettings,
}

impl Default for FactGraphConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            input: InputSettings::default(),
            graph: GraphHints::default(),
            tui: TuiSettings::default(),
        }
    }
}

/// What happens when the input exceeds `max_chars`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitMode {
    /// Refuse to submit
    Reject,
    /// Warn and submit anyway
    Advisory,
}

/// Input validation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSettings {
    /// Character limit, counted in Unicode scalar values
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default = "default_limit_mode")]
    pub limit: LimitMode,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            limit: default_limit_mode(),
        }
    }
}

/// Terminal interface settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TuiSettings {
    /// Event poll interval
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    /// How long a notice stays on screen
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_secs: u64,
}

impl Default for TuiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            notification_ttl_secs: default_notification_ttl(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000/analyze".to_string()
}

fn default_request_timeout() -> u64 {
    // Summarization plus per-sentence NLI is slow on CPU backends
    120
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_chars() -> usize {
    5000
}

fn default_limit_mode() -> LimitMode {
    LimitMode::Reject
}

fn default_tick_rate() -> u64 {
    100
}

fn default_notification_ttl() -> u64 {
    5
}

impl FactGraphConfig {
    /// Load configuration from file, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            FactGraphError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: FactGraphConfig = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Apply `FACTGRAPH_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(endpoint) = env::var(ENDPOINT_ENV) {
            if !endpoint.is_empty() {
                debug!("Endpoint overridden by {}", ENDPOINT_ENV);
                self.endpoint = endpoint;
            }
        }

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                FactGraphError::Config(format!("{} must be a whole number of seconds, got {:?}", TIMEOUT_ENV, raw))
            })?;
        }

        Ok(())
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(FactGraphError::Config("endpoint cannot be empty".to_string()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(FactGraphError::Config(format!(
                "endpoint must be an http(s) URL, got {}",
                self.endpoint
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(FactGraphError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(FactGraphError::Config(
                "connect_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.input.max_chars == 0 {
            return Err(FactGraphError::Config(
                "input.max_chars must be greater than zero".to_string(),
            ));
        }
        for (field, value) in [
            ("graph.background", &self.graph.background),
            ("graph.link_color", &self.graph.link_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(FactGraphError::Config(format!(
                    "{} must be a #rrggbb color, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "factgraph")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".factgraph").join("config.toml"))
    }
}
