// File: src/config.rs
// Purpose: Configuration parsing from assetdesk.toml

use crate::environment::Breakpoints;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    /// Viewport breakpoints for client-side classification
    #[serde(default)]
    pub detection: Breakpoints,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Device routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Mount points served once per device (default: ["/forms"])
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,

    /// Path prefixes that are never redirected
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

// Default values
fn default_name() -> String {
    "assetdesk".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_sections() -> Vec<String> {
    vec!["/forms".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "/api".to_string(),
        "/static".to_string(),
        "/health".to_string(),
    ]
}

// Default implementations
impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            exclude: default_exclude(),
        }
    }
}

impl Config {
    /// Load configuration from assetdesk.toml
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./assetdesk.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("assetdesk.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let bp = &self.detection;
        ensure!(
            bp.tablet_min_width <= bp.tablet_max_width,
            "detection.tablet_min_width ({}) exceeds detection.tablet_max_width ({})",
            bp.tablet_min_width,
            bp.tablet_max_width
        );
        Ok(())
    }

    /// `host:port` the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
