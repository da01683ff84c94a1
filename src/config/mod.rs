/// Configuration management for the flow editor
///
/// Handles server configuration, canvas interaction behaviour, and logging level.

use crate::canvas::geometry::ContainmentMode;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Canvas interaction configuration
    pub canvas: CanvasConfig,
    /// Default log filter when RUST_LOG is not set (e.g., "info", "flow_editor=debug")
    pub log_level: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Canvas interaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// How a dropped node must overlap a batch to be adopted by it
    pub containment: ContainmentMode,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            containment: ContainmentMode::Full,
        }
    }
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for k8s/container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("FLOW_EDITOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FLOW_EDITOR_PORT")
                    .unwrap_or_else(|_| "3004".to_string())
                    .parse()
                    .unwrap_or(3004),
            },
            canvas: CanvasConfig {
                containment: std::env::var("FLOW_EDITOR_CONTAINMENT")
                    .ok()
                    .and_then(|mode| ContainmentMode::parse(&mode))
                    .unwrap_or_default(),
            },
            log_level: std::env::var("FLOW_EDITOR_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
