//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the order service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// File logger settings.
    pub logging: LoggingConfig,

    /// Order store settings.
    pub orders: OrdersConfig,
}

impl AppConfig {
    /// Apply a `PORT` override, keeping the configured host.
    pub fn apply_port_override(&mut self, port: Option<&str>) {
        let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) else {
            return;
        };
        let host = self
            .server
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host)
            .unwrap_or("0.0.0.0");
        self.server.bind_address = format!("{}:{}", host, port);
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// File logger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory holding the per-severity log files.
    pub directory: PathBuf,

    /// Size in bytes above which a log file is rotated.
    pub max_file_size: u64,

    /// Number of rotated backups kept per (severity, day).
    pub max_files: u32,

    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub console_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            max_file_size: 10 * 1024 * 1024, // 10MB
            max_files: 5,
            console_filter: "order_service=debug,order_service::console=trace,tower_http=info"
                .to_string(),
        }
    }
}

/// Order store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Seed the store with the demo orders at startup.
    pub seed_demo_data: bool,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}
