//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// HTTP server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8089").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8089".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Validate that the bind address parses as `host:port`.
    pub fn validate(&self) -> Result<(), String> {
        self.bind
            .parse::<SocketAddr>()
            .map(|_| ())
            .map_err(|e| format!("server.bind '{}' is not a socket address: {e}", self.bind))
    }
}

/// File storage configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Largest accepted upload in bytes (default: 32 MiB).
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Keep at most one file per user (default: true).
    /// When true, uploading a file replaces whatever file the user held
    /// before, under any name.
    #[serde(default = "default_single_file_per_owner")]
    pub single_file_per_owner: bool,
}

fn default_max_file_size() -> u64 {
    crate::DEFAULT_MAX_FILE_SIZE
}

fn default_single_file_per_owner() -> bool {
    true
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            single_file_per_owner: default_single_file_per_owner(),
        }
    }
}

impl FilesConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size == 0 {
            return Err("files.max_file_size must be greater than zero".to_string());
        }
        // The limit becomes an axum body limit, which is a usize.
        if usize::try_from(self.max_file_size).is_err() {
            return Err(format!(
                "files.max_file_size {} does not fit in memory addressing",
                self.max_file_size
            ));
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Binds to an ephemeral local port and caps
    /// uploads at 1 MiB.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
                metrics_enabled: true,
            },
            files: FilesConfig {
                max_file_size: 1024 * 1024,
                single_file_per_owner: true,
            },
        }
    }

    /// Validate every section, reporting the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.files.validate()
    }
}
