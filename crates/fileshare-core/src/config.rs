//! Application configuration.
//!
//! Values come from an optional TOML file; anything missing falls back
//! to the defaults below. Command-line flags are applied on top with the
//! `with_*` setters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::gateway::{DEFAULT_GATEWAY_ORIGIN, Gateway};

/// Local development node (Ganache default port).
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:7545";
/// Where the contract toolchain writes its build output.
pub const DEFAULT_ARTIFACT_PATH: &str = "contracts/FileSharing.json";
/// Local IPFS daemon API.
pub const DEFAULT_IPFS_API_URL: &str = "http://127.0.0.1:5001";

/// Configuration for the desktop app.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON-RPC endpoint of the wallet-backed node.
    pub rpc_url: String,
    /// Contract artifact (ABI plus per-network addresses).
    pub artifact_path: PathBuf,
    /// Gateway origin used for "View File" links.
    pub gateway_origin: String,
    /// IPFS HTTP API used by the upload panel.
    pub ipfs_api_url: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            gateway_origin: DEFAULT_GATEWAY_ORIGIN.to_string(),
            ipfs_api_url: DEFAULT_IPFS_API_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Reads a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    pub fn with_artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn with_gateway_origin(mut self, origin: impl Into<String>) -> Self {
        self.gateway_origin = origin.into();
        self
    }

    pub fn with_ipfs_api_url(mut self, url: impl Into<String>) -> Self {
        self.ipfs_api_url = url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn gateway(&self) -> Gateway {
        Gateway::new(self.gateway_origin.clone())
    }
}
