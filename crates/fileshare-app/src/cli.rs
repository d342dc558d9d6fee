//! Command line arguments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fileshare_core::AppConfig;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "fileshare")]
#[command(about = "Upload and view files shared through the file sharing contract")]
pub struct Args {
    /// TOML config file (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the wallet-backed node
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Contract artifact JSON (ABI and network addresses)
    #[arg(short, long)]
    pub artifact: Option<PathBuf>,

    /// Gateway origin for "View File" links
    #[arg(short, long)]
    pub gateway: Option<String>,

    /// IPFS HTTP API used for uploads
    #[arg(long)]
    pub ipfs_api: Option<String>,
}

impl Args {
    /// Config file values with flags applied on top.
    pub fn resolve_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(url) = &self.rpc_url {
            config = config.with_rpc_url(url);
        }
        if let Some(path) = &self.artifact {
            config = config.with_artifact_path(path);
        }
        if let Some(origin) = &self.gateway {
            config = config.with_gateway_origin(origin);
        }
        if let Some(url) = &self.ipfs_api {
            config = config.with_ipfs_api_url(url);
        }
        Ok(config)
    }
}
