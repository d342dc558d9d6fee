//! Process-wide handles shared by the panels.
//!
//! Built once in `main` before the window opens. Panels only read them;
//! each panel still owns its own account, contract handle and state.

use std::sync::OnceLock;

use anyhow::Context;
use fileshare_core::{AppConfig, ContractArtifact, Gateway, IpfsClient, RpcClient};

/// Clients and settings handed to the panels.
#[derive(Debug, Clone)]
pub struct Services {
    pub config: AppConfig,
    pub artifact: ContractArtifact,
    pub rpc: RpcClient,
    pub ipfs: IpfsClient,
    pub gateway: Gateway,
}

impl Services {
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let artifact = ContractArtifact::load(&config.artifact_path).with_context(|| {
            format!("loading contract artifact {}", config.artifact_path.display())
        })?;
        let rpc = RpcClient::with_timeout(&config.rpc_url, config.request_timeout())
            .context("creating JSON-RPC client")?;
        let ipfs = IpfsClient::new(&config.ipfs_api_url, config.request_timeout())
            .context("creating IPFS client")?;
        let gateway = config.gateway();

        Ok(Self {
            config,
            artifact,
            rpc,
            ipfs,
            gateway,
        })
    }
}

static SERVICES: OnceLock<Services> = OnceLock::new();

/// Installs the services; later calls are ignored.
pub fn install(services: Services) {
    if SERVICES.set(services).is_err() {
        tracing::warn!("Services already installed");
    }
}

pub fn services() -> Option<&'static Services> {
    SERVICES.get()
}
