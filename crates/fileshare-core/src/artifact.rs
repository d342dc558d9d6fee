//! Compiled contract artifact: call interface plus per-network addresses.
//!
//! Reads the JSON emitted by the contract toolchain (`contractName`, `abi`,
//! `networks`). Selectors for the functions the front-end calls are
//! computed once, at load time, from the ABI entries.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::abi::{self, Selector};
use crate::error::ArtifactError;
use crate::types::{Address, NetworkId};

/// Lists the file ids the caller may view.
pub const LIST_FUNCTION: &str = "getSharedFiles";
/// Resolves a file id to `(contentHash, fileName, ...)`.
pub const GET_FUNCTION: &str = "getFile";
/// Registers `(contentHash, fileName)` for the caller.
pub const UPLOAD_FUNCTION: &str = "uploadFile";

#[derive(Debug, Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName", default)]
    contract_name: String,
    abi: Vec<AbiItem>,
    #[serde(default)]
    networks: BTreeMap<String, RawNetwork>,
}

#[derive(Debug, Deserialize)]
struct RawNetwork {
    address: String,
}

#[derive(Debug, Deserialize)]
struct AbiItem {
    #[serde(rename = "type", default = "default_item_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    components: Vec<AbiParam>,
}

fn default_item_type() -> String {
    "function".to_string()
}

impl AbiParam {
    /// Canonical type as used in signatures; tuples expand to `(a,b)`.
    fn canonical(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> = self.components.iter().map(AbiParam::canonical).collect();
                format!("({}){}", inner.join(","), suffix)
            }
            None => self.ty.clone(),
        }
    }
}

impl AbiItem {
    fn signature(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(AbiParam::canonical).collect();
        format!("{}({})", self.name, inputs.join(","))
    }
}

/// The call interface the front-end relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInterface {
    pub list_files: Selector,
    pub get_file: Selector,
    /// Absent for read-only deployments.
    pub upload_file: Option<Selector>,
}

/// Where the contract lives on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    pub network_id: NetworkId,
    pub address: Address,
}

/// A loaded, validated contract artifact.
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub interface: ContractInterface,
    deployments: BTreeMap<NetworkId, Address>,
}

impl ContractArtifact {
    /// Reads and validates an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses and validates artifact JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;

        let find = |name: &str| -> Option<Selector> {
            raw.abi
                .iter()
                .find(|item| item.kind == "function" && item.name == name)
                .map(|item| abi::selector(&item.signature()))
        };

        let interface = ContractInterface {
            list_files: find(LIST_FUNCTION)
                .ok_or_else(|| ArtifactError::MissingFunction(LIST_FUNCTION.to_string()))?,
            get_file: find(GET_FUNCTION)
                .ok_or_else(|| ArtifactError::MissingFunction(GET_FUNCTION.to_string()))?,
            upload_file: find(UPLOAD_FUNCTION),
        };

        let mut deployments = BTreeMap::new();
        for (key, network) in &raw.networks {
            let Ok(id) = key.parse::<u64>() else {
                warn!(network = %key, "Skipping artifact network with non-numeric id");
                continue;
            };
            let address =
                network
                    .address
                    .parse::<Address>()
                    .map_err(|_| ArtifactError::InvalidAddress {
                        network: key.clone(),
                        address: network.address.clone(),
                    })?;
            deployments.insert(NetworkId(id), address);
        }

        Ok(Self {
            name: raw.contract_name,
            interface,
            deployments,
        })
    }

    /// The deployment record for a network, if the contract was deployed there.
    pub fn deployment(&self, network_id: NetworkId) -> Option<Deployment> {
        self.deployments.get(&network_id).map(|address| Deployment {
            network_id,
            address: *address,
        })
    }

    /// Networks that have a deployment record.
    pub fn networks(&self) -> impl Iterator<Item = NetworkId> + '_ {
        self.deployments.keys().copied()
    }
}
