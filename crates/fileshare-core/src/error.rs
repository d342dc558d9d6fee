//! Error types for the file sharing front-end.
//!
//! Each external boundary has its own error enum. The panel-facing
//! [`SharedFilesError`] and [`UploadError`] carry the text the user sees.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::NetworkId;

/// Failure reported by the wallet provider.
///
/// The message is kept verbatim so a rejection reads exactly as the wallet
/// phrased it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// JSON-RPC failures.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Invalid RPC endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("{message}")]
    Node { code: i64, message: String },

    #[error("RPC response carried neither result nor error")]
    MissingResult,

    #[error("Unexpected RPC result: {0}")]
    Decode(String),

    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    #[error("Contract does not expose `{0}`")]
    UnsupportedCall(&'static str),
}

impl RpcError {
    /// JSON-RPC "method not found".
    pub const METHOD_NOT_FOUND: i64 = -32601;

    /// Whether the node rejected the method as unknown.
    pub fn is_method_not_found(&self) -> bool {
        matches!(self, RpcError::Node { code, .. } if *code == Self::METHOD_NOT_FOUND)
    }
}

impl From<RpcError> for ProviderError {
    fn from(e: RpcError) -> Self {
        ProviderError::new(e.to_string())
    }
}

/// Errors while encoding or decoding contract call data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("Invalid hex data: {0}")]
    InvalidHex(String),

    #[error("Return data is empty")]
    Empty,

    #[error("Return data too short: needed {needed} bytes, got {actual}")]
    OutOfBounds { needed: usize, actual: usize },

    #[error("Offset or length does not fit in memory")]
    Overflow,

    #[error("String is not valid UTF-8")]
    InvalidUtf8,
}

/// Errors while loading or validating a contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid address for network {network}: {address}")]
    InvalidAddress { network: String, address: String },

    #[error("Contract interface is missing function `{0}`")]
    MissingFunction(String),
}

/// Failures of the content store (IPFS HTTP API).
#[derive(Debug, Error)]
pub enum ContentStoreError {
    #[error("Content store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Content store rejected the file ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("Unexpected content store response: {0}")]
    Decode(String),
}

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How a user can get past a shared-files failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Reload the application to run initialization again.
    Reload,
    /// Switch the wallet to another network, or deploy the contract.
    SwitchNetworkOrDeploy,
    /// Nothing to recover; the flow was abandoned on purpose.
    NotApplicable,
}

/// Failures of the shared-files initialization and listing flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SharedFilesError {
    /// The wallet refused account access.
    #[error("{0}")]
    AuthorizationDenied(String),

    /// The artifact has no deployment record for the active network.
    #[error(
        "Contract not deployed on the current network ({network_id}). Please deploy your contract first."
    )]
    MissingDeployment { network_id: NetworkId },

    /// Any other provider failure, e.g. the network id lookup.
    #[error("{0}")]
    Provider(String),

    /// The "list visible files" call failed or reverted.
    #[error("Error loading shared files. Please try again.")]
    ListingFailed,

    /// The owning panel went away before the flow finished.
    #[error("Shared files request was cancelled.")]
    Cancelled,
}

impl SharedFilesError {
    pub fn recovery(&self) -> Recovery {
        match self {
            SharedFilesError::MissingDeployment { .. } => Recovery::SwitchNetworkOrDeploy,
            SharedFilesError::Cancelled => Recovery::NotApplicable,
            SharedFilesError::AuthorizationDenied(_)
            | SharedFilesError::Provider(_)
            | SharedFilesError::ListingFailed => Recovery::Reload,
        }
    }

    /// Configuration problem rather than a connectivity problem.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SharedFilesError::MissingDeployment { .. })
    }
}

/// Failures of the upload flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Invalid upload: {0}")]
    InvalidInput(String),

    #[error("Could not connect: {0}")]
    Connection(String),

    #[error("Failed to store file: {0}")]
    Storage(String),

    #[error("Failed to register file on chain: {0}")]
    Registration(String),

    #[error("Upload was cancelled.")]
    Cancelled,
}

impl From<SharedFilesError> for UploadError {
    fn from(e: SharedFilesError) -> Self {
        match e {
            SharedFilesError::Cancelled => UploadError::Cancelled,
            other => UploadError::Connection(other.to_string()),
        }
    }
}
