//! # Fileshare Core
//!
//! Wallet, contract and content-store plumbing behind the decentralized
//! file sharing front-end.
//!
//! The UI never talks to a node directly. It is handed capabilities:
//!
//! - [`WalletProvider`]: account authorization and network discovery
//! - [`FileRegistry`]: the deployed file-sharing contract (list, read, register)
//! - [`ContractBinder`]: turns an artifact plus an address into a [`FileRegistry`]
//! - [`ContentStore`]: stores file bytes and hands back a content hash
//! - [`UrlOpener`]: opens a gateway URL in a new viewing context
//!
//! [`RpcClient`] implements the first three over Ethereum JSON-RPC and
//! [`IpfsClient`] implements the content store over the IPFS HTTP API.
//! The [`mock`] module provides scripted in-memory versions for tests.
//!
//! ## Shared files flow
//!
//! ```rust,ignore
//! use fileshare_core::{initialize, ContractArtifact, RpcClient, SharedFilesState};
//! use tokio_util::sync::CancellationToken;
//!
//! let rpc = RpcClient::new("http://127.0.0.1:7545")?;
//! let artifact = ContractArtifact::load("contracts/FileSharing.json")?;
//! let cancel = CancellationToken::new();
//!
//! let mut state = SharedFilesState::new();
//! state.apply(initialize(&rpc, &rpc, &artifact, &cancel).await);
//! ```

pub mod abi;
pub mod artifact;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod provider;
pub mod registry;
pub mod rpc;
pub mod shared_files;
pub mod state;
pub mod types;
pub mod upload;

pub use artifact::{ContractArtifact, Deployment};
pub use config::AppConfig;
pub use error::*;
pub use gateway::{Gateway, UrlOpener, open_file};
pub use provider::WalletProvider;
pub use registry::{ContractBinder, FileEntry, FileRegistry};
pub use rpc::RpcClient;
pub use shared_files::{Connection, InitReport, LoadOutcome, connect, initialize, load_shared_files};
pub use state::{
    Banner, BannerTone, PanelStatus, PickedFile, SharedFilesState, UploadState, UploadStatus,
};
pub use types::*;
pub use upload::{ContentStore, IpfsClient, UploadReceipt, submit_file};
