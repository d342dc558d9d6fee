//! Scripted in-memory capabilities for testing
//!
//! Stand-ins for the wallet, the contract, the content store and the URL
//! opener, so panel flows can be exercised without a node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fileshare_core::mock::{MockBinder, MockRegistry, MockWallet, sample_artifact};
//!
//! let wallet = MockWallet::new(Account::new("0xme"), NetworkId(5777));
//! let registry = MockRegistry::new()
//!     .with_file(FileId::from(1), "QmA", "a.txt")
//!     .failing_file(FileId::from(2));
//! let binder = MockBinder::new(registry);
//!
//! let report = initialize(&wallet, &binder, &sample_artifact(), &cancel).await;
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use sha3::{Digest, Keccak256};
use tokio::sync::Mutex;

use crate::artifact::ContractArtifact;
use crate::error::{ContentStoreError, ProviderError, RpcError};
use crate::gateway::UrlOpener;
use crate::provider::{NO_ACCOUNTS_MESSAGE, WalletProvider};
use crate::registry::{ContractBinder, FileEntry, FileRegistry};
use crate::types::{Account, Address, FileId, NetworkId};
use crate::upload::ContentStore;

/// Artifact JSON with the three registry functions and one deployment on
/// network 5777.
pub const SAMPLE_ARTIFACT_JSON: &str = r#"{
    "contractName": "FileSharing",
    "abi": [
        { "type": "constructor", "inputs": [] },
        {
            "type": "function",
            "name": "uploadFile",
            "inputs": [
                { "name": "_ipfsHash", "type": "string" },
                { "name": "_fileName", "type": "string" }
            ],
            "outputs": []
        },
        {
            "type": "function",
            "name": "getFile",
            "inputs": [{ "name": "_fileId", "type": "uint256" }],
            "outputs": [
                { "name": "", "type": "string" },
                { "name": "", "type": "string" },
                { "name": "", "type": "address" }
            ]
        },
        {
            "type": "function",
            "name": "getSharedFiles",
            "inputs": [],
            "outputs": [{ "name": "", "type": "uint256[]" }]
        }
    ],
    "networks": {
        "5777": { "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3" }
    }
}"#;

/// Parsed [`SAMPLE_ARTIFACT_JSON`].
pub fn sample_artifact() -> ContractArtifact {
    ContractArtifact::from_json_str(SAMPLE_ARTIFACT_JSON).expect("sample artifact is valid")
}

fn revert(message: &str) -> RpcError {
    RpcError::Node {
        code: -32000,
        message: message.to_string(),
    }
}

/// A wallet with fixed accounts and network.
#[derive(Debug, Clone)]
pub struct MockWallet {
    accounts: Vec<Account>,
    network_id: NetworkId,
    access_error: Option<String>,
    network_error: Option<String>,
    access_requests: Arc<AtomicUsize>,
}

impl MockWallet {
    pub fn new(account: Account, network_id: NetworkId) -> Self {
        Self {
            accounts: vec![account],
            network_id,
            access_error: None,
            network_error: None,
            access_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Rejects account access with `message`.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.access_error = Some(message.into());
        self
    }

    pub fn with_accounts(mut self, accounts: Vec<Account>) -> Self {
        self.accounts = accounts;
        self
    }

    /// Fails the network id lookup with `message`.
    pub fn failing_network(mut self, message: impl Into<String>) -> Self {
        self.network_error = Some(message.into());
        self
    }

    pub fn access_requests(&self) -> usize {
        self.access_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn request_account_access(&self) -> Result<Account, ProviderError> {
        self.access_requests.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.access_error {
            return Err(ProviderError::new(message.clone()));
        }
        self.accounts
            .first()
            .cloned()
            .ok_or_else(|| ProviderError::new(NO_ACCOUNTS_MESSAGE))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        Ok(self.accounts.clone())
    }

    async fn current_network_id(&self) -> Result<NetworkId, ProviderError> {
        match &self.network_error {
            Some(message) => Err(ProviderError::new(message.clone())),
            None => Ok(self.network_id),
        }
    }
}

/// An in-memory file registry.
///
/// Every listed file is visible to every caller. Lookups of unknown ids
/// and of ids marked with [`MockRegistry::failing_file`] revert.
#[derive(Debug, Default)]
pub struct MockRegistry {
    files: Vec<(FileId, FileEntry)>,
    failing: HashSet<FileId>,
    listing_error: Option<String>,
    registration_error: Option<String>,
    registered: Mutex<Vec<(Account, String, String)>>,
    list_calls: AtomicUsize,
    get_calls: AtomicUsize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(
        mut self,
        file_id: FileId,
        content_hash: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        self.files.push((
            file_id,
            FileEntry {
                content_hash: content_hash.into(),
                file_name: file_name.into(),
            },
        ));
        self
    }

    /// Makes `getFile` revert for this id; it is still listed.
    pub fn failing_file(mut self, file_id: FileId) -> Self {
        self.failing.insert(file_id);
        self
    }

    pub fn failing_listing(mut self, message: impl Into<String>) -> Self {
        self.listing_error = Some(message.into());
        self
    }

    pub fn failing_registration(mut self, message: impl Into<String>) -> Self {
        self.registration_error = Some(message.into());
        self
    }

    /// `(owner, content_hash, file_name)` for every successful registration.
    pub async fn registered(&self) -> Vec<(Account, String, String)> {
        self.registered.lock().await.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileRegistry for MockRegistry {
    async fn list_visible_files(&self, _caller: &Account) -> Result<Vec<FileId>, RpcError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.listing_error {
            return Err(revert(message));
        }
        Ok(self.files.iter().map(|(id, _)| *id).collect())
    }

    async fn get_file(&self, file_id: &FileId) -> Result<FileEntry, RpcError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(file_id) {
            return Err(revert("execution reverted"));
        }
        self.files
            .iter()
            .find(|(id, _)| id == file_id)
            .map(|(_, entry)| entry.clone())
            .ok_or_else(|| revert("execution reverted: file does not exist"))
    }

    async fn register_file(
        &self,
        owner: &Account,
        content_hash: &str,
        file_name: &str,
    ) -> Result<String, RpcError> {
        if let Some(message) = &self.registration_error {
            return Err(revert(message));
        }
        let mut registered = self.registered.lock().await;
        registered.push((owner.clone(), content_hash.to_string(), file_name.to_string()));
        Ok(format!("0x{:064x}", registered.len()))
    }
}

/// Hands out one shared [`MockRegistry`] and records bound addresses.
#[derive(Debug)]
pub struct MockBinder {
    registry: Arc<MockRegistry>,
    bound: StdMutex<Vec<Address>>,
}

impl MockBinder {
    pub fn new(registry: MockRegistry) -> Self {
        Self::shared(Arc::new(registry))
    }

    pub fn shared(registry: Arc<MockRegistry>) -> Self {
        Self {
            registry,
            bound: StdMutex::new(Vec::new()),
        }
    }

    pub fn registry(&self) -> &Arc<MockRegistry> {
        &self.registry
    }

    pub fn bound_addresses(&self) -> Vec<Address> {
        self.bound.lock().map(|b| b.clone()).unwrap_or_default()
    }
}

impl ContractBinder for MockBinder {
    fn bind(&self, _artifact: &ContractArtifact, address: Address) -> Arc<dyn FileRegistry> {
        if let Ok(mut bound) = self.bound.lock() {
            bound.push(address);
        }
        self.registry.clone()
    }
}

/// Records every URL it is asked to open.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: StdMutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl UrlOpener for RecordingOpener {
    fn open_in_new_context(&self, url: &str) {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
    }
}

/// Content store that keeps files in memory.
///
/// Hashes are `Qm` followed by the first 44 hex digits of the content's
/// Keccak-256, so equal content gets an equal hash.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    stored: Mutex<Vec<(String, Vec<u8>)>>,
    error: Option<String>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            stored: Mutex::new(Vec::new()),
            error: Some(message.into()),
        }
    }

    pub async fn stored(&self) -> Vec<(String, Vec<u8>)> {
        self.stored.lock().await.clone()
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn add(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ContentStoreError> {
        if let Some(message) = &self.error {
            return Err(ContentStoreError::Rejected {
                status: 500,
                body: message.clone(),
            });
        }
        let digest = hex::encode(Keccak256::digest(&bytes));
        let hash = format!("Qm{}", &digest[..44]);
        self.stored.lock().await.push((file_name.to_string(), bytes));
        Ok(hash)
    }
}
