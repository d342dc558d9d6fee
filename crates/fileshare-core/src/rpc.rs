//! Ethereum JSON-RPC client.
//!
//! One [`RpcClient`] serves as the wallet provider and as the contract
//! binder. Contract handles it creates share its pooled HTTP client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::abi::{self, Arg};
use crate::artifact::{ContractArtifact, ContractInterface, UPLOAD_FUNCTION};
use crate::error::{ProviderError, RpcError};
use crate::provider::{NO_ACCOUNTS_MESSAGE, WalletProvider};
use crate::registry::{ContractBinder, FileEntry, FileRegistry};
use crate::types::{Account, Address, FileId, NetworkId};

/// Gas allowance attached to read calls (50,000,000).
pub const CALL_GAS: &str = "0x2faf080";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RpcResponse {
    fn into_result<T: DeserializeOwned>(self) -> Result<T, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }
        let value = self.result.ok_or(RpcError::MissingResult)?;
        serde_json::from_value(value).map_err(|e| RpcError::Decode(e.to_string()))
    }
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// JSON-RPC client for a wallet-backed node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    inner: Arc<Inner>,
}

impl RpcClient {
    /// Client for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, RpcError> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RpcError::InvalidEndpoint(url));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                url,
                next_id: AtomicU64::new(1),
            }),
        })
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Sends one JSON-RPC request and decodes its result.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(method, id, "RPC request");

        let response: RpcResponse = self
            .inner
            .http
            .post(&self.inner.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        response.into_result()
    }

    /// Read-only contract call against the latest block.
    pub async fn eth_call(
        &self,
        from: Option<&Account>,
        to: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, RpcError> {
        let raw: String = self
            .request("eth_call", json!([call_object(from, to, data), "latest"]))
            .await?;
        Ok(abi::decode_hex(&raw)?)
    }

    /// State-changing call signed by the wallet; returns the transaction hash.
    pub async fn send_transaction(
        &self,
        from: &Account,
        to: Address,
        data: &[u8],
    ) -> Result<String, RpcError> {
        let tx = json!({
            "from": from.as_str(),
            "to": to.to_hex(),
            "data": abi::encode_hex(data),
        });
        self.request("eth_sendTransaction", json!([tx])).await
    }
}

fn call_object(from: Option<&Account>, to: Address, data: &[u8]) -> Value {
    let mut call = json!({
        "to": to.to_hex(),
        "data": abi::encode_hex(data),
        "gas": CALL_GAS,
    });
    if let Some(from) = from {
        call["from"] = Value::String(from.as_str().to_string());
    }
    call
}

fn parse_network_id(value: &Value) -> Option<NetworkId> {
    let id = match value {
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => s.parse().ok(),
        },
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    id.map(NetworkId)
}

#[async_trait]
impl WalletProvider for RpcClient {
    async fn request_account_access(&self) -> Result<Account, ProviderError> {
        let accounts: Vec<String> = match self.request("eth_requestAccounts", json!([])).await {
            Ok(accounts) => accounts,
            Err(e) if e.is_method_not_found() => {
                debug!("Node has no eth_requestAccounts, using eth_accounts");
                self.request("eth_accounts", json!([])).await?
            }
            Err(e) => return Err(e.into()),
        };
        accounts
            .into_iter()
            .next()
            .map(Account)
            .ok_or_else(|| ProviderError::new(NO_ACCOUNTS_MESSAGE))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let accounts: Vec<String> = self.request("eth_accounts", json!([])).await?;
        Ok(accounts.into_iter().map(Account).collect())
    }

    async fn current_network_id(&self) -> Result<NetworkId, ProviderError> {
        let value: Value = self.request("net_version", json!([])).await?;
        parse_network_id(&value)
            .ok_or_else(|| ProviderError::new(format!("Unrecognized network id: {}", value)))
    }
}

impl ContractBinder for RpcClient {
    fn bind(&self, artifact: &ContractArtifact, address: Address) -> Arc<dyn FileRegistry> {
        debug!(contract = %artifact.name, %address, "Binding contract handle");
        Arc::new(RpcFileRegistry {
            client: self.clone(),
            address,
            interface: artifact.interface.clone(),
        })
    }
}

/// Contract handle backed by [`RpcClient`].
#[derive(Debug, Clone)]
pub struct RpcFileRegistry {
    client: RpcClient,
    address: Address,
    interface: ContractInterface,
}

impl RpcFileRegistry {
    pub fn address(&self) -> Address {
        self.address
    }
}

#[async_trait]
impl FileRegistry for RpcFileRegistry {
    async fn list_visible_files(&self, caller: &Account) -> Result<Vec<FileId>, RpcError> {
        let data = abi::encode_call(self.interface.list_files, &[]);
        let raw = self.client.eth_call(Some(caller), self.address, &data).await?;
        let ids = abi::decode_uint_array(&raw)?;
        debug!(count = ids.len(), "Raw file ids");
        Ok(ids.into_iter().map(FileId).collect())
    }

    async fn get_file(&self, file_id: &FileId) -> Result<FileEntry, RpcError> {
        let data = abi::encode_call(self.interface.get_file, &[Arg::Uint(&file_id.0)]);
        let raw = self.client.eth_call(None, self.address, &data).await?;
        let entry = FileEntry::decode(&raw)?;
        debug!(%file_id, name = %entry.file_name, "File details");
        Ok(entry)
    }

    async fn register_file(
        &self,
        owner: &Account,
        content_hash: &str,
        file_name: &str,
    ) -> Result<String, RpcError> {
        let selector = self
            .interface
            .upload_file
            .ok_or(RpcError::UnsupportedCall(UPLOAD_FUNCTION))?;
        let data = abi::encode_call(selector, &[Arg::Str(content_hash), Arg::Str(file_name)]);
        self.client.send_transaction(owner, self.address, &data).await
    }
}
