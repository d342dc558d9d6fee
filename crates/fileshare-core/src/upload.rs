//! Upload flow: store the bytes, then register the hash on chain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::{ContentStoreError, UploadError};
use crate::registry::FileRegistry;
use crate::shared_files::until_cancelled;
use crate::types::Account;

/// Stores file contents and returns their content hash.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn add(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ContentStoreError>;
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Content store backed by an IPFS node's HTTP API.
#[derive(Debug, Clone)]
pub struct IpfsClient {
    http: reqwest::Client,
    api_url: String,
}

impl IpfsClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ContentStoreError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn add_url(&self) -> String {
        format!("{}/api/v0/add?pin=true", self.api_url)
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    async fn add(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ContentStoreError> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let response = self.http.post(self.add_url()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentStoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| ContentStoreError::Decode(e.to_string()))?;
        Ok(added.hash)
    }
}

/// A completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_name: String,
    pub content_hash: String,
    pub tx_hash: String,
}

/// Stores `bytes` and registers the resulting hash for `owner`.
pub async fn submit_file(
    store: &dyn ContentStore,
    registry: &dyn FileRegistry,
    owner: &Account,
    file_name: &str,
    bytes: Vec<u8>,
    cancel: &CancellationToken,
) -> Result<UploadReceipt, UploadError> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(UploadError::InvalidInput("file name is empty".into()));
    }
    if bytes.is_empty() {
        return Err(UploadError::InvalidInput(format!("{} is empty", file_name)));
    }

    let size = bytes.len();
    let content_hash = until_cancelled(cancel, store.add(file_name, bytes))
        .await?
        .map_err(|e| {
            error!(error = %e, file = file_name, "Failed to store file");
            UploadError::Storage(e.to_string())
        })?;
    info!(file = file_name, size, %content_hash, "File stored");

    let tx_hash = until_cancelled(cancel, registry.register_file(owner, &content_hash, file_name))
        .await?
        .map_err(|e| {
            error!(error = %e, file = file_name, "Failed to register file");
            UploadError::Registration(e.to_string())
        })?;
    info!(file = file_name, %tx_hash, "File registered");

    Ok(UploadReceipt {
        file_name: file_name.to_string(),
        content_hash,
        tx_hash,
    })
}
