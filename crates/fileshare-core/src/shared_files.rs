//! Shared-files initialization and listing.
//!
//! [`connect`] authorizes the account, finds the deployment for the active
//! network and binds a contract handle. [`load_shared_files`] lists the ids
//! visible to the account and resolves each one concurrently. Every
//! external call is raced against the caller's [`CancellationToken`].

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::artifact::ContractArtifact;
use crate::error::SharedFilesError;
use crate::provider::{NO_ACCOUNTS_MESSAGE, WalletProvider};
use crate::registry::{ContractBinder, FileRegistry};
use crate::types::{Account, FileRecord, NetworkId};

/// Result of the listing and resolution procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Records that resolved, in the order the contract listed their ids.
    Loaded(Vec<FileRecord>),
    /// The contract lists no files for this account.
    Empty,
    Failed(SharedFilesError),
}

impl LoadOutcome {
    pub fn records(&self) -> &[FileRecord] {
        match self {
            LoadOutcome::Loaded(records) => records,
            LoadOutcome::Empty | LoadOutcome::Failed(_) => &[],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoadOutcome::Failed(SharedFilesError::Cancelled))
    }
}

/// An authorized account bound to the contract on its network.
#[derive(Clone)]
pub struct Connection {
    pub account: Account,
    pub network_id: NetworkId,
    pub registry: Arc<dyn FileRegistry>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("account", &self.account)
            .field("network_id", &self.network_id)
            .finish_non_exhaustive()
    }
}

/// What one run of [`initialize`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    /// Set once account access was granted.
    pub account: Option<Account>,
    pub outcome: LoadOutcome,
}

pub(crate) async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, SharedFilesError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(SharedFilesError::Cancelled),
        out = fut => Ok(out),
    }
}

/// Authorizes the account and binds the contract for the active network.
pub async fn connect<P, B>(
    provider: &P,
    binder: &B,
    artifact: &ContractArtifact,
    cancel: &CancellationToken,
) -> Result<Connection, SharedFilesError>
where
    P: WalletProvider + ?Sized,
    B: ContractBinder + ?Sized,
{
    until_cancelled(cancel, provider.request_account_access())
        .await?
        .map_err(|e| {
            warn!(error = %e, "Account access rejected");
            SharedFilesError::AuthorizationDenied(e.message)
        })?;

    let accounts = until_cancelled(cancel, provider.list_accounts())
        .await?
        .map_err(|e| SharedFilesError::Provider(e.message))?;
    let account = accounts
        .into_iter()
        .next()
        .ok_or_else(|| SharedFilesError::AuthorizationDenied(NO_ACCOUNTS_MESSAGE.to_string()))?;

    let network_id = until_cancelled(cancel, provider.current_network_id())
        .await?
        .map_err(|e| SharedFilesError::Provider(e.message))?;

    let deployment = artifact.deployment(network_id).ok_or_else(|| {
        warn!(%network_id, "No deployment record for network");
        SharedFilesError::MissingDeployment { network_id }
    })?;

    let registry = binder.bind(artifact, deployment.address);
    info!(%account, %network_id, address = %deployment.address, "Connected to file registry");

    Ok(Connection {
        account,
        network_id,
        registry,
    })
}

/// Lists the files visible to `account` and resolves their metadata.
///
/// Resolutions run concurrently and are all awaited. A failed resolution
/// drops that one record; the rest keep the listing order.
pub async fn load_shared_files(
    registry: &dyn FileRegistry,
    account: &Account,
    cancel: &CancellationToken,
) -> LoadOutcome {
    let ids = match until_cancelled(cancel, registry.list_visible_files(account)).await {
        Ok(Ok(ids)) => ids,
        Ok(Err(e)) => {
            error!(error = %e, "Error loading shared files");
            return LoadOutcome::Failed(SharedFilesError::ListingFailed);
        }
        Err(cancelled) => return LoadOutcome::Failed(cancelled),
    };

    if ids.is_empty() {
        info!(%account, "No shared files");
        return LoadOutcome::Empty;
    }

    let fetches = ids.iter().map(|id| async move {
        match registry.get_file(id).await {
            Ok(entry) => Some(entry.into_record(*id)),
            Err(e) => {
                warn!(file_id = %id, error = %e, "Error fetching file details");
                None
            }
        }
    });

    let resolved = match until_cancelled(cancel, join_all(fetches)).await {
        Ok(resolved) => resolved,
        Err(cancelled) => return LoadOutcome::Failed(cancelled),
    };

    let records: Vec<FileRecord> = resolved.into_iter().flatten().collect();
    info!(listed = ids.len(), resolved = records.len(), "Shared files loaded");
    LoadOutcome::Loaded(records)
}

/// Runs the whole shared-files flow once.
pub async fn initialize<P, B>(
    provider: &P,
    binder: &B,
    artifact: &ContractArtifact,
    cancel: &CancellationToken,
) -> InitReport
where
    P: WalletProvider + ?Sized,
    B: ContractBinder + ?Sized,
{
    let connection = match connect(provider, binder, artifact, cancel).await {
        Ok(connection) => connection,
        Err(e) => {
            return InitReport {
                account: None,
                outcome: LoadOutcome::Failed(e),
            };
        }
    };

    let outcome = load_shared_files(connection.registry.as_ref(), &connection.account, cancel).await;
    InitReport {
        account: Some(connection.account),
        outcome,
    }
}
