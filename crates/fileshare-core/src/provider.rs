//! Wallet provider capability.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{Account, NetworkId};

/// Reported when the wallet authorizes access but exposes no account.
pub const NO_ACCOUNTS_MESSAGE: &str = "No accounts available from the wallet provider.";

/// Account and network access supplied by the host environment.
///
/// The panel is handed an implementation at initialization instead of
/// reaching for an ambient global, so tests can substitute a fake.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet to authorize account access.
    ///
    /// Returns the first authorized account. A user or environment
    /// rejection comes back as an error carrying the wallet's message.
    async fn request_account_access(&self) -> Result<Account, ProviderError>;

    /// Accounts currently exposed by the wallet, primary first.
    async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError>;

    /// Identifier of the network the wallet is connected to.
    async fn current_network_id(&self) -> Result<NetworkId, ProviderError>;
}
