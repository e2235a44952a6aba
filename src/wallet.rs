use std::fmt::Display;

use async_trait::async_trait;
use thiserror::Error;

use crate::traits::Wallet;
use crate::types::abbreviate;

pub type AccountId = String;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("no wallet provider available")]
    NoProvider,
    #[error("wallet connection rejected: {0}")]
    Rejected(String),
}

/// Connection state as shown next to the connect button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletStatus {
    Connected(AccountId),
    Disconnected,
    NoProvider,
}

impl WalletStatus {
    pub async fn connect(wallet: &dyn Wallet) -> Self {
        match wallet.connect().await {
            Ok(account) => {
                log::info!("Wallet connected: {account}");
                Self::Connected(account)
            }
            Err(WalletError::NoProvider) => {
                log::warn!("No wallet provider found");
                Self::NoProvider
            }
            Err(err) => {
                log::warn!("Wallet connection failed: {err}");
                Self::Disconnected
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    pub fn account(&self) -> Option<&str> {
        match self {
            Self::Connected(account) => Some(account),
            _ => None,
        }
    }
}

impl Display for WalletStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected(account) => write!(f, "Connected: {}", abbreviate(account, 6)),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::NoProvider => write!(f, "No wallet provider"),
        }
    }
}

/// The environment has no wallet at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableWallet;

#[async_trait]
impl Wallet for UnavailableWallet {
    async fn connect(&self) -> Result<AccountId, WalletError> {
        Err(WalletError::NoProvider)
    }
}

/// Always connects to the same, preconfigured account.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    account: AccountId,
}

impl StaticWallet {
    pub fn new<S: Into<AccountId>>(account: S) -> Self {
        Self {
            account: account.into(),
        }
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    async fn connect(&self) -> Result<AccountId, WalletError> {
        if self.account.trim().is_empty() {
            return Err(WalletError::Rejected("empty account".into()));
        }
        Ok(self.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_wallet_connects() {
        let status = WalletStatus::connect(&StaticWallet::new("0x9fA3c0dE")).await;
        assert!(status.is_connected());
        assert_eq!(status.account(), Some("0x9fA3c0dE"));
        assert_eq!(status.to_string(), "Connected: 0x9fA3...");
    }

    #[tokio::test]
    async fn failures_degrade_to_status() {
        assert_eq!(WalletStatus::connect(&UnavailableWallet).await, WalletStatus::NoProvider);
        assert_eq!(WalletStatus::connect(&StaticWallet::new(" ")).await, WalletStatus::Disconnected);
        assert_eq!(WalletStatus::Disconnected.to_string(), "Disconnected");
    }
}
