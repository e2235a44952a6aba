use async_trait::async_trait;

use crate::geocode::GeocodeError;
use crate::shipment::ShipmentReceipt;
use crate::wallet::AccountId;
use crate::wallet::WalletError;

/// Subscriber to store events. All methods are optional.
#[async_trait]
pub trait StoreObserver: Send + Sync + 'static {
    async fn on_shipment_recorded(&self, _receipt: &ShipmentReceipt) {}
    async fn on_warning(&self, _message: &str) {}
}

// A browser wallet or anything else capable of providing an account.
#[async_trait]
pub trait Wallet: Send + Sync + 'static {
    async fn connect(&self) -> Result<AccountId, WalletError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync + 'static {
    /// Best matching place name for a partial user input, if there is one.
    async fn suggest(&self, query: &str) -> Result<Option<String>, GeocodeError>;
}
