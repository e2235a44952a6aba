use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ProvenanceError;

const QR_SUFFIX: &str = "_qrcode.png";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryInfo {
    pub recipient: String,
    pub address:   String,
    pub timestamp: String,
}

/// A product's provenance entry as the ledger would report it.
///
/// Fields are only reachable through getters. A stored record never changes in place: shipments replace it as a
/// whole.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductRecord {
    product_id:      String,
    batch:           String,
    factory:         String,
    owner:           String,
    delivered:       bool,
    replaced:        bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery_info:   Option<DeliveryInfo>,
    transaction_ref: String,
    qr_token:        String,
}

impl ProductRecord {
    /// A freshly registered product still sitting at its factory.
    pub fn registered<S: Into<String>>(product_id: S, batch: S, factory: S, transaction_ref: S) -> Self {
        let product_id = product_id.into();
        let factory = factory.into();
        Self {
            qr_token: Self::qr_token_for(&product_id),
            owner: factory.clone(),
            product_id,
            batch: batch.into(),
            factory,
            delivered: false,
            replaced: false,
            delivery_info: None,
            transaction_ref: transaction_ref.into(),
        }
    }

    /// Mark the product as handed over. The delivery address becomes the product's current owner.
    pub fn delivered_to(mut self, info: DeliveryInfo) -> Self {
        self.owner = info.address.clone();
        self.delivered = true;
        self.delivery_info = Some(info);
        self
    }

    pub fn returned(mut self) -> Self {
        self.replaced = true;
        self
    }

    pub fn qr_token_for(product_id: &str) -> String {
        format!("{product_id}{QR_SUFFIX}")
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn factory(&self) -> &str {
        &self.factory
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    pub fn is_replaced(&self) -> bool {
        self.replaced
    }

    pub fn delivery_info(&self) -> Option<&DeliveryInfo> {
        self.delivery_info.as_ref()
    }

    pub fn transaction_ref(&self) -> &str {
        &self.transaction_ref
    }

    pub fn qr_token(&self) -> &str {
        &self.qr_token
    }

    /// The data encoded into the verification QR image.
    pub fn qr_payload(&self) -> &str {
        self.qr_token.strip_suffix(QR_SUFFIX).unwrap_or(&self.qr_token)
    }

    /// Records coming from outside of the crate (seed files) must keep delivery flag and delivery details in sync.
    pub(crate) fn check_consistency(&self) -> Result<(), ProvenanceError> {
        let reason = match (self.delivered, self.delivery_info.is_some()) {
            (true, false) => "delivered without delivery details",
            (false, true) => "delivery details on an undelivered product",
            _ if self.product_id.trim().is_empty() => "empty product id",
            _ => return Ok(()),
        };
        Err(ProvenanceError::InvalidRecord {
            product_id: self.product_id.clone(),
            reason,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub location:  String,
    pub timestamp: String,
    pub action:    String,
}

impl HistoryEvent {
    pub fn new<S: Into<String>>(location: S, timestamp: S, action: S) -> Self {
        Self {
            location:  location.into(),
            timestamp: timestamp.into(),
            action:    action.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Shorten a long identifier the way dashboards display hashes and addresses.
pub fn abbreviate(value: &str, keep: usize) -> String {
    match value.char_indices().nth(keep) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => format!("{value}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery() -> DeliveryInfo {
        DeliveryInfo {
            recipient: "Varun".into(),
            address:   "BITS".into(),
            timestamp: "2025-10-25 20:26:17 UTC".into(),
        }
    }

    #[test]
    fn registered_record_sits_at_factory() {
        let record = ProductRecord::registered("P1", "B001", "India-FactoryA", "0xabc");
        assert_eq!(record.owner(), "India-FactoryA");
        assert!(!record.is_delivered());
        assert!(record.delivery_info().is_none());
        assert_eq!(record.qr_token(), "P1_qrcode.png");
        assert_eq!(record.qr_payload(), "P1");
        assert!(record.check_consistency().is_ok());
    }

    #[test]
    fn delivery_moves_ownership() {
        let record = ProductRecord::registered("P1", "B001", "India-FactoryA", "0xabc").delivered_to(delivery());
        assert_eq!(record.owner(), "BITS");
        assert!(record.is_delivered());
        assert!(record.check_consistency().is_ok());
    }

    #[test]
    fn inconsistent_seed_record_is_rejected() {
        let json = r#"{
            "product_id": "P9", "batch": "B", "factory": "F", "owner": "F",
            "delivered": true, "replaced": false, "transaction_ref": "0x1", "qr_token": "P9_qrcode.png"
        }"#;
        let record: ProductRecord = serde_json::from_str(json).unwrap();
        let err = record.check_consistency().unwrap_err();
        assert!(matches!(err, ProvenanceError::InvalidRecord { ref product_id, .. } if product_id == "P9"));
    }

    #[test]
    fn abbreviation() {
        assert_eq!(abbreviate("0901524b0c06fa31159614d0770a04aa", 15), "0901524b0c06fa3...");
        assert_eq!(abbreviate("0x12345678", 6), "0x1234...");
        assert_eq!(abbreviate("BITS", 15), "BITS...");
    }
}
