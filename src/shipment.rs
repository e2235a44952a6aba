use std::fmt::Write;

use fieldx::fxstruct;
use garde::Validate;
use tokio::sync::oneshot;

use crate::error::ProvenanceError;
use crate::error::Result;
use crate::types::abbreviate;

#[allow(clippy::ptr_arg)]
fn not_blank(value: &String, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        Err(garde::Error::new("must not be blank"))
    }
    else {
        Ok(())
    }
}

/// What a user fills into the shipping form.
#[derive(Debug, Clone, Validate)]
#[fxstruct(no_new, builder, get)]
pub struct ShipmentRequest {
    #[fieldx(builder(into))]
    #[garde(custom(not_blank))]
    product_id:        String,

    #[fieldx(builder(into))]
    #[garde(custom(not_blank))]
    recipient_name:    String,

    /// Recipient's wallet address. It is required by the form but doesn't make it into the ledger record.
    #[fieldx(builder(into))]
    #[garde(custom(not_blank))]
    recipient_address: String,

    /// Where the product is heading to. Becomes the delivery address of the record.
    #[fieldx(builder(into))]
    #[garde(custom(not_blank))]
    location_detail:   String,
}

impl ShipmentRequest {
    pub fn new<S: Into<String>>(product_id: S, recipient_name: S, recipient_address: S, location_detail: S) -> Self {
        Self {
            product_id:        product_id.into(),
            recipient_name:    recipient_name.into(),
            recipient_address: recipient_address.into(),
            location_detail:   location_detail.into(),
        }
    }

    /// The same request with all fields trimmed.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.product_id.trim(),
            self.recipient_name.trim(),
            self.recipient_address.trim(),
            self.location_detail.trim(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShipmentReceipt {
    pub product_id:      String,
    pub transaction_ref: String,
    pub timestamp:       String,
}

impl ShipmentReceipt {
    /// Transaction hash as shown in status lines.
    pub fn short_hash(&self) -> String {
        abbreviate(&self.transaction_ref, 15)
    }
}

/// A handle to a shipment awaiting its confirmation.
///
/// The transaction reference is known right after submission; the record only changes once the confirmation task
/// completes. Dropping the ticket doesn't cancel the confirmation.
#[derive(Debug)]
pub struct ShipmentTicket {
    product_id:      String,
    transaction_ref: String,
    receiver:        oneshot::Receiver<ShipmentReceipt>,
}

impl ShipmentTicket {
    pub(crate) fn new(product_id: String, transaction_ref: String, receiver: oneshot::Receiver<ShipmentReceipt>) -> Self {
        Self {
            product_id,
            transaction_ref,
            receiver,
        }
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn transaction_ref(&self) -> &str {
        &self.transaction_ref
    }

    pub async fn confirmed(self) -> Result<ShipmentReceipt> {
        self.receiver
            .await
            .map_err(|_| ProvenanceError::ConfirmationLost(self.product_id))
    }
}

/// Random `0x`-prefixed 32-byte hex string standing in for a ledger transaction hash.
pub fn mock_transaction_hash() -> String {
    let bytes: [u8; 32] = rand::random();
    bytes.iter().fold(String::from("0x"), |mut hash, b| {
        let _ = write!(hash, "{b:02x}");
        hash
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_fail_validation() {
        let request = ShipmentRequest::new("P1", "  ", "0xabc", "London, UK");
        let report = request.validate().unwrap_err();
        assert!(report.to_string().contains("recipient_name"));

        assert!(ShipmentRequest::new("P1", "Akash", "0xabc", "Mumbai").validate().is_ok());
    }

    #[test]
    fn builder_and_normalization() {
        let request = ShipmentRequest::builder()
            .product_id(" P7 ")
            .recipient_name("Akash")
            .recipient_address("0xabc")
            .location_detail("Mumbai\n")
            .build()
            .unwrap();
        let normalized = request.normalized();
        assert_eq!(normalized.product_id(), "P7");
        assert_eq!(normalized.location_detail(), "Mumbai");
    }

    #[test]
    fn transaction_hash_shape() {
        let hash = mock_transaction_hash();
        assert_eq!(hash.len(), 66);
        assert!(hash.starts_with("0x"));
        assert!(hash[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(hash, mock_transaction_hash());
    }

    #[test]
    fn short_hash() {
        let receipt = ShipmentReceipt {
            product_id:      "P1".into(),
            transaction_ref: "0x0123456789abcdef0123".into(),
            timestamp:       "2025-10-25 20:26:17 UTC".into(),
        };
        assert_eq!(receipt.short_hash(), "0x0123456789abc...");
    }
}
