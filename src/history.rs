//! Translation of a product record into its lifecycle events.
//!
//! The order of events is fixed by business rules, not by timestamps: registration, then delivery, then return.
//! Timestamps of the registration and return events are ledger placeholders and may well be earlier than the delivery
//! one.

use crate::types::HistoryEvent;
use crate::types::ProductRecord;

pub const REGISTRATION_TIMESTAMP: &str = "2025-10-24 10:00:00 UTC";
pub const RETURN_CENTER: &str = "Return Center";
pub const RETURN_TIMESTAMP: &str = "2025-10-20 15:00:00 UTC";
pub const RETURN_ACTION: &str = "Marked Replaced/Returned";

impl ProductRecord {
    pub fn history(&self) -> Vec<HistoryEvent> {
        let mut history = Vec::with_capacity(3);

        history.push(HistoryEvent::new(
            self.factory().to_string(),
            REGISTRATION_TIMESTAMP.to_string(),
            format!("Product Registered (Batch: {})", self.batch()),
        ));

        if let (true, Some(info)) = (self.is_delivered(), self.delivery_info()) {
            history.push(HistoryEvent::new(
                info.address.clone(),
                info.timestamp.clone(),
                format!("Marked Delivered to Recipient: {}", info.recipient),
            ));
        }

        if self.is_replaced() {
            history.push(HistoryEvent::new(RETURN_CENTER, RETURN_TIMESTAMP, RETURN_ACTION));
        }

        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryInfo;

    fn delivered() -> ProductRecord {
        ProductRecord::registered("P2", "B001-ALPHA", "India-FactoryA", "0x01").delivered_to(DeliveryInfo {
            recipient: "Akshay".into(),
            address:   "Bits".into(),
            timestamp: "2025-10-25 21:07:08 UTC".into(),
        })
    }

    #[test]
    fn registration_only() {
        let history = ProductRecord::registered("P1", "B002", "India-FactoryA", "0x00").history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].location, "India-FactoryA");
        assert_eq!(history[0].timestamp, REGISTRATION_TIMESTAMP);
        assert_eq!(history[0].action, "Product Registered (Batch: B002)");
    }

    #[test]
    fn delivered_adds_second_event() {
        let history = delivered().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].location, "Bits");
        assert_eq!(history[1].timestamp, "2025-10-25 21:07:08 UTC");
        assert_eq!(history[1].action, "Marked Delivered to Recipient: Akshay");
    }

    #[test]
    fn returned_goes_last_regardless_of_timestamps() {
        let history = delivered().returned().history();
        assert_eq!(history.len(), 3);
        assert!(history[0].action.starts_with("Product Registered"));
        assert!(history[1].action.starts_with("Marked Delivered"));
        assert_eq!(history[2].location, RETURN_CENTER);
        assert_eq!(history[2].action, RETURN_ACTION);
        // Return timestamp predates the delivery yet stays last.
        assert!(history[2].timestamp < history[1].timestamp);
    }

    #[test]
    fn returned_without_delivery() {
        let history = ProductRecord::registered("P3", "B", "F", "0x").returned().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].location, RETURN_CENTER);
    }
}
