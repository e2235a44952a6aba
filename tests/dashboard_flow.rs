use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use provenance_trace::prelude::*;
use provenance_trace::verification::Verdict;

fn store() -> Arc<ProvenanceStore> {
    ProvenanceStore::builder()
        .confirmation_delay(Duration::from_millis(100))
        .build()
        .expect("Failed to build provenance store")
}

#[derive(Default)]
struct ReceiptLog {
    receipts: Mutex<Vec<ShipmentReceipt>>,
}

#[async_trait]
impl StoreObserver for ReceiptLog {
    async fn on_shipment_recorded(&self, receipt: &ShipmentReceipt) {
        self.receipts.lock().unwrap().push(receipt.clone());
    }
}

#[test]
fn history_length_follows_record_state() {
    let store = store();
    for id in store.product_ids() {
        let record = store.get_record(&id).unwrap();
        let expected = match (record.is_delivered(), record.is_replaced()) {
            (false, _) => 1,
            (true, false) => 2,
            (true, true) => 3,
        };
        let history = store.get_history(&id);
        assert_eq!(history.len(), expected, "history of {id}");
        assert!(history[0].action.starts_with("Product Registered"));
    }
}

#[test]
fn seeded_product_traces_to_its_recipient() {
    let store = store();
    let projector = RouteProjector::new();

    let projection = projector.project(&store.get_history("P20251025210653"));
    let route = projection.route().expect("two events make a route");
    assert_eq!(route.headline(), "Route from India-FactoryA to Bits");
    assert!(route.has_path());
    assert_eq!(route.unresolved_count(), 0);
    assert!(matches!(route.view, MapView::FitBounds { .. }));
}

#[test]
fn unregistered_product_has_nothing_to_show() {
    let store = store();
    let projector = RouteProjector::new();

    assert!(store.get_record("P19990101000000").is_none());
    assert_eq!(
        projector.project(&store.get_history("P19990101000000")),
        Projection::InsufficientData { available: 0 }
    );
    assert_eq!(store.verify("P19990101000000").verdict, Verdict::Counterfeit);

    // Registered but never shipped.
    assert_eq!(
        projector.project(&store.get_history("P20251027120000")),
        Projection::InsufficientData { available: 1 }
    );
}

#[tokio::test]
async fn shipment_flows_into_verification_and_route() {
    let store = store();
    let log = Arc::new(ReceiptLog::default());
    store.add_observer(log.clone());

    let ticket = store
        .submit_shipment(&ShipmentRequest::new(
            "P20251101080000",
            "Akash",
            "0x9fA3c0ffee",
            "Delivered to Recipient: London, UK",
        ))
        .expect("Valid shipment must be accepted");
    let submitted_ref = ticket.transaction_ref().to_string();

    let receipt = ticket.confirmed().await.expect("Shipment must be confirmed");
    assert_eq!(receipt.transaction_ref, submitted_ref);
    assert_eq!(log.receipts.lock().unwrap().as_slice(), &[receipt.clone()]);

    let report = store.verify("P20251101080000");
    assert_eq!(report.verdict.to_string(), "AUTHENTIC: Traced to Factory DynamicFactory");

    let projection = RouteProjector::new().project(&store.get_history("P20251101080000"));
    let route = projection.route().unwrap();
    assert_eq!(route.stops.len(), 2);
    assert_eq!(route.stops[1].coordinate, Some(Coordinate::new(51.5074, -0.1278)));
    assert!(route.has_path());

    store.close().await;
}
