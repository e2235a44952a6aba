use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fieldx_plus::fx_plus;
use garde::Validate;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::error::ProvenanceError;
use crate::error::Result;
use crate::seed::mock_records;
use crate::shipment::mock_transaction_hash;
use crate::shipment::ShipmentReceipt;
use crate::shipment::ShipmentRequest;
use crate::shipment::ShipmentTicket;
use crate::traits::StoreObserver;
use crate::types::DeliveryInfo;
use crate::types::HistoryEvent;
use crate::types::ProductRecord;

/// Delivery timestamps of shipments. Same shape as the seeded ledger rows, so histories sort and read alike.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";
/// Batch label of products provisioned by a shipment.
pub const SHIPMENT_BATCH: &str = "B003-NEW";
/// Origin of products provisioned by a shipment.
pub const SHIPMENT_FACTORY: &str = "DynamicFactory";

/// The single source of truth for product records.
///
/// ```ignore
/// let store = ProvenanceStore::builder()
///     .confirmation_delay(Duration::from_millis(250))
///     .build()?;
///
/// let ticket = store.submit_shipment(&ShipmentRequest::new("P1", "Akash", "0x9fA3", "Mumbai"))?;
/// println!("Submitted: {}", ticket.transaction_ref());
/// let receipt = ticket.confirmed().await?;
///
/// assert_eq!(store.get_history("P1").len(), 2);
/// ```
#[fx_plus(
    parent,
    no_new,
    default(off),
    sync,
    rc,
    builder(
        error(ProvenanceError),
        post_build,
        opt_in,
        doc("Builder object of [`ProvenanceStore`].", "", "See [`ProvenanceStore::builder()`] method."),
        method_doc("Implement builder pattern for [`ProvenanceStore`]."),
    )
)]
pub struct ProvenanceStore {
    /// Store name. Most useful for debugging and logging.
    #[fieldx(get(clone), builder, default(String::from("provenance")))]
    name: String,

    /// Initial records. The built-in mock ledger is used if not set.
    #[fieldx(lock, optional, clearer, private, get(off), builder(vis(pub)))]
    seed: Vec<ProductRecord>,

    /// How long it takes for a submitted shipment to get confirmed. Zero means "as soon as the runtime gets to it".
    #[fieldx(get(copy), set, builder, default(Duration::from_secs(2)))]
    confirmation_delay: Duration,

    #[fieldx(lock, private, get, get_mut, default(HashMap::new()))]
    records: HashMap<String, ProductRecord>,

    // Confirmation tasks which may still be running.
    #[fieldx(lock, private, get, get_mut, default(Vec::new()))]
    confirmations: Vec<JoinHandle<()>>,

    #[fieldx(lock, private, get, get_mut, default(Vec::new()))]
    observers: Vec<Arc<dyn StoreObserver>>,
}

impl ProvenanceStore {
    fn post_build(self: Arc<Self>) -> Result<Arc<Self>> {
        let seed = self.clear_seed().unwrap_or_else(mock_records);
        {
            let mut records = self.records_mut();
            for record in seed {
                record.check_consistency()?;
                records.insert(record.product_id().to_string(), record);
            }
        }
        log::debug!("[{}] Loaded {} seed records", self.name(), self.records().len());
        Ok(self)
    }

    pub fn add_observer(&self, observer: Arc<dyn StoreObserver>) {
        self.observers_mut().push(observer);
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.records().contains_key(product_id)
    }

    /// Known product IDs in lexicographic order.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids = self.records().keys().cloned().collect::<Vec<_>>();
        ids.sort();
        ids
    }

    /// A missing record is not an error: it means there is no provenance for the ID.
    pub fn get_record(&self, product_id: &str) -> Option<ProductRecord> {
        log::debug!("[{}] GET({product_id})", self.name());
        self.records().get(product_id).cloned()
    }

    /// Lifecycle events of a product, empty for unknown IDs. Computed anew on every call.
    pub fn get_history(&self, product_id: &str) -> Vec<HistoryEvent> {
        self.records()
            .get(product_id)
            .map(ProductRecord::history)
            .unwrap_or_default()
    }

    /// Store a delivered product record, replacing whatever was known about `product_id` before.
    ///
    /// Arguments are taken as is; blank values end up in the record. Use [`ProvenanceStore::submit_shipment`] for
    /// validated input.
    pub fn record_shipment(
        &self,
        product_id: &str,
        recipient_name: &str,
        location_detail: &str,
        transaction_ref: &str,
    ) -> ShipmentReceipt {
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let record = ProductRecord::registered(product_id, SHIPMENT_BATCH, SHIPMENT_FACTORY, transaction_ref)
            .delivered_to(DeliveryInfo {
                recipient: recipient_name.to_string(),
                address:   location_detail.to_string(),
                timestamp: timestamp.clone(),
            });

        if let Some(previous) = self.records_mut().insert(product_id.to_string(), record) {
            log::info!(
                "[{}] Shipment of '{product_id}' replaces its record (was delivered: {}, replaced: {})",
                self.name(),
                previous.is_delivered(),
                previous.is_replaced()
            );
        }
        else {
            log::info!("[{}] Shipment of '{product_id}' creates a new record", self.name());
        }

        ShipmentReceipt {
            product_id: product_id.to_string(),
            transaction_ref: transaction_ref.to_string(),
            timestamp,
        }
    }

    /// Validate a shipment request and schedule its confirmation. Must be called within a Tokio runtime.
    ///
    /// The returned ticket knows the mock transaction hash right away. The record is written after
    /// [`confirmation_delay`](ProvenanceStore::confirmation_delay). Once submitted, a shipment cannot be cancelled.
    pub fn submit_shipment(&self, request: &ShipmentRequest) -> Result<ShipmentTicket> {
        request.validate()?;
        let request = request.normalized();
        let myself = self.myself().ok_or(ProvenanceError::StoreGone)?;

        let transaction_ref = mock_transaction_hash();
        let delay = self.confirmation_delay();
        let (reply, receiver) = oneshot::channel();

        log::info!(
            "[{}] Submitting shipment of '{}' to {} at '{}' (tx {}), confirming in {delay:?}",
            self.name(),
            request.product_id(),
            request.recipient_name(),
            request.location_detail(),
            transaction_ref
        );

        let ticket = ShipmentTicket::new(request.product_id().clone(), transaction_ref.clone(), receiver);
        let task = tokio::spawn(async move { myself.confirm_shipment(request, transaction_ref, delay, reply).await });

        let mut confirmations = self.confirmations_mut();
        confirmations.retain(|t| !t.is_finished());
        confirmations.push(task);

        Ok(ticket)
    }

    #[instrument(level = "debug", skip(self, reply))]
    async fn confirm_shipment(
        &self,
        request: ShipmentRequest,
        transaction_ref: String,
        delay: Duration,
        reply: oneshot::Sender<ShipmentReceipt>,
    ) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let replaces = self.contains(request.product_id());
        let receipt = self.record_shipment(
            request.product_id(),
            request.recipient_name(),
            request.location_detail(),
            &transaction_ref,
        );

        let observers = self.observers().iter().cloned().collect::<Vec<_>>();
        for observer in observers {
            if replaces {
                observer
                    .on_warning(&format!("Shipment of '{}' replaced an existing record", receipt.product_id))
                    .await;
            }
            observer.on_shipment_recorded(&receipt).await;
        }

        if reply.send(receipt).is_err() {
            log::debug!(
                "[{}] Nobody is waiting for confirmation of '{}'",
                self.name(),
                request.product_id()
            );
        }
    }

    pub fn pending_confirmations(&self) -> usize {
        self.confirmations().iter().filter(|t| !t.is_finished()).count()
    }

    /// Wait until every submitted shipment is confirmed.
    pub async fn close(&self) {
        loop {
            let pending = std::mem::take(&mut *self.confirmations_mut());
            if pending.is_empty() {
                break;
            }

            log::debug!("[{}] Waiting for {} confirmations", self.name(), pending.len());
            for task in pending {
                if let Err(err) = task.await {
                    log::error!("[{}] Shipment confirmation task failed: {err}", self.name());
                }
            }
        }
    }
}
