use std::fmt::Display;

use serde::Serialize;
use strum::AsRefStr;
use strum::Display as StrumDisplay;

use crate::store::ProvenanceStore;
use crate::types::abbreviate;
use crate::types::HistoryEvent;
use crate::types::ProductRecord;

pub const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=";
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Authentic { factory: String, returned: bool },
    /// No record exists for the ID.
    Counterfeit,
}

impl Verdict {
    pub fn is_authentic(&self) -> bool {
        matches!(self, Self::Authentic { .. })
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Authentic { factory, returned } => {
                write!(f, "AUTHENTIC: Traced to Factory {factory}")?;
                if *returned {
                    write!(f, " (WARNING: Returned)")?;
                }
                Ok(())
            }
            Self::Counterfeit => write!(f, "FAKE/INVALID: No Immutable Record Found"),
        }
    }
}

/// Ledger details shown next to the verdict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogDetails {
    pub recipient:     Option<String>,
    /// Shortened owner address.
    pub owner_address: Option<String>,
    /// Shortened transaction hash.
    pub tx_hash:       String,
    pub qr_image_url:  String,
}

impl LogDetails {
    pub fn from_record(record: &ProductRecord) -> Self {
        let delivery = record.delivery_info();
        Self {
            recipient:     delivery.map(|d| d.recipient.clone()),
            owner_address: delivery.map(|d| abbreviate(&d.address, 15)),
            tx_hash:       abbreviate(record.transaction_ref(), 15),
            qr_image_url:  format!("{QR_SERVICE_URL}{}", record.qr_payload()),
        }
    }

    pub fn recipient_or_na(&self) -> &str {
        self.recipient.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn owner_address_or_na(&self) -> &str {
        self.owner_address.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, StrumDisplay, AsRefStr)]
pub enum TimelineIcon {
    #[strum(serialize = "factory")]
    Factory,
    #[strum(serialize = "truck")]
    Truck,
    #[strum(serialize = "undo")]
    Undo,
    #[strum(serialize = "info")]
    Info,
}

impl TimelineIcon {
    pub fn for_action(action: &str) -> Self {
        if action.contains("Registered") {
            Self::Factory
        }
        else if action.contains("Delivered") {
            Self::Truck
        }
        else if action.contains("Returned") {
            Self::Undo
        }
        else {
            Self::Info
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub icon:  TimelineIcon,
    pub event: HistoryEvent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub product_id: String,
    pub verdict:    Verdict,
    pub details:    Option<LogDetails>,
    pub timeline:   Vec<TimelineEntry>,
}

impl VerificationReport {
    pub fn for_record(product_id: &str, record: Option<&ProductRecord>) -> Self {
        let Some(record) = record
        else {
            return Self {
                product_id: product_id.to_string(),
                verdict:    Verdict::Counterfeit,
                details:    None,
                timeline:   Vec::new(),
            };
        };

        Self {
            product_id: product_id.to_string(),
            verdict:    Verdict::Authentic {
                factory:  record.factory().to_string(),
                returned: record.is_replaced(),
            },
            details:    Some(LogDetails::from_record(record)),
            timeline:   record
                .history()
                .into_iter()
                .map(|event| TimelineEntry {
                    icon: TimelineIcon::for_action(&event.action),
                    event,
                })
                .collect(),
        }
    }
}

impl ProvenanceStore {
    pub fn verify(&self, product_id: &str) -> VerificationReport {
        let record = self.get_record(product_id);
        let report = VerificationReport::for_record(product_id, record.as_ref());
        log::info!("[{}] Verified '{product_id}': {}", self.name(), report.verdict);
        report
    }
}
