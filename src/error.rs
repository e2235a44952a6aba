use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("invalid shipment request: {0}")]
    InvalidShipment(#[from] garde::Report),

    #[error("seed record '{product_id}' is inconsistent: {reason}")]
    InvalidRecord { product_id: String, reason: &'static str },

    #[error("failed to read seed file {}: {source}", path.display())]
    SeedIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed data: {0}")]
    SeedFormat(#[from] serde_json::Error),

    #[error(transparent)]
    Builder(#[from] fieldx::error::FieldXError),

    #[error("confirmation of shipment '{0}' was lost before it completed")]
    ConfirmationLost(String),

    #[error("provenance store is gone")]
    StoreGone,
}

pub type Result<T, E = ProvenanceError> = std::result::Result<T, E>;
