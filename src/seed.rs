use std::path::Path;

use crate::error::ProvenanceError;
use crate::error::Result;
use crate::types::DeliveryInfo;
use crate::types::ProductRecord;

/// The mock ledger the dashboard starts with.
pub fn mock_records() -> Vec<ProductRecord> {
    vec![
        ProductRecord::registered(
            "P20251025202605",
            "B001-ALPHA",
            "India-FactoryA",
            "0901524b0c06fa31159614d0770a04aa0062f70c606c6c9c39c7ea8a2f7f68e9",
        )
        .delivered_to(DeliveryInfo {
            recipient: "Varun".into(),
            address:   "BITS".into(),
            timestamp: "2025-10-25 20:26:17 UTC".into(),
        }),
        ProductRecord::registered(
            "P20251025210653",
            "B001-ALPHA",
            "India-FactoryA",
            "0986ff8db51317cc942be98dcf765e9d0d64ee82aab6ad8dda518828cb53b2ff",
        )
        .delivered_to(DeliveryInfo {
            recipient: "Akshay".into(),
            address:   "Bits".into(),
            timestamp: "2025-10-25 21:07:08 UTC".into(),
        }),
        ProductRecord::registered(
            "P20251026093114",
            "B002-BETA",
            "India-FactoryA",
            "5c3f1e07a9d24b6e88f0d7a1c2b94e3f6a0d8c7b1e2f3a4b5c6d7e8f9a0b1c2d",
        )
        .delivered_to(DeliveryInfo {
            recipient: "Meera".into(),
            address:   "BITS".into(),
            timestamp: "2025-10-26 09:31:40 UTC".into(),
        })
        .returned(),
        ProductRecord::registered(
            "P20251027120000",
            "B002-BETA",
            "India-FactoryA",
            "a7e2c94d01b35f68e2d7c0b9a4f316e85d2c7b0a9e4f1d3c6b8a5e2f7d0c9b14",
        ),
    ]
}

pub fn load_records(path: &Path) -> Result<Vec<ProductRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| ProvenanceError::SeedIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&content)
}

pub fn parse_records(json: &str) -> Result<Vec<ProductRecord>> {
    let records: Vec<ProductRecord> = serde_json::from_str(json)?;
    for record in &records {
        record.check_consistency()?;
    }
    log::debug!("Parsed {} seed records", records.len());
    Ok(records)
}
