//! # provenance-trace
//!
//! Mock product-provenance ledger for supply-chain dashboards.
//!
//! A user pastes a product ID and gets back an authenticity verdict, a timeline of the product's lifecycle, and a
//! route to plot on a map. Another user ships a product and, after a short "confirmation" delay, the very same ledger
//! reflects the delivery together with a fake transaction hash.
//!
//! Nothing here talks to a real blockchain or geocoding service. Everything comes from an in-memory table seeded with
//! mock data.
//!
//! # The Basics
//!
//! The crate consists of two main parts:
//!
//! - [`ProvenanceStore`] owns product records. It answers lookups, derives ordered product histories, and records
//!   shipments, either immediately or through an asynchronous confirmation which can be awaited via a
//!   [`ShipmentTicket`](shipment::ShipmentTicket) or observed with a [`StoreObserver`].
//! - [`RouteProjector`](route::RouteProjector) turns a history into map stops, a drawable path, and a route summary.
//!   Locations it doesn't know about are kept as unresolved stops rather than being placed at some made-up point.
//!
//! ```ignore
//! let store = ProvenanceStore::builder().build()?;
//! let projector = RouteProjector::new();
//!
//! match projector.project(&store.get_history("P20251025202605")) {
//!     Projection::Route(route) => println!("{}", route.headline()),
//!     Projection::InsufficientData { available } => println!("only {available} events"),
//! }
//! ```
//!
//! Wallets and geocoders are collaborators behind the [`Wallet`](traits::Wallet) and [`Geocoder`](traits::Geocoder)
//! traits. Their failures never reach the store: they degrade to a status value or to canned suggestions.
//!
//! # Feature Flags
//!
//! - `cli` – the `provtrace` command line dashboard.

pub mod error;
pub mod geocode;
pub mod history;
pub mod route;
pub mod seed;
pub mod shipment;
pub mod store;
pub mod traits;
pub mod types;
pub mod verification;
pub mod wallet;

#[cfg(feature = "cli")]
pub mod app;

#[doc(inline)]
pub use error::ProvenanceError;
#[doc(inline)]
pub use store::ProvenanceStore;
#[doc(inline)]
pub use traits::StoreObserver;

pub mod prelude {
    pub use crate::error::ProvenanceError;
    pub use crate::route::MapView;
    pub use crate::route::Projection;
    pub use crate::route::RouteProjector;
    pub use crate::route::RouteResult;
    pub use crate::route::RouteStop;
    pub use crate::shipment::ShipmentReceipt;
    pub use crate::shipment::ShipmentRequest;
    pub use crate::shipment::ShipmentTicket;
    pub use crate::store::ProvenanceStore;
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use crate::verification::VerificationReport;
    pub use crate::verification::Verdict;
}
