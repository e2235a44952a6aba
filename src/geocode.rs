//! Place-name suggestions for the shipping form.
//!
//! Suggestions are decorative: nothing in the store or in route projection depends on them. A failing remote service
//! degrades to a tiny canned table, see [`FallbackGeocoder`].

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::traits::Geocoder;

pub const TYPING_HINT: &str = "Type a city (e.g., London)";

const CANNED_PLACES: &[(&str, &str)] = &[("london", "London, UK"), ("new york", "New York, USA")];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Suggested(String),
    NoMatch,
    Hint,
}

impl Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suggested(place) => write!(f, "Suggested: {place}"),
            Self::NoMatch => write!(f, "No suggestions found."),
            Self::Hint => write!(f, "{TYPING_HINT}"),
        }
    }
}

/// Knows a couple of cities by their name prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedGeocoder;

impl CannedGeocoder {
    pub fn lookup(query: &str) -> Option<&'static str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        CANNED_PLACES
            .iter()
            .find(|(name, _)| name.starts_with(&query))
            .map(|(_, place)| *place)
    }
}

#[async_trait]
impl Geocoder for CannedGeocoder {
    async fn suggest(&self, query: &str) -> Result<Option<String>, GeocodeError> {
        Ok(Self::lookup(query).map(String::from))
    }
}

/// Stands in for the remote geocoding service which is never reachable from here.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineGeocoder;

#[async_trait]
impl Geocoder for OfflineGeocoder {
    async fn suggest(&self, _query: &str) -> Result<Option<String>, GeocodeError> {
        Err(GeocodeError::Unavailable("network access is disabled".into()))
    }
}

/// Asks the inner geocoder first and falls back to [`CannedGeocoder`] if it fails.
#[derive(Debug, Clone)]
pub struct FallbackGeocoder<G> {
    inner: G,
}

impl<G> FallbackGeocoder<G>
where
    G: Geocoder,
{
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    pub async fn suggestion(&self, query: &str) -> Suggestion {
        match self.inner.suggest(query).await {
            Ok(Some(place)) => Suggestion::Suggested(place),
            Ok(None) => Suggestion::NoMatch,
            Err(err) => {
                log::warn!("Geocoding failed for '{query}', using canned suggestions: {err}");
                CannedGeocoder::lookup(query).map_or(Suggestion::Hint, |place| Suggestion::Suggested(place.into()))
            }
        }
    }
}

/// Debounced suggestion driver for a text input.
///
/// Every call to [`Autocomplete::input`] supersedes the pending lookup. Only inputs longer than `min_query_len`
/// characters, after trimming, are looked up. The latest suggestion is published to [`Autocomplete::subscribe`]rs.
pub struct Autocomplete<G> {
    geocoder:      Arc<FallbackGeocoder<G>>,
    debounce:      Duration,
    min_query_len: usize,
    sender:        Arc<watch::Sender<Option<Suggestion>>>,
    pending:       Mutex<Option<JoinHandle<()>>>,
}

impl<G> Autocomplete<G>
where
    G: Geocoder,
{
    pub fn new(geocoder: G) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            geocoder:      Arc::new(FallbackGeocoder::new(geocoder)),
            debounce:      Duration::from_millis(500),
            min_query_len: 3,
            sender:        Arc::new(sender),
            pending:       Mutex::new(None),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Suggestion>> {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> Option<Suggestion> {
        self.sender.borrow().clone()
    }

    /// Must be called within a Tokio runtime.
    pub fn input(&self, text: &str) {
        let query = text.trim().to_string();
        let geocoder = Arc::clone(&self.geocoder);
        let sender = Arc::clone(&self.sender);
        let debounce = self.debounce;
        let min_query_len = self.min_query_len;

        let task = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if query.chars().count() <= min_query_len {
                return;
            }
            let suggestion = geocoder.suggestion(&query).await;
            log::debug!("Suggestion for '{query}': {suggestion}");
            sender.send_replace(Some(suggestion));
        });

        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }
}

impl<G> Drop for Autocomplete<G> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}
