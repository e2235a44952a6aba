//! Projection of a product history onto a map.
//!
//! Locations are resolved through a static table of known place names. A location missing from the table yields an
//! unresolved stop: it is listed and counted but never drawn and never affects bounds fitting.

use std::collections::HashMap;
use std::fmt::Display;

use fieldx::fxstruct;
use serde::Serialize;
use strum::Display as StrumDisplay;

use crate::history::RETURN_CENTER;
use crate::types::Coordinate;
use crate::types::HistoryEvent;

/// Where the map looks when there is no route to fit.
pub const WORLD_CENTER: Coordinate = Coordinate::new(20.0, 0.0);
pub const WORLD_ZOOM: u8 = 2;
pub const FIT_PADDING: (u32, u32) = (50, 50);

const RECIPIENT_MARKER: &str = "Recipient:";
const LABEL_SEPARATOR: &str = ": ";

/// Mock geocoding table.
pub fn default_places() -> HashMap<String, Coordinate> {
    [
        ("India-FactoryA", Coordinate::new(28.6139, 77.2090)),
        ("BITS", Coordinate::new(28.3621, 73.8821)),
        ("Bits", Coordinate::new(28.3621, 73.8821)),
        ("DynamicFactory", Coordinate::new(31.2304, 121.4737)),
        // Same spot as London. The legacy mock table had the longitude sign flipped, placing it east of Greenwich.
        (RETURN_CENTER, Coordinate::new(51.5074, -0.1278)),
        ("London, UK", Coordinate::new(51.5074, -0.1278)),
        ("New York, USA", Coordinate::new(40.7128, -74.0060)),
    ]
    .into_iter()
    .map(|(name, coord)| (name.to_string(), coord))
    .collect()
}

/// Lookup key for a location text. Labelled recipient locations like `"Delivered to Recipient: London, UK"` are
/// looked up by the segment following the label. Only that one segment is used: in `"Recipient: Shop: London, UK"`
/// the key is `"Shop"`.
pub fn resolution_key(location: &str) -> &str {
    if location.contains(RECIPIENT_MARKER) {
        if let Some(key) = location.split(LABEL_SEPARATOR).nth(1) {
            return key;
        }
    }
    location
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, StrumDisplay)]
pub enum StopRole {
    #[strum(serialize = "Waypoint")]
    Waypoint,
    #[strum(serialize = "Final Stop")]
    FinalStop,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteStop {
    /// 1-based position of the stop along the route.
    pub index:      usize,
    /// `None` when the location is not known to the coordinate table.
    pub coordinate: Option<Coordinate>,
    pub label:      String,
    pub location:   String,
    pub timestamp:  String,
    pub role:       StopRole,
}

impl RouteStop {
    pub fn is_resolved(&self) -> bool {
        self.coordinate.is_some()
    }

    /// Marker popup text.
    pub fn popup(&self) -> String {
        format!("{}\nLocation: {}\nTime: {}", self.label, self.location, self.timestamp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinate>) -> Option<Self> {
        points.into_iter().fold(None, |bounds: Option<Bounds>, p| {
            Some(match bounds {
                None => Bounds {
                    south_west: *p,
                    north_east: *p,
                },
                Some(b) => Bounds {
                    south_west: Coordinate::new(b.south_west.lat.min(p.lat), b.south_west.lon.min(p.lon)),
                    north_east: Coordinate::new(b.north_east.lat.max(p.lat), b.north_east.lon.max(p.lon)),
                },
            })
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum MapView {
    FitBounds { bounds: Bounds, padding: (u32, u32) },
    World { center: Coordinate, zoom: u8 },
}

impl MapView {
    pub fn world() -> Self {
        Self::World {
            center: WORLD_CENTER,
            zoom:   WORLD_ZOOM,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteResult {
    pub stops:         Vec<RouteStop>,
    /// Coordinates of resolved stops in route order. Markers go to each of them; a polyline needs at least two.
    pub drawable_path: Vec<Coordinate>,
    pub summary_lines: Vec<String>,
    pub view:          MapView,
}

impl RouteResult {
    pub fn title(&self) -> String {
        format!("Route Summary: {} Stops", self.stops.len())
    }

    pub fn headline(&self) -> String {
        let first = self.stops.first().map_or("", |s| s.location.as_str());
        let last = self.stops.last().map_or("", |s| s.location.as_str());
        format!("Route from {first} to {last}")
    }

    pub fn resolved_stops(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops.iter().filter(|s| s.is_resolved())
    }

    pub fn unresolved_count(&self) -> usize {
        self.stops.len() - self.resolved_stops().count()
    }

    pub fn has_path(&self) -> bool {
        self.drawable_path.len() >= 2
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Projection {
    Route(RouteResult),
    /// Less than two events; nothing to connect.
    InsufficientData { available: usize },
}

impl Projection {
    pub fn route(&self) -> Option<&RouteResult> {
        match self {
            Self::Route(route) => Some(route),
            Self::InsufficientData { .. } => None,
        }
    }

    pub fn view(&self) -> MapView {
        match self {
            Self::Route(route) => route.view,
            Self::InsufficientData { .. } => MapView::world(),
        }
    }
}

impl Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Route(route) => write!(f, "{}", route.headline()),
            Self::InsufficientData { available } => write!(
                f,
                "Insufficient data to draw a map route (only {available} events)."
            ),
        }
    }
}

#[derive(Debug, Clone)]
#[fxstruct(builder(post_build), get)]
pub struct RouteProjector {
    #[fieldx(default(default_places()))]
    places: HashMap<String, Coordinate>,

    /// Extra places added on top of the default table.
    #[fieldx(get(off), default(Vec::new()))]
    extra_places: Vec<(String, Coordinate)>,

    #[fieldx(get(copy), default(FIT_PADDING))]
    fit_padding: (u32, u32),
}

impl RouteProjector {
    fn post_build(mut self) -> Self {
        let extra = std::mem::take(&mut self.extra_places);
        self.places.extend(extra);
        self
    }

    pub fn resolve(&self, location: &str) -> Option<Coordinate> {
        self.places.get(resolution_key(location)).copied()
    }

    pub fn project(&self, history: &[HistoryEvent]) -> Projection {
        if history.len() < 2 {
            log::debug!("Not enough events for a route: {}", history.len());
            return Projection::InsufficientData {
                available: history.len(),
            };
        }

        let last_idx = history.len() - 1;
        let stops = history
            .iter()
            .enumerate()
            .map(|(idx, event)| {
                let coordinate = self.resolve(&event.location);
                if coordinate.is_none() {
                    log::debug!("Location '{}' has no known coordinates", event.location);
                }
                RouteStop {
                    index: idx + 1,
                    coordinate,
                    label: format!("Stop {}: {}", idx + 1, event.action),
                    location: event.location.clone(),
                    timestamp: event.timestamp.clone(),
                    role: if idx == last_idx {
                        StopRole::FinalStop
                    }
                    else {
                        StopRole::Waypoint
                    },
                }
            })
            .collect::<Vec<_>>();

        let drawable_path = stops.iter().filter_map(|s| s.coordinate).collect::<Vec<_>>();

        let view = match Bounds::enclosing(&drawable_path) {
            Some(bounds) if drawable_path.len() >= 2 => MapView::FitBounds {
                bounds,
                padding: self.fit_padding(),
            },
            _ => MapView::world(),
        };

        let summary_lines = history
            .iter()
            .zip(stops.iter())
            .map(|(event, stop)| format!("{} at {} ({})", event.action, event.location, stop.role))
            .collect();

        Projection::Route(RouteResult {
            stops,
            drawable_path,
            summary_lines,
            view,
        })
    }
}
