//! Geographic primitives and viewport derivation.
//!
//! Coordinates are WGS84 degrees as Leaflet expects them. No projection math
//! happens here; the map library owns that.

use serde::{Deserialize, Serialize};

use crate::locations::PointRecord;

/// Center used when there is nothing to show (Disneyland Resort, Anaheim).
pub const FALLBACK_CENTER: LatLng = LatLng {
    lat: 33.811,
    lng: -117.922,
};

/// Zoom used for the mean-based viewport and for the fallback.
pub const DEFAULT_ZOOM: u8 = 15;

/// A latitude/longitude pair. Serializes as `[lat, lng]`, the array form
/// Leaflet accepts anywhere a `LatLng` is expected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        LatLng { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
}

impl Viewport {
    pub const FALLBACK: Viewport = Viewport {
        center: FALLBACK_CENTER,
        zoom: DEFAULT_ZOOM,
    };
}

/// Axis-aligned box over lat/lng. Serializes as `[[s, w], [n, e]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[LatLng; 2]")]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl From<Bounds> for [LatLng; 2] {
    fn from(b: Bounds) -> Self {
        [b.south_west, b.north_east]
    }
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }
}

/// Arithmetic mean of the points' coordinates. `None` when empty.
pub fn mean_center(points: &[PointRecord]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.latitude).sum::<f64>() / n;
    let lng = points.iter().map(|p| p.longitude).sum::<f64>() / n;
    Some(LatLng { lat, lng })
}

/// Viewport before any bounds fitting: mean center at the default zoom, or
/// the fallback when there are no points.
pub fn initial_viewport(points: &[PointRecord]) -> Viewport {
    match mean_center(points) {
        Some(center) => Viewport {
            center,
            zoom: DEFAULT_ZOOM,
        },
        None => Viewport::FALLBACK,
    }
}
