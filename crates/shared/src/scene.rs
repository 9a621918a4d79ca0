//! Declarative description of everything a map mount puts on screen.
//!
//! A `MapScene` is built from data without touching the map library, then
//! replayed against a `MapBackend` by the lifecycle.

use serde::Serialize;

use crate::cluster::ClusterOptions;
use crate::geo::{self, Bounds, LatLng, Viewport};
use crate::locations::PointRecord;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const OSM_MAX_ZOOM: u8 = 19;

/// Padding applied on every side when fitting to the points' bounds.
pub const FIT_PADDING_PX: u32 = 50;

/// Popup second line when a point carries no annotation.
pub const DEFAULT_ANNOTATION: &str = "Location";

const ICON_BASE_URL: &str = "https://unpkg.com/leaflet@1.9.4/dist/images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapVariant {
    Clustered,
    Shapes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerConfig {
    #[serde(skip)]
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileLayerConfig {
    pub fn openstreetmap() -> Self {
        TileLayerConfig {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            max_zoom: OSM_MAX_ZOOM,
        }
    }
}

/// `L.icon` options for the default marker pin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
    pub icon_size: [i32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [i32; 2],
}

impl Default for IconConfig {
    fn default() -> Self {
        IconConfig {
            icon_url: format!("{}/marker-icon.png", ICON_BASE_URL),
            icon_retina_url: format!("{}/marker-icon-2x.png", ICON_BASE_URL),
            shadow_url: format!("{}/marker-shadow.png", ICON_BASE_URL),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}

/// Stroke and fill for circles and polygons.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: String,
    pub fill_color: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleSpec {
    pub center: LatLng,
    /// Meters.
    pub radius: f64,
    pub style: PathStyle,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSpec {
    pub ring: Vec<LatLng>,
    pub style: PathStyle,
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Markers added as children of one cluster group layer.
    ClusterGroup {
        options: ClusterOptions,
        markers: Vec<MarkerSpec>,
    },
    Marker(MarkerSpec),
    Circle(CircleSpec),
    Polygon(PolygonSpec),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitBounds {
    pub bounds: Bounds,
    pub padding_px: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub viewport: Viewport,
    pub tiles: TileLayerConfig,
    pub icon: IconConfig,
    pub overlays: Vec<Overlay>,
    pub fit: Option<FitBounds>,
}

impl MapScene {
    /// Every marker in the scene, clustered or not.
    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.overlays.iter().flat_map(|o| match o {
            Overlay::ClusterGroup { markers, .. } => markers.iter().collect::<Vec<_>>(),
            Overlay::Marker(m) => vec![m],
            _ => Vec::new(),
        })
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<b>title</b><br>line`, with both parts escaped.
pub fn popup_html(title: &str, line: &str) -> String {
    format!("<b>{}</b><br>{}", escape_html(title), escape_html(line))
}

/// Popup for a data point; an empty or missing annotation falls back to
/// [`DEFAULT_ANNOTATION`].
///
/// Name and annotation are HTML-escaped, so markup in the data shows up as
/// literal text instead of being rendered inside the popup.
pub fn point_popup(point: &PointRecord) -> String {
    let line = point
        .annotation
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_ANNOTATION);
    popup_html(&point.name, line)
}

/// All points as clustered markers, viewport from their mean, then fit to
/// their bounds.
pub fn clustered_scene(points: &[PointRecord]) -> MapScene {
    let markers = points
        .iter()
        .map(|p| MarkerSpec {
            position: LatLng::new(p.latitude, p.longitude),
            popup: point_popup(p),
        })
        .collect();

    let fit = Bounds::from_points(points.iter().map(|p| LatLng::new(p.latitude, p.longitude)))
        .map(|bounds| FitBounds {
            bounds,
            padding_px: FIT_PADDING_PX,
        });

    MapScene {
        viewport: geo::initial_viewport(points),
        tiles: TileLayerConfig::openstreetmap(),
        icon: IconConfig::default(),
        overlays: vec![Overlay::ClusterGroup {
            options: ClusterOptions::default(),
            markers,
        }],
        fit,
    }
}

// --- Annotated-shapes variant (central Hanoi) ---

pub const SHAPES_CENTER: LatLng = LatLng::new(21.0285, 105.8542);
pub const SHAPES_ZOOM: u8 = 13;

pub const SHAPES_CIRCLE_CENTER: LatLng = LatLng::new(21.0285, 105.8542);
pub const SHAPES_CIRCLE_RADIUS_M: f64 = 500.0;

pub const SHAPES_POLYGON_RING: [LatLng; 4] = [
    LatLng::new(21.0450, 105.8300),
    LatLng::new(21.0450, 105.8450),
    LatLng::new(21.0350, 105.8450),
    LatLng::new(21.0350, 105.8300),
];

const SHAPES_MARKERS: [(LatLng, &str, &str); 3] = [
    (
        LatLng::new(21.0288, 105.8525),
        "Hoan Kiem Lake",
        "Lake of the Returned Sword, heart of the Old Quarter.",
    ),
    (
        LatLng::new(21.0294, 105.8355),
        "Temple of Literature",
        "Temple dedicated to Confucius, built in 1070.",
    ),
    (
        LatLng::new(21.0369, 105.8347),
        "Ho Chi Minh Mausoleum",
        "Located in Ba Dinh Square.",
    ),
];

/// Three fixed markers, a 500 m circle and a four-point polygon. Independent
/// of the location data.
pub fn shapes_scene() -> MapScene {
    let mut overlays: Vec<Overlay> = SHAPES_MARKERS
        .iter()
        .map(|&(position, title, line)| {
            Overlay::Marker(MarkerSpec {
                position,
                popup: popup_html(title, line),
            })
        })
        .collect();

    overlays.push(Overlay::Circle(CircleSpec {
        center: SHAPES_CIRCLE_CENTER,
        radius: SHAPES_CIRCLE_RADIUS_M,
        style: PathStyle {
            color: "red".to_string(),
            fill_color: "#f03".to_string(),
            fill_opacity: 0.5,
        },
        popup: popup_html("Circle", "500 m radius around Hoan Kiem district center."),
    }));

    overlays.push(Overlay::Polygon(PolygonSpec {
        ring: SHAPES_POLYGON_RING.to_vec(),
        style: PathStyle {
            color: "blue".to_string(),
            fill_color: "#30f".to_string(),
            fill_opacity: 0.3,
        },
        popup: popup_html("Polygon", "A highlighted area of Ba Dinh."),
    }));

    MapScene {
        viewport: Viewport {
            center: SHAPES_CENTER,
            zoom: SHAPES_ZOOM,
        },
        tiles: TileLayerConfig::openstreetmap(),
        icon: IconConfig::default(),
        overlays,
        fit: None,
    }
}
