use serde::Serialize;

/// Pixel radius within which markers merge into one cluster.
pub const MAX_CLUSTER_RADIUS_PX: u32 = 80;

/// Cluster badges are square.
pub const CLUSTER_ICON_PX: u32 = 40;

const MEDIUM_THRESHOLD: u32 = 10;
const LARGE_THRESHOLD: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSize {
    Small,
    Medium,
    Large,
}

impl ClusterSize {
    pub fn for_count(count: u32) -> Self {
        if count >= LARGE_THRESHOLD {
            ClusterSize::Large
        } else if count >= MEDIUM_THRESHOLD {
            ClusterSize::Medium
        } else {
            ClusterSize::Small
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClusterSize::Small => "small",
            ClusterSize::Medium => "medium",
            ClusterSize::Large => "large",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ClusterSize::Small => "marker-cluster-small",
            ClusterSize::Medium => "marker-cluster-medium",
            ClusterSize::Large => "marker-cluster-large",
        }
    }
}

impl std::fmt::Display for ClusterSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options object for `L.divIcon`, as rendered for a cluster badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterIcon {
    pub html: String,
    pub class_name: String,
    pub icon_size: [u32; 2],
}

impl ClusterIcon {
    pub fn for_count(count: u32) -> Self {
        let size = ClusterSize::for_count(count);
        ClusterIcon {
            html: format!("<div><span>{}</span></div>", count),
            class_name: format!("marker-cluster {}", size.css_class()),
            icon_size: [CLUSTER_ICON_PX, CLUSTER_ICON_PX],
        }
    }
}

/// `L.markerClusterGroup` options. The icon factory is attached separately
/// by the backend since it is a JS callback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOptions {
    pub chunked_loading: bool,
    pub spiderfy_on_max_zoom: bool,
    pub show_coverage_on_hover: bool,
    pub zoom_to_bounds_on_click: bool,
    pub max_cluster_radius: u32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        ClusterOptions {
            chunked_loading: true,
            spiderfy_on_max_zoom: true,
            show_coverage_on_hover: false,
            zoom_to_bounds_on_click: true,
            max_cluster_radius: MAX_CLUSTER_RADIUS_PX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_thresholds() {
        assert_eq!(ClusterSize::for_count(0), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(5), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(9), ClusterSize::Small);
        assert_eq!(ClusterSize::for_count(10), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(99), ClusterSize::Medium);
        assert_eq!(ClusterSize::for_count(100), ClusterSize::Large);
        assert_eq!(ClusterSize::for_count(5000), ClusterSize::Large);
    }

    #[test]
    fn test_size_names() {
        assert_eq!(ClusterSize::for_count(5).to_string(), "small");
        assert_eq!(ClusterSize::for_count(10).to_string(), "medium");
        assert_eq!(ClusterSize::for_count(100).to_string(), "large");
    }

    #[test]
    fn test_icon_for_medium_cluster() {
        let icon = ClusterIcon::for_count(42);
        assert_eq!(icon.html, "<div><span>42</span></div>");
        assert_eq!(icon.class_name, "marker-cluster marker-cluster-medium");
        assert_eq!(icon.icon_size, [40, 40]);
    }

    #[test]
    fn test_icon_serializes_with_leaflet_keys() {
        let value = serde_json::to_value(ClusterIcon::for_count(3)).unwrap();
        assert_eq!(value["className"], "marker-cluster marker-cluster-small");
        assert_eq!(value["iconSize"], serde_json::json!([40, 40]));
    }

    #[test]
    fn test_default_options() {
        let value = serde_json::to_value(ClusterOptions::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "chunkedLoading": true,
                "spiderfyOnMaxZoom": true,
                "showCoverageOnHover": false,
                "zoomToBoundsOnClick": true,
                "maxClusterRadius": 80
            })
        );
    }
}
