use std::sync::OnceLock;

use locmap_shared::locations::{self, LocationResult};

const LOCATIONS_JSON: &str = include_str!("../assets/locations.json");

/// Bundled location results, parsed on first use.
///
/// A malformed bundle is logged and treated as empty so the map still shows
/// the fallback viewport.
pub fn location_results() -> &'static [LocationResult] {
    static RESULTS: OnceLock<Vec<LocationResult>> = OnceLock::new();
    RESULTS.get_or_init(|| match locations::parse_results(LOCATIONS_JSON) {
        Ok(results) => {
            tracing::debug!(results = results.len(), "Loaded bundled locations");
            results
        }
        Err(e) => {
            tracing::warn!(error = %e, "Bundled locations unreadable");
            Vec::new()
        }
    })
}
