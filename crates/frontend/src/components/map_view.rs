use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use locmap_shared::lifecycle::{MapSlot, MountOutcome};
use locmap_shared::locations;
use locmap_shared::scene::{self, MapScene, MapVariant};

use crate::components::info_card::InfoCard;
use crate::data;
use crate::leaflet::LeafletBackend;

const MAP_CONTAINER_ID: &str = "location-map-container";

type SharedSlot = Rc<RefCell<MapSlot<LeafletBackend>>>;

/// Caption for the location count card.
pub fn locations_caption(count: usize) -> String {
    format!("Showing {} locations from Disneyland Resort", count)
}

/// Scene for a variant. The clustered one reads the bundled locations.
pub fn build_scene(variant: MapVariant) -> MapScene {
    match variant {
        MapVariant::Clustered => {
            let points = locations::eligible_points(data::location_results());
            scene::clustered_scene(&points)
        }
        MapVariant::Shapes => scene::shapes_scene(),
    }
}

fn mount_map(slot: &SharedSlot, variant: MapVariant) {
    match slot.borrow_mut().mount(|| build_scene(variant)) {
        Ok(MountOutcome::Mounted) => {}
        Ok(outcome) => tracing::debug!(?outcome, "Map mount skipped"),
        Err(e) => tracing::error!(error = %e, "Failed to create map"),
    }
}

/// Leaflet map bound to a container div. Created when the div mounts,
/// destroyed when this component drops.
#[component]
pub fn MapView(variant: MapVariant) -> Element {
    let slot: SharedSlot =
        use_hook(|| Rc::new(RefCell::new(MapSlot::new(LeafletBackend, MAP_CONTAINER_ID))));

    let teardown_slot = slot.clone();
    use_drop(move || {
        teardown_slot.borrow_mut().unmount();
    });

    let count = locations::eligible_count(data::location_results());
    let caption = locations_caption(count);

    rsx! {
        div { class: "map-stack",
            div {
                id: MAP_CONTAINER_ID,
                class: "map-container",
                onmounted: move |_| mount_map(&slot, variant),
            }

            if variant == MapVariant::Clustered {
                div { class: "info-grid",
                    InfoCard { title: "Disney Locations", "{caption}" }
                    InfoCard { title: "Marker Clustering",
                        "Zoom out to group markers, zoom in to see each location in detail"
                    }
                    InfoCard { title: "Interactive",
                        "Click a cluster or marker to see more information"
                    }
                }
            } else {
                div { class: "info-grid",
                    InfoCard { title: "Markers", "Three landmarks, each with its own popup" }
                    InfoCard { title: "Circle", "A 500 m radius around the city center" }
                    InfoCard { title: "Polygon", "A highlighted four-corner area" }
                }
            }
        }
    }
}
