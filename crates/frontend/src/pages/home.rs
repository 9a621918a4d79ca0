use dioxus::prelude::*;
use locmap_shared::scene::MapVariant;

use crate::components::map_view::MapView;
use crate::leaflet;
use crate::Route;

#[component]
fn MapPlaceholder() -> Element {
    rsx! {
        div { class: "map-placeholder",
            p { "Loading map..." }
        }
    }
}

/// Page shell: title card, variant switch, and the map once Leaflet is on
/// the page. Until then a fixed-height placeholder holds the layout.
#[component]
pub fn MapPage(variant: MapVariant) -> Element {
    let leaflet_ready = use_resource(|| leaflet::wait_until_loaded());
    let ready = matches!(*leaflet_ready.read(), Some(true));

    rsx! {
        main { class: "container",
            div { class: "card",
                div { class: "card-header",
                    h1 { class: "card-title", "Leaflet.js with Dioxus" }
                    p { class: "card-description",
                        "Interactive map example using Leaflet.js in a Dioxus web app"
                    }
                    nav { class: "variant-nav",
                        if variant == MapVariant::Clustered {
                            Link { to: Route::Shapes {}, "Show markers with shapes" }
                        } else {
                            Link { to: Route::Home {}, "Show clustered locations" }
                        }
                    }
                }
                div { class: "card-content",
                    if ready {
                        MapView { variant }
                    } else {
                        MapPlaceholder {}
                    }
                }
            }
        }
    }
}
