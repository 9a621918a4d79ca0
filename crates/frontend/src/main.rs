mod components;
mod data;
mod leaflet;
mod pages;

use dioxus::prelude::*;
use locmap_shared::scene::MapVariant;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/shapes")]
    Shapes {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::home::MapPage { variant: MapVariant::Clustered }
    }
}

#[component]
fn Shapes() -> Element {
    rsx! {
        pages::home::MapPage { variant: MapVariant::Shapes }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
