//! Leaflet + Leaflet.markercluster bindings and the `MapBackend` built on them.
//!
//! Both libraries are loaded as globals (`window.L`) from `Dioxus.toml`.
//! Option objects are built from the shared serde types via `JSON.parse`.

use gloo_timers::future::TimeoutFuture;
use js_sys::{Object, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use locmap_shared::cluster::ClusterIcon;
use locmap_shared::geo::{LatLng, Viewport};
use locmap_shared::lifecycle::MapBackend;
use locmap_shared::scene::{
    FitBounds, IconConfig, MarkerSpec, Overlay, PathStyle, TileLayerConfig,
};

const READY_POLL_MS: u32 = 50;
const READY_POLL_ATTEMPTS: u32 = 200;

#[wasm_bindgen]
extern "C" {
    /// `L.Map`
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn new_map(container_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &Layer) -> Map;

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue) -> Map;

    #[wasm_bindgen(method)]
    fn remove(this: &Map) -> Map;

    /// Any `L.Layer`: tile layer, marker, path or cluster group.
    #[derive(Debug, Clone)]
    pub type Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circle)]
    fn circle(center: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    fn polygon(lat_lngs: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = markerClusterGroup)]
    fn marker_cluster_group(options: &JsValue) -> Result<Layer, JsValue>;

    #[wasm_bindgen(method, js_name = bindPopup)]
    fn bind_popup(this: &Layer, content: &str) -> Layer;

    /// `LayerGroup.addLayer`, used on the cluster group.
    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_child(this: &Layer, layer: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &Layer) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = icon)]
    fn icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    /// Argument of `iconCreateFunction`.
    pub type MarkerCluster;

    #[wasm_bindgen(method, js_name = getChildCount)]
    fn get_child_count(this: &MarkerCluster) -> u32;
}

type IconFactory = Closure<dyn Fn(MarkerCluster) -> JsValue>;

thread_local! {
    // One factory for every cluster group. It is stateless and never dropped,
    // so chunks markercluster still has queued after `map.remove()` can call it.
    static ICON_FACTORY: IconFactory = Closure::new(cluster_icon);
}

#[derive(Serialize)]
struct MapOptions {
    center: LatLng,
    zoom: u8,
}

#[derive(Serialize)]
struct FitOptions {
    padding: [u32; 2],
}

#[derive(Serialize)]
struct CircleOptions<'a> {
    radius: f64,
    #[serde(flatten)]
    style: &'a PathStyle,
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    let json = serde_json::to_string(value).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&json).map_err(js_error)
}

/// True once both Leaflet and the markercluster plugin are on `window.L`.
pub fn is_loaded() -> bool {
    let Ok(l) = Reflect::get(&js_sys::global(), &JsValue::from_str("L")) else {
        return false;
    };
    if l.is_undefined() || l.is_null() {
        return false;
    }
    Reflect::get(&l, &JsValue::from_str("markerClusterGroup"))
        .map(|f| f.is_function())
        .unwrap_or(false)
}

/// Poll until the scripts have loaded. Gives up after ~10s.
pub async fn wait_until_loaded() -> bool {
    for _ in 0..READY_POLL_ATTEMPTS {
        if is_loaded() {
            return true;
        }
        TimeoutFuture::new(READY_POLL_MS).await;
    }
    let loaded = is_loaded();
    if !loaded {
        tracing::warn!("Leaflet scripts did not load");
    }
    loaded
}

fn cluster_icon(cluster: MarkerCluster) -> JsValue {
    let spec = ClusterIcon::for_count(cluster.get_child_count());
    match to_js(&spec) {
        Ok(options) => div_icon(&options),
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to default cluster icon");
            div_icon(&JsValue::UNDEFINED)
        }
    }
}

/// A live Leaflet map and the JS objects it depends on.
pub struct LeafletMap {
    map: Map,
    default_icon: Option<JsValue>,
    cluster_groups: Vec<Layer>,
}

impl LeafletMap {
    fn marker_options(&mut self, icon: &IconConfig) -> Result<JsValue, String> {
        let pin = match &self.default_icon {
            Some(pin) => pin.clone(),
            None => {
                let pin = self::icon(&to_js(icon)?);
                self.default_icon = Some(pin.clone());
                pin
            }
        };
        let options = Object::new();
        Reflect::set(&options, &JsValue::from_str("icon"), &pin).map_err(js_error)?;
        Ok(options.into())
    }

    fn build_marker(&mut self, spec: &MarkerSpec, icon: &IconConfig) -> Result<Layer, String> {
        let options = self.marker_options(icon)?;
        let layer = marker(&to_js(&spec.position)?, &options);
        layer.bind_popup(&spec.popup);
        Ok(layer)
    }
}

#[derive(Debug, Default)]
pub struct LeafletBackend;

impl MapBackend for LeafletBackend {
    type Handle = LeafletMap;

    fn container_exists(&self, container_id: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(container_id))
            .is_some()
    }

    fn create_map(&mut self, container_id: &str, viewport: &Viewport) -> Result<LeafletMap, String> {
        let options = to_js(&MapOptions {
            center: viewport.center,
            zoom: viewport.zoom,
        })?;
        let map = new_map(container_id, &options).map_err(js_error)?;
        Ok(LeafletMap {
            map,
            default_icon: None,
            cluster_groups: Vec::new(),
        })
    }

    fn add_tile_layer(&mut self, map: &mut LeafletMap, tiles: &TileLayerConfig) -> Result<(), String> {
        let layer = tile_layer(&tiles.url_template, &to_js(tiles)?);
        map.map.add_layer(&layer);
        Ok(())
    }

    fn add_overlay(
        &mut self,
        map: &mut LeafletMap,
        overlay: &Overlay,
        icon: &IconConfig,
    ) -> Result<(), String> {
        match overlay {
            Overlay::ClusterGroup { options, markers } => {
                let js_options = to_js(options)?;
                ICON_FACTORY.with(|factory| {
                    Reflect::set(
                        &js_options,
                        &JsValue::from_str("iconCreateFunction"),
                        factory.as_ref(),
                    )
                })
                .map_err(js_error)?;
                let group = marker_cluster_group(&js_options).map_err(js_error)?;
                map.cluster_groups.push(group.clone());

                for spec in markers {
                    let layer = map.build_marker(spec, icon)?;
                    group.add_child(&layer);
                }
                map.map.add_layer(&group);
            }
            Overlay::Marker(spec) => {
                let layer = map.build_marker(spec, icon)?;
                map.map.add_layer(&layer);
            }
            Overlay::Circle(c) => {
                let options = to_js(&CircleOptions {
                    radius: c.radius,
                    style: &c.style,
                })?;
                let layer = circle(&to_js(&c.center)?, &options);
                layer.bind_popup(&c.popup);
                map.map.add_layer(&layer);
            }
            Overlay::Polygon(p) => {
                let layer = polygon(&to_js(&p.ring)?, &to_js(&p.style)?);
                layer.bind_popup(&p.popup);
                map.map.add_layer(&layer);
            }
        }
        Ok(())
    }

    fn fit_bounds(&mut self, map: &mut LeafletMap, fit: &FitBounds) -> Result<(), String> {
        let options = to_js(&FitOptions {
            padding: [fit.padding_px, fit.padding_px],
        })?;
        map.map.fit_bounds(&to_js(&fit.bounds)?, &options);
        Ok(())
    }

    fn clear_overlays(&mut self, map: &mut LeafletMap) {
        for group in map.cluster_groups.drain(..) {
            group.clear_layers();
        }
    }

    fn destroy(&mut self, map: LeafletMap) {
        map.map.remove();
    }
}
