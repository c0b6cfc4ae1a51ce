// Bindings to the page's global Leaflet (`L`) and a MapSurface on top of them
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::config::{FenceStyle, PathStyle, TileLayerConfig};
use crate::error::TrackerError;
use crate::map_view::MapSurface;
use crate::models::Coordinate;

#[wasm_bindgen]
extern "C" {
    type LeafletMapHandle;
    type LeafletLayer;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    fn leaflet_map(container_id: &str) -> Result<LeafletMapHandle, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &LeafletMapHandle, center: &JsValue, zoom: f64);

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url_template: &str, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    fn polygon(latlngs: &JsValue, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(latlngs: &JsValue, options: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(latlng: &JsValue) -> LeafletLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &LeafletLayer, map: &LeafletMapHandle);

    #[wasm_bindgen(method, js_name = setStyle)]
    fn set_style(this: &LeafletLayer, style: &JsValue);

    #[wasm_bindgen(method, js_name = setLatLng)]
    fn set_lat_lng(this: &LeafletLayer, latlng: &JsValue);

    #[wasm_bindgen(method, js_name = addLatLng)]
    fn add_lat_lng(this: &LeafletLayer, latlng: &JsValue);
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    max_zoom: u8,
    attribution: &'a str,
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    match to_value(value) {
        Ok(js) => js,
        Err(e) => {
            log::error!("Failed to convert value for Leaflet: {}", e);
            JsValue::UNDEFINED
        }
    }
}

fn lat_lng(at: Coordinate) -> JsValue {
    to_js(&at.to_lat_lng())
}

/// A Leaflet map mounted on a page element, with the overlays the tracker
/// draws on it.
pub struct LeafletMap {
    map: LeafletMapHandle,
    fence: Option<LeafletLayer>,
    marker: Option<LeafletLayer>,
    path: Option<LeafletLayer>,
}

impl LeafletMap {
    /// Creates the map inside `#container_id` and adds the tile layer.
    pub fn mount(
        document: &Document,
        container_id: &str,
        tiles: &TileLayerConfig,
    ) -> Result<Self, TrackerError> {
        if document.get_element_by_id(container_id).is_none() {
            return Err(TrackerError::MapContainer(container_id.to_string()));
        }
        let map = leaflet_map(container_id).map_err(|e| {
            log::error!("L.map failed: {:?}", e);
            TrackerError::MapContainer(container_id.to_string())
        })?;

        let options = TileOptions {
            max_zoom: tiles.max_zoom,
            attribution: &tiles.attribution,
        };
        tile_layer(&tiles.url_template, &to_js(&options)).add_to(&map);

        Ok(Self {
            map,
            fence: None,
            marker: None,
            path: None,
        })
    }
}

impl MapSurface for LeafletMap {
    fn set_view(&mut self, center: Coordinate, zoom: u8) {
        self.map.set_view(&lat_lng(center), zoom as f64);
    }

    fn draw_fence(&mut self, ring: &[Coordinate], style: &FenceStyle) {
        let latlngs: Vec<[f64; 2]> = ring.iter().map(|c| c.to_lat_lng()).collect();
        let layer = polygon(&to_js(&latlngs), &to_js(style));
        layer.add_to(&self.map);
        self.fence = Some(layer);
    }

    fn set_fence_style(&mut self, style: &FenceStyle) {
        if let Some(fence) = &self.fence {
            fence.set_style(&to_js(style));
        }
    }

    fn draw_path(&mut self, style: &PathStyle) {
        let empty: [[f64; 2]; 0] = [];
        let layer = polyline(&to_js(&empty), &to_js(style));
        layer.add_to(&self.map);
        self.path = Some(layer);
    }

    fn place_marker(&mut self, at: Coordinate) {
        let layer = marker(&lat_lng(at));
        layer.add_to(&self.map);
        self.marker = Some(layer);
    }

    fn move_marker(&mut self, at: Coordinate) {
        if let Some(m) = &self.marker {
            m.set_lat_lng(&lat_lng(at));
            return;
        }
        self.place_marker(at);
    }

    fn extend_path(&mut self, at: Coordinate) {
        if let Some(path) = &self.path {
            path.add_lat_lng(&lat_lng(at));
        }
    }
}
