//! URL state encoding/decoding for shareable URLs.
//!
//! Encodes the map center, zoom and style in the URL query string so
//! reloading restores the view.

use draggable_markers::MapBindings;

/// Parsed URL parameters.
#[derive(Debug, Default, PartialEq)]
pub struct UrlParams {
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub zoom: Option<f64>,
    pub style: Option<String>,
    pub token: Option<String>,
}

impl UrlParams {
    /// Overrides the matching bindings.
    pub fn apply(self, bindings: &mut MapBindings) {
        if let Some(lon) = self.lon {
            bindings.longitude = lon;
        }
        if let Some(lat) = self.lat {
            bindings.latitude = lat;
        }
        if let Some(zoom) = self.zoom {
            bindings.zoom = zoom;
        }
        if let Some(style) = self.style {
            bindings.map_style = style;
        }
        if let Some(token) = self.token {
            bindings.access_token = token;
        }
    }
}

/// Parses a `?key=value&...` query string.
pub fn parse_query(query: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = query.trim_start_matches('?');
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "lon" => params.lon = Some(value.to_string()),
            "lat" => params.lat = Some(value.to_string()),
            "zoom" => params.zoom = value.parse().ok(),
            "style" => params.style = Some(value.to_string()),
            "token" => params.token = Some(value.to_string()),
            _ => {}
        }
    }

    params
}

/// Builds the query string written back on viewport changes.
pub fn format_query(bindings: &MapBindings) -> String {
    format!(
        "?lon={}&lat={}&zoom={:.2}&style={}",
        bindings.longitude, bindings.latitude, bindings.zoom, bindings.map_style
    )
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

/// Push current state to the URL query string using `replaceState`.
#[cfg(target_arch = "wasm32")]
pub fn push_to_url(bindings: &MapBindings) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };
    let query = format_query(bindings);
    if let Err(e) =
        history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&query))
    {
        log::warn!("Failed to update URL: {:?}", e);
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn push_to_url(_bindings: &MapBindings) {}
