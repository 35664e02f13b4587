//! Camera controller: external longitude/latitude/zoom scalars <-> live camera.
//!
//! Both directions run through here. Host changes re-center (or re-zoom) the
//! camera; settle events read the camera back into the host. A write-back is
//! remembered until the next external replay is compared against it, so the
//! host replaying it once is recognized as an echo rather than as a fresh
//! external change.

use crate::engine::{LngLat, MapEngine, MapOptions};
use crate::state::{
    format_coordinate, parse_coordinate, HostStore, MapBindings, MapEvent, Viewport,
};

pub struct CameraController {
    decimals: usize,
    epsilon: f64,
    /// Longitude/latitude strings of the last write-back not yet replayed.
    echo_center: Option<(String, String)>,
    /// Zoom of the last write-back not yet replayed.
    echo_zoom: Option<f64>,
}

impl CameraController {
    pub fn new(decimals: usize, epsilon: f64) -> Self {
        Self {
            decimals,
            epsilon,
            echo_center: None,
            echo_zoom: None,
        }
    }

    /// Builds the camera construction options, or `None` when the
    /// credential gate is closed.
    pub fn map_options(&self, bindings: &MapBindings) -> Option<MapOptions> {
        if !bindings.has_access_token() {
            log::warn!(
                "No access token provided. Please provide one in the component settings."
            );
            return None;
        }

        Some(MapOptions {
            access_token: bindings.access_token.trim().to_string(),
            style: bindings.map_style.clone(),
            center: LngLat::new(
                parse_coordinate(&bindings.longitude),
                parse_coordinate(&bindings.latitude),
            ),
            zoom: bindings.zoom,
            attribution_control: false,
        })
    }

    /// External longitude/latitude changed: publish the snapshot and move
    /// the camera there.
    pub fn apply_center<E: MapEngine, H: HostStore>(
        &mut self,
        engine: &mut E,
        longitude: &str,
        latitude: &str,
        zoom: f64,
        host: &mut H,
    ) {
        if self.is_center_echo(longitude, latitude) {
            log::trace!("Ignoring echoed center {}, {}", longitude, latitude);
            return;
        }

        let target = LngLat::new(parse_coordinate(longitude), parse_coordinate(latitude));
        host.set_viewport(Viewport::new(target, zoom));

        if engine.center().approx_eq(&target, self.epsilon) {
            return;
        }
        log::debug!("Re-centering camera to {:?}", target);
        engine.set_center(target);
    }

    /// External zoom changed: re-zoom the camera unless it is already there.
    pub fn apply_zoom<E: MapEngine, H: HostStore>(
        &mut self,
        engine: &mut E,
        zoom: f64,
        host: &mut H,
    ) {
        if self.echo_zoom.take() == Some(zoom) {
            log::trace!("Ignoring echoed zoom {}", zoom);
            return;
        }
        if (engine.zoom() - zoom).abs() <= self.epsilon {
            return;
        }

        log::debug!("Re-zooming camera to {}", zoom);
        engine.set_zoom(zoom);
        host.set_viewport(Viewport::new(engine.center(), engine.zoom()));
    }

    pub fn apply_style<E: MapEngine>(&mut self, engine: &mut E, style: &str) {
        log::debug!("Switching map style to {}", style);
        engine.set_style(style);
    }

    /// A pan/zoom or rotation settled: copy the camera into the host and
    /// notify it.
    pub fn settle<E: MapEngine, H: HostStore>(
        &mut self,
        engine: &E,
        event: MapEvent,
        host: &mut H,
    ) {
        let center = engine.center();
        let zoom = engine.zoom();
        let longitude = format_coordinate(center.lng, self.decimals);
        let latitude = format_coordinate(center.lat, self.decimals);

        host.set_longitude(longitude.clone());
        host.set_latitude(latitude.clone());
        host.set_zoom(zoom);
        host.set_viewport(Viewport::new(center, zoom));
        self.echo_center = Some((longitude, latitude));
        self.echo_zoom = Some(zoom);

        host.emit(event);
    }

    /// Every rendered frame re-measures the container.
    pub fn on_render<E: MapEngine>(&mut self, engine: &mut E) {
        engine.resize();
    }

    /// Forgets the echo tags, e.g. after the camera was torn down.
    pub fn reset(&mut self) {
        self.echo_center = None;
        self.echo_zoom = None;
    }

    /// Consumes the center tag: only the first replay after a write-back
    /// can be its echo.
    fn is_center_echo(&mut self, longitude: &str, latitude: &str) -> bool {
        self.echo_center
            .take()
            .is_some_and(|(lng, lat)| lng == longitude && lat == latitude)
    }
}
