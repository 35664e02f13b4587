#![warn(clippy::all)]

//! Draggable Markers - a demo host for the marker/viewport sync core.
//!
//! The host owns every binding value, replays them into the map each frame,
//! shows an inspector for editing them, and logs the notification events
//! the map emits.

mod host;
mod ui;

use draggable_markers::canvas::CanvasEngineFactory;
use draggable_markers::{EngineEvent, MarkerMap, SyncConfig};
use eframe::egui;
use host::{url_state, HostSettings, HostState};

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Draggable Markers",
        native_options,
        Box::new(|cc| Ok(Box::new(MarkersApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to mount into");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("app_canvas")
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            log::error!("Failed to find app_canvas");
            return;
        };

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(MarkersApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    log::error!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Demo host application.
pub struct MarkersApp {
    host: HostState,
    map: MarkerMap<CanvasEngineFactory>,
    /// Config the current map was built with.
    active_sync: SyncConfig,
    inspector: ui::InspectorBuffers,
}

impl MarkersApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut settings = HostSettings::load();
        url_state::parse_from_url().apply(&mut settings.bindings);

        let active_sync = settings.sync.clone();
        let mut map = MarkerMap::new(active_sync.clone());
        map.mount(CanvasEngineFactory);

        Self {
            host: HostState::new(settings),
            map,
            active_sync,
            inspector: ui::InspectorBuffers::default(),
        }
    }

    /// Rebuilds the map when the core tunables changed.
    fn rebuild_if_reconfigured(&mut self) {
        if self.host.settings.sync == self.active_sync {
            return;
        }
        log::info!("Sync config changed, rebuilding map");
        self.active_sync = self.host.settings.sync.clone();
        self.map.unmount();
        self.map = MarkerMap::new(self.active_sync.clone());
        self.map.mount(CanvasEngineFactory);
    }
}

impl eframe::App for MarkersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.rebuild_if_reconfigured();

        // Replay the host's current values into the map
        let bindings = self.host.bindings().clone();
        self.map.sync(&bindings, &mut self.host);

        ui::render_top_bar(ctx, &self.host, &self.map);
        ui::render_left_panel(ctx, &mut self.host, &mut self.inspector);
        ui::render_bottom_panel(ctx, &mut self.host);
        ui::render_canvas(ctx, &mut self.map);

        // Deliver what the engine reported this frame
        let events = self
            .map
            .engine_mut()
            .map(|engine| engine.drain_events())
            .unwrap_or_default();
        let settled = events.iter().any(|e| *e != EngineEvent::Render);
        for event in events {
            self.map.handle_event(event, &mut self.host);
        }

        if self.host.dirty {
            self.host.settings.save();
            self.host.dirty = false;
            ctx.request_repaint();
        } else if settled {
            ctx.request_repaint();
        }
    }
}
