#![warn(clippy::all)]

//! Draggable markers on a map, kept in sync with a host state store.
//!
//! The host owns every value (point list, viewport scalars, geometry, style,
//! access token) and replays them into a [`MarkerMap`] each time they may
//! have changed. Map interactions flow back through [`HostStore`] setters
//! and notification events. The map renderer sits behind the [`MapEngine`]
//! trait; [`canvas::CanvasEngine`] is an egui-painted implementation.

pub mod canvas;
pub mod engine;
pub mod error;
pub mod geo;
pub mod state;
pub mod sync;

pub use engine::{EngineEvent, EngineFactory, LngLat, MapEngine, MarkerId};
pub use error::{BindingsError, EngineError};
pub use state::{FieldNames, HostStore, MapBindings, MapEvent, PointList, PointRecord, Viewport};
pub use sync::{DragWriteBack, MarkerMap, SyncConfig};
