//! Error types for the fallible boundaries.
//!
//! The synchronization core itself never surfaces errors to the host; engine
//! failures are logged where they cross back into the core.

/// Failures reported by a render engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("access token is blank")]
    MissingAccessToken,
    #[error("source '{0}' already exists")]
    DuplicateSource(String),
    #[error("source '{0}' does not exist")]
    UnknownSource(String),
    #[error("layer '{0}' already exists")]
    DuplicateLayer(String),
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
}

/// Failures while reading a host binding configuration.
#[derive(Debug, thiserror::Error)]
pub enum BindingsError {
    #[error("failed to parse bindings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("points must be a JSON array of objects")]
    PointsNotArray,
}
