//! Error types for the race engine
//!
//! Structural failures (unreadable files, malformed configuration or event
//! records) are fatal and surface through this enum. Semantic anomalies in
//! the event stream are not errors; the state machine absorbs them as
//! no-ops.

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a run before or during event loading
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid event format: {0}")]
    EventFormat(String),

    #[error("invalid event time format: {0}")]
    EventTime(String),

    #[error("not enough event parts: {0}")]
    EventParts(String),

    #[error("invalid event ID: {0}")]
    EventId(String),

    #[error("invalid competitor ID: {0}")]
    CompetitorId(String),

    #[error("malformed event record at line {line}: {source}")]
    EventRecord {
        line: usize,
        source: Box<EngineError>,
    },

    #[error("invalid clock value: {0}")]
    ClockValue(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
