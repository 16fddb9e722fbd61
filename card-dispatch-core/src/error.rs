//! Error types

use std::io;

/// Failure reported by an action's async call.
///
/// This is the only failure kind a controller distinguishes. It is always
/// recovered locally: the observer's `failed` hook receives it and the
/// controller resets after the failure display duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    /// The backend did not answer in time.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a failure.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The request was rejected before it reached the backend.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Error returned by an observer hook.
///
/// Hook errors are not swallowed: they propagate out of `trigger`/`apply`
/// after the controller has finished its own transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    /// The receiving side of a channel observer was dropped.
    #[error("observer channel closed")]
    ChannelClosed,

    /// A hook failed for an observer-specific reason.
    #[error("observer hook failed: {0}")]
    Hook(String),
}

/// Error from a preference store.
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("preference data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("could not parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
