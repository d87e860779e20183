use crate::PlayerId;
use thiserror::Error;

/// Errors reported by the native player plugin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The plugin rejected the call.
    #[error("{0}")]
    Rejected(String),

    /// The plugin has no player with this identifier.
    #[error("player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The plugin is not available on this platform.
    #[error("video player plugin not available")]
    NotAvailable,
}

/// Errors that can occur when the controller handles a command.
///
/// Every variant has already been written to the status board by the time it
/// is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControllerError {
    /// The video URL input was empty.
    #[error("Please enter a video URL")]
    MissingUrl,

    /// A volume level outside `0.0..=1.0` was requested.
    #[error("Volume must be between 0.0 and 1.0")]
    VolumeOutOfRange(f32),

    /// The plugin answered an init call with a failed result.
    #[error("Failed to initialize player")]
    InitFailed,

    /// The plugin rejected a call.
    #[error(transparent)]
    Plugin(#[from] PluginError),
}
