//! Video file types understood by the native player plugin.
//!
//! This crate provides:
//! - **Extensions**: the closed set of video file extensions the plugin plays
//! - **MIME lookup**: the MIME type the plugin announces for each extension
//! - **URL sniffing**: extension detection from a media URL
//!
//! # Usage
//!
//! ```
//! use playerkit_video::{VideoExtension, mime_type_for};
//!
//! assert_eq!(VideoExtension::M3u8.mime_type(), "application/x-mpegURL");
//! assert_eq!(mime_type_for("mkv").unwrap(), "video/x-matroska");
//! assert!(mime_type_for("gif").is_err());
//!
//! let ext = VideoExtension::from_url("https://cdn.example.com/clip.MOV?token=1");
//! assert_eq!(ext, Some(VideoExtension::Mov));
//! ```

#![warn(missing_docs)]

mod types;

pub use types::VideoExtension;

/// Errors that can occur with video type lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VideoError {
    /// The extension is not one of the recognized video extensions.
    #[error("unrecognized video extension: {0:?}")]
    UnrecognizedExtension(String),
}

/// Look up the MIME type for a file extension given without the leading dot.
///
/// Unlike [`VideoExtension::mime_type`], which is total, this accepts any
/// string and never falls back to a default type.
///
/// # Errors
/// Returns [`VideoError::UnrecognizedExtension`] if `extension` is not a
/// recognized key.
pub fn mime_type_for(extension: &str) -> Result<&'static str, VideoError> {
    extension.parse::<VideoExtension>().map(VideoExtension::mime_type)
}
