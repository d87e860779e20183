//! # Playerkit
//!
//! Helpers for driving a native video-player plugin from application code.
//!
//! Playerkit is modular. Enable only the features you need.
//!
//! - `player`: the player-session controller, the plugin trait and a simulated plugin.
//! - `video`: the video file extension to MIME type lookup.
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! playerkit = { version = "0.1", features = ["video"] }
//! ```
//!
//! ```rust,ignore
//! use playerkit::video::VideoExtension;
//!
//! assert_eq!(VideoExtension::Mov.mime_type(), "video/quicktime");
//! ```

#[cfg(feature = "player")]
pub use playerkit_player as player;

#[cfg(feature = "video")]
pub use playerkit_video as video;
