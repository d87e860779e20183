//! Extension to MIME type table.

use crate::VideoError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A video file extension recognized by the player plugin.
///
/// Keys are lowercase and carry no leading dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoExtension {
    /// MPEG-4 container.
    Mp4,
    /// `WebM` container.
    Webm,
    /// Common Media Application Format.
    Cmaf,
    /// CMAF video track.
    Cmfv,
    /// HLS playlist.
    M3u8,
    /// Ogg container.
    Ogg,
    /// Ogg video.
    Ogv,
    /// `QuickTime` movie.
    Mov,
    /// Audio Video Interleave.
    Avi,
    /// Matroska container.
    Mkv,
    /// Flash video.
    Flv,
    /// Windows Media Video.
    Wmv,
}

impl VideoExtension {
    /// Every recognized extension, in table order.
    pub const ALL: [Self; 12] = [
        Self::Mp4,
        Self::Webm,
        Self::Cmaf,
        Self::Cmfv,
        Self::M3u8,
        Self::Ogg,
        Self::Ogv,
        Self::Mov,
        Self::Avi,
        Self::Mkv,
        Self::Flv,
        Self::Wmv,
    ];

    /// The extension as written in file names, without the dot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Cmaf => "cmaf",
            Self::Cmfv => "cmfv",
            Self::M3u8 => "m3u8",
            Self::Ogg => "ogg",
            Self::Ogv => "ogv",
            Self::Mov => "mov",
            Self::Avi => "avi",
            Self::Mkv => "mkv",
            Self::Flv => "flv",
            Self::Wmv => "wmv",
        }
    }

    /// The MIME type the plugin announces for this extension.
    ///
    /// `webm`, `cmaf` and `cmfv` share `video/mp4` with `mp4`. The plugin's
    /// own table has always done this; `webm` in particular would normally be
    /// `video/webm`. Kept identical so hosts see what the plugin sees.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Mp4 | Self::Webm | Self::Cmaf | Self::Cmfv => "video/mp4",
            Self::M3u8 => "application/x-mpegURL",
            Self::Ogg | Self::Ogv => "video/ogg",
            Self::Mov => "video/quicktime",
            Self::Avi => "video/x-msvideo",
            Self::Mkv => "video/x-matroska",
            Self::Flv => "video/x-flv",
            Self::Wmv => "video/x-ms-wmv",
        }
    }

    /// Detect the extension of a media URL or path.
    ///
    /// Only the last path segment is considered, the query string and
    /// fragment are ignored and the comparison is case-insensitive.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let segment = path.rsplit('/').next().unwrap_or_default();
        let (stem, ext) = segment.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        ext.to_ascii_lowercase().parse().ok()
    }
}

impl fmt::Display for VideoExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoExtension {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str() == s)
            .ok_or_else(|| VideoError::UnrecognizedExtension(s.to_owned()))
    }
}
