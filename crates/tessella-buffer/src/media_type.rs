use std::{fmt, str::FromStr};

use crate::error::BufferError;

/// Media types a buffer slot can be created for.
///
/// `Audio` and `Video` are *native*: their sinks attach directly to the
/// shared media source and ingest demuxed media bytes. The remaining
/// types are *custom*: independently constructed auxiliary buffers whose
/// sinks come from the injected capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Audio,
    Video,
    Text,
    Image,
    Overlay,
}

impl MediaType {
    /// Every type a registry can ever hold, in disposal order.
    pub const ALL: [MediaType; 5] = [
        MediaType::Audio,
        MediaType::Video,
        MediaType::Text,
        MediaType::Image,
        MediaType::Overlay,
    ];

    /// True for types bound directly to the shared media source.
    pub fn is_native(self) -> bool {
        matches!(self, MediaType::Audio | MediaType::Video)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Text => "text",
            MediaType::Image => "image",
            MediaType::Overlay => "overlay",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = BufferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "audio" => Ok(MediaType::Audio),
            "video" => Ok(MediaType::Video),
            "text" => Ok(MediaType::Text),
            "image" => Ok(MediaType::Image),
            "overlay" => Ok(MediaType::Overlay),
            other => Err(BufferError::UnknownType(other.to_string())),
        }
    }
}
