#![forbid(unsafe_code)]

//! # Tessella
//!
//! Facade crate for the buffering core of an adaptive-media-streaming
//! client: segment index resolution plus per-media-type buffer operation
//! queues.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use tessella::buffer::{BufferRegistry, SegmentPayload, SinkCapabilities, SinkOptions};
//! use tessella::index::{IndexContext, SegmentIndex, TemplateIndex, TemplateIndexArgs};
//!
//! // Resolve the segments covering the next few seconds of playback.
//! let context = IndexContext::new(0.0, "https://cdn.example.com/rep/".parse()?);
//! let index: SegmentIndex = TemplateIndex::new(args, &context)?.into();
//! let references = index.segments(0.0, 12.0);
//!
//! // Feed their bytes through the audio buffer's queue.
//! let registry = BufferRegistry::new(media_source, SinkCapabilities::new());
//! let queue = registry.create(tessella::buffer::MediaType::Audio, "audio/mp4", &SinkOptions::default())?;
//! queue.enqueue_append(SegmentPayload::new(segment_bytes)).await?;
//! ```

// ── Re-export sub-crates ────────────────────────────────────────────────

pub mod buffer {
    pub use tessella_buffer::*;
}

pub mod index {
    pub use tessella_index::*;
}
