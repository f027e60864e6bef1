#![forbid(unsafe_code)]

//! Per-media-type operation queues over single-operation asynchronous
//! buffer sinks.
//!
//! A [`BufferRegistry`] owns at most one [`SinkQueue`] per media type.
//! Each queue serializes append/remove/abort operations against one
//! external [`MediaSink`] — the stateful primitive that forbids
//! concurrent mutations — preserving submission order and propagating
//! each outcome back to its original requester.
//!
//! Native types (audio, video) attach to the shared [`MediaSource`];
//! custom types (text, image, overlay) are built by constructors from an
//! injected [`SinkCapabilities`] table and recreated from scratch on
//! every (re)creation.

mod capabilities;
mod error;
mod events;
mod media_type;
mod queue;
mod registry;
mod sink;
pub mod testing;

pub use capabilities::{SinkCapabilities, SinkCapability, SinkContext, SinkFactory, SinkOptions};
pub use error::{BufferError, BufferResult, QueueError, QueueResult, SinkError};
pub use events::BufferEvent;
pub use media_type::MediaType;
pub use queue::{OperationHandle, OperationKind, SinkQueue};
pub use registry::BufferRegistry;
pub use sink::{MediaSink, MediaSource, ReadyState, SegmentPayload};
