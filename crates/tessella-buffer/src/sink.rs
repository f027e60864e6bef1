//! The external sink and media-source abstractions the queue drives.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::SinkError;

/// Bytes of one segment handed to `append`, plus optional time bounds for
/// sinks that window their ingestion. Opaque to this crate.
#[derive(Debug, Clone)]
pub struct SegmentPayload {
    pub data: Bytes,
    /// `[start, end]` seconds this payload covers, when known.
    pub time_range: Option<(f64, f64)>,
}

impl SegmentPayload {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            time_range: None,
        }
    }

    pub fn with_time_range(mut self, start: f64, end: f64) -> Self {
        self.time_range = Some((start, end));
        self
    }
}

/// The stateful, single-operation-at-a-time primitive that ingests
/// segment bytes into the playback buffer.
///
/// One instance per media type, driven exclusively by that type's
/// [`SinkQueue`]: the queue guarantees at most one `append`/`remove` is
/// in flight at a time. An operation cancelled by abort has its future
/// dropped before `abort` is invoked; implementations must tolerate
/// that ordering.
///
/// Successful appends and removes change the sink's internally buffered
/// time ranges; this crate does not track those ranges itself.
///
/// [`SinkQueue`]: crate::queue::SinkQueue
#[async_trait]
pub trait MediaSink: Send {
    /// Ingest one segment payload. Resolves when the sink has fully
    /// absorbed it.
    async fn append(&mut self, payload: &SegmentPayload) -> Result<(), SinkError>;

    /// Drop buffered content covering `[start, end]` seconds.
    async fn remove(&mut self, start: f64, end: f64) -> Result<(), SinkError>;

    /// Best-effort cancellation of the current activity. Synchronous;
    /// failures are logged by the caller, never escalated.
    fn abort(&mut self) -> Result<(), SinkError>;

    /// The sink's own asynchronous in-flight indicator.
    fn is_busy(&self) -> bool;
}

/// Readiness of the shared media source the native sinks attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Open,
    Ended,
    Closed,
}

/// The shared playback surface native sinks are carved out of.
///
/// Shared read-only across the registry: the core checks readiness
/// before best-effort aborts and never mutates the source itself.
pub trait MediaSource: Send + Sync {
    fn ready_state(&self) -> ReadyState;

    /// Attach a native sink for the given codec.
    fn create_sink(&self, codec: &str) -> Result<Box<dyn MediaSink>, SinkError>;
}
