//! Mock implementations for exercising queues and registries.
//!
//! Manual mocks with shared probes: the sink hands its state out through
//! a [`MockSinkProbe`] so tests can script failures and latency before
//! operations arrive, then inspect exactly what reached the sink. The
//! probe also records whether two operations ever overlapped — the one
//! thing a queue must never allow.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::{
    error::SinkError,
    sink::{MediaSink, MediaSource, ReadyState, SegmentPayload},
};

/// One call that reached a [`MockSink`], in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkCall {
    Append,
    Remove,
    Abort,
}

#[derive(Default)]
struct MockSinkState {
    calls: Mutex<Vec<SinkCall>>,
    appended: Mutex<Vec<Bytes>>,
    removed: Mutex<Vec<(f64, f64)>>,
    /// Scripted failures keyed by 0-based operation ordinal.
    failures: Mutex<HashMap<usize, String>>,
    op_counter: AtomicUsize,
    op_delay: Mutex<Duration>,
    busy: AtomicBool,
    overlap: AtomicBool,
    abort_error: Mutex<Option<String>>,
}

impl MockSinkState {
    fn scripted_failure(&self, ordinal: usize) -> Result<(), SinkError> {
        match self.failures.lock().remove(&ordinal) {
            Some(message) => Err(SinkError::new(message)),
            None => Ok(()),
        }
    }
}

/// Clears the busy flag even when an operation's future is dropped
/// mid-flight (an aborted operation is exactly that).
struct BusyGuard(Arc<MockSinkState>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

/// Scriptable, recording sink.
pub struct MockSink {
    state: Arc<MockSinkState>,
}

impl MockSink {
    pub fn new() -> (Self, MockSinkProbe) {
        let state = Arc::new(MockSinkState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockSinkProbe { state },
        )
    }

    /// Mark an operation in flight; flags an overlap if one already is.
    fn begin(&self, call: SinkCall) -> (usize, BusyGuard) {
        let state = &self.state;
        if state.busy.swap(true, Ordering::AcqRel) {
            state.overlap.store(true, Ordering::Release);
        }
        state.calls.lock().push(call);
        let ordinal = state.op_counter.fetch_add(1, Ordering::AcqRel);
        (ordinal, BusyGuard(Arc::clone(state)))
    }

    async fn run_operation(&self, ordinal: usize) -> Result<(), SinkError> {
        let delay = *self.state.op_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.state.scripted_failure(ordinal)
    }
}

#[async_trait]
impl MediaSink for MockSink {
    async fn append(&mut self, payload: &SegmentPayload) -> Result<(), SinkError> {
        let (ordinal, _guard) = self.begin(SinkCall::Append);
        let outcome = self.run_operation(ordinal).await;
        if outcome.is_ok() {
            self.state.appended.lock().push(payload.data.clone());
        }
        outcome
    }

    async fn remove(&mut self, start: f64, end: f64) -> Result<(), SinkError> {
        let (ordinal, _guard) = self.begin(SinkCall::Remove);
        let outcome = self.run_operation(ordinal).await;
        if outcome.is_ok() {
            self.state.removed.lock().push((start, end));
        }
        outcome
    }

    fn abort(&mut self) -> Result<(), SinkError> {
        self.state.calls.lock().push(SinkCall::Abort);
        match self.state.abort_error.lock().clone() {
            Some(message) => Err(SinkError::new(message)),
            None => Ok(()),
        }
    }

    fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }
}

/// Test-side view into a [`MockSink`].
#[derive(Clone)]
pub struct MockSinkProbe {
    state: Arc<MockSinkState>,
}

impl MockSinkProbe {
    /// Fail the operation with the given 0-based ordinal.
    pub fn fail_nth(&self, ordinal: usize, message: impl Into<String>) {
        self.state.failures.lock().insert(ordinal, message.into());
    }

    /// Stretch every subsequent operation by `delay`.
    pub fn set_op_delay(&self, delay: Duration) {
        *self.state.op_delay.lock() = delay;
    }

    /// Make `abort` report a failure.
    pub fn set_abort_error(&self, message: impl Into<String>) {
        *self.state.abort_error.lock() = Some(message.into());
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.state.calls.lock().clone()
    }

    pub fn appended(&self) -> Vec<Bytes> {
        self.state.appended.lock().clone()
    }

    pub fn removed(&self) -> Vec<(f64, f64)> {
        self.state.removed.lock().clone()
    }

    /// True if two operations were ever in flight at once.
    pub fn overlap_detected(&self) -> bool {
        self.state.overlap.load(Ordering::Acquire)
    }
}

/// Controllable media source: settable readiness, scriptable attach
/// failures, and a probe for every sink it hands out.
pub struct MockMediaSource {
    ready: Mutex<ReadyState>,
    fail_create: Mutex<Option<String>>,
    sinks: Mutex<Vec<(String, MockSinkProbe)>>,
}

impl MockMediaSource {
    pub fn new() -> Self {
        Self {
            ready: Mutex::new(ReadyState::Open),
            fail_create: Mutex::new(None),
            sinks: Mutex::new(Vec::new()),
        }
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        *self.ready.lock() = state;
    }

    /// Make the next `create_sink` calls fail.
    pub fn fail_create(&self, message: impl Into<String>) {
        *self.fail_create.lock() = Some(message.into());
    }

    /// Codecs attached so far, in order.
    pub fn created_codecs(&self) -> Vec<String> {
        self.sinks.lock().iter().map(|(codec, _)| codec.clone()).collect()
    }

    /// Probe for the most recently attached sink.
    pub fn last_probe(&self) -> Option<MockSinkProbe> {
        self.sinks.lock().last().map(|(_, probe)| probe.clone())
    }
}

impl Default for MockMediaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for MockMediaSource {
    fn ready_state(&self) -> ReadyState {
        *self.ready.lock()
    }

    fn create_sink(&self, codec: &str) -> Result<Box<dyn MediaSink>, SinkError> {
        if let Some(message) = self.fail_create.lock().clone() {
            return Err(SinkError::new(message));
        }
        let (sink, probe) = MockSink::new();
        self.sinks.lock().push((codec.to_string(), probe));
        Ok(Box::new(sink))
    }
}
