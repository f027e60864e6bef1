//! FIFO serialization of buffer operations against one sink.
//!
//! A [`SinkQueue`] is a cloneable handle over a dispatch task that owns
//! the sink. Operations are executed strictly in submission order with at
//! most one in flight; each caller gets a handle resolving when its own
//! operation finishes. A failed mutation cascade-cancels everything
//! queued behind it, since the buffer is not assumed recoverable without
//! caller intervention.

use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    task::{Context, Poll},
};

use tokio::sync::{broadcast, mpsc, oneshot, Notify};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::{
    error::{QueueError, SinkError},
    events::{BufferEvent, EventSink},
    media_type::MediaType,
    sink::{MediaSink, SegmentPayload},
};

/// Kind of a queued operation, for diagnostics and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Append,
    Remove,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Append => "append",
            OperationKind::Remove => "remove",
        })
    }
}

enum BufferOperation {
    Append(SegmentPayload),
    Remove { start: f64, end: f64 },
}

impl BufferOperation {
    fn kind(&self) -> OperationKind {
        match self {
            BufferOperation::Append(_) => OperationKind::Append,
            BufferOperation::Remove { .. } => OperationKind::Remove,
        }
    }
}

struct QueuedOperation {
    op: BufferOperation,
    done: oneshot::Sender<Result<(), QueueError>>,
}

/// Observability mirror of the dispatch task's state.
#[derive(Default)]
struct QueueShared {
    sink_busy: AtomicBool,
    current: parking_lot::Mutex<Option<OperationKind>>,
}

/// Completion handle for one enqueued operation.
///
/// Resolves with the operation's outcome; dropping it detaches the
/// caller without cancelling the operation.
pub struct OperationHandle {
    rx: oneshot::Receiver<Result<(), QueueError>>,
}

impl Future for OperationHandle {
    type Output = Result<(), QueueError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|res| match res {
            Ok(outcome) => outcome,
            Err(_) => Err(QueueError::Closed),
        })
    }
}

/// Cloneable handle over one media type's dispatch task.
#[derive(Clone)]
pub struct SinkQueue {
    media_type: MediaType,
    op_tx: mpsc::UnboundedSender<QueuedOperation>,
    abort: Arc<Notify>,
    cancel: CancellationToken,
    shared: Arc<QueueShared>,
}

impl std::fmt::Debug for SinkQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkQueue")
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}

impl SinkQueue {
    /// Wrap a freshly constructed sink and spawn its dispatch task,
    /// optionally publishing failure/abort events into `events`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        media_type: MediaType,
        sink: Box<dyn MediaSink>,
        events: Option<broadcast::Sender<BufferEvent>>,
    ) -> Self {
        let events = EventSink::new(events);
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let abort = Arc::new(Notify::new());
        let cancel = CancellationToken::new();
        let shared = Arc::new(QueueShared::default());

        let worker = QueueWorker {
            media_type,
            sink,
            op_rx,
            abort: Arc::clone(&abort),
            cancel: cancel.clone(),
            shared: Arc::clone(&shared),
            events,
        };
        tokio::spawn(worker.run());

        Self {
            media_type,
            op_tx,
            abort,
            cancel,
            shared,
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Queue an append of one segment payload.
    pub fn enqueue_append(&self, payload: SegmentPayload) -> OperationHandle {
        self.enqueue(BufferOperation::Append(payload))
    }

    /// Queue removal of buffered content covering `[start, end]` seconds.
    pub fn enqueue_remove(&self, start: f64, end: f64) -> OperationHandle {
        self.enqueue(BufferOperation::Remove { start, end })
    }

    fn enqueue(&self, op: BufferOperation) -> OperationHandle {
        let kind = op.kind();
        let (done, rx) = oneshot::channel();
        let queued = QueuedOperation { op, done };
        match self.op_tx.send(queued) {
            Ok(()) => trace!(media_type = %self.media_type, %kind, "operation enqueued"),
            Err(mpsc::error::SendError(rejected)) => {
                debug!(media_type = %self.media_type, %kind, "enqueue on closed queue");
                let _ = rejected.done.send(Err(QueueError::Closed));
            }
        }
        OperationHandle { rx }
    }

    /// Cancel the current operation (requesting a best-effort sink abort)
    /// and discard everything pending. Only this type's queue is
    /// affected.
    pub fn abort(&self) {
        debug!(media_type = %self.media_type, "abort requested");
        self.abort.notify_one();
    }

    /// True while an operation is submitted to the sink.
    pub fn is_busy(&self) -> bool {
        self.shared.sink_busy.load(Ordering::Acquire)
    }

    /// Kind of the operation currently submitted to the sink, if any.
    pub fn current_operation(&self) -> Option<OperationKind> {
        *self.shared.current.lock()
    }

    /// Terminate the dispatch task. In-flight and pending operations are
    /// failed as aborted; later enqueues observe a closed queue.
    pub(crate) fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Outcome of driving one operation against the sink.
enum ExecOutcome {
    Done,
    Failed(SinkError),
    /// Preempted by an explicit abort; the sink was asked to cancel.
    Aborted,
    /// Preempted by queue shutdown; the sink is left untouched.
    Cancelled,
}

struct QueueWorker {
    media_type: MediaType,
    sink: Box<dyn MediaSink>,
    op_rx: mpsc::UnboundedReceiver<QueuedOperation>,
    abort: Arc<Notify>,
    cancel: CancellationToken,
    shared: Arc<QueueShared>,
    events: EventSink,
}

impl QueueWorker {
    async fn run(mut self) {
        trace!(media_type = %self.media_type, "sink queue started");
        loop {
            tokio::select! {
                biased;

                // Aborts outrank shutdown so a dispose that just issued
                // one still aborts the sink before the task exits.
                _ = self.abort.notified() => {
                    self.handle_idle_abort();
                }
                _ = self.cancel.cancelled() => {
                    self.drain_pending(&QueueError::Aborted);
                    break;
                }
                queued = self.op_rx.recv() => match queued {
                    Some(queued) => self.execute(queued).await,
                    None => break,
                },
            }
        }
        trace!(media_type = %self.media_type, "sink queue stopped");
    }

    /// Drive one operation to completion, watching for abort/shutdown.
    async fn execute(&mut self, queued: QueuedOperation) {
        let kind = queued.op.kind();
        self.set_current(Some(kind));
        trace!(media_type = %self.media_type, %kind, "operation submitted to sink");

        let abort = Arc::clone(&self.abort);
        let cancel = self.cancel.clone();
        let outcome = tokio::select! {
            biased;
            _ = abort.notified() => ExecOutcome::Aborted,
            _ = cancel.cancelled() => ExecOutcome::Cancelled,
            result = Self::apply(self.sink.as_mut(), &queued.op) => match result {
                Ok(()) => ExecOutcome::Done,
                Err(e) => ExecOutcome::Failed(e),
            },
        };

        self.set_current(None);
        match outcome {
            ExecOutcome::Done => {
                trace!(media_type = %self.media_type, %kind, "operation completed");
                let _ = queued.done.send(Ok(()));
            }
            ExecOutcome::Failed(error) => {
                warn!(media_type = %self.media_type, %kind, %error, "sink operation failed");
                let cause = error.to_string();
                let _ = queued.done.send(Err(QueueError::Sink { kind, source: error }));
                self.drain_pending(&QueueError::CancelledByFailure {
                    cause: cause.clone(),
                });
                self.events.publish(BufferEvent::OperationFailed {
                    media_type: self.media_type,
                    kind,
                    error: cause,
                });
            }
            ExecOutcome::Aborted => {
                debug!(media_type = %self.media_type, %kind, "operation aborted mid-flight");
                self.abort_sink();
                let _ = queued.done.send(Err(QueueError::Aborted));
                self.drain_pending(&QueueError::Aborted);
                self.events.publish(BufferEvent::Aborted {
                    media_type: self.media_type,
                });
            }
            ExecOutcome::Cancelled => {
                debug!(media_type = %self.media_type, %kind, "operation cancelled by shutdown");
                let _ = queued.done.send(Err(QueueError::Aborted));
                self.drain_pending(&QueueError::Aborted);
            }
        }
    }

    async fn apply(sink: &mut dyn MediaSink, op: &BufferOperation) -> Result<(), SinkError> {
        match op {
            BufferOperation::Append(payload) => sink.append(payload).await,
            BufferOperation::Remove { start, end } => sink.remove(*start, *end).await,
        }
    }

    /// Abort received while no operation was in flight: still ask the
    /// sink to cancel, then discard whatever queued up.
    fn handle_idle_abort(&mut self) {
        debug!(media_type = %self.media_type, "abort requested while idle");
        self.abort_sink();
        if self.drain_pending(&QueueError::Aborted) > 0 {
            self.events.publish(BufferEvent::Aborted {
                media_type: self.media_type,
            });
        }
    }

    fn abort_sink(&mut self) {
        if let Err(error) = self.sink.abort() {
            warn!(media_type = %self.media_type, %error, "failed to abort sink");
        }
    }

    fn drain_pending(&mut self, error: &QueueError) -> usize {
        let mut dropped = 0usize;
        while let Ok(queued) = self.op_rx.try_recv() {
            let _ = queued.done.send(Err(error.clone()));
            dropped += 1;
        }
        if dropped > 0 {
            debug!(media_type = %self.media_type, dropped, %error, "discarded pending operations");
        }
        dropped
    }

    fn set_current(&self, kind: Option<OperationKind>) {
        *self.shared.current.lock() = kind;
        self.shared
            .sink_busy
            .store(kind.is_some(), Ordering::Release);
    }
}
