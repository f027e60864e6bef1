//! Buffer lifecycle events.
//!
//! Components publish into an optional `broadcast` channel; with no
//! subscribers (or no channel configured) events are silently dropped.

use tokio::sync::broadcast;

use crate::{media_type::MediaType, queue::OperationKind};

/// Events emitted by the registry and its sink queues.
#[derive(Debug, Clone)]
pub enum BufferEvent {
    /// A buffer slot was created and its queue spawned.
    SlotCreated {
        media_type: MediaType,
        codec: String,
    },
    /// A buffer slot was disposed and its queue shut down.
    SlotDisposed { media_type: MediaType },
    /// The sink rejected an operation; everything queued behind it was
    /// cascade-cancelled.
    OperationFailed {
        media_type: MediaType,
        kind: OperationKind,
        error: String,
    },
    /// The queue's current and pending operations were cancelled by an
    /// explicit abort.
    Aborted { media_type: MediaType },
}

/// Publish-if-configured helper shared by the registry and queues.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    tx: Option<broadcast::Sender<BufferEvent>>,
}

impl EventSink {
    pub fn new(tx: Option<broadcast::Sender<BufferEvent>>) -> Self {
        Self { tx }
    }

    pub fn publish(&self, event: BufferEvent) {
        if let Some(ref tx) = self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn sender(&self) -> Option<broadcast::Sender<BufferEvent>> {
        self.tx.clone()
    }
}
