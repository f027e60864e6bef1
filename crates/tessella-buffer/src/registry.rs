//! Type-keyed factory and lifecycle manager over buffer slots.
//!
//! At most one slot exists per media type. Native sinks are carved out
//! of the shared media source; custom sinks come from the injected
//! capability table and are rebuilt from scratch on every (re)creation.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    capabilities::{SinkCapabilities, SinkContext, SinkOptions},
    error::{BufferError, BufferResult},
    events::{BufferEvent, EventSink},
    media_type::MediaType,
    queue::SinkQueue,
    sink::{MediaSink, MediaSource, ReadyState},
};

/// One live buffer: the queue plus informational codec.
struct BufferSlot {
    codec: String,
    queue: SinkQueue,
}

/// Owns at most one [`SinkQueue`] per media type.
pub struct BufferRegistry {
    media_source: Arc<dyn MediaSource>,
    capabilities: SinkCapabilities,
    // Held only across the check/mutate of slot existence, never across
    // queued-operation execution.
    slots: Mutex<HashMap<MediaType, BufferSlot>>,
    events: EventSink,
}

impl BufferRegistry {
    pub fn new(media_source: Arc<dyn MediaSource>, capabilities: SinkCapabilities) -> Self {
        Self {
            media_source,
            capabilities,
            slots: Mutex::new(HashMap::new()),
            events: EventSink::default(),
        }
    }

    /// Publish lifecycle and failure events into the given channel.
    pub fn with_events(mut self, tx: broadcast::Sender<BufferEvent>) -> Self {
        self.events = EventSink::new(Some(tx));
        self
    }

    /// Every type this registry can create: the native pair plus each
    /// registered custom capability.
    pub fn available_types(&self) -> Vec<MediaType> {
        MediaType::ALL
            .into_iter()
            .filter(|ty| ty.is_native() || self.capabilities.is_registered(*ty))
            .collect()
    }

    /// Create the slot for a media type and return its queue.
    ///
    /// Fails with [`BufferError::AlreadyExists`] while a slot for the
    /// type is live: callers must dispose before recreating.
    pub fn create(
        &self,
        media_type: MediaType,
        codec: &str,
        options: &SinkOptions,
    ) -> BufferResult<SinkQueue> {
        let mut slots = self.slots.lock();
        if slots.contains_key(&media_type) {
            return Err(BufferError::AlreadyExists(media_type));
        }

        let sink = self.construct_sink(media_type, codec, options)?;
        let queue = SinkQueue::spawn(media_type, sink, self.events.sender());
        slots.insert(
            media_type,
            BufferSlot {
                codec: codec.to_string(),
                queue: queue.clone(),
            },
        );
        drop(slots);

        self.events.publish(BufferEvent::SlotCreated {
            media_type,
            codec: codec.to_string(),
        });
        Ok(queue)
    }

    fn construct_sink(
        &self,
        media_type: MediaType,
        codec: &str,
        options: &SinkOptions,
    ) -> BufferResult<Box<dyn MediaSink>> {
        if media_type.is_native() {
            debug!(media_type = %media_type, codec, "attaching native sink");
            return Ok(self.media_source.create_sink(codec)?);
        }

        let capability = self
            .capabilities
            .get(media_type)
            .ok_or(BufferError::FeatureNotActivated(media_type))?;
        if capability.requires_render_target && options.render_target.is_none() {
            return Err(BufferError::InvalidOptions {
                media_type,
                reason: "a render target is required".to_string(),
            });
        }

        debug!(media_type = %media_type, codec, "constructing custom sink");
        let context = SinkContext {
            media_type,
            codec: codec.to_string(),
            options: options.clone(),
        };
        Ok((capability.factory)(&context))
    }

    /// The live queue for a type, if any.
    pub fn get(&self, media_type: MediaType) -> Option<SinkQueue> {
        self.slots.lock().get(&media_type).map(|slot| slot.queue.clone())
    }

    /// Whether a slot for the type is live.
    pub fn has(&self, media_type: MediaType) -> bool {
        self.slots.lock().contains_key(&media_type)
    }

    /// Codec the slot was created with, if live.
    pub fn codec(&self, media_type: MediaType) -> Option<String> {
        self.slots.lock().get(&media_type).map(|slot| slot.codec.clone())
    }

    /// Tear down the slot for a type. A no-op when none is live.
    ///
    /// Native sinks get a best-effort abort only while the media source
    /// is still open; aborting a closed or ended source is itself an
    /// error condition in browser-class sinks. Custom sinks are aborted
    /// unconditionally. Either way the slot fully relinquishes its sink.
    pub fn dispose(&self, media_type: MediaType) {
        let slot = self.slots.lock().remove(&media_type);
        let Some(slot) = slot else {
            return;
        };

        if media_type.is_native() {
            let state = self.media_source.ready_state();
            if state == ReadyState::Open {
                debug!(media_type = %media_type, "aborting native sink");
                slot.queue.abort();
            } else {
                debug!(media_type = %media_type, ?state, "media source not open, skipping abort");
            }
        } else {
            debug!(media_type = %media_type, "aborting custom sink");
            slot.queue.abort();
        }
        slot.queue.shutdown();

        self.events.publish(BufferEvent::SlotDisposed { media_type });
    }

    /// Dispose every currently-held type. Idempotent.
    pub fn dispose_all(&self) {
        for media_type in MediaType::ALL {
            self.dispose(media_type);
        }
    }
}
