//! Capability table for custom sink construction.
//!
//! An explicit configuration object injected at registry construction:
//! which custom media types can be created, and how their sinks are
//! built. Nothing here is process-wide; two registries can carry
//! different tables.

use std::sync::Arc;

use crate::{media_type::MediaType, sink::MediaSink};

/// Construction context handed to a custom sink factory.
#[derive(Debug, Clone)]
pub struct SinkContext {
    pub media_type: MediaType,
    pub codec: String,
    pub options: SinkOptions,
}

/// Per-creation options for custom sinks.
#[derive(Debug, Clone, Default)]
pub struct SinkOptions {
    /// Identifier of the surface a text/overlay sink renders into.
    /// Required when the capability declares it.
    pub render_target: Option<String>,
}

impl SinkOptions {
    pub fn with_render_target(mut self, target: impl Into<String>) -> Self {
        self.render_target = Some(target.into());
        self
    }
}

/// Constructor for one custom sink type.
pub type SinkFactory = Arc<dyn Fn(&SinkContext) -> Box<dyn MediaSink> + Send + Sync>;

/// One registered custom sink constructor plus its requirements.
#[derive(Clone)]
pub struct SinkCapability {
    pub(crate) factory: SinkFactory,
    pub(crate) requires_render_target: bool,
}

impl SinkCapability {
    pub fn new(
        factory: impl Fn(&SinkContext) -> Box<dyn MediaSink> + Send + Sync + 'static,
    ) -> Self {
        Self {
            factory: Arc::new(factory),
            requires_render_target: false,
        }
    }

    /// Declare that creation must carry a render target.
    pub fn requiring_render_target(mut self) -> Self {
        self.requires_render_target = true;
        self
    }
}

/// Which custom types a registry can create, and how.
#[derive(Clone, Default)]
pub struct SinkCapabilities {
    text: Option<SinkCapability>,
    image: Option<SinkCapability>,
    overlay: Option<SinkCapability>,
}

impl SinkCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, capability: SinkCapability) -> Self {
        self.text = Some(capability);
        self
    }

    pub fn with_image(mut self, capability: SinkCapability) -> Self {
        self.image = Some(capability);
        self
    }

    pub fn with_overlay(mut self, capability: SinkCapability) -> Self {
        self.overlay = Some(capability);
        self
    }

    /// The registered capability for a custom type. Native types are
    /// never looked up here.
    pub(crate) fn get(&self, media_type: MediaType) -> Option<&SinkCapability> {
        match media_type {
            MediaType::Audio | MediaType::Video => None,
            MediaType::Text => self.text.as_ref(),
            MediaType::Image => self.image.as_ref(),
            MediaType::Overlay => self.overlay.as_ref(),
        }
    }

    /// True when a constructor is registered for the custom type.
    pub fn is_registered(&self, media_type: MediaType) -> bool {
        self.get(media_type).is_some()
    }
}
