use url::Url;

use crate::{
    error::IndexResult,
    segment::ByteRange,
    templating::resolve_index_url,
};

/// Resolution context shared by every index variant.
///
/// Supplied by the manifest collaborator alongside the addressing
/// metadata; `representation_id` and `representation_bitrate` feed URL
/// token expansion only.
#[derive(Debug, Clone)]
pub struct IndexContext {
    /// Start of the enclosing period, in seconds.
    pub period_start: f64,
    /// Base URL of the representation the index belongs to.
    pub representation_url: Url,
    pub representation_id: Option<String>,
    pub representation_bitrate: Option<u64>,
}

impl IndexContext {
    pub fn new(period_start: f64, representation_url: Url) -> Self {
        Self {
            period_start,
            representation_url,
            representation_id: None,
            representation_bitrate: None,
        }
    }

    pub fn with_representation_id(mut self, id: impl Into<String>) -> Self {
        self.representation_id = Some(id.into());
        self
    }

    pub fn with_representation_bitrate(mut self, bitrate: u64) -> Self {
        self.representation_bitrate = Some(bitrate);
        self
    }

    pub(crate) fn resolve(&self, media: Option<&str>) -> IndexResult<Url> {
        resolve_index_url(
            &self.representation_url,
            media,
            self.representation_id.as_deref(),
            self.representation_bitrate,
        )
    }
}

/// Manifest-supplied initialization segment descriptor, pre-resolution.
#[derive(Debug, Clone, Default)]
pub struct InitializationArg {
    /// Locator relative to the representation URL; `None` addresses the
    /// representation URL itself.
    pub media: Option<String>,
    pub range: Option<ByteRange>,
}

/// Resolved initialization segment descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializationRef {
    pub url: Url,
    pub range: Option<ByteRange>,
}

impl InitializationRef {
    pub(crate) fn resolve(
        arg: Option<&InitializationArg>,
        context: &IndexContext,
    ) -> IndexResult<Option<Self>> {
        match arg {
            None => Ok(None),
            Some(arg) => Ok(Some(Self {
                url: context.resolve(arg.media.as_deref())?,
                range: arg.range,
            })),
        }
    }
}
