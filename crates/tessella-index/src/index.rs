//! Uniform contract over the index variants.

use tracing::debug;

use crate::{
    list::ListIndex,
    segment::SegmentReference,
    template::TemplateIndex,
};

/// Tagged variant over the supported addressing schemes.
///
/// Each variant implements distinct arithmetic behind the same surface;
/// callers resolve segments without caring which scheme the manifest
/// declared.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentIndex {
    List(ListIndex),
    Template(TemplateIndex),
}

impl SegmentIndex {
    /// Reference for the one-time initialization segment, if declared.
    pub fn init_segment(&self) -> Option<SegmentReference> {
        match self {
            Self::List(index) => index.init_segment(),
            Self::Template(index) => index.init_segment(),
        }
    }

    /// Ordered references for every segment intersecting `[from, to]`
    /// seconds.
    pub fn segments(&self, from: f64, to: f64) -> Vec<SegmentReference> {
        match self {
            Self::List(index) => index.segments(from, to),
            Self::Template(index) => index.segments(from, to),
        }
    }

    /// Whether the manifest must be re-fetched to serve position `to`.
    pub fn should_refresh(&self, to: f64) -> bool {
        match self {
            Self::List(index) => index.should_refresh(to),
            Self::Template(index) => index.should_refresh(to),
        }
    }

    /// First addressable position in seconds, when the scheme has an
    /// inherent bound.
    pub fn first_position(&self) -> Option<f64> {
        match self {
            Self::List(index) => index.first_position(),
            Self::Template(index) => index.first_position(),
        }
    }

    /// Last addressable position in seconds, when the scheme has an
    /// inherent bound.
    pub fn last_position(&self) -> Option<f64> {
        match self {
            Self::List(index) => index.last_position(),
            Self::Template(index) => index.last_position(),
        }
    }

    /// Position of the next discontinuity after `time`, for schemes with
    /// gap semantics. Neither supported scheme has any.
    pub fn check_discontinuity(&self, time: f64) -> Option<f64> {
        match self {
            Self::List(index) => index.check_discontinuity(time),
            Self::Template(index) => index.check_discontinuity(time),
        }
    }

    /// Replace the index with a freshly parsed one, on manifest refresh.
    /// The state is swapped wholesale, including across addressing-scheme
    /// changes.
    pub fn update(&mut self, new: SegmentIndex) {
        match (self, new) {
            (Self::List(index), Self::List(new)) => index.update(new),
            (Self::Template(index), Self::Template(new)) => index.update(new),
            (this, new) => {
                debug!("addressing scheme changed on manifest refresh");
                *this = new;
            }
        }
    }

    /// Incrementally extend the index. A no-op for both supported
    /// schemes.
    pub fn add_segments(&mut self, segments: &[SegmentReference]) {
        match self {
            Self::List(index) => index.add_segments(segments),
            Self::Template(index) => index.add_segments(segments),
        }
    }
}

impl From<ListIndex> for SegmentIndex {
    fn from(index: ListIndex) -> Self {
        Self::List(index)
    }
}

impl From<TemplateIndex> for SegmentIndex {
    fn from(index: TemplateIndex) -> Self {
        Self::Template(index)
    }
}
