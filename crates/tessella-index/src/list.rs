//! List-addressed segment index.
//!
//! The manifest enumerates every segment explicitly; entry `i` covers the
//! nominal interval `[i * duration, (i + 1) * duration)`. The enumeration
//! is closed and complete, so the index is only ever replaced wholesale on
//! manifest refresh.

use tracing::warn;
use url::Url;

use crate::{
    context::{IndexContext, InitializationArg, InitializationRef},
    error::{IndexError, IndexResult},
    range::normalize_range,
    segment::{ByteRange, SegmentReference},
};

/// Manifest-supplied addressing metadata for a list index, pre-resolution.
#[derive(Debug, Clone)]
pub struct ListIndexArgs {
    pub timescale: u64,
    /// Nominal duration of every entry, in `timescale` units.
    pub duration: u64,
    pub entries: Vec<ListEntryArg>,
    pub initialization: Option<InitializationArg>,
    pub index_range: Option<ByteRange>,
    pub presentation_time_offset: u64,
}

/// One pre-resolution list entry.
#[derive(Debug, Clone, Default)]
pub struct ListEntryArg {
    /// Locator relative to the representation URL; `None` addresses the
    /// representation URL itself.
    pub media: Option<String>,
    pub range: Option<ByteRange>,
}

/// Resolved list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub url: Url,
    pub range: Option<ByteRange>,
}

/// Resolved state of a list index. Replaced wholesale on `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIndexState {
    pub timescale: u64,
    pub duration: u64,
    pub entries: Vec<ListEntry>,
    pub initialization: Option<InitializationRef>,
    pub index_range: Option<ByteRange>,
    pub presentation_time_offset: u64,
}

/// Segment index over an explicit enumeration of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListIndex {
    state: ListIndexState,
}

impl ListIndex {
    pub fn new(args: ListIndexArgs, context: &IndexContext) -> IndexResult<Self> {
        if args.timescale == 0 {
            return Err(IndexError::InvalidTimescale);
        }
        if args.duration == 0 {
            return Err(IndexError::InvalidDuration);
        }

        let entries = args
            .entries
            .iter()
            .map(|entry| {
                Ok(ListEntry {
                    url: context.resolve(entry.media.as_deref())?,
                    range: entry.range,
                })
            })
            .collect::<IndexResult<Vec<_>>>()?;

        Ok(Self {
            state: ListIndexState {
                timescale: args.timescale,
                duration: args.duration,
                entries,
                initialization: InitializationRef::resolve(args.initialization.as_ref(), context)?,
                index_range: args.index_range,
                presentation_time_offset: args.presentation_time_offset,
            },
        })
    }

    /// Rebuild an index from previously resolved state, e.g. one produced
    /// by another instance. Invariants are re-checked.
    pub fn from_state(state: ListIndexState) -> IndexResult<Self> {
        if state.timescale == 0 {
            return Err(IndexError::InvalidTimescale);
        }
        if state.duration == 0 {
            return Err(IndexError::InvalidDuration);
        }
        Ok(Self { state })
    }

    pub fn state(&self) -> &ListIndexState {
        &self.state
    }

    /// Reference for the one-time initialization segment, if declared.
    pub fn init_segment(&self) -> Option<SegmentReference> {
        self.state.initialization.as_ref().map(|init| {
            SegmentReference::init(init.url.clone(), init.range, self.state.timescale)
        })
    }

    /// Every entry whose nominal interval intersects `[from, to]` seconds,
    /// clamped to the enumeration's valid range.
    pub fn segments(&self, from: f64, to: f64) -> Vec<SegmentReference> {
        let state = &self.state;
        if state.entries.is_empty() {
            return Vec::new();
        }

        let range = normalize_range(
            state.timescale,
            state.presentation_time_offset,
            from,
            to,
        );
        let last = (state.entries.len() as u64 - 1).min(range.to / state.duration);

        let mut segments = Vec::new();
        let mut i = range.from / state.duration;
        while i <= last {
            let entry = &state.entries[i as usize];
            segments.push(SegmentReference {
                id: i.to_string(),
                time: i * state.duration,
                duration: state.duration,
                timescale: state.timescale,
                number: None,
                url: entry.url.clone(),
                byte_range: entry.range,
                is_init: false,
            });
            i += 1;
        }
        segments
    }

    /// True exactly when the enumeration cannot serve position `to`
    /// (seconds) and the manifest must be re-fetched.
    pub fn should_refresh(&self, to: f64) -> bool {
        let state = &self.state;
        let scaled_to = to * state.timescale as f64;
        let position = (scaled_to / state.duration as f64).floor();
        !(position >= 0.0 && position < state.entries.len() as f64)
    }

    /// First addressable position, in seconds.
    pub fn first_position(&self) -> Option<f64> {
        Some(0.0)
    }

    /// End of the last addressable interval, in seconds.
    pub fn last_position(&self) -> Option<f64> {
        let state = &self.state;
        Some((state.entries.len() as u64 * state.duration) as f64 / state.timescale as f64)
    }

    /// List addressing has no gap semantics; there is never a
    /// discontinuity to report.
    pub fn check_discontinuity(&self, _time: f64) -> Option<f64> {
        None
    }

    /// Replace the whole state with a freshly parsed one.
    pub fn update(&mut self, new: ListIndex) {
        self.state = new.state;
    }

    /// Incremental addition is unsupported: the enumeration is closed.
    pub fn add_segments(&mut self, _segments: &[SegmentReference]) {
        if cfg!(debug_assertions) {
            warn!("tried to add segments to a list-addressed index");
        }
    }
}
