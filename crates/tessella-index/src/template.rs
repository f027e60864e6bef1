//! Template-addressed segment index.
//!
//! Every address is computable from the formula, so the index is
//! unbounded: it never needs a manifest refresh and carries no inherent
//! first/last position. Callers derive availability from complementary
//! manifest fields.

use tracing::warn;

use crate::{
    context::{IndexContext, InitializationArg, InitializationRef},
    error::{IndexError, IndexResult},
    range::normalize_range,
    segment::{ByteRange, SegmentReference},
    templating::UrlTemplate,
};

/// Manifest-supplied addressing metadata for a template index,
/// pre-resolution.
#[derive(Debug, Clone)]
pub struct TemplateIndexArgs {
    pub timescale: u64,
    /// Nominal segment duration, in `timescale` units.
    pub duration: u64,
    /// Media locator template, relative to the representation URL. May
    /// carry `$Time$` / `$Number$` tokens (and representation-level
    /// tokens, expanded at construction).
    pub media: Option<String>,
    /// Number of the first segment. Defaults to 1.
    pub start_number: Option<u64>,
    pub initialization: Option<InitializationArg>,
    pub index_range: Option<ByteRange>,
    pub presentation_time_offset: u64,
}

/// Resolved state of a template index. Replaced wholesale on `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateIndexState {
    pub timescale: u64,
    pub duration: u64,
    pub start_number: u64,
    /// Start of the enclosing period, in seconds; converts absolute query
    /// time into a period-relative segment number.
    pub period_start: f64,
    pub(crate) media: UrlTemplate,
    pub initialization: Option<InitializationRef>,
    pub index_range: Option<ByteRange>,
    pub presentation_time_offset: u64,
}

/// Segment index expanding a URL template on the fly.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateIndex {
    state: TemplateIndexState,
}

impl TemplateIndex {
    pub fn new(args: TemplateIndexArgs, context: &IndexContext) -> IndexResult<Self> {
        if args.timescale == 0 {
            return Err(IndexError::InvalidTimescale);
        }
        if args.duration == 0 {
            return Err(IndexError::InvalidDuration);
        }

        let media = UrlTemplate::new(context.resolve(args.media.as_deref())?.into())?;

        Ok(Self {
            state: TemplateIndexState {
                timescale: args.timescale,
                duration: args.duration,
                start_number: args.start_number.unwrap_or(1),
                period_start: context.period_start,
                media,
                initialization: InitializationRef::resolve(args.initialization.as_ref(), context)?,
                index_range: args.index_range,
                presentation_time_offset: args.presentation_time_offset,
            },
        })
    }

    /// Rebuild an index from previously resolved state, e.g. one produced
    /// by another instance. Invariants are re-checked.
    pub fn from_state(state: TemplateIndexState) -> IndexResult<Self> {
        if state.timescale == 0 {
            return Err(IndexError::InvalidTimescale);
        }
        if state.duration == 0 {
            return Err(IndexError::InvalidDuration);
        }
        Ok(Self { state })
    }

    pub fn state(&self) -> &TemplateIndexState {
        &self.state
    }

    /// Reference for the one-time initialization segment, if declared.
    pub fn init_segment(&self) -> Option<SegmentReference> {
        self.state.initialization.as_ref().map(|init| {
            SegmentReference::init(init.url.clone(), init.range, self.state.timescale)
        })
    }

    /// Expand every segment whose grid slot intersects `[from, to]`
    /// seconds. No upper bound other than the caller-supplied `to`.
    pub fn segments(&self, from: f64, to: f64) -> Vec<SegmentReference> {
        let state = &self.state;
        let range = normalize_range(
            state.timescale,
            state.presentation_time_offset,
            from,
            to,
        );
        if range.to <= range.from {
            return Vec::new();
        }

        let period_start_scaled = scale_period_start(state.period_start, state.timescale);

        let mut segments = Vec::new();
        let mut base_time = range.from;
        while base_time <= range.to {
            let position = base_time.saturating_sub(period_start_scaled) / state.duration;
            let number = position + state.start_number;
            let time = position * state.duration + period_start_scaled;
            match state.media.fill(time, number) {
                Ok(url) => segments.push(SegmentReference {
                    id: number.to_string(),
                    time,
                    duration: state.duration,
                    timescale: state.timescale,
                    number: Some(number),
                    url,
                    byte_range: None,
                    is_init: false,
                }),
                // Cannot happen for templates validated at construction;
                // skip rather than return a reference with no locator.
                Err(e) => warn!(number, error = %e, "skipping unresolvable segment"),
            }
            base_time += state.duration;
        }
        segments
    }

    /// Template addresses are computed, never looked up: the manifest
    /// never needs re-fetching on this index's account.
    pub fn should_refresh(&self, _to: f64) -> bool {
        false
    }

    /// Unknown: template addressing carries no inherent lower bound.
    pub fn first_position(&self) -> Option<f64> {
        None
    }

    /// Unknown: template addressing carries no inherent upper bound.
    pub fn last_position(&self) -> Option<f64> {
        None
    }

    /// Template addressing has no gap semantics; there is never a
    /// discontinuity to report.
    pub fn check_discontinuity(&self, _time: f64) -> Option<f64> {
        None
    }

    /// Replace the whole state with a freshly parsed one.
    pub fn update(&mut self, new: TemplateIndex) {
        self.state = new.state;
    }

    /// Incremental addition is unsupported: every address is already
    /// computable.
    pub fn add_segments(&mut self, _segments: &[SegmentReference]) {
        if cfg!(debug_assertions) {
            warn!("tried to add segments to a template-addressed index");
        }
    }
}

fn scale_period_start(period_start: f64, timescale: u64) -> u64 {
    let scaled = period_start * timescale as f64;
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    }
}
