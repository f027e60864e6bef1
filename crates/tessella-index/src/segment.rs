use url::Url;

/// Inclusive byte range within a physical resource.
///
/// Present only for addressing schemes that multiplex several segments
/// into one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }
}

/// One addressable media chunk produced by index resolution.
///
/// Value type: recreated on every resolution call and never mutated after
/// construction. `time / timescale` is the segment's start in seconds,
/// `duration / timescale` its length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentReference {
    /// Unique within one resolution call, stable across re-resolution of
    /// the same underlying segment. Initialization segments always use
    /// [`SegmentReference::INIT_ID`].
    pub id: String,
    /// Start position in `timescale` units.
    pub time: u64,
    /// Length in `timescale` units.
    pub duration: u64,
    /// Units per second for `time` and `duration`.
    pub timescale: u64,
    /// Segment number, for number-addressed (template) schemes.
    pub number: Option<u64>,
    /// Resolved byte-fetch locator. Opaque to this crate's callers.
    pub url: Url,
    /// Sub-range of the resource holding this segment, if multiplexed.
    pub byte_range: Option<ByteRange>,
    /// Distinguishes the one-time initialization segment from media
    /// segments.
    pub is_init: bool,
}

impl SegmentReference {
    /// Fixed id shared by every initialization segment.
    pub const INIT_ID: &'static str = "init";

    /// Build the reference for an initialization segment.
    pub(crate) fn init(url: Url, byte_range: Option<ByteRange>, timescale: u64) -> Self {
        Self {
            id: Self::INIT_ID.to_string(),
            time: 0,
            duration: 0,
            timescale,
            number: None,
            url,
            byte_range,
            is_init: true,
        }
    }
}
