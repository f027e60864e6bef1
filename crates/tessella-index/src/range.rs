//! Query-window normalization shared by all index variants.

/// A caller's query window converted into index timescale units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScaledRange {
    pub from: u64,
    pub to: u64,
}

/// Convert a real-time window (seconds) into scaled units, applying the
/// presentation time offset.
///
/// Negative positions clamp to zero; inverted windows come out with
/// `to <= from` and are rejected by the variant-specific resolution logic.
pub(crate) fn normalize_range(
    timescale: u64,
    presentation_time_offset: u64,
    from: f64,
    to: f64,
) -> ScaledRange {
    let scale = timescale as f64;
    let offset = presentation_time_offset as f64;
    ScaledRange {
        from: scale_position(from * scale - offset),
        to: scale_position(to * scale - offset),
    }
}

fn scale_position(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}
