#![forbid(unsafe_code)]

use thiserror::Error;

/// Segment index construction and resolution errors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index timescale must be greater than zero")]
    InvalidTimescale,

    #[error("Segment duration must be greater than zero")]
    InvalidDuration,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL template references ${0}$ but no value is available")]
    MissingTemplateValue(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
