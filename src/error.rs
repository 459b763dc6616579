//! Error types for the hsv_histogram library

use thiserror::Error;

/// Result type alias for histogram operations
pub type Result<T> = std::result::Result<T, HistogramError>;

/// Every way a histogram computation can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistogramError {
    /// The rounding mode is not one of closest, up or down.
    #[error("Invalid rounding mode: {value}")]
    InvalidRoundingMode { value: String },

    /// The image has no pixels, so percentages are undefined.
    #[error("Degenerate image: {width}x{height} has no pixels to normalize by")]
    DegenerateImage { width: u32, height: u32 },

    /// Raw counts were normalized against a pixel total of zero.
    #[error("Cannot normalize against a pixel count of zero")]
    ZeroPixelCount,

    /// The normalizer only knows 32 and 64 bin layouts.
    #[error("Unsupported bin count: {len} (expected 32 or 64)")]
    UnsupportedBinCount { len: usize },

    /// The aggregator gave up waiting for tile results.
    #[error("Stalled worker: received {received} of {expected} tile results within {timeout_ms}ms")]
    StalledWorker {
        received: usize,
        expected: usize,
        timeout_ms: u64,
    },

    /// A tile worker went away without handing off its bins.
    #[error("Tile worker {tile} terminated without producing a result")]
    WorkerFailed { tile: usize },

    /// The configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl HistogramError {
    /// Errors caused by the input rather than by the worker pool.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            HistogramError::InvalidRoundingMode { .. }
                | HistogramError::DegenerateImage { .. }
                | HistogramError::ZeroPixelCount
                | HistogramError::UnsupportedBinCount { .. }
                | HistogramError::InvalidConfig { .. }
        )
    }
}
