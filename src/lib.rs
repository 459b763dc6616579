// THEORY:
// This file is the main entry point for the `hsv_histogram` library crate.
// It defines the public API exposed to external consumers: four histogram
// operations (32 or 64 bins, sequential or concurrent), the configurable
// pipelines behind them, and the handful of data types a caller needs to
// interpret the output.
//
// The engine itself lives in `core_modules`, leaf to root: `pixel` converts a
// sample to HSV, `binner` picks its slot, `tile` partitions the image, and
// `tile_worker`, `aggregator` and `normalizer` turn tiles into percentages.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::binner::Resolution;
pub use core_modules::image_source::image_source::PixelSource;
pub use core_modules::normalizer::{Percentage, RoundingMode};
pub use core_modules::pixel::pixel::{Hsv, PixelSample};
pub use core_modules::tile::tile::Rectangle;
pub use error::{HistogramError, Result};
pub use parallel_pipeline::{
    ParallelPipeline, compute_histogram_32_concurrent, compute_histogram_64_concurrent,
    raw_counts_concurrent,
};
pub use pipeline::{
    HistogramConfig, HistogramPipeline, compute_histogram_32, compute_histogram_64, raw_counts,
};
