// THEORY:
// The `pipeline` module is the sequential, top-level API of the histogram engine.
// It wires the leaf modules together in their simplest form: one pass over the
// whole image, binning every pixel, followed by normalization. It also owns the
// `HistogramConfig` shared with the concurrent pipeline, so both paths are tuned
// from the same place.

use crate::core_modules::binner::Resolution;
use crate::core_modules::image_source::image_source::PixelSource;
use crate::core_modules::normalizer::{self, Percentage, RoundingMode};
use crate::core_modules::tile::tile::{Coordinate, DEFAULT_MIN_TILE_SIZE};
use crate::core_modules::tile_worker::tile_worker::{BinVector, scan_tile};
use crate::error::{HistogramError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_WORKER_TIMEOUT_MS: u64 = 30_000;

/// Configuration for the histogram pipelines, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// How percentages are rounded.
    pub rounding: RoundingMode,
    /// Tiles smaller than this in both dimensions are not split further.
    pub min_tile_size: Coordinate,
    /// Upper bound on concurrently scanned tiles. Defaults to the number of logical CPUs.
    pub worker_count: usize,
    /// How long the aggregator waits for all tiles. `None` waits forever.
    pub worker_timeout_ms: Option<u64>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::default(),
            min_tile_size: DEFAULT_MIN_TILE_SIZE,
            worker_count: num_cpus::get(),
            worker_timeout_ms: Some(DEFAULT_WORKER_TIMEOUT_MS),
        }
    }
}

impl HistogramConfig {
    pub fn with_rounding(rounding: RoundingMode) -> Self {
        Self {
            rounding,
            ..Self::default()
        }
    }

    /// Parses a JSON document; missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| HistogramError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(HistogramError::InvalidConfig {
                message: "worker_count must be at least 1".to_string(),
            });
        }
        if self.min_tile_size < 1 {
            return Err(HistogramError::InvalidConfig {
                message: format!("min_tile_size must be positive, got {}", self.min_tile_size),
            });
        }
        Ok(())
    }

    pub fn worker_timeout(&self) -> Option<Duration> {
        self.worker_timeout_ms.map(Duration::from_millis)
    }
}

/// Fails fast on images without pixels instead of dividing by zero later.
pub(crate) fn ensure_pixels<I>(image: &I) -> Result<u64>
where
    I: PixelSource + ?Sized,
{
    let pixel_count = image.pixel_count();
    if pixel_count == 0 {
        return Err(HistogramError::DegenerateImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(pixel_count)
}

/// Single-threaded histogram computation.
#[derive(Debug, Clone, Default)]
pub struct HistogramPipeline {
    config: HistogramConfig,
}

impl HistogramPipeline {
    pub fn new(config: HistogramConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// Raw per-bin pixel counts for the whole image.
    pub fn raw_counts<I>(&self, image: &I, resolution: Resolution) -> BinVector
    where
        I: PixelSource + ?Sized,
    {
        scan_tile(image, &image.full_rectangle(), resolution)
    }

    /// Percentage histogram of `image` at the given resolution.
    pub fn histogram<I>(&self, image: &I, resolution: Resolution) -> Result<Vec<Percentage>>
    where
        I: PixelSource + ?Sized,
    {
        let pixel_count = ensure_pixels(image)?;
        let bins = self.raw_counts(image, resolution);
        debug!(
            "scanned {}x{} image sequentially into {} bins",
            image.width(),
            image.height(),
            bins.len()
        );
        normalizer::normalize(self.config.rounding, pixel_count, &bins)
    }
}

/// Raw 32 or 64 bin counts for the whole image, scanned on the current thread.
pub fn raw_counts<I>(image: &I, resolution: Resolution) -> BinVector
where
    I: PixelSource + ?Sized,
{
    HistogramPipeline::default().raw_counts(image, resolution)
}

/// 32-bin hue x saturation histogram, in percent of the image's pixels.
///
/// Hue is mapped to 8 levels (indexes `0, 4, .., 28`) and saturation to 4
/// (`hue_level + 0..=3`). Value is ignored, which makes the histogram invariant
/// to light intensity. Percentages are rounded, so they need not sum to 100.
pub fn compute_histogram_32<I>(image: &I, mode: RoundingMode) -> Result<Vec<Percentage>>
where
    I: PixelSource + ?Sized,
{
    HistogramPipeline::new(HistogramConfig::with_rounding(mode)).histogram(image, Resolution::Bins32)
}

/// 64-bin hue x saturation x value histogram, in percent of the image's pixels.
///
/// The first 32 bins hold pixels with value up to 50, the last 32 the brighter
/// ones. `hist64[i] + hist64[i + 32]` always equals the 32-bin `hist32[i]`.
pub fn compute_histogram_64<I>(image: &I, mode: RoundingMode) -> Result<Vec<Percentage>>
where
    I: PixelSource + ?Sized,
{
    HistogramPipeline::new(HistogramConfig::with_rounding(mode)).histogram(image, Resolution::Bins64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::PixelSample;
    use image::{Rgba, RgbaImage};

    fn red_square() -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn all_red_image_fills_one_bin() {
        let hist = compute_histogram_32(&red_square(), RoundingMode::Nearest).unwrap();
        let mut expected = vec![0.0; 32];
        expected[3] = 100.0;
        assert_eq!(hist, expected);

        let hist = compute_histogram_64(&red_square(), RoundingMode::Nearest).unwrap();
        assert_eq!(hist[35], 100.0);
        assert_eq!(hist[3], 0.0);
        assert_eq!(hist.iter().sum::<f64>(), 100.0);
    }

    #[test]
    fn raw_counts_conserve_pixels() {
        let img = RgbaImage::from_fn(7, 5, |x, y| Rgba([(x * 30) as u8, (y * 50) as u8, 90, 255]));
        let bins = raw_counts(&img, Resolution::Bins32);
        assert_eq!(bins.iter().sum::<u64>(), 35);
    }

    #[test]
    fn quarter_black_image() {
        let mut img = red_square();
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let down = compute_histogram_32(&img, RoundingMode::Down).unwrap();
        assert_eq!(down[0], 25.0);
        assert_eq!(down[3], 75.0);
    }

    /// Samples whose red channel is twice their alpha.
    struct OverBright;

    impl PixelSource for OverBright {
        fn width(&self) -> u32 {
            3
        }

        fn height(&self) -> u32 {
            2
        }

        fn pixel_at(&self, _x: u32, _y: u32) -> PixelSample {
            PixelSample::new(0x1fffe, 0, 0, 0xffff)
        }
    }

    #[test]
    fn over_bright_samples_land_in_the_bright_half() {
        assert_eq!(OverBright.pixel_at(0, 0).to_hsv().value, 200.0);

        let hist = compute_histogram_64(&OverBright, RoundingMode::Nearest).unwrap();
        assert_eq!(hist[35], 100.0);
        assert_eq!(hist.iter().sum::<f64>(), 100.0);

        let hist = compute_histogram_32(&OverBright, RoundingMode::Nearest).unwrap();
        assert_eq!(hist[3], 100.0);
    }

    #[test]
    fn empty_image_is_degenerate() {
        let img = RgbaImage::new(0, 3);
        assert_eq!(
            compute_histogram_32(&img, RoundingMode::Nearest),
            Err(HistogramError::DegenerateImage { width: 0, height: 3 })
        );
    }

    #[test]
    fn config_from_json() {
        let config = HistogramConfig::from_json_str(
            r#"{ "rounding": "Up", "min_tile_size": 64, "worker_count": 3 }"#,
        )
        .unwrap();
        assert_eq!(config.rounding, RoundingMode::Up);
        assert_eq!(config.min_tile_size, 64);
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.worker_timeout(), Some(Duration::from_secs(30)));

        assert!(HistogramConfig::from_json_str(r#"{ "worker_count": 0 }"#).is_err());
        assert!(HistogramConfig::from_json_str("not json").is_err());
    }
}
