use crate::core_modules::aggregator::Aggregator;
use crate::core_modules::binner::Resolution;
use crate::core_modules::image_source::image_source::PixelSource;
use crate::core_modules::normalizer::{self, Percentage, RoundingMode};
use crate::core_modules::tile::tile::{Rectangle, split_into_with_threshold};
use crate::core_modules::tile_worker::tile_worker::{BinVector, TileHandle, TileTask};
use crate::error::Result;
use crate::pipeline::{HistogramConfig, ensure_pixels};
use log::debug;
use std::sync::Arc;

/// Fans an image out over tile workers and fans their bins back in.
///
/// Output is bit-identical to [`crate::pipeline::HistogramPipeline`] for the
/// same image and rounding mode, whatever the worker count.
#[derive(Debug, Clone, Default)]
pub struct ParallelPipeline {
    config: HistogramConfig,
}

impl ParallelPipeline {
    pub fn new(config: HistogramConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// The tiles an image of this size is split into.
    pub fn plan_tiles(&self, bounds: Rectangle) -> Vec<Rectangle> {
        split_into_with_threshold(
            self.config.worker_count.max(1),
            self.config.min_tile_size,
            bounds,
        )
    }

    fn dispatch<I>(&self, image: &Arc<I>, resolution: Resolution) -> Vec<TileHandle>
    where
        I: PixelSource + Send + Sync + ?Sized + 'static,
    {
        let source: &I = image;
        let tiles = self.plan_tiles(source.full_rectangle());
        debug!(
            "dispatching {} tiles for {}x{} image",
            tiles.len(),
            source.width(),
            source.height()
        );

        tiles
            .into_iter()
            .enumerate()
            .map(|(index, tile)| TileTask::new(index, tile, resolution).spawn(Arc::clone(image)))
            .collect()
    }

    /// Raw per-bin counts, scanned concurrently.
    pub async fn raw_counts<I>(&self, image: Arc<I>, resolution: Resolution) -> Result<BinVector>
    where
        I: PixelSource + Send + Sync + ?Sized + 'static,
    {
        let handles = self.dispatch(&image, resolution);
        Aggregator::collect(resolution.len(), handles, self.config.worker_timeout()).await
    }

    /// Percentage histogram of `image`, scanned concurrently.
    pub async fn histogram<I>(&self, image: Arc<I>, resolution: Resolution) -> Result<Vec<Percentage>>
    where
        I: PixelSource + Send + Sync + ?Sized + 'static,
    {
        let pixel_count = ensure_pixels(&*image)?;
        let bins = self.raw_counts(image, resolution).await?;
        normalizer::normalize(self.config.rounding, pixel_count, &bins)
    }
}

/// Raw counts scanned concurrently with the default configuration.
pub async fn raw_counts_concurrent<I>(image: Arc<I>, resolution: Resolution) -> Result<BinVector>
where
    I: PixelSource + Send + Sync + ?Sized + 'static,
{
    ParallelPipeline::default().raw_counts(image, resolution).await
}

/// Concurrent counterpart of [`crate::pipeline::compute_histogram_32`].
pub async fn compute_histogram_32_concurrent<I>(image: Arc<I>, mode: RoundingMode) -> Result<Vec<Percentage>>
where
    I: PixelSource + Send + Sync + ?Sized + 'static,
{
    ParallelPipeline::new(HistogramConfig::with_rounding(mode))
        .histogram(image, Resolution::Bins32)
        .await
}

/// Concurrent counterpart of [`crate::pipeline::compute_histogram_64`].
pub async fn compute_histogram_64_concurrent<I>(image: Arc<I>, mode: RoundingMode) -> Result<Vec<Percentage>>
where
    I: PixelSource + Send + Sync + ?Sized + 'static,
{
    ParallelPipeline::new(HistogramConfig::with_rounding(mode))
        .histogram(image, Resolution::Bins64)
        .await
}
