// THEORY:
// A `TileWorker` is the unit of parallel work. It owns one tile of the image,
// walks every coordinate in it, converts each pixel to HSV, bins it, and hands
// the resulting local `BinVector` off exactly once.
//
// Key architectural principles:
// 1.  **Private Accumulator**: A worker only ever writes to its own vector. The
//     image is shared read-only through an `Arc`, so no locking is needed.
// 2.  **One-Shot Handoff**: The result travels over a `oneshot` channel and the
//     worker terminates. If it panics the sender is dropped, which the
//     aggregator observes as a failure rather than waiting forever.
// 3.  **Blocking Pool**: Scanning is CPU-bound with no await points, so it runs
//     on tokio's blocking pool instead of starving the async executor.

pub mod tile_worker {
    use crate::core_modules::binner::Resolution;
    use crate::core_modules::image_source::image_source::PixelSource;
    use crate::core_modules::tile::tile::Rectangle;
    use log::trace;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    /// Raw per-bin pixel counts.
    pub type BinVector = Vec<u64>;

    /// Bins every pixel of `tile` that lies inside `image`.
    ///
    /// Both corners of the tile are included. Coordinates outside the image are
    /// skipped, so a tile never reads out of bounds.
    pub fn scan_tile<I>(image: &I, tile: &Rectangle, resolution: Resolution) -> BinVector
    where
        I: PixelSource + ?Sized,
    {
        let mut bins = vec![0u64; resolution.len()];
        let region = tile.intersection(&image.full_rectangle());
        if region.is_empty() {
            return bins;
        }

        for x in region.min.x..=region.max.x {
            for y in region.min.y..=region.max.y {
                let hsv = image.pixel_at(x as u32, y as u32).to_hsv();
                bins[resolution.bin_index(&hsv)] += 1;
            }
        }

        bins
    }

    /// One tile waiting to be scanned.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct TileTask {
        /// Position of the tile in the tiler's output.
        pub index: usize,
        pub tile: Rectangle,
        pub resolution: Resolution,
    }

    /// The receiving end of a dispatched worker.
    pub struct TileHandle {
        pub index: usize,
        pub receiver: oneshot::Receiver<BinVector>,
    }

    impl TileTask {
        pub fn new(index: usize, tile: Rectangle, resolution: Resolution) -> Self {
            Self {
                index,
                tile,
                resolution,
            }
        }

        /// Scans the tile on the current thread.
        pub fn run<I>(&self, image: &I) -> BinVector
        where
            I: PixelSource + ?Sized,
        {
            scan_tile(image, &self.tile, self.resolution)
        }

        /// Scans the tile on the blocking pool and returns the handle its result arrives on.
        ///
        /// Must be called from within a tokio runtime.
        pub fn spawn<I>(self, image: Arc<I>) -> TileHandle
        where
            I: PixelSource + Send + Sync + ?Sized + 'static,
        {
            let (result_sender, receiver) = oneshot::channel();
            tokio::task::spawn_blocking(move || {
                let bins = self.run(&*image);
                trace!(
                    "tile {} {} scanned {} pixels",
                    self.index,
                    self.tile,
                    bins.iter().sum::<u64>()
                );
                // The aggregator may have timed out and dropped its end.
                let _ = result_sender.send(bins);
            });

            TileHandle {
                index: self.index,
                receiver,
            }
        }
    }
}
