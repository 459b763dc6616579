// THEORY:
// The `Aggregator` is the fan-in half of the concurrent engine. It knows up front
// how many tiles were dispatched and waits for exactly that many `BinVector`s,
// adding each one into a running total as soon as it arrives.
//
// Key architectural principles:
// 1.  **Order Independence**: Results are consumed in completion order, not
//     dispatch order. Element-wise addition is commutative and associative, so
//     the total is the same whichever worker finishes first.
// 2.  **Single Writer**: The running total lives on the aggregating task alone.
//     Workers never touch it, so there is nothing to lock.
// 3.  **Bounded Waiting**: A worker that dies is reported as `WorkerFailed`, and
//     an optional deadline turns a hung worker into `StalledWorker` instead of a
//     silent deadlock.

use crate::core_modules::tile_worker::tile_worker::{BinVector, TileHandle};
use crate::error::{HistogramError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, warn};
use std::time::Duration;

/// Sums tile results into a single vector.
#[derive(Debug, Clone)]
pub struct Aggregator {
    bins: BinVector,
    received: usize,
    expected: usize,
}

impl Aggregator {
    pub fn new(bin_count: usize, expected: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
            received: 0,
            expected,
        }
    }

    /// Adds one tile's counts into the total.
    pub fn merge(&mut self, partial: &[u64]) {
        debug_assert_eq!(partial.len(), self.bins.len(), "tile result has the wrong layout");
        for (total, count) in self.bins.iter_mut().zip(partial) {
            *total += count;
        }
        self.received += 1;
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    pub fn into_bins(self) -> BinVector {
        self.bins
    }

    /// Waits for every handle and returns the summed counts.
    ///
    /// With `timeout` set, gives up once the deadline passes and reports how
    /// many tiles had arrived.
    pub async fn collect(
        bin_count: usize,
        handles: Vec<TileHandle>,
        timeout: Option<Duration>,
    ) -> Result<BinVector> {
        let mut aggregator = Aggregator::new(bin_count, handles.len());
        let mut pending: FuturesUnordered<_> = handles
            .into_iter()
            .map(|handle| async move { (handle.index, handle.receiver.await) })
            .collect();

        let receive_all = async {
            while let Some((tile, result)) = pending.next().await {
                let partial = result.map_err(|_| HistogramError::WorkerFailed { tile })?;
                aggregator.merge(&partial);
            }
            Ok::<(), HistogramError>(())
        };

        match timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, receive_all).await;
                if let Ok(received) = outcome {
                    received?;
                } else {
                    warn!(
                        "aggregation timed out after {}ms with {}/{} tiles",
                        limit.as_millis(),
                        aggregator.received(),
                        aggregator.expected
                    );
                    return Err(HistogramError::StalledWorker {
                        received: aggregator.received(),
                        expected: aggregator.expected,
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            }
            None => receive_all.await?,
        }

        debug!("aggregated {} tile results", aggregator.received());
        Ok(aggregator.into_bins())
    }
}
