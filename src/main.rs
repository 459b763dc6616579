// Example runner for the `hsv_histogram` library.
//
// Usage: hsv_histogram <image_path> [rounding] [config.json]
//
// Decodes the image, computes the 32 and 64 bin histograms concurrently and
// prints them. Set RUST_LOG=debug to see tiling and aggregation.

use anyhow::Context;
use hsv_histogram::{HistogramConfig, ParallelPipeline, Resolution, RoundingMode};
use log::info;
use std::env;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // --- 1. Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: hsv_histogram <image_path> [nearest|up|down] [config.json]");
        return Ok(());
    }
    let image_path = &args[1];

    let mut config = match args.get(3) {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            HistogramConfig::from_json_str(&json)?
        }
        None => HistogramConfig::default(),
    };
    if let Some(rounding) = args.get(2) {
        config.rounding = rounding.parse::<RoundingMode>()?;
    }

    // --- 2. Decoding ---
    let image = image::open(image_path)
        .with_context(|| format!("decoding {image_path}"))?
        .to_rgba8();
    info!("loaded {} ({}x{})", image_path, image.width(), image.height());
    let image = Arc::new(image);

    // --- 3. Histograms ---
    let pipeline = ParallelPipeline::new(config);
    for resolution in [Resolution::Bins32, Resolution::Bins64] {
        let started = Instant::now();
        let histogram = pipeline.histogram(Arc::clone(&image), resolution).await?;
        info!("{:?} computed in {:?}", resolution, started.elapsed());
        println!("{:?}: {:?}", resolution, histogram);
    }

    Ok(())
}
