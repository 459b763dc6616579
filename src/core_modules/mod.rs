pub mod aggregator;
pub mod binner;
pub mod image_source;
pub mod normalizer;
pub mod pixel;
pub mod tile;
pub mod tile_worker;
