//! Compact watershed implementation in Rust.
//!
//! This crate provides compact watershed superpixel segmentation (Neubert & Protzel, ICPR 2014).
//! Seeds placed on a grid (or given explicitly) are grown over the image in order of increasing
//! color difference, like marker-based watershed. Every hop away from the seed adds a constant
//! `compactness_step` to the priority, so far pixels get claimed later and the superpixels stay
//! compact even where the image has no edges.
//!
//! The following example describes how to process image in packed RGB24 (RGB 8bit) format
//! (default for image crate):
//!
//! ```rust
//! use compact_watershed_rust::arrays::ImageRef;
//! use compact_watershed_rust::common::*;
//! use compact_watershed_rust::segment::segment;
//!
//! fn main() -> Result<(), Error> {
//!     // synthetic image, use image::open() for real ones
//!     let dimg = image::RgbImage::from_fn(64, 48, |x, y| {
//!         image::Rgb([(x * 4) as u8, (y * 5) as u8, 128])
//!     });
//!     let width = dimg.width() as usize;
//!     let height = dimg.height() as usize;
//!     // create config with defaults
//!     let mut config = Config::default();
//!     // override number of superpixels
//!     config.seed_placement = SeedPlacement::Count(12);
//!     // make the computation
//!     let result = segment(ImageRef::rgb(dimg.as_raw(), width, height), &config, None)?;
//!     assert_eq!(result.report.seeds.len(), 12);
//!     assert_eq!(result.labels.width, width);
//!     Ok(())
//! }
//! ```
//!
//! The building blocks (`seeds`, `flood`, `boundary`) are public, so it's possible to write
//! custom seeding (e.g. ROI) and get the label grid out of the algorithm before the border
//! correction.
//!
//! The run is single-threaded. All state lives in the call, so different images can be
//! segmented from different threads.
//!

pub mod arena;
pub mod arrays;
pub mod boundary;
pub mod common;
pub mod conectivity;
pub mod distance;
pub mod flood;
pub mod label;
pub mod queue;
pub mod region;
pub mod seeds;
pub mod segment;
