//! Core types shared by the fidtag crates.
//!
//! This crate is intentionally small: owned and borrowed grayscale buffers,
//! a 4-point projective transform, and a minimal stderr logger. It does
//! *not* depend on any image codec; file I/O lives in the CLI crate.

mod homography;
mod image;
mod logger;

pub use homography::Homography;
pub use image::{GrayImage, GrayImageView};
pub use logger::init_logging;
