//! Color to intensity conversion.

use fidtag_core::GrayImage;
use image::RgbImage;

/// Convert a color buffer to intensity with fixed-point BT.601 weighting
/// (0.299 R + 0.587 G + 0.114 B), rounded to nearest.
///
/// Pure function of the input buffer; dimensions are preserved.
pub fn rgb_to_gray(img: &RgbImage) -> GrayImage {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let mut data = Vec::with_capacity(width * height);
    for pixel in img.pixels() {
        data.push(luma601(pixel.0[0], pixel.0[1], pixel.0[2]));
    }
    GrayImage {
        width,
        height,
        data,
    }
}

#[inline]
fn luma601(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
    ((weighted + 500) / 1000) as u8
}
