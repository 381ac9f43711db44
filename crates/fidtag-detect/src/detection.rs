//! Detection results and the detector capability boundary.

use fidtag_core::GrayImageView;
use nalgebra::Point2;

/// One located and decoded tag.
#[derive(Clone, Debug)]
pub struct TagDetection {
    /// Tag id within the family the detector was built with.
    pub id: u32,
    /// Bit errors corrected when matching the payload against the family.
    pub hamming: u8,
    /// Whether the match stayed within the error-recovery budget.
    pub good: bool,
    /// Intersection of the quad diagonals, image pixels.
    pub center: Point2<f32>,
    /// Quad corners in image pixels, clockwise in image coordinates,
    /// starting at the canonical tag orientation.
    pub corners: [Point2<f32>; 4],
}

/// Capability interface for tag detection on an intensity image.
///
/// Implementations are pure with respect to the image: no I/O, no mutable
/// state across calls. An empty result means "no tags found" and is a
/// normal outcome, not an error.
pub trait DetectTags {
    fn detect(&self, gray: &GrayImageView<'_>) -> Vec<TagDetection>;
}
