//! The concrete tag detector.

use fidtag_core::GrayImageView;
use fidtag_family::{Matcher, TagFamily};
use log::debug;

use crate::decode::read_payload;
use crate::detection::{DetectTags, TagDetection};
use crate::quad::{min_edge, quad_center, quad_from_boundary};
use crate::segment::{dark_regions, otsu_threshold};

/// Detector tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct TagParams {
    /// Smallest dark region considered a candidate, in pixels.
    pub min_region_area: usize,
    /// Smallest accepted quad side, in pixels.
    pub min_edge_px: f32,
    /// Required fraction of black border cells for a decode.
    pub min_border_score: f32,
    /// Hamming search budget when matching observed codes.
    pub max_hamming: u8,
    /// Corrected-bit budget for the `good` flag on a detection.
    pub error_recovery_bits: u8,
}

impl Default for TagParams {
    fn default() -> Self {
        Self {
            min_region_area: 64,
            min_edge_px: 20.0,
            min_border_score: 0.85,
            max_hamming: 2,
            error_recovery_bits: 1,
        }
    }
}

/// Tag detector bound to one family for its lifetime.
///
/// Detecting against a different family means constructing a new detector;
/// there is no way to swap the table afterwards.
pub struct TagDetector {
    matcher: Matcher,
    params: TagParams,
}

impl TagDetector {
    pub fn new(family: TagFamily, params: TagParams) -> Self {
        let matcher = Matcher::new(family, params.max_hamming);
        Self { matcher, params }
    }

    pub fn with_defaults(family: TagFamily) -> Self {
        Self::new(family, TagParams::default())
    }

    pub fn family(&self) -> &TagFamily {
        self.matcher.family()
    }

    pub fn params(&self) -> &TagParams {
        &self.params
    }
}

impl DetectTags for TagDetector {
    fn detect(&self, gray: &GrayImageView<'_>) -> Vec<TagDetection> {
        if gray.width == 0 || gray.height == 0 {
            return Vec::new();
        }

        let thr = otsu_threshold(gray.data);
        let regions = dark_regions(gray, thr, self.params.min_region_area);
        debug!(
            "threshold {thr}, {} candidate regions above {} px",
            regions.len(),
            self.params.min_region_area
        );

        let family = self.matcher.family();
        let mut detections = Vec::new();

        for region in &regions {
            let Some(mut corners) = quad_from_boundary(&region.boundary) else {
                continue;
            };
            if min_edge(&corners) < self.params.min_edge_px {
                continue;
            }
            let Some(payload) = read_payload(
                gray,
                &corners,
                family.dim,
                family.border,
                self.params.min_border_score,
            ) else {
                continue;
            };
            let Some(m) = self.matcher.match_code(payload.code) else {
                continue;
            };

            // Align corner 0 with the family's canonical orientation.
            corners.rotate_left(m.rotation as usize);
            detections.push(TagDetection {
                id: m.id,
                hamming: m.hamming,
                good: m.hamming <= self.params.error_recovery_bits,
                center: quad_center(&corners),
                corners,
            });
        }

        detections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use fidtag_core::GrayImage;
    use fidtag_family::{builtins, render_tag};

    const CELL: usize = 16;
    const MARGIN: usize = 32;

    fn rendered(id: u32) -> GrayImage {
        render_tag(&builtins::tag16h5(), id, CELL, MARGIN).expect("render")
    }

    fn blit(dst: &mut GrayImage, src: &GrayImage, ox: usize, oy: usize) {
        for y in 0..src.height {
            for x in 0..src.width {
                dst.put(ox + x, oy + y, src.as_view().get(x as i32, y as i32));
            }
        }
    }

    #[test]
    fn detects_one_clean_tag() {
        let img = rendered(3);
        let detector = TagDetector::with_defaults(builtins::tag16h5());
        let dets = detector.detect(&img.as_view());

        assert_eq!(dets.len(), 1);
        let det = &dets[0];
        assert_eq!(det.id, 3);
        assert_eq!(det.hamming, 0);
        assert!(det.good);

        // The tag spans pixels [32, 127] on both axes.
        assert_abs_diff_eq!(det.center.x, 79.5, epsilon = 1.5);
        assert_abs_diff_eq!(det.center.y, 79.5, epsilon = 1.5);
        for &(ex, ey) in &[(32.0, 32.0), (127.0, 32.0), (127.0, 127.0), (32.0, 127.0)] {
            assert!(
                det.corners
                    .iter()
                    .any(|c| (c.x - ex).abs() < 2.0 && (c.y - ey).abs() < 2.0),
                "no corner near ({ex}, {ey}): {:?}",
                det.corners
            );
        }
    }

    #[test]
    fn blank_images_yield_nothing() {
        let detector = TagDetector::with_defaults(builtins::tag16h5());
        let white = GrayImage::filled(64, 64, 255);
        assert!(detector.detect(&white.as_view()).is_empty());
        let black = GrayImage::filled(64, 64, 0);
        assert!(detector.detect(&black.as_view()).is_empty());
    }

    #[test]
    fn detects_two_tags_in_one_image() {
        let mut canvas = GrayImage::filled(360, 200, 255);
        blit(&mut canvas, &rendered(1), 10, 20);
        blit(&mut canvas, &rendered(8), 190, 20);

        let detector = TagDetector::with_defaults(builtins::tag16h5());
        let mut ids: Vec<u32> = detector
            .detect(&canvas.as_view())
            .iter()
            .map(|d| d.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 8]);
    }

    #[test]
    fn corrupted_cell_decodes_within_recovery_budget() {
        let fam = builtins::tag16h5();
        let mut img = rendered(3);
        // Payload cell (0, 0) of id 3 is black; paint it white.
        assert!(!fidtag_family::code_bit(fam.code(3).unwrap(), 4, 0, 0));
        let x0 = MARGIN + CELL;
        for y in x0..x0 + CELL {
            for x in x0..x0 + CELL {
                img.put(x, y, 255);
            }
        }

        let detector = TagDetector::with_defaults(fam);
        let dets = detector.detect(&img.as_view());
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].id, 3);
        assert_eq!(dets[0].hamming, 1);
        assert!(dets[0].good);
    }

    #[test]
    fn repeated_detection_is_identical() {
        let img = rendered(3);
        let detector = TagDetector::with_defaults(builtins::tag16h5());
        let first = detector.detect(&img.as_view());
        let second = detector.detect(&img.as_view());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.hamming, b.hamming);
            assert_eq!(a.center, b.center);
            assert_eq!(a.corners, b.corners);
        }
    }

    #[test]
    fn runs_behind_the_capability_trait() {
        let detector: Box<dyn DetectTags> =
            Box::new(TagDetector::with_defaults(builtins::tag16h5()));
        let img = rendered(5);
        let dets = detector.detect(&img.as_view());
        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].id, 5);
    }
}
