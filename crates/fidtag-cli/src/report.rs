//! Line-oriented detection report.

use std::fmt::Write;

use fidtag_detect::TagDetection;

/// Render the report: a count line, then one detail line per detection in
/// the order the detector returned them. No filtering, no resorting.
pub fn format_report(detections: &[TagDetection]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} tags detected:", detections.len());

    for det in detections {
        let _ = write!(
            out,
            "  Id: {} (Hamming distance: {}, good: {}) at center ({}, {}), corners",
            det.id,
            det.hamming,
            if det.good { "yes" } else { "no" },
            det.center.x,
            det.center.y,
        );
        for corner in &det.corners {
            let _ = write!(out, " ({}, {})", corner.x, corner.y);
        }
        out.push('\n');
    }

    out
}
