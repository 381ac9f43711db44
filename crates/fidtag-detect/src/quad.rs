//! Quad candidates from region boundaries.

use nalgebra::Point2;

/// Fit a quad to a region boundary by extreme points.
///
/// Corner 0 is the boundary point farthest from the boundary centroid,
/// corner 2 the point farthest from corner 0, and corners 1/3 the points
/// with the largest deviation from the 0-2 diagonal on either side. The
/// result is a simple polygon with clockwise winding in image coordinates.
/// Returns `None` for degenerate (flat or near-empty) boundaries; regions
/// that are not actually quadrilateral survive here and are rejected later
/// by the payload border check.
pub(crate) fn quad_from_boundary(boundary: &[(i32, i32)]) -> Option<[Point2<f32>; 4]> {
    if boundary.len() < 4 {
        return None;
    }

    let inv_n = 1.0 / boundary.len() as f32;
    let (mut cx, mut cy) = (0.0f32, 0.0f32);
    for &(x, y) in boundary {
        cx += x as f32;
        cy += y as f32;
    }
    let centroid = Point2::new(cx * inv_n, cy * inv_n);

    let a = *farthest_from(boundary, centroid)?;
    let b = *farthest_from(boundary, to_point(a))?;
    if a == b {
        return None;
    }

    // Largest deviation from the a-b diagonal, per side.
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut left: Option<((i32, i32), i64)> = None;
    let mut right: Option<((i32, i32), i64)> = None;
    for &p in boundary {
        let cross = dx as i64 * (p.1 - a.1) as i64 - dy as i64 * (p.0 - a.0) as i64;
        if cross > 0 && left.is_none_or(|(_, c)| cross > c) {
            left = Some((p, cross));
        } else if cross < 0 && right.is_none_or(|(_, c)| cross < c) {
            right = Some((p, cross));
        }
    }
    let (left, _) = left?;
    let (right, _) = right?;

    let mut corners = [to_point(a), to_point(left), to_point(b), to_point(right)];
    enforce_clockwise(&mut corners);
    Some(corners)
}

fn farthest_from(points: &[(i32, i32)], from: Point2<f32>) -> Option<&(i32, i32)> {
    points.iter().max_by(|p, q| {
        dist2(**p, from)
            .partial_cmp(&dist2(**q, from))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

#[inline]
fn dist2(p: (i32, i32), q: Point2<f32>) -> f32 {
    let dx = p.0 as f32 - q.x;
    let dy = p.1 as f32 - q.y;
    dx * dx + dy * dy
}

#[inline]
fn to_point(p: (i32, i32)) -> Point2<f32> {
    Point2::new(p.0 as f32, p.1 as f32)
}

/// Swap corners 1 and 3 when the winding is counter-clockwise, so cell
/// sampling never reads a mirrored payload.
fn enforce_clockwise(corners: &mut [Point2<f32>; 4]) {
    let d1 = corners[1] - corners[0];
    let d2 = corners[2] - corners[0];
    if d1.x * d2.y - d1.y * d2.x < 0.0 {
        corners.swap(1, 3);
    }
}

/// Shortest side of the quad.
pub(crate) fn min_edge(corners: &[Point2<f32>; 4]) -> f32 {
    (0..4)
        .map(|i| (corners[(i + 1) % 4] - corners[i]).norm())
        .fold(f32::INFINITY, f32::min)
}

/// Intersection of the quad diagonals, falling back to the vertex mean
/// when the diagonals are near-parallel.
pub(crate) fn quad_center(corners: &[Point2<f32>; 4]) -> Point2<f32> {
    let d1 = corners[2] - corners[0];
    let d2 = corners[3] - corners[1];
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() > 1e-6 {
        let s = corners[1] - corners[0];
        let t = (s.x * d2.y - s.y * d2.x) / denom;
        return corners[0] + d1 * t;
    }
    nalgebra::center(
        &nalgebra::center(&corners[0], &corners[2]),
        &nalgebra::center(&corners[1], &corners[3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square_ring_boundary(x0: i32, y0: i32, side: i32) -> Vec<(i32, i32)> {
        let mut pts = Vec::new();
        for x in x0..x0 + side {
            pts.push((x, y0));
            pts.push((x, y0 + side - 1));
        }
        for y in y0..y0 + side {
            pts.push((x0, y));
            pts.push((x0 + side - 1, y));
        }
        pts
    }

    fn assert_corner_set(corners: &[Point2<f32>; 4], expected: &[(f32, f32); 4]) {
        for &(ex, ey) in expected {
            assert!(
                corners
                    .iter()
                    .any(|c| (c.x - ex).abs() < 0.5 && (c.y - ey).abs() < 0.5),
                "missing corner ({ex}, {ey}) in {corners:?}"
            );
        }
    }

    #[test]
    fn recovers_square_corners() {
        let boundary = square_ring_boundary(10, 20, 31);
        let corners = quad_from_boundary(&boundary).expect("quad");
        assert_corner_set(
            &corners,
            &[(10.0, 20.0), (40.0, 20.0), (40.0, 50.0), (10.0, 50.0)],
        );
    }

    #[test]
    fn winding_is_clockwise() {
        let boundary = square_ring_boundary(0, 0, 21);
        let c = quad_from_boundary(&boundary).expect("quad");
        let d1 = c[1] - c[0];
        let d2 = c[2] - c[0];
        assert!(d1.x * d2.y - d1.y * d2.x > 0.0);
    }

    #[test]
    fn flat_boundary_is_rejected() {
        let line: Vec<_> = (0..12).map(|x| (x, 5)).collect();
        assert!(quad_from_boundary(&line).is_none());
    }

    #[test]
    fn center_is_diagonal_intersection() {
        let corners = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let c = quad_center(&corners);
        assert_abs_diff_eq!(c.x, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(c.y, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(min_edge(&corners), 10.0, epsilon = 1e-5);
    }
}
