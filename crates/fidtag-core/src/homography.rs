//! 4-point projective transform.

use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

/// Plane projective transform `dst ~ H * src`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    /// Estimate H from 4 correspondences, fixing `h33 = 1`.
    ///
    /// Corner order must be consistent between `src` and `dst`. Returns
    /// `None` when the correspondences are degenerate (three collinear
    /// points on either side).
    pub fn from_quad(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Self> {
        // For (x, y) -> (u, v):
        //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
        //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for k in 0..4 {
            let x = src[k].x as f64;
            let y = src[k].y as f64;
            let u = dst[k].x as f64;
            let v = dst[k].y as f64;

            let r = 2 * k;
            a[(r, 0)] = x;
            a[(r, 1)] = y;
            a[(r, 2)] = 1.0;
            a[(r, 6)] = -u * x;
            a[(r, 7)] = -u * y;
            b[r] = u;

            a[(r + 1, 3)] = x;
            a[(r + 1, 4)] = y;
            a[(r + 1, 5)] = 1.0;
            a[(r + 1, 6)] = -v * x;
            a[(r + 1, 7)] = -v * y;
            b[r + 1] = v;
        }

        let s = a.lu().solve(&b)?;
        Some(Self::new(Matrix3::new(
            s[0], s[1], s[2], //
            s[3], s[4], s[5], //
            s[6], s[7], 1.0,
        )))
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        Point2::new((v[0] / v[2]) as f32, (v[1] / v[2]) as f32)
    }
}
