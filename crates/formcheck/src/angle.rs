//! Joint angle measurement.

use nalgebra::{SVector, Vector2, Vector3};

/// Arms shorter than this are considered degenerate.
const MIN_ARM_LENGTH: f32 = 1e-6;

/// Angle returned for degenerate joint configurations.
pub const DEGENERATE: f32 = 0.0;

/// Computes the angle at vertex `b` formed by the points `a`, `b` and `c`, in degrees.
///
/// The result is in range 0.0 to 180.0. If `a` or `c` coincides with `b` the angle is undefined,
/// and [`DEGENERATE`] is returned.
pub fn angle_2d(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    checked_angle_2d(a, b, c).unwrap_or(DEGENERATE)
}

/// Like [`angle_2d`], but returns [`None`] instead of [`DEGENERATE`] when the angle is undefined.
pub fn checked_angle_2d(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> Option<f32> {
    included_angle(Vector2::from(a), Vector2::from(b), Vector2::from(c))
}

/// Like [`angle_2d`], but for points in 3D space.
pub fn angle_3d(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    included_angle(Vector3::from(a), Vector3::from(b), Vector3::from(c)).unwrap_or(DEGENERATE)
}

fn included_angle<const D: usize>(
    a: SVector<f32, D>,
    b: SVector<f32, D>,
    c: SVector<f32, D>,
) -> Option<f32> {
    let ba = a - b;
    let bc = c - b;
    let (len_a, len_c) = (ba.norm(), bc.norm());
    if !(len_a > MIN_ARM_LENGTH && len_c > MIN_ARM_LENGTH) {
        // Also catches NaN lengths.
        return None;
    }

    // Rounding can push the cosine slightly outside of [-1, 1], where `acos` returns NaN.
    let cos = (ba.dot(&bc) / (len_a * len_c)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}
