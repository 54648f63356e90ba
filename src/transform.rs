use nalgebra as na;

use na::{dmatrix, DMatrix, Vector3};

use crate::error::Result;
use crate::math;

/// Maps normalized device coordinates onto the screen rectangle
/// [x, x + w] x [y, y + h] and depth onto [0, depth]: a translation to the
/// rectangle center composed with a half-extent scale.
pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth: f32) -> DMatrix<f32> {
    return dmatrix![
        w / 2.0, 0.0,     0.0,         x + w / 2.0;
        0.0,     h / 2.0, 0.0,         y + h / 2.0;
        0.0,     0.0,     depth / 2.0, depth / 2.0;
        0.0,     0.0,     0.0,         1.0
    ];
}

/// Camera basis change built from the eye, target and up vectors via
/// Gram-Schmidt. Rotation rows are the new x, y, z axes; the translation
/// column moves the target to the origin.
pub fn look_at(eye: Vector3<f32>, center: Vector3<f32>, up: Vector3<f32>) -> DMatrix<f32> {
    let z = (eye - center).normalize();
    let x = up.cross(&z).normalize();
    let y = z.cross(&x).normalize();
    return dmatrix![
        x.x, x.y, x.z, -center.x;
        y.x, y.y, y.z, -center.y;
        z.x, z.y, z.z, -center.z;
        0.0, 0.0, 0.0, 1.0
    ];
}

/// Single-parameter perspective: identity with the bottom row picking up
/// -z / (distance from eye to center), so the homogenous divide shrinks
/// geometry with distance. No near or far plane.
pub fn projection(eye: Vector3<f32>, center: Vector3<f32>) -> DMatrix<f32> {
    let mut m = DMatrix::identity(4, 4);
    m[(3, 2)] = -1.0 / (eye - center).norm();
    return m;
}

/// Composed vertex transform: world space in, screen space out.
pub struct Pipeline {
    matrix: DMatrix<f32>,
}

impl Pipeline {
    /// Composes viewport * projection * model once, so per-vertex work is a
    /// single product and divide.
    pub fn new(
        viewport: &DMatrix<f32>,
        projection: &DMatrix<f32>,
        model: &DMatrix<f32>,
    ) -> Result<Pipeline> {
        let matrix = math::mul(&math::mul(viewport, projection)?, model)?;
        return Ok(Pipeline { matrix });
    }

    /// Carries a world-space vertex through the composed transform and back
    /// out of homogenous coordinates: x, y in pixels, z in the depth range.
    pub fn to_screen(&self, v: Vector3<f32>) -> Result<Vector3<f32>> {
        let hom = math::mul(&self.matrix, &math::to_hom_point(v))?;
        return Ok(math::from_hom_point(&hom));
    }
}
