use nalgebra as na;

use na::{dmatrix, vector, DMatrix, Vector3};

use crate::error::{RenderError, Result};

/// Matrix product with a runtime shape check.
/// Every product allocates a fresh matrix, inputs are never aliased or mutated.
pub fn mul(a: &DMatrix<f32>, b: &DMatrix<f32>) -> Result<DMatrix<f32>> {
    if a.ncols() != b.nrows() {
        return Err(RenderError::DimensionMismatch {
            left_rows: a.nrows(),
            left_cols: a.ncols(),
            right_rows: b.nrows(),
            right_cols: b.ncols(),
        });
    }
    return Ok(a * b);
}

/// Per-component floor, used to snap screen-space vertices to the pixel grid.
pub fn floor(v: Vector3<f32>) -> Vector3<f32> {
    return v.map(|component| component.floor());
}

/// Transformation of a point to homogenous coordinates as a 4x1 matrix.
pub fn to_hom_point(v: Vector3<f32>) -> DMatrix<f32> {
    return dmatrix![v.x; v.y; v.z; 1.0];
}

/// Transformation of a point from homogenous coordinates.
/// Dividing by a w of zero is the perspective singularity at the camera plane;
/// callers must keep geometry away from it.
pub fn from_hom_point(m: &DMatrix<f32>) -> Vector3<f32> {
    let w = m[(3, 0)];
    return vector![m[(0, 0)] / w, m[(1, 0)] / w, m[(2, 0)] / w];
}
