use nalgebra as na;

use na::{Vector2, Vector3};

/// Indices of one face corner into the mesh attribute arrays, already 0-based.
#[derive(Debug, Clone, Copy)]
pub struct Corner {
    pub position: usize,
    pub texcoord: usize,
    pub normal: usize,
}

/// A triangular face as three corners.
pub type Face = [Corner; 3];

/// Triangle mesh as the renderer consumes it: attribute arrays plus faces
/// indexing into them. Producing this value (parsing model files, adjusting
/// the format's 1-based indices) is the loader's job; indices out of range
/// are a loader bug and will panic on access.
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub texcoords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Positions of a face's three corners.
    pub fn face_positions(&self, face: &Face) -> [Vector3<f32>; 3] {
        return [
            self.positions[face[0].position],
            self.positions[face[1].position],
            self.positions[face[2].position],
        ];
    }

    /// Texture coordinates of a face's three corners.
    pub fn face_texcoords(&self, face: &Face) -> [Vector2<f32>; 3] {
        return [
            self.texcoords[face[0].texcoord],
            self.texcoords[face[1].texcoord],
            self.texcoords[face[2].texcoord],
        ];
    }

    /// Normals of a face's three corners.
    pub fn face_normals(&self, face: &Face) -> [Vector3<f32>; 3] {
        return [
            self.normals[face[0].normal],
            self.normals[face[1].normal],
            self.normals[face[2].normal],
        ];
    }
}
