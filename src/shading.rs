use image::RgbaImage;
use nalgebra as na;

use na::{Vector2, Vector3};

use crate::framebuffer::Color;

/// Per-pixel color source queried by the triangle rasterizer once a fragment
/// has passed the depth test. Weights are the barycentric coordinates of the
/// fragment. None means the fragment is discarded instead of written.
pub trait Shading {
    fn color_at(&self, weights: Vector3<f32>) -> Option<Color>;
}

/// The same color for every covered pixel.
pub struct FlatColor {
    pub color: Color,
}

impl Shading for FlatColor {
    fn color_at(&self, _weights: Vector3<f32>) -> Option<Color> {
        return Some(self.color);
    }
}

/// Samples a diffuse texture at the barycentric interpolation of the three
/// corner uvs. Alpha is not sampled; it carries the constant intensity the
/// caller computed for the face.
pub struct TextureShading<'a> {
    texture: &'a RgbaImage,
    uvs: [Vector2<f32>; 3],
    intensity: u8,
}

impl<'a> TextureShading<'a> {
    pub fn new(texture: &'a RgbaImage, uvs: [Vector2<f32>; 3], intensity: u8) -> TextureShading<'a> {
        return TextureShading { texture, uvs, intensity };
    }
}

impl Shading for TextureShading<'_> {
    fn color_at(&self, weights: Vector3<f32>) -> Option<Color> {
        let uv = self.uvs[0] * weights.x + self.uvs[1] * weights.y + self.uvs[2] * weights.z;
        let tx = (uv.x * self.texture.width() as f32) as i32;
        let ty = (uv.y * self.texture.height() as f32) as i32;
        // The v axis grows upwards while texture rows are stored top-down,
        // the same inversion the framebuffer applies on write.
        let ty = self.texture.height() as i32 - 1 - ty;
        if tx < 0 || tx >= self.texture.width() as i32 || ty < 0 || ty >= self.texture.height() as i32 {
            return None;
        }
        let sample = self.texture.get_pixel(tx as u32, ty as u32).0;
        return Some(Color {
            r: sample[0],
            g: sample[1],
            b: sample[2],
            a: self.intensity,
        });
    }
}

/// Texture sampling with per-pixel diffuse lighting: corner normals are
/// interpolated by the same barycentric weights, and the sampled intensity is
/// scaled by the projection of the interpolated normal on the light
/// direction, floored at zero for faces turned away from the light.
pub struct NormalShading<'a> {
    base: TextureShading<'a>,
    normals: [Vector3<f32>; 3],
    light_direction: Vector3<f32>,
}

impl<'a> NormalShading<'a> {
    pub fn new(
        base: TextureShading<'a>,
        normals: [Vector3<f32>; 3],
        light_direction: Vector3<f32>,
    ) -> NormalShading<'a> {
        return NormalShading { base, normals, light_direction };
    }
}

impl Shading for NormalShading<'_> {
    fn color_at(&self, weights: Vector3<f32>) -> Option<Color> {
        let sampled = self.base.color_at(weights)?;
        let normal = (self.normals[0] * weights.x
            + self.normals[1] * weights.y
            + self.normals[2] * weights.z)
            .normalize();
        let diff_coef = self.light_direction.dot(&normal).max(0.0);
        return Some(Color {
            a: (sampled.a as f32 * diff_coef) as u8,
            ..sampled
        });
    }
}
