use std::cmp::{max, min};
use std::mem::swap;

use nalgebra as na;

use na::{vector, Vector2, Vector3};

use crate::framebuffer::{Color, Framebuffer};
use crate::math;
use crate::shading::Shading;

// Axis-aligned box over a triangle, clamped to the render target.
#[derive(Debug)]
struct BoundingBox {
    ll: Vector2<i32>, // lower left corner
    ur: Vector2<i32>, // upper right corner
}

fn get_triangle_bounding_box(
    coord_a: Vector2<i32>,
    coord_b: Vector2<i32>,
    coord_c: Vector2<i32>,
    width: u32,
    height: u32,
) -> BoundingBox {
    return BoundingBox {
        ll: vector![
            max(min(min(coord_a.x, coord_b.x), coord_c.x), 0),
            max(min(min(coord_a.y, coord_b.y), coord_c.y), 0)
        ],
        ur: vector![
            min(max(max(coord_a.x, coord_b.x), coord_c.x), width as i32 - 1),
            min(max(max(coord_a.y, coord_b.y), coord_c.y), height as i32 - 1)
        ],
    };
}

/// Barycentric coordinates of a point relative to a triangle, via the cross
/// product of the x- and y-difference vectors. The second weight belongs to
/// vertex b and the third to vertex c. A near-zero screen area makes the
/// construction degenerate; the sentinel then fails the inside test for
/// every point.
fn to_barycentric_coord(
    coord_point: Vector2<i32>,
    coord_a: Vector2<i32>,
    coord_b: Vector2<i32>,
    coord_c: Vector2<i32>,
) -> Vector3<f32> {
    let x_diffs = vector![
        (coord_b.x - coord_a.x) as f32,
        (coord_c.x - coord_a.x) as f32,
        (coord_a.x - coord_point.x) as f32
    ];
    let y_diffs = vector![
        (coord_b.y - coord_a.y) as f32,
        (coord_c.y - coord_a.y) as f32,
        (coord_a.y - coord_point.y) as f32
    ];
    let raw_cross = x_diffs.cross(&y_diffs);
    if raw_cross.z.abs() < 1.0 {
        // Degenerate triangle, returning something with a negative coordinate.
        return vector![-1.0, 1.0, 1.0];
    }
    return vector![
        1.0 - (raw_cross.x + raw_cross.y) / raw_cross.z,
        raw_cross.x / raw_cross.z,
        raw_cross.y / raw_cross.z
    ];
}

/// Draws a line between two pixel coordinates via Bresenham's algorithm,
/// stepping along the axis of greater extent so steep lines stay gap-free.
/// Endpoints are inclusive; clipping is left to the framebuffer write.
pub fn draw_line(fb: &mut Framebuffer, a: Vector2<i32>, b: Vector2<i32>, color: Color) {
    let (mut x_0, mut y_0) = (a.x, a.y);
    let (mut x_1, mut y_1) = (b.x, b.y);
    let steep = (x_1 - x_0).abs() < (y_1 - y_0).abs();
    if steep {
        swap(&mut x_0, &mut y_0);
        swap(&mut x_1, &mut y_1);
    }
    if x_0 > x_1 {
        swap(&mut x_0, &mut x_1);
        swap(&mut y_0, &mut y_1);
    }
    let dx = x_1 - x_0;
    let dy = y_1 - y_0;
    let derror2 = dy.abs() * 2;
    let mut error2 = 0;
    let mut y = y_0;
    for x in x_0..=x_1 {
        if steep {
            fb.put_pixel(y, x, color);
        } else {
            fb.put_pixel(x, y, color);
        }
        error2 += derror2;
        if error2 > dx {
            y += if y_1 > y_0 { 1 } else { -1 };
            error2 -= dx * 2;
        }
    }
}

/// Fills a triangle given in screen space (x, y in pixels, z in the depth
/// range), walking its bounding box, depth testing every covered pixel and
/// asking the shading for the fragment color on success.
pub fn triangle(fb: &mut Framebuffer, verts: [Vector3<f32>; 3], shading: &dyn Shading) {
    let vert_a = math::floor(verts[0]);
    let vert_b = math::floor(verts[1]);
    let vert_c = math::floor(verts[2]);
    let coord_a = vector![vert_a.x as i32, vert_a.y as i32];
    let coord_b = vector![vert_b.x as i32, vert_b.y as i32];
    let coord_c = vector![vert_c.x as i32, vert_c.y as i32];

    let bbox = get_triangle_bounding_box(coord_a, coord_b, coord_c, fb.width, fb.height);
    for i in bbox.ll.x..=bbox.ur.x {
        for j in bbox.ll.y..=bbox.ur.y {
            let weights = to_barycentric_coord(vector![i, j], coord_a, coord_b, coord_c);
            if weights.x < 0.0 || weights.y < 0.0 || weights.z < 0.0 {
                // Point is not in the triangle, skipping it.
                continue;
            }
            if weights.x > 1.0 || weights.y > 1.0 || weights.z > 1.0 {
                continue;
            }
            let z = weights.x * vert_a.z + weights.y * vert_b.z + weights.z * vert_c.z;
            if fb.depth_test(i, j, z) {
                if let Some(color) = shading.color_at(weights) {
                    fb.put_pixel(i, j, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::framebuffer::{BLUE, GREEN, RED, WHITE};
    use crate::shading::FlatColor;

    fn set_pixels(fb: &Framebuffer) -> Vec<(i32, i32)> {
        let mut set = Vec::new();
        for y in 0..fb.height as i32 {
            for x in 0..fb.width as i32 {
                if fb.pixel_at(x, y).unwrap().a != 0 {
                    set.push((x, y));
                }
            }
        }
        return set;
    }

    #[test]
    fn horizontal_line_covers_exactly_its_row() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(&mut fb, vector![0, 0], vector![4, 0], WHITE);
        let expected: Vec<(i32, i32)> = (0..=4).map(|x| (x, 0)).collect();
        assert_eq!(set_pixels(&fb), expected);
    }

    #[test]
    fn vertical_line_covers_exactly_its_column() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(&mut fb, vector![0, 0], vector![0, 4], WHITE);
        let mut pixels = set_pixels(&fb);
        pixels.sort();
        let expected: Vec<(i32, i32)> = (0..=4).map(|y| (0, y)).collect();
        assert_eq!(pixels, expected);
    }

    #[test]
    fn steep_line_connects_both_endpoints() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(&mut fb, vector![0, 0], vector![2, 6], WHITE);
        let pixels = set_pixels(&fb);
        assert!(pixels.contains(&(0, 0)));
        assert!(pixels.contains(&(2, 6)));
        // Stepping along y, one pixel per row of the longer extent.
        assert_eq!(pixels.len(), 7);
    }

    #[test]
    fn line_endpoint_order_does_not_matter() {
        let mut forward = Framebuffer::new(8, 8);
        let mut backward = Framebuffer::new(8, 8);
        draw_line(&mut forward, vector![1, 1], vector![6, 4], WHITE);
        draw_line(&mut backward, vector![6, 4], vector![1, 1], WHITE);
        assert_eq!(set_pixels(&forward), set_pixels(&backward));
    }

    #[test]
    fn triangle_fills_exactly_its_half_square() {
        let mut fb = Framebuffer::new(8, 8);
        let verts = [
            vector![0.0, 0.0, 0.0],
            vector![4.0, 0.0, 0.0],
            vector![0.0, 4.0, 0.0],
        ];
        triangle(&mut fb, verts, &FlatColor { color: RED });
        for y in 0..8 {
            for x in 0..8 {
                let inside = x + y <= 4;
                let expected = if inside { RED.r } else { 0 };
                assert_eq!(
                    fb.pixel_at(x, y).unwrap().r,
                    expected,
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn triangle_clamps_bounding_box_to_target() {
        let mut fb = Framebuffer::new(4, 4);
        let verts = [
            vector![-10.0, -10.0, 0.0],
            vector![20.0, -10.0, 0.0],
            vector![-10.0, 20.0, 0.0],
        ];
        // Covers the whole small target without panicking on the overhang.
        triangle(&mut fb, verts, &FlatColor { color: GREEN });
        assert_eq!(set_pixels(&fb).len(), 16);
    }

    #[test]
    fn nearer_fragment_wins_regardless_of_draw_order() {
        let verts = |z: f32| {
            [
                vector![0.0, 0.0, z],
                vector![4.0, 0.0, z],
                vector![0.0, 4.0, z],
            ]
        };

        // Near first: the far refill must not show.
        let mut fb = Framebuffer::new(8, 8);
        triangle(&mut fb, verts(1.0), &FlatColor { color: RED });
        triangle(&mut fb, verts(0.0), &FlatColor { color: BLUE });
        assert_eq!(fb.pixel_at(1, 1), Some(RED));

        // Far first: the near refill replaces it.
        let mut fb = Framebuffer::new(8, 8);
        triangle(&mut fb, verts(0.0), &FlatColor { color: RED });
        triangle(&mut fb, verts(1.0), &FlatColor { color: BLUE });
        assert_eq!(fb.pixel_at(1, 1), Some(BLUE));
    }

    #[test]
    fn degenerate_triangle_rasterizes_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        let collinear = [
            vector![0.0, 0.0, 0.0],
            vector![2.0, 2.0, 0.0],
            vector![4.0, 4.0, 0.0],
        ];
        triangle(&mut fb, collinear, &FlatColor { color: WHITE });
        assert!(set_pixels(&fb).is_empty());
    }

    #[test]
    fn triangle_interpolates_depth_across_surface() {
        let mut fb = Framebuffer::new(8, 8);
        let verts = [
            vector![0.0, 0.0, 0.0],
            vector![4.0, 0.0, 4.0],
            vector![0.0, 4.0, 0.0],
        ];
        triangle(&mut fb, verts, &FlatColor { color: WHITE });
        assert_eq!(fb.depth_at(0, 0), Some(0.0));
        assert_eq!(fb.depth_at(4, 0), Some(4.0));
        assert_eq!(fb.depth_at(2, 0), Some(2.0));
    }
}
