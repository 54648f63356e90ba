use std::fs::File;
use std::io::BufReader;
use std::time;

use image::RgbaImage;
use log::{debug, info};
use nalgebra as na;
use obj::{load_obj, Obj, TexturedVertex};
use show_image::{create_window, event, ImageInfo, ImageView, WindowOptions};

use na::{vector, DMatrix, Vector3};

use soft_renderer::error::Result as RenderResult;
use soft_renderer::framebuffer::{Color, Framebuffer, BLACK, WHITE};
use soft_renderer::mesh::{Corner, Mesh};
use soft_renderer::raster;
use soft_renderer::shading::{FlatColor, NormalShading, TextureShading};
use soft_renderer::transform::{self, Pipeline};

// Resolution of the z-buffer after the viewport transform.
const DEPTH_RANGE: f32 = 255.0;

pub struct Params {
    pub width: u32,
    pub height: u32,
    pub print_fps: bool,
    pub asset_path: String,
    pub mode_name: String,
}

/// The successively more complete renderers, from a bare wireframe to the
/// full camera pipeline with per-pixel lighting.
#[derive(Debug, Clone, Copy)]
enum Mode {
    Wireframe,
    Flat,
    Textured,
    Perspective,
    Lit,
}

/// Helper, defining exit event to be an Escape key press.
fn is_exit_event(window_event: event::WindowEvent) -> bool {
    if let event::WindowEvent::KeyboardInput(event) = window_event {
        if event.input.key_code == Some(event::VirtualKeyCode::Escape)
            && event.input.state.is_released()
        {
            return true;
        }
    }

    return false;
}

/// Reads an OBJ file into the renderer's mesh value. The OBJ crate already
/// resolves the format's 1-based indices into a single 0-based vertex list,
/// so every corner uses one index for all three attributes.
fn load_mesh(path: &str) -> Result<Mesh, Box<dyn std::error::Error>> {
    let model: Obj<TexturedVertex, u32> = load_obj(BufReader::new(File::open(path)?))?;

    let mut positions = Vec::with_capacity(model.vertices.len());
    let mut texcoords = Vec::with_capacity(model.vertices.len());
    let mut normals = Vec::with_capacity(model.vertices.len());
    for vertex in &model.vertices {
        positions.push(vector![
            vertex.position[0],
            vertex.position[1],
            vertex.position[2]
        ]);
        texcoords.push(vector![vertex.texture[0], vertex.texture[1]]);
        normals.push(vector![vertex.normal[0], vertex.normal[1], vertex.normal[2]]);
    }
    let faces = model
        .indices
        .chunks_exact(3)
        .map(|corners| {
            let corner = |index: u32| Corner {
                position: index as usize,
                texcoord: index as usize,
                normal: index as usize,
            };
            return [corner(corners[0]), corner(corners[1]), corner(corners[2])];
        })
        .collect();

    return Ok(Mesh { positions, texcoords, normals, faces });
}

/// Direct mapping of normalized device coordinates onto the pixel grid,
/// used by the modes that skip the matrix pipeline.
fn ndc_to_screen(v: Vector3<f32>, width: u32, height: u32) -> Vector3<f32> {
    return vector![
        (v.x + 1.0) * width as f32 / 2.0,
        (v.y + 1.0) * height as f32 / 2.0,
        v.z
    ];
}

/// Per-face diffuse intensity against a fixed light; negative values mean
/// the face is turned away and gets culled by the flat modes.
fn face_intensity(world: &[Vector3<f32>; 3], light_direction: Vector3<f32>) -> f32 {
    let face_normal = (world[2] - world[0])
        .cross(&(world[1] - world[0]))
        .normalize();
    return face_normal.dot(&light_direction);
}

fn draw_wireframe(fb: &mut Framebuffer, mesh: &Mesh) {
    for face in &mesh.faces {
        let world = mesh.face_positions(face);
        for i in 0..3 {
            let a = ndc_to_screen(world[i], fb.width, fb.height);
            let b = ndc_to_screen(world[(i + 1) % 3], fb.width, fb.height);
            raster::draw_line(
                fb,
                vector![a.x as i32, a.y as i32],
                vector![b.x as i32, b.y as i32],
                WHITE,
            );
        }
    }
}

fn draw_flat(fb: &mut Framebuffer, mesh: &Mesh) {
    let light_direction = vector![0.0, 0.0, -1.0];
    for face in &mesh.faces {
        let world = mesh.face_positions(face);
        let screen = world.map(|v| ndc_to_screen(v, fb.width, fb.height));
        let intensity = face_intensity(&world, light_direction);
        if intensity > 0.0 {
            let shading = FlatColor { color: Color::blend(WHITE, BLACK, intensity) };
            raster::triangle(fb, screen, &shading);
        }
    }
}

fn draw_textured(fb: &mut Framebuffer, mesh: &Mesh, texture: &RgbaImage) {
    let light_direction = vector![0.0, 0.0, -1.0];
    for face in &mesh.faces {
        let world = mesh.face_positions(face);
        let screen = world.map(|v| ndc_to_screen(v, fb.width, fb.height));
        let intensity = face_intensity(&world, light_direction);
        if intensity > 0.0 {
            let shading = TextureShading::new(
                texture,
                mesh.face_texcoords(face),
                (intensity * 255.0).round() as u8,
            );
            raster::triangle(fb, screen, &shading);
        }
    }
}

fn draw_perspective(fb: &mut Framebuffer, mesh: &Mesh, texture: &RgbaImage) -> RenderResult<()> {
    let camera = vector![0.0, 0.0, 3.0];
    let center = vector![0.0, 0.0, 0.0];
    let light_direction = vector![0.0, 0.0, -1.0];
    let pipeline = Pipeline::new(
        &margin_viewport(fb),
        &transform::projection(camera, center),
        &DMatrix::identity(4, 4),
    )?;

    for face in &mesh.faces {
        let world = mesh.face_positions(face);
        let mut screen = [Vector3::zeros(); 3];
        for i in 0..3 {
            screen[i] = pipeline.to_screen(world[i])?;
        }
        let intensity = face_intensity(&world, light_direction);
        if intensity > 0.0 {
            let shading = TextureShading::new(
                texture,
                mesh.face_texcoords(face),
                (intensity * 255.0).round() as u8,
            );
            raster::triangle(fb, screen, &shading);
        }
    }

    return Ok(());
}

fn draw_lit(fb: &mut Framebuffer, mesh: &Mesh, texture: &RgbaImage) -> RenderResult<()> {
    let light_direction = vector![1.0, -1.0, 1.0].normalize();
    let eye = vector![1.0, 1.0, 3.0];
    let center = vector![0.0, 0.0, 0.0];
    let up = vector![0.0, 1.0, 0.0];
    let pipeline = Pipeline::new(
        &margin_viewport(fb),
        &transform::projection(eye, center),
        &transform::look_at(eye, center, up),
    )?;

    for face in &mesh.faces {
        let world = mesh.face_positions(face);
        let mut screen = [Vector3::zeros(); 3];
        for i in 0..3 {
            screen[i] = pipeline.to_screen(world[i])?;
        }
        // No backface culling here; lighting zeroes out faces turned away.
        let shading = NormalShading::new(
            TextureShading::new(texture, mesh.face_texcoords(face), 255),
            mesh.face_normals(face),
            light_direction,
        );
        raster::triangle(fb, screen, &shading);
    }

    return Ok(());
}

/// Viewport with an eighth of the canvas as margin on every side.
fn margin_viewport(fb: &Framebuffer) -> DMatrix<f32> {
    let w = fb.width as f32;
    let h = fb.height as f32;
    return transform::viewport(w / 8.0, h / 8.0, w * 3.0 / 4.0, h * 3.0 / 4.0, DEPTH_RANGE);
}

/// Actually launches the window, rendering the model with the chosen mode
/// until an exit event arrives.
pub fn run(params: Params) -> Result<(), Box<dyn std::error::Error>> {
    let mode = match params.mode_name.as_str() {
        "wireframe" => Mode::Wireframe,
        "flat" => Mode::Flat,
        "textured" => Mode::Textured,
        "perspective" => Mode::Perspective,
        "lit" => Mode::Lit,
        other => return Err(format!("render mode '{other}' is not supported").into()),
    };

    let mut fb = Framebuffer::new(params.width, params.height);
    let mesh = load_mesh(&format!("{}.obj", params.asset_path))?;
    let texture = image::open(format!("{}_diffuse.tga", params.asset_path))?.to_rgba8();
    info!(
        "loaded model: {} vertices, {} faces, {}x{} texture",
        mesh.positions.len(),
        mesh.faces.len(),
        texture.width(),
        texture.height()
    );

    let window_options: WindowOptions = WindowOptions {
        size: Some([params.width, params.height]),
        ..Default::default()
    };
    let window = create_window("output", window_options)?;
    let event_channel = window.event_channel()?;

    let mut exit = false;
    let mut frame_counter_time_begin = time::Instant::now();
    let mut frame_counter: u32 = 0;
    while !exit {
        // Clearing the z-buffer and resetting pixel data before each frame.
        fb.clear();

        match mode {
            Mode::Wireframe => draw_wireframe(&mut fb, &mesh),
            Mode::Flat => draw_flat(&mut fb, &mesh),
            Mode::Textured => draw_textured(&mut fb, &mesh, &texture),
            Mode::Perspective => draw_perspective(&mut fb, &mesh, &texture)?,
            Mode::Lit => draw_lit(&mut fb, &mesh, &texture)?,
        }

        let image_data = ImageView::new(
            ImageInfo::rgba8(params.width, params.height),
            fb.present(),
        );
        window.set_image("render", image_data)?;

        // Unloading all events that piled up in the channel, looking for an
        // exit event.
        let exit_poll_result = event_channel
            .try_iter()
            .map(is_exit_event)
            .reduce(|was_exit_event, is_exit_event| was_exit_event || is_exit_event);
        exit = exit_poll_result.unwrap_or(false);

        if params.print_fps {
            frame_counter += 1;
            if frame_counter_time_begin.elapsed().as_secs_f32() > 1.0 {
                debug!("fps {}", frame_counter);
                frame_counter_time_begin = time::Instant::now();
                frame_counter = 0;
            }
        }
    }

    return Ok(());
}
