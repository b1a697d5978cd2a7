//! Ray-cast a procedural density volume stored in a 3D texture.
//!
//! A metaball-ish density field is filled voxel by voxel, uploaded as a
//! single-channel 3D texture together with its gradient field, and ray-marched
//! in the fragment shader of a unit cube. Gradients double as surface normals
//! for shading.
//!
//! Drag with the left mouse button to orbit, scroll to zoom.
//! Press <escape> to quit or close the window.

mod common;

use common::OrbitCamera;
use glfw::Key;
use glint::{
  AttribKind, BufferUsage, GfxContext, Primitive, Sampler, VertexAttrib, VertexLayout, Volume,
  Wrap,
};
use std::cell::RefCell;
use std::rc::Rc;

const VS: &str = include_str!("volume-vs.glsl");
const FS: &str = include_str!("volume-fs.glsl");

const GRID: u32 = 64;
const BACKGROUND: [f32; 3] = [0.08, 0.08, 0.1];

// density of one blob: 1 at the center, fading to 0 at `radius`
fn blob(x: f32, y: f32, z: f32, cx: f32, cy: f32, cz: f32, radius: f32) -> f32 {
  let d = ((x - cx).powi(2) + (y - cy).powi(2) + (z - cz).powi(2)).sqrt();
  (1. - d / radius).max(0.)
}

fn build_volume() -> Volume {
  let mut volume = Volume::new(GRID, GRID, GRID);

  for z in 0..GRID {
    for y in 0..GRID {
      for x in 0..GRID {
        let (fx, fy, fz) = (
          x as f32 / GRID as f32,
          y as f32 / GRID as f32,
          z as f32 / GRID as f32,
        );

        let density = blob(fx, fy, fz, 0.42, 0.45, 0.5, 0.3)
          + blob(fx, fy, fz, 0.65, 0.6, 0.45, 0.22);

        volume
          .set(x, y, z, density.min(1.))
          .expect("in-bounds voxel write");
      }
    }
  }

  volume
}

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint volume ray-casting", 960, 540).expect("context creation");

  let volume = build_volume();
  let sampler = Sampler::with_wrap(Wrap::ClampToEdge);
  let density = gfx
    .new_texture_3d(&volume, &sampler, false)
    .expect("density texture creation");
  let gradients = gfx
    .new_gradient_texture_3d(&volume, &sampler)
    .expect("gradient texture creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec3, "NORMAL"));
  layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

  let buffer = gfx
    .new_vertex_buffer(&common::cube_vertices(), BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  let camera = Rc::new(RefCell::new(OrbitCamera::new(2.2)));

  {
    let camera = camera.clone();
    gfx.on_mouse_button(move |_, button, action, _| {
      camera.borrow_mut().on_button(button, action);
    });
  }

  {
    let camera = camera.clone();
    gfx.on_mouse_move(move |_, x, y| {
      camera.borrow_mut().on_move(x, y);
    });
  }

  {
    let camera = camera.clone();
    gfx.on_mouse_scroll(move |_, _, yoffset| {
      camera.borrow_mut().on_scroll(yoffset);
    });
  }

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    gfx.set_clear_color([BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 1.]);
    gfx.clear();

    let (width, height) = gfx.framebuffer_size();
    let camera = camera.borrow();
    let eye = camera.eye();
    let mvp = common::projection(width, height) * camera.view();

    gfx.bind_program(&program);
    gfx.set_uniform_mat4(&program, "u_mvp", mvp.into());
    gfx.set_uniform_vec3(&program, "u_cam_tex", [eye.x + 0.5, eye.y + 0.5, eye.z + 0.5]);
    gfx.set_uniform_vec3(&program, "u_light_dir", [-0.6, -0.7, -0.4]);
    gfx.set_uniform_vec3(&program, "u_background", BACKGROUND);
    gfx.bind_texture_at(&density, 0);
    gfx.set_uniform_i32(&program, "u_volume", 0);
    gfx.bind_texture_at(&gradients, 1);
    gfx.set_uniform_i32(&program, "u_gradients", 1);
    gfx.draw(&mesh, Primitive::Triangles, 36);
  });

  gfx.run();
}
