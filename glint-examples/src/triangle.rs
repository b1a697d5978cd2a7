//! Render a single orange triangle.
//!
//! This demo uses the bare loop variant: three plain functions and no UI
//! overlay, the closest thing to a raw main loop the toolkit offers.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{AttribKind, BufferUsage, GfxContext, Primitive, VertexAttrib, VertexLayout};

const VS: &str = include_str!("triangle-vs.glsl");
const FS: &str = include_str!("triangle-fs.glsl");

const VERTICES: [f32; 9] = [
  -0.5, -0.5, 0., // left
  0.5, -0.5, 0., // right
  0., 0.5, 0., // top
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint triangle", 800, 600).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));

  let buffer = gfx
    .new_vertex_buffer(&VERTICES, BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  gfx.run_bare(
    |_| (),
    |gfx| {
      if gfx.key_pressed(Key::Escape) {
        gfx.request_close();
      }
    },
    move |gfx| {
      gfx.clear();
      gfx.bind_program(&program);
      gfx.draw(&mesh, Primitive::Triangles, 3);
    },
  );
}
