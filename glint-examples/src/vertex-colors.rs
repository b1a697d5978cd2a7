//! Interleave a color attribute with positions in one packed vertex record.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{AttribKind, BufferUsage, GfxContext, Primitive, VertexAttrib, VertexLayout};

const VS: &str = include_str!("vertex-colors-vs.glsl");
const FS: &str = include_str!("vertex-colors-fs.glsl");

// x, y, z, r, g, b
const VERTICES: [f32; 18] = [
  -0.5, -0.5, 0., 1., 0., 0., //
  0.5, -0.5, 0., 0., 1., 0., //
  0., 0.5, 0., 0., 0., 1., //
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint vertex colors", 800, 600).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec3, "COLOR"));

  let buffer = gfx
    .new_vertex_buffer(&VERTICES, BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    gfx.clear();
    gfx.bind_program(&program);
    gfx.draw(&mesh, Primitive::Triangles, 3);
  });

  gfx.run();
}
