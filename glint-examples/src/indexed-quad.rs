//! Render a quad through an index buffer: four vertices, six indices.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{AttribKind, BufferUsage, GfxContext, Primitive, VertexAttrib, VertexLayout};

const VS: &str = include_str!("triangle-vs.glsl");
const FS: &str = include_str!("triangle-fs.glsl");

const VERTICES: [f32; 12] = [
  0.5, 0.5, 0., // top right
  0.5, -0.5, 0., // bottom right
  -0.5, -0.5, 0., // bottom left
  -0.5, 0.5, 0., // top left
];

const INDICES: [u32; 6] = [
  0, 1, 3, // first triangle
  1, 2, 3, // second triangle
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint indexed drawing", 800, 600).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));

  let vertex_buffer = gfx
    .new_vertex_buffer(&VERTICES, BufferUsage::Static)
    .expect("vertex buffer creation");
  let index_buffer = gfx
    .new_index_buffer(&INDICES, BufferUsage::Static)
    .expect("index buffer creation");
  let mesh = gfx
    .new_indexed_mesh(vertex_buffer, index_buffer, &layout)
    .expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    gfx.clear();
    gfx.bind_program(&program);
    gfx.draw_indexed(&mesh, Primitive::Triangles, INDICES.len() as u32);
  });

  gfx.run();
}
