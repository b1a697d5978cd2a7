//! Sample a 1D palette texture across a fullscreen quad.
//!
//! The palette is built in memory: a small gradient of byte texels wrapped as
//! a single-row image and uploaded as a 1D texture with linear filtering.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{
  AttribKind, BufferUsage, GfxContext, Image, Primitive, Sampler, VertexAttrib, VertexLayout, Wrap,
};

const VS: &str = include_str!("palette-1d-vs.glsl");
const FS: &str = include_str!("palette-1d-fs.glsl");

const QUAD: [f32; 12] = [
  -1., -1., 1., -1., 1., 1., //
  -1., -1., 1., 1., -1., 1., //
];

// a handful of heat-map control colors
const PALETTE: [[u8; 3]; 5] = [
  [13, 8, 135],
  [126, 3, 168],
  [204, 71, 120],
  [248, 149, 64],
  [240, 249, 33],
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint 1D palette", 800, 600).expect("context creation");

  let texels: Vec<u8> = PALETTE.iter().flatten().copied().collect();
  let palette =
    Image::from_raw(&texels, PALETTE.len() as u32, 3).expect("palette image creation");

  let texture = gfx
    .new_texture_1d(&palette, &Sampler::with_wrap(Wrap::ClampToEdge))
    .expect("texture creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec2, "POSITION"));

  let buffer = gfx
    .new_vertex_buffer(&QUAD, BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    gfx.clear();
    gfx.bind_program(&program);
    gfx.bind_texture(&texture);
    gfx.set_uniform_i32(&program, "u_palette", 0);
    gfx.draw(&mesh, Primitive::Triangles, 6);
  });

  gfx.run();
}
