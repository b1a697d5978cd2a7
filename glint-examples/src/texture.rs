//! Load an image from disk and stretch it over the window.
//!
//! The texture path is read from the command line and is the sole argument.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{
  AttribKind, BufferUsage, GfxContext, Image, MagFilter, MinFilter, Primitive, Sampler,
  VertexAttrib, VertexLayout, Wrap,
};
use std::env;

const VS: &str = include_str!("texture-vs.glsl");
const FS: &str = include_str!("texture-fs.glsl");

// x, y, u, v; v flipped so the image shows upright
const QUAD: [f32; 24] = [
  -1., -1., 0., 1., //
  1., -1., 1., 1., //
  1., 1., 1., 0., //
  -1., -1., 0., 1., //
  1., 1., 1., 0., //
  -1., 1., 0., 0., //
];

fn main() {
  env_logger::init();

  let Some(path) = env::args().nth(1) else {
    eprintln!("missing first argument (path to the texture to load)");
    return;
  };

  let image = match Image::open(&path) {
    Ok(image) => image,
    Err(e) => {
      eprintln!("cannot load {}: {}", path, e);
      return;
    }
  };

  let mut gfx = GfxContext::new("glint texture", 800, 600).expect("context creation");

  let sampler = Sampler {
    min_filter: MinFilter::LinearMipmapLinear,
    mag_filter: MagFilter::Linear,
    ..Sampler::with_wrap(Wrap::Repeat)
  };
  let texture = gfx
    .new_texture_2d(&image, &sampler, true)
    .expect("texture creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec2, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

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
    gfx.set_uniform_i32(&program, "u_texture", 0);
    gfx.draw(&mesh, Primitive::Triangles, 6);
  });

  gfx.run();
}
