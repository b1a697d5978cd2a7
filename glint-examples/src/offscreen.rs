//! Render to an off-screen target, then post-process it onto the screen.
//!
//! The first pass draws the vertex-colors triangle into a color framebuffer;
//! the second pass samples it over a fullscreen quad and inverts it. Resizing
//! the window reallocates the off-screen target at the new size.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::{
  AttribKind, BufferUsage, FramebufferMode, GfxContext, Primitive, VertexAttrib, VertexLayout,
};
use std::cell::RefCell;
use std::rc::Rc;

const SCENE_VS: &str = include_str!("vertex-colors-vs.glsl");
const SCENE_FS: &str = include_str!("vertex-colors-fs.glsl");
const POST_VS: &str = include_str!("texture-vs.glsl");
const POST_FS: &str = include_str!("offscreen-post-fs.glsl");

// x, y, z, r, g, b
const TRIANGLE: [f32; 18] = [
  -0.5, -0.5, 0., 1., 0., 0., //
  0.5, -0.5, 0., 0., 1., 0., //
  0., 0.5, 0., 0., 0., 1., //
];

// x, y, u, v
const QUAD: [f32; 24] = [
  -1., -1., 0., 0., //
  1., -1., 1., 0., //
  1., 1., 1., 1., //
  -1., -1., 0., 0., //
  1., 1., 1., 1., //
  -1., 1., 0., 1., //
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint offscreen", 960, 540).expect("context creation");

  let mut scene_layout = VertexLayout::new();
  scene_layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  scene_layout.push(VertexAttrib::new(AttribKind::Vec3, "COLOR"));

  let mut quad_layout = VertexLayout::new();
  quad_layout.push(VertexAttrib::new(AttribKind::Vec2, "POSITION"));
  quad_layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

  let triangle_buffer = gfx
    .new_vertex_buffer(&TRIANGLE, BufferUsage::Static)
    .expect("vertex buffer creation");
  let triangle = gfx
    .new_mesh(triangle_buffer, &scene_layout)
    .expect("mesh creation");

  let quad_buffer = gfx
    .new_vertex_buffer(&QUAD, BufferUsage::Static)
    .expect("vertex buffer creation");
  let quad = gfx.new_mesh(quad_buffer, &quad_layout).expect("mesh creation");

  let scene_program = gfx.new_program(SCENE_VS, SCENE_FS).expect("program creation");
  let post_program = gfx.new_program(POST_VS, POST_FS).expect("program creation");

  let (width, height) = gfx.framebuffer_size();
  let framebuffer = Rc::new(RefCell::new(
    gfx
      .new_framebuffer(width, height, FramebufferMode::Color)
      .expect("framebuffer creation"),
  ));

  {
    let framebuffer = framebuffer.clone();
    gfx.on_resize(move |_, width, height| {
      framebuffer
        .borrow_mut()
        .resize(width, height)
        .expect("framebuffer resize");
    });
  }

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    let framebuffer = framebuffer.borrow();
    let (width, height) = gfx.framebuffer_size();

    // first pass: scene into the off-screen target
    framebuffer.bind();
    gfx.set_viewport(framebuffer.width(), framebuffer.height());
    gfx.set_clear_color([0.1, 0.1, 0.12, 1.]);
    gfx.clear();
    gfx.bind_program(&scene_program);
    gfx.draw(&triangle, Primitive::Triangles, 3);
    framebuffer.unbind();

    // second pass: post-process onto the screen
    gfx.set_viewport(width, height);
    gfx.clear();
    gfx.bind_program(&post_program);
    gfx.bind_framebuffer_texture(&framebuffer);
    gfx.set_uniform_i32(&post_program, "u_scene", 0);
    gfx.draw(&quad, Primitive::Triangles, 6);
  });

  gfx.run();
}
