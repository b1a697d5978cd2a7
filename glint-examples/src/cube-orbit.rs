//! A lit cube under an orbit camera.
//!
//! Drag with the left mouse button to orbit, scroll to zoom.
//! Press <escape> to quit or close the window.

mod common;

use common::OrbitCamera;
use glfw::Key;
use glint::{AttribKind, BufferUsage, GfxContext, Primitive, VertexAttrib, VertexLayout};
use std::cell::RefCell;
use std::rc::Rc;

const VS: &str = include_str!("cube-vs.glsl");
const FS: &str = include_str!("cube-fs.glsl");

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint orbit camera", 960, 540).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec3, "NORMAL"));
  layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

  let buffer = gfx
    .new_vertex_buffer(&common::cube_vertices(), BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  let camera = Rc::new(RefCell::new(OrbitCamera::new(4.)));

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

    gfx.set_clear_color([0.1, 0.1, 0.12, 1.]);
    gfx.clear();

    let (width, height) = gfx.framebuffer_size();
    let camera = camera.borrow();
    let mvp = common::projection(width, height) * camera.view();

    gfx.bind_program(&program);
    gfx.set_uniform_mat4(&program, "u_mvp", mvp.into());
    gfx.set_uniform_vec3(&program, "u_light_dir", [-0.5, -0.8, -0.3]);
    gfx.draw(&mesh, Primitive::Triangles, 36);
  });

  gfx.run();
}
