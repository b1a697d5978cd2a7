//! Directional shadow mapping through a depth-only off-screen target.
//!
//! Pass one renders the scene's depth from the light into a depth
//! framebuffer; pass two lights the scene from the camera and darkens
//! fragments the light cannot see, with a 3x3 PCF filter over the shadow map.
//!
//! Drag with the left mouse button to orbit, scroll to zoom.
//! Press <escape> to quit or close the window.

mod common;

use cgmath::{Matrix4, Point3, Vector3};
use common::OrbitCamera;
use glfw::Key;
use glint::{
  AttribKind, BufferUsage, FramebufferMode, GfxContext, Primitive, VertexAttrib, VertexLayout,
};
use std::cell::RefCell;
use std::rc::Rc;

const DEPTH_VS: &str = include_str!("shadow-depth-vs.glsl");
const DEPTH_FS: &str = include_str!("shadow-depth-fs.glsl");
const LIT_VS: &str = include_str!("shadow-lit-vs.glsl");
const LIT_FS: &str = include_str!("shadow-lit-fs.glsl");

const SHADOW_SIZE: u32 = 2048;
const LIGHT_DIR: [f32; 3] = [-0.45, -0.75, -0.5];

struct Object {
  model: Matrix4<f32>,
  color: [f32; 3],
}

fn light_space() -> Matrix4<f32> {
  let dir = Vector3::from(LIGHT_DIR);
  let eye = Point3::new(-dir.x * 8., -dir.y * 8., -dir.z * 8.);
  let projection = cgmath::ortho(-6., 6., -6., 6., 0.5, 20.);
  let view = Matrix4::look_at_rh(eye, Point3::new(0., 0., 0.), Vector3::unit_y());

  projection * view
}

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint shadow mapping", 960, 540).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec3, "NORMAL"));
  layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

  let cube_buffer = gfx
    .new_vertex_buffer(&common::cube_vertices(), BufferUsage::Static)
    .expect("vertex buffer creation");
  let cube = gfx.new_mesh(cube_buffer, &layout).expect("mesh creation");

  let ground_buffer = gfx
    .new_vertex_buffer(&common::ground_vertices(6., -0.5), BufferUsage::Static)
    .expect("vertex buffer creation");
  let ground = gfx.new_mesh(ground_buffer, &layout).expect("mesh creation");

  let depth_program = gfx.new_program(DEPTH_VS, DEPTH_FS).expect("program creation");
  let lit_program = gfx.new_program(LIT_VS, LIT_FS).expect("program creation");

  let shadow_target = gfx
    .new_framebuffer(SHADOW_SIZE, SHADOW_SIZE, FramebufferMode::Depth)
    .expect("framebuffer creation");

  let objects = vec![
    Object {
      model: Matrix4::from_translation(Vector3::new(0., 0., 0.)),
      color: [0.9, 0.45, 0.2],
    },
    Object {
      model: Matrix4::from_translation(Vector3::new(1.6, -0.2, -1.))
        * Matrix4::from_scale(0.6),
      color: [0.3, 0.65, 0.4],
    },
    Object {
      model: Matrix4::from_translation(Vector3::new(-1.4, 0.3, 1.2))
        * Matrix4::from_scale(0.8),
      color: [0.35, 0.5, 0.85],
    },
  ];

  let camera = Rc::new(RefCell::new(OrbitCamera::new(7.)));

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

    let light_space = light_space();

    // pass one: depth from the light's point of view
    shadow_target.bind();
    gfx.set_viewport(SHADOW_SIZE, SHADOW_SIZE);
    gfx.clear();
    gfx.bind_program(&depth_program);
    gfx.set_uniform_mat4(&depth_program, "u_light_space", light_space.into());

    for object in &objects {
      gfx.set_uniform_mat4(&depth_program, "u_model", object.model.into());
      gfx.draw(&cube, Primitive::Triangles, 36);
    }

    gfx.set_uniform_mat4(&depth_program, "u_model", Matrix4::from_scale(1.).into());
    gfx.draw(&ground, Primitive::Triangles, 6);

    shadow_target.unbind();

    // pass two: lit scene from the camera
    let (width, height) = gfx.framebuffer_size();
    gfx.set_viewport(width, height);
    gfx.set_clear_color([0.1, 0.1, 0.12, 1.]);
    gfx.clear();

    let camera = camera.borrow();
    let view_projection = common::projection(width, height) * camera.view();

    gfx.bind_program(&lit_program);
    gfx.bind_framebuffer_texture(&shadow_target);
    gfx.set_uniform_i32(&lit_program, "u_shadow_map", 0);
    gfx.set_uniform_mat4(&lit_program, "u_light_space", light_space.into());
    gfx.set_uniform_vec3(&lit_program, "u_light_dir", LIGHT_DIR);

    for object in &objects {
      let mvp = view_projection * object.model;
      gfx.set_uniform_mat4(&lit_program, "u_mvp", mvp.into());
      gfx.set_uniform_mat4(&lit_program, "u_model", object.model.into());
      gfx.set_uniform_vec3(&lit_program, "u_color", object.color);
      gfx.draw(&cube, Primitive::Triangles, 36);
    }

    gfx.set_uniform_mat4(&lit_program, "u_mvp", view_projection.into());
    gfx.set_uniform_mat4(&lit_program, "u_model", Matrix4::from_scale(1.).into());
    gfx.set_uniform_vec3(&lit_program, "u_color", [0.55, 0.55, 0.6]);
    gfx.draw(&ground, Primitive::Triangles, 6);
  });

  gfx.run();
}
