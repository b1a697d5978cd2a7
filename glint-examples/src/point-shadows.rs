//! Omnidirectional shadows from a point light, through a depth cubemap.
//!
//! The depth pass uses a geometry stage to broadcast every triangle to all
//! six cubemap faces in one draw, writing linear light distance into depth.
//! The lit pass samples the cubemap with the fragment-to-light vector. The
//! light slowly circles the scene.
//!
//! Drag with the left mouse button to orbit, scroll to zoom.
//! Press <escape> to quit or close the window.

mod common;

use cgmath::{Deg, Matrix4, Point3, Vector3};
use common::OrbitCamera;
use glfw::Key;
use glint::{
  AttribKind, BufferUsage, FramebufferMode, GfxContext, Primitive, VertexAttrib, VertexLayout,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const DEPTH_VS: &str = include_str!("point-depth-vs.glsl");
const DEPTH_GS: &str = include_str!("point-depth-gs.glsl");
const DEPTH_FS: &str = include_str!("point-depth-fs.glsl");
const LIT_VS: &str = include_str!("point-lit-vs.glsl");
const LIT_FS: &str = include_str!("point-lit-fs.glsl");

const SHADOW_SIZE: u32 = 1024;
const FAR_PLANE: f32 = 25.;

// view directions and up vectors for the six cubemap faces, +X -X +Y -Y +Z -Z
const FACES: [([f32; 3], [f32; 3]); 6] = [
  ([1., 0., 0.], [0., -1., 0.]),
  ([-1., 0., 0.], [0., -1., 0.]),
  ([0., 1., 0.], [0., 0., 1.]),
  ([0., -1., 0.], [0., 0., -1.]),
  ([0., 0., 1.], [0., -1., 0.]),
  ([0., 0., -1.], [0., -1., 0.]),
];

fn shadow_matrices(light_pos: Point3<f32>) -> [Matrix4<f32>; 6] {
  let projection = cgmath::perspective(Deg(90.), 1., 0.1, FAR_PLANE);

  FACES.map(|(dir, up)| {
    let view = Matrix4::look_at_rh(
      light_pos,
      light_pos + Vector3::from(dir),
      Vector3::from(up),
    );

    projection * view
  })
}

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint point shadows", 960, 540).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
  layout.push(VertexAttrib::new(AttribKind::Vec3, "NORMAL"));
  layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

  let cube_buffer = gfx
    .new_vertex_buffer(&common::cube_vertices(), BufferUsage::Static)
    .expect("vertex buffer creation");
  let cube = gfx.new_mesh(cube_buffer, &layout).expect("mesh creation");

  let ground_buffer = gfx
    .new_vertex_buffer(&common::ground_vertices(8., -0.5), BufferUsage::Static)
    .expect("vertex buffer creation");
  let ground = gfx.new_mesh(ground_buffer, &layout).expect("mesh creation");

  let depth_program = gfx
    .new_program_with_geometry(DEPTH_VS, DEPTH_GS, DEPTH_FS)
    .expect("program creation");
  let lit_program = gfx.new_program(LIT_VS, LIT_FS).expect("program creation");

  let shadow_target = gfx
    .new_framebuffer(SHADOW_SIZE, SHADOW_SIZE, FramebufferMode::DepthCubemap)
    .expect("framebuffer creation");

  let models = vec![
    (Matrix4::from_translation(Vector3::new(0., 0., 0.)), [0.9f32, 0.45, 0.2]),
    (
      Matrix4::from_translation(Vector3::new(2., -0.1, -1.4)) * Matrix4::from_scale(0.7),
      [0.3, 0.65, 0.4],
    ),
    (
      Matrix4::from_translation(Vector3::new(-1.8, 0.4, 1.6)) * Matrix4::from_scale(0.9),
      [0.35, 0.5, 0.85],
    ),
    (
      Matrix4::from_translation(Vector3::new(-0.4, 1.3, -2.)) * Matrix4::from_scale(0.5),
      [0.8, 0.75, 0.3],
    ),
  ];

  let camera = Rc::new(RefCell::new(OrbitCamera::new(8.)));

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

  let start = Instant::now();

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    let t = start.elapsed().as_secs_f32() * 0.4;
    let light_pos = Point3::new(t.cos() * 3., 2.2, t.sin() * 3.);
    let light_pos_arr = [light_pos.x, light_pos.y, light_pos.z];

    // pass one: linear depth into all six cubemap faces
    shadow_target.bind();
    gfx.set_viewport(SHADOW_SIZE, SHADOW_SIZE);
    gfx.clear();
    gfx.bind_program(&depth_program);

    for (face, matrix) in shadow_matrices(light_pos).iter().enumerate() {
      let name = format!("u_shadow_matrices[{}]", face);
      gfx.set_uniform_mat4(&depth_program, &name, (*matrix).into());
    }

    gfx.set_uniform_vec3(&depth_program, "u_light_pos", light_pos_arr);
    gfx.set_uniform_f32(&depth_program, "u_far_plane", FAR_PLANE);

    for (model, _) in &models {
      gfx.set_uniform_mat4(&depth_program, "u_model", (*model).into());
      gfx.draw(&cube, Primitive::Triangles, 36);
    }

    gfx.set_uniform_mat4(&depth_program, "u_model", Matrix4::from_scale(1.).into());
    gfx.draw(&ground, Primitive::Triangles, 6);

    shadow_target.unbind();

    // pass two: lit scene sampling the cubemap
    let (width, height) = gfx.framebuffer_size();
    gfx.set_viewport(width, height);
    gfx.set_clear_color([0.07, 0.07, 0.09, 1.]);
    gfx.clear();

    let camera = camera.borrow();
    let view_projection = common::projection(width, height) * camera.view();

    gfx.bind_program(&lit_program);
    gfx.bind_framebuffer_texture(&shadow_target);
    gfx.set_uniform_i32(&lit_program, "u_depth_cube", 0);
    gfx.set_uniform_vec3(&lit_program, "u_light_pos", light_pos_arr);
    gfx.set_uniform_f32(&lit_program, "u_far_plane", FAR_PLANE);

    for (model, color) in &models {
      gfx.set_uniform_mat4(&lit_program, "u_mvp", (view_projection * *model).into());
      gfx.set_uniform_mat4(&lit_program, "u_model", (*model).into());
      gfx.set_uniform_vec3(&lit_program, "u_color", *color);
      gfx.draw(&cube, Primitive::Triangles, 36);
    }

    gfx.set_uniform_mat4(&lit_program, "u_mvp", view_projection.into());
    gfx.set_uniform_mat4(&lit_program, "u_model", Matrix4::from_scale(1.).into());
    gfx.set_uniform_vec3(&lit_program, "u_color", [0.55, 0.55, 0.6]);
    gfx.draw(&ground, Primitive::Triangles, 6);
  });

  gfx.run();
}
