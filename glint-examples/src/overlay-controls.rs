//! Drive the scene from the immediate-mode UI overlay.
//!
//! A side panel exposes a color picker for the triangle, a scale slider and
//! the clear color. The panel claims the pointer while hovered, so dragging a
//! slider never reaches the scene's mouse handlers.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::egui;
use glint::{AttribKind, BufferUsage, GfxContext, Primitive, VertexAttrib, VertexLayout};

const VS: &str = include_str!("overlay-controls-vs.glsl");
const FS: &str = include_str!("overlay-controls-fs.glsl");

const VERTICES: [f32; 9] = [
  -0.5, -0.5, 0., //
  0.5, -0.5, 0., //
  0., 0.5, 0., //
];

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint overlay", 960, 540).expect("context creation");

  let mut layout = VertexLayout::new();
  layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));

  let buffer = gfx
    .new_vertex_buffer(&VERTICES, BufferUsage::Static)
    .expect("vertex buffer creation");
  let mesh = gfx.new_mesh(buffer, &layout).expect("mesh creation");
  let program = gfx.new_program(VS, FS).expect("program creation");

  let mut triangle_color = [1f32, 0.5, 0.2];
  let mut clear_color = [0.1f32, 0.1, 0.12];
  let mut scale = 1f32;

  gfx.on_render(move |gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    egui::SidePanel::left("controls").show(gfx.overlay(), |ui| {
      ui.heading("controls");
      ui.color_edit_button_rgb(&mut triangle_color);
      ui.add(egui::Slider::new(&mut scale, 0.1..=2.).text("scale"));
      ui.separator();
      ui.color_edit_button_rgb(&mut clear_color);
    });

    gfx.set_clear_color([clear_color[0], clear_color[1], clear_color[2], 1.]);
    gfx.clear();

    gfx.bind_program(&program);
    gfx.set_uniform_vec3(&program, "u_color", triangle_color);
    gfx.set_uniform_f32(&program, "u_scale", scale);
    gfx.draw(&mesh, Primitive::Triangles, 3);
  });

  gfx.run();
}
