//! The smallest possible program: open a window, clear it every frame.
//!
//! Press <escape> to quit or close the window.

use glfw::Key;
use glint::GfxContext;

fn main() {
  env_logger::init();

  let mut gfx = GfxContext::new("glint window", 800, 600).expect("context creation");

  gfx.on_init(|gfx| {
    gfx.set_clear_color([0., 0.67, 0.9, 1.]);
  });

  gfx.on_render(|gfx| {
    if gfx.key_pressed(Key::Escape) {
      gfx.request_close();
    }

    gfx.clear();
  });

  gfx.run();
}
