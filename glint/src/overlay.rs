//! Immediate-mode UI overlay.
//!
//! The overlay composites an [`egui`] layer on top of whatever the render
//! callback drew. The context owns one overlay, feeds it the window events it
//! polls, opens a UI frame before the render callback and paints the
//! accumulated shapes after it. Render callbacks reach the overlay through
//! [`crate::GfxContext::overlay`] and build panels with plain egui calls.
//!
//! Painting happens through [`egui_glow`] on a [`glow`] context that shares
//! the window's proc-address loader with the rest of the crate.

use glfw::WindowEvent;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::sync::Arc;
use std::time::Instant;

/// Error that might happen while creating the overlay.
#[non_exhaustive]
#[derive(Debug)]
pub enum OverlayError {
  /// The painter could not be set up on the current GL context.
  Painter(String),
}

impl fmt::Display for OverlayError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      OverlayError::Painter(reason) => write!(f, "cannot create overlay painter: {}", reason),
    }
  }
}

impl error::Error for OverlayError {}

pub(crate) struct Overlay {
  ctx: egui::Context,
  painter: egui_glow::Painter,
  input: egui::RawInput,
  start: Instant,
  pointer: egui::Pos2,
  modifiers: egui::Modifiers,
  scale: f32,
}

impl Overlay {
  pub(crate) fn new(window: &mut glfw::Window) -> Result<Self, OverlayError> {
    let glow_ctx = unsafe {
      glow::Context::from_loader_function(|s| window.get_proc_address(s) as *const c_void)
    };

    let painter = egui_glow::Painter::new(Arc::new(glow_ctx), "", None)
      .map_err(|e| OverlayError::Painter(e.to_string()))?;

    let scale = window.get_content_scale().0;
    let ctx = egui::Context::default();
    ctx.set_pixels_per_point(scale);

    Ok(Overlay {
      ctx,
      painter,
      input: egui::RawInput::default(),
      start: Instant::now(),
      pointer: egui::Pos2::ZERO,
      modifiers: egui::Modifiers::default(),
      scale,
    })
  }

  pub(crate) fn egui_ctx(&self) -> &egui::Context {
    &self.ctx
  }

  /// Whether the overlay currently claims pointer events (a panel is hovered
  /// or dragged).
  pub(crate) fn wants_pointer(&self) -> bool {
    self.ctx.wants_pointer_input()
  }

  /// Translate one window event into overlay input.
  pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
    match *event {
      WindowEvent::CursorPos(x, y) => {
        self.pointer = egui::pos2(x as f32 / self.scale, y as f32 / self.scale);
        self.input.events.push(egui::Event::PointerMoved(self.pointer));
      }

      WindowEvent::MouseButton(button, action, mods) => {
        self.modifiers = translate_modifiers(mods);

        if let Some(button) = translate_mouse_button(button) {
          self.input.events.push(egui::Event::PointerButton {
            pos: self.pointer,
            button,
            pressed: action == glfw::Action::Press,
            modifiers: self.modifiers,
          });
        }
      }

      WindowEvent::Scroll(x, y) => {
        self.input.events.push(egui::Event::MouseWheel {
          unit: egui::MouseWheelUnit::Line,
          delta: egui::vec2(x as f32, y as f32),
          modifiers: self.modifiers,
        });
      }

      WindowEvent::Char(c) => {
        if !c.is_control() {
          self.input.events.push(egui::Event::Text(c.to_string()));
        }
      }

      WindowEvent::Key(key, _, action, mods) => {
        self.modifiers = translate_modifiers(mods);

        if let Some(key) = translate_key(key) {
          self.input.events.push(egui::Event::Key {
            key,
            physical_key: None,
            pressed: action != glfw::Action::Release,
            repeat: action == glfw::Action::Repeat,
            modifiers: self.modifiers,
          });
        }
      }

      WindowEvent::ContentScale(x, _) => {
        self.scale = x;
        self.ctx.set_pixels_per_point(x);
      }

      _ => (),
    }
  }

  /// Open the UI frame the render callback will add panels to.
  pub(crate) fn begin_frame(&mut self, width: u32, height: u32) {
    let mut input = self.input.take();

    input.screen_rect = Some(egui::Rect::from_min_size(
      egui::Pos2::ZERO,
      egui::vec2(width as f32, height as f32) / self.scale,
    ));
    input.time = Some(self.start.elapsed().as_secs_f64());

    self.ctx.begin_frame(input);
  }

  /// Close the UI frame and composite it over the rendered scene.
  pub(crate) fn end_frame_and_paint(&mut self, width: u32, height: u32) {
    let output = self.ctx.end_frame();
    let pixels_per_point = output.pixels_per_point;
    let primitives = self.ctx.tessellate(output.shapes, pixels_per_point);

    self.painter.paint_and_update_textures(
      [width, height],
      pixels_per_point,
      &primitives,
      &output.textures_delta,
    );
  }

  /// Release the painter's GPU objects. Must run while the GL context is
  /// still current.
  pub(crate) fn destroy(&mut self) {
    self.painter.destroy();
  }
}

fn translate_mouse_button(button: glfw::MouseButton) -> Option<egui::PointerButton> {
  match button {
    glfw::MouseButton::Button1 => Some(egui::PointerButton::Primary),
    glfw::MouseButton::Button2 => Some(egui::PointerButton::Secondary),
    glfw::MouseButton::Button3 => Some(egui::PointerButton::Middle),
    _ => None,
  }
}

fn translate_modifiers(mods: glfw::Modifiers) -> egui::Modifiers {
  egui::Modifiers {
    alt: mods.contains(glfw::Modifiers::Alt),
    ctrl: mods.contains(glfw::Modifiers::Control),
    shift: mods.contains(glfw::Modifiers::Shift),
    mac_cmd: false,
    command: mods.contains(glfw::Modifiers::Control),
  }
}

// The practical subset: navigation and text editing. Anything else only
// matters to applications the overlay is not meant for.
fn translate_key(key: glfw::Key) -> Option<egui::Key> {
  let key = match key {
    glfw::Key::Enter => egui::Key::Enter,
    glfw::Key::Tab => egui::Key::Tab,
    glfw::Key::Backspace => egui::Key::Backspace,
    glfw::Key::Delete => egui::Key::Delete,
    glfw::Key::Escape => egui::Key::Escape,
    glfw::Key::Space => egui::Key::Space,
    glfw::Key::Left => egui::Key::ArrowLeft,
    glfw::Key::Right => egui::Key::ArrowRight,
    glfw::Key::Up => egui::Key::ArrowUp,
    glfw::Key::Down => egui::Key::ArrowDown,
    glfw::Key::Home => egui::Key::Home,
    glfw::Key::End => egui::Key::End,
    glfw::Key::PageUp => egui::Key::PageUp,
    glfw::Key::PageDown => egui::Key::PageDown,
    glfw::Key::A => egui::Key::A,
    glfw::Key::C => egui::Key::C,
    glfw::Key::V => egui::Key::V,
    glfw::Key::X => egui::Key::X,
    glfw::Key::Z => egui::Key::Z,
    _ => return None,
  };

  Some(key)
}
