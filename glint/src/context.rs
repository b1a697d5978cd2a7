//! The graphics context facade.
//!
//! [`GfxContext`] is the entry point of the crate: it creates the window and
//! the GL context, registers lifecycle callbacks, owns the render loop and
//! hands out every GPU resource. One context per process is the intended
//! usage; creating a second one on the same thread fails.

use gl::types::*;
use glfw::{Context as _, Glfw, Window, WindowEvent, WindowHint};
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::ptr::null;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use crate::buffer::{BufferError, BufferUsage, IndexBuffer, VertexBuffer};
use crate::framebuffer::{Framebuffer, FramebufferError, FramebufferMode};
use crate::image::Image;
use crate::mesh::{opengl_primitive, Mesh, MeshError, Primitive};
use crate::overlay::{Overlay, OverlayError};
use crate::shader::{Program, ProgramError};
use crate::state::{Bind, GlState, StateQueryError};
use crate::texture::{Sampler, Texture, TextureError};
use crate::vertex::VertexLayout;
use crate::volume::Volume;

/// Global render toggles.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RenderOption {
  DepthTest,
  Blending,
  FaceCulling,
  Multisample,
}

/// Error that can be risen while creating a context.
#[non_exhaustive]
#[derive(Debug)]
pub enum ContextError {
  /// Initialization of the windowing toolkit went wrong.
  Init(glfw::InitError),

  /// The window or its GL context could not be created.
  WindowCreation,

  /// The graphics state is not available on this thread.
  State(StateQueryError),

  /// The UI overlay could not be set up.
  Overlay(OverlayError),
}

impl fmt::Display for ContextError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      ContextError::Init(e) => write!(f, "initialization error: {}", e),
      ContextError::WindowCreation => f.write_str("cannot create window"),
      ContextError::State(e) => write!(f, "failed to get graphics state: {}", e),
      ContextError::Overlay(e) => write!(f, "failed to set up overlay: {}", e),
    }
  }
}

impl error::Error for ContextError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ContextError::Init(e) => Some(e),
      ContextError::State(e) => Some(e),
      ContextError::Overlay(e) => Some(e),
      _ => None,
    }
  }
}

impl From<glfw::InitError> for ContextError {
  fn from(e: glfw::InitError) -> Self {
    ContextError::Init(e)
  }
}

impl From<StateQueryError> for ContextError {
  fn from(e: StateQueryError) -> Self {
    ContextError::State(e)
  }
}

impl From<OverlayError> for ContextError {
  fn from(e: OverlayError) -> Self {
    ContextError::Overlay(e)
  }
}

// One optional handler per lifecycle event; registering replaces the previous
// handler.
#[derive(Default)]
struct Callbacks {
  init: Option<Box<dyn FnMut(&mut GfxContext)>>,
  render: Option<Box<dyn FnMut(&mut GfxContext)>>,
  resize: Option<Box<dyn FnMut(&mut GfxContext, u32, u32)>>,
  mouse_move: Option<Box<dyn FnMut(&mut GfxContext, f64, f64)>>,
  mouse_scroll: Option<Box<dyn FnMut(&mut GfxContext, f64, f64)>>,
  mouse_button: Option<Box<dyn FnMut(&mut GfxContext, glfw::MouseButton, glfw::Action, glfw::Modifiers)>>,
}

/// The graphics context: window, GL state, callbacks and the render loop.
pub struct GfxContext {
  glfw: Glfw,
  window: Window,
  events_rx: Receiver<(f64, WindowEvent)>,
  state: Rc<RefCell<GlState>>,
  overlay: Overlay,
  callbacks: Callbacks,
}

impl GfxContext {
  /// Create a window with a live GL 3.3 core context, load the GL functions
  /// and set up the UI overlay.
  ///
  /// Default global state: depth test, blending and multisampling enabled,
  /// vsync on.
  pub fn new(title: &str, width: u32, height: u32) -> Result<Self, ContextError> {
    let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS)?;

    glfw.window_hint(WindowHint::ContextVersionMajor(3));
    glfw.window_hint(WindowHint::ContextVersionMinor(3));
    glfw.window_hint(WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
    glfw.window_hint(WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(WindowHint::Samples(Some(8)));

    let (mut window, events_rx) = glfw
      .create_window(width, height, title, glfw::WindowMode::Windowed)
      .ok_or(ContextError::WindowCreation)?;

    window.make_current();
    window.set_all_polling(true);
    glfw.set_swap_interval(glfw::SwapInterval::Sync(1));

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let state = Rc::new(RefCell::new(GlState::new()?));
    let overlay = Overlay::new(&mut window)?;

    {
      let mut st = state.borrow_mut();

      unsafe {
        st.set_texture_unit(0);
        st.set_depth_test(true);
        st.set_blending(true);
        st.set_multisample(true);
        st.set_clear_color([0., 0.67, 0.9, 1.]);
      }
    }

    Ok(GfxContext {
      glfw,
      window,
      events_rx,
      state,
      overlay,
      callbacks: Callbacks::default(),
    })
  }

  // ---------------------------------------------------------------- callbacks

  /// Register the handler invoked once, right before the loop starts.
  pub fn on_init(&mut self, f: impl FnMut(&mut GfxContext) + 'static) {
    self.callbacks.init = Some(Box::new(f));
  }

  /// Register the handler invoked once per frame.
  pub fn on_render(&mut self, f: impl FnMut(&mut GfxContext) + 'static) {
    self.callbacks.render = Some(Box::new(f));
  }

  /// Register the handler invoked when the framebuffer changes size.
  ///
  /// The viewport is updated to the new size before the handler runs.
  pub fn on_resize(&mut self, f: impl FnMut(&mut GfxContext, u32, u32) + 'static) {
    self.callbacks.resize = Some(Box::new(f));
  }

  /// Register the handler invoked when the cursor moves.
  pub fn on_mouse_move(&mut self, f: impl FnMut(&mut GfxContext, f64, f64) + 'static) {
    self.callbacks.mouse_move = Some(Box::new(f));
  }

  /// Register the handler invoked on scroll, unless the overlay claims the
  /// pointer.
  pub fn on_mouse_scroll(&mut self, f: impl FnMut(&mut GfxContext, f64, f64) + 'static) {
    self.callbacks.mouse_scroll = Some(Box::new(f));
  }

  /// Register the handler invoked on mouse press/release, unless the overlay
  /// claims the pointer.
  pub fn on_mouse_button(
    &mut self,
    f: impl FnMut(&mut GfxContext, glfw::MouseButton, glfw::Action, glfw::Modifiers) + 'static,
  ) {
    self.callbacks.mouse_button = Some(Box::new(f));
  }

  // --------------------------------------------------------------- run loops

  /// Run the render loop until the window is closed.
  ///
  /// The init handler runs exactly once, then every iteration polls input,
  /// dispatches resize/mouse handlers, opens an overlay frame, runs the
  /// render handler, composites the overlay and swaps buffers.
  pub fn run(&mut self) {
    self.dispatch_init();

    while !self.window.should_close() {
      self.glfw.poll_events();
      let events: Vec<(f64, WindowEvent)> = self.events_rx.try_iter().collect();

      for (_, event) in events {
        self.overlay.handle_event(&event);

        match event {
          WindowEvent::FramebufferSize(w, h) => {
            let (w, h) = (w.max(0) as u32, h.max(0) as u32);
            self.set_viewport(w, h);
            self.dispatch_resize(w, h);
          }

          WindowEvent::CursorPos(x, y) => {
            self.dispatch_mouse_move(x, y);
          }

          WindowEvent::Scroll(x, y) => {
            if !self.overlay.wants_pointer() {
              self.dispatch_mouse_scroll(x, y);
            }
          }

          WindowEvent::MouseButton(button, action, mods) => {
            if !self.overlay.wants_pointer() {
              self.dispatch_mouse_button(button, action, mods);
            }
          }

          _ => (),
        }
      }

      let (width, height) = self.framebuffer_size();

      self.overlay.begin_frame(width, height);
      self.dispatch_render();
      self.overlay.end_frame_and_paint(width, height);

      // the overlay painter works around the state cache
      unsafe {
        gl::Disable(gl::SCISSOR_TEST);
      }
      self.state.borrow_mut().invalidate_after_external_draw();

      self.window.swap_buffers();
    }
  }

  /// Legacy loop variant driven by three plain functions, without the UI
  /// overlay.
  ///
  /// `init` runs once; every frame polls input, runs `input` and `render`,
  /// and swaps buffers. Resize events still update the viewport.
  pub fn run_bare<I, N, R>(&mut self, mut init: I, mut input: N, mut render: R)
  where
    I: FnMut(&mut GfxContext),
    N: FnMut(&mut GfxContext),
    R: FnMut(&mut GfxContext),
  {
    init(self);

    while !self.window.should_close() {
      self.glfw.poll_events();
      let events: Vec<(f64, WindowEvent)> = self.events_rx.try_iter().collect();

      for (_, event) in events {
        if let WindowEvent::FramebufferSize(w, h) = event {
          self.set_viewport(w.max(0) as u32, h.max(0) as u32);
        }
      }

      input(self);
      render(self);

      self.window.swap_buffers();
    }
  }

  fn dispatch_init(&mut self) {
    if let Some(mut cb) = self.callbacks.init.take() {
      cb(self);

      if self.callbacks.init.is_none() {
        self.callbacks.init = Some(cb);
      }
    }
  }

  fn dispatch_render(&mut self) {
    if let Some(mut cb) = self.callbacks.render.take() {
      cb(self);

      if self.callbacks.render.is_none() {
        self.callbacks.render = Some(cb);
      }
    }
  }

  fn dispatch_resize(&mut self, width: u32, height: u32) {
    if let Some(mut cb) = self.callbacks.resize.take() {
      cb(self, width, height);

      if self.callbacks.resize.is_none() {
        self.callbacks.resize = Some(cb);
      }
    }
  }

  fn dispatch_mouse_move(&mut self, x: f64, y: f64) {
    if let Some(mut cb) = self.callbacks.mouse_move.take() {
      cb(self, x, y);

      if self.callbacks.mouse_move.is_none() {
        self.callbacks.mouse_move = Some(cb);
      }
    }
  }

  fn dispatch_mouse_scroll(&mut self, x: f64, y: f64) {
    if let Some(mut cb) = self.callbacks.mouse_scroll.take() {
      cb(self, x, y);

      if self.callbacks.mouse_scroll.is_none() {
        self.callbacks.mouse_scroll = Some(cb);
      }
    }
  }

  fn dispatch_mouse_button(
    &mut self,
    button: glfw::MouseButton,
    action: glfw::Action,
    mods: glfw::Modifiers,
  ) {
    if let Some(mut cb) = self.callbacks.mouse_button.take() {
      cb(self, button, action, mods);

      if self.callbacks.mouse_button.is_none() {
        self.callbacks.mouse_button = Some(cb);
      }
    }
  }

  // ---------------------------------------------------------------- queries

  /// The overlay's UI context; build panels on it from the render handler.
  pub fn overlay(&self) -> &egui::Context {
    self.overlay.egui_ctx()
  }

  /// Current cursor position in window coordinates.
  pub fn mouse_position(&self) -> (f64, f64) {
    self.window.get_cursor_pos()
  }

  /// Whether a keyboard key is currently held down.
  pub fn key_pressed(&self, key: glfw::Key) -> bool {
    self.window.get_key(key) == glfw::Action::Press
  }

  /// Ask the loop to terminate after the current frame.
  pub fn request_close(&mut self) {
    self.window.set_should_close(true);
  }

  /// Size of the drawable framebuffer in pixels.
  pub fn framebuffer_size(&self) -> (u32, u32) {
    let (w, h) = self.window.get_framebuffer_size();
    (w.max(0) as u32, h.max(0) as u32)
  }

  // ----------------------------------------------------------- global state

  /// Set the color the color buffer clears to.
  pub fn set_clear_color(&mut self, color: [f32; 4]) {
    unsafe {
      self.state.borrow_mut().set_clear_color(color);
    }
  }

  /// Clear the color and depth buffers of the bound target.
  pub fn clear(&mut self) {
    unsafe {
      gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    }
  }

  /// Set the rendering viewport to `(0, 0, width, height)`.
  ///
  /// Needed when switching between render targets of different sizes.
  pub fn set_viewport(&mut self, width: u32, height: u32) {
    unsafe {
      self
        .state
        .borrow_mut()
        .set_viewport([0, 0, width as GLint, height as GLint]);
    }
  }

  pub fn enable(&mut self, option: RenderOption) {
    self.toggle(option, true);
  }

  pub fn disable(&mut self, option: RenderOption) {
    self.toggle(option, false);
  }

  fn toggle(&mut self, option: RenderOption, enabled: bool) {
    let mut state = self.state.borrow_mut();

    unsafe {
      match option {
        RenderOption::DepthTest => state.set_depth_test(enabled),
        RenderOption::Blending => state.set_blending(enabled),
        RenderOption::FaceCulling => state.set_face_culling(enabled),
        RenderOption::Multisample => state.set_multisample(enabled),
      }
    }
  }

  // ------------------------------------------------------ resource creation

  /// Upload packed vertex records into a new vertex buffer.
  pub fn new_vertex_buffer<V>(
    &mut self,
    vertices: &[V],
    usage: BufferUsage,
  ) -> Result<VertexBuffer, BufferError>
  where
    V: Copy,
  {
    VertexBuffer::new(&self.state, vertices, usage)
  }

  /// Upload `u32` indices into a new index buffer.
  pub fn new_index_buffer(
    &mut self,
    indices: &[u32],
    usage: BufferUsage,
  ) -> Result<IndexBuffer, BufferError> {
    IndexBuffer::new(&self.state, indices, usage)
  }

  /// Tie a vertex buffer and a layout into a drawable mesh.
  pub fn new_mesh(
    &mut self,
    vertex_buffer: VertexBuffer,
    layout: &VertexLayout,
  ) -> Result<Mesh, MeshError> {
    Mesh::new(&self.state, vertex_buffer, None, layout)
  }

  /// Tie a vertex buffer, an index buffer and a layout into a drawable mesh.
  pub fn new_indexed_mesh(
    &mut self,
    vertex_buffer: VertexBuffer,
    index_buffer: IndexBuffer,
    layout: &VertexLayout,
  ) -> Result<Mesh, MeshError> {
    Mesh::new(&self.state, vertex_buffer, Some(index_buffer), layout)
  }

  /// Upload a single-row image as a 1D texture.
  pub fn new_texture_1d(
    &mut self,
    image: &Image,
    sampler: &Sampler,
  ) -> Result<Texture, TextureError> {
    Texture::new_1d(&self.state, image, sampler)
  }

  /// Upload an image as a 2D texture.
  pub fn new_texture_2d(
    &mut self,
    image: &Image,
    sampler: &Sampler,
    mipmaps: bool,
  ) -> Result<Texture, TextureError> {
    Texture::new_2d(&self.state, image, sampler, mipmaps)
  }

  /// Upload a volume as a single-channel `f32` 3D texture.
  pub fn new_texture_3d(
    &mut self,
    volume: &Volume,
    sampler: &Sampler,
    mipmaps: bool,
  ) -> Result<Texture, TextureError> {
    Texture::new_3d(&self.state, volume, sampler, mipmaps)
  }

  /// Upload a volume's central-difference gradient field as a 3-channel
  /// `f32` 3D texture.
  pub fn new_gradient_texture_3d(
    &mut self,
    volume: &Volume,
    sampler: &Sampler,
  ) -> Result<Texture, TextureError> {
    Texture::new_3d_gradients(&self.state, volume, sampler)
  }

  /// Compile and link a vertex + fragment program.
  pub fn new_program(
    &mut self,
    vertex_src: &str,
    fragment_src: &str,
  ) -> Result<Program, ProgramError> {
    Program::from_sources(vertex_src, None, fragment_src)
  }

  /// Compile and link a vertex + geometry + fragment program.
  pub fn new_program_with_geometry(
    &mut self,
    vertex_src: &str,
    geometry_src: &str,
    fragment_src: &str,
  ) -> Result<Program, ProgramError> {
    Program::from_sources(vertex_src, Some(geometry_src), fragment_src)
  }

  /// Create an off-screen render target.
  pub fn new_framebuffer(
    &mut self,
    width: u32,
    height: u32,
    mode: FramebufferMode,
  ) -> Result<Framebuffer, FramebufferError> {
    Framebuffer::new(&self.state, width, height, mode)
  }

  // --------------------------------------------------------- binding / draw

  /// Make a program current.
  pub fn bind_program(&mut self, program: &Program) {
    unsafe {
      self.state.borrow_mut().use_program(program.handle());
    }
  }

  /// Bind a texture to texture unit 0.
  pub fn bind_texture(&mut self, texture: &Texture) {
    self.bind_texture_at(texture, 0);
  }

  /// Bind a texture to the given texture unit.
  pub fn bind_texture_at(&mut self, texture: &Texture, unit: u32) {
    let mut state = self.state.borrow_mut();

    unsafe {
      state.set_texture_unit(unit);
      state.bind_texture(texture.target(), texture.handle());
    }
  }

  /// Bind a framebuffer's color (or depth) attachment to texture unit 0 for
  /// sampling.
  pub fn bind_framebuffer_texture(&mut self, framebuffer: &Framebuffer) {
    self.bind_framebuffer_texture_at(framebuffer, 0);
  }

  /// Bind a framebuffer's color (or depth) attachment to the given texture
  /// unit for sampling.
  pub fn bind_framebuffer_texture_at(&mut self, framebuffer: &Framebuffer, unit: u32) {
    let mut state = self.state.borrow_mut();

    unsafe {
      state.set_texture_unit(unit);
      state.bind_texture(framebuffer.texture_target(), framebuffer.texture_handle());
    }
  }

  /// Issue a non-indexed draw of `vertex_count` vertices from a mesh.
  pub fn draw(&mut self, mesh: &Mesh, primitive: Primitive, vertex_count: u32) {
    unsafe {
      self.state.borrow_mut().bind_vertex_array(mesh.vao(), Bind::Cached);
      gl::DrawArrays(opengl_primitive(primitive), 0, vertex_count as GLsizei);
    }
  }

  /// Issue an indexed draw of `index_count` `u32` indices from offset zero.
  ///
  /// [`Primitive::TriangleStrip`] is only available to non-indexed draws; it
  /// is skipped with a warning here.
  pub fn draw_indexed(&mut self, mesh: &Mesh, primitive: Primitive, index_count: u32) {
    if primitive == Primitive::TriangleStrip {
      log::warn!("indexed draws do not support triangle strips; draw call skipped");
      return;
    }

    unsafe {
      self.state.borrow_mut().bind_vertex_array(mesh.vao(), Bind::Cached);
      gl::DrawElements(
        opengl_primitive(primitive),
        index_count as GLsizei,
        gl::UNSIGNED_INT,
        null(),
      );
    }
  }

  // ---------------------------------------------------------------- uniforms

  /// Set a `float` uniform by name.
  ///
  /// A name with no active uniform in the program logs a warning and leaves
  /// the program untouched; same for every other setter.
  pub fn set_uniform_f32(&mut self, program: &Program, name: &str, value: f32) {
    self.with_uniform(program, name, |location| unsafe {
      gl::Uniform1f(location, value);
    });
  }

  /// Set an `int` (or sampler binding) uniform by name.
  pub fn set_uniform_i32(&mut self, program: &Program, name: &str, value: i32) {
    self.with_uniform(program, name, |location| unsafe {
      gl::Uniform1i(location, value);
    });
  }

  /// Set a `vec2` uniform by name.
  pub fn set_uniform_vec2(&mut self, program: &Program, name: &str, value: [f32; 2]) {
    self.with_uniform(program, name, |location| unsafe {
      gl::Uniform2fv(location, 1, value.as_ptr());
    });
  }

  /// Set a `vec3` uniform by name.
  pub fn set_uniform_vec3(&mut self, program: &Program, name: &str, value: [f32; 3]) {
    self.with_uniform(program, name, |location| unsafe {
      gl::Uniform3fv(location, 1, value.as_ptr());
    });
  }

  /// Set a `mat4` uniform by name (column-major).
  pub fn set_uniform_mat4(&mut self, program: &Program, name: &str, value: [[f32; 4]; 4]) {
    self.with_uniform(program, name, |location| unsafe {
      gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr() as *const f32);
    });
  }

  fn with_uniform(&mut self, program: &Program, name: &str, set: impl FnOnce(GLint)) {
    unsafe {
      self.state.borrow_mut().use_program(program.handle());
    }

    match program.uniform_location(name) {
      Some(location) => set(location),
      None => log::warn!("uniform {:?} is not active in the bound program", name),
    }
  }
}

impl Drop for GfxContext {
  fn drop(&mut self) {
    self.overlay.destroy();
  }
}
