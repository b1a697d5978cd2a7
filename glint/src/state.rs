//! Graphics state cache.
//!
//! OpenGL is a big bag of global mutable state. [`GlState`] sits between the
//! rest of the crate and the driver and remembers the last value written for
//! every binding point we use, so that redundant `glBind*` / `glEnable` calls
//! are skipped. Every GPU resource type holds an `Rc<RefCell<GlState>>` back
//! to the state of the context it was created in.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GlState`.
//
// Only one graphics state may exist per thread; the cache would silently
// diverge from the driver otherwise.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costy GPU commands if we know the
/// target value is already set. An empty cache is always invalid, so the first
/// write after creation or invalidation always reaches the driver.
#[derive(Debug)]
struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  /// An unknown value; the next set always goes through.
  fn unknown() -> Self {
    Cached(None)
  }

  /// Explicitly invalidate a value.
  ///
  /// This is necessary when foreign GL code might have written the binding
  /// behind our back.
  fn invalidate(&mut self) {
    self.0 = None;
  }

  fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(t) => t != new_val,
      _ => true,
    }
  }
}

/// Should the binding be cached or forced to the provided value?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

/// The graphics state of one context.
#[derive(Debug)]
pub struct GlState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // object bindings
  bound_array_buffer: GLuint,
  bound_element_array_buffer: GLuint,
  bound_vertex_array: GLuint,
  bound_draw_framebuffer: Cached<GLuint>,
  current_program: GLuint,

  // texture units
  current_texture_unit: Cached<u32>,
  bound_textures: Vec<(GLenum, GLuint)>,

  // clear color / viewport
  clear_color: Cached<[GLfloat; 4]>,
  viewport: Cached<[GLint; 4]>,

  // capability toggles
  depth_test: Cached<bool>,
  blending: Cached<bool>,
  face_culling: Cached<bool>,
  multisample: Cached<bool>,
}

impl GlState {
  /// Create a new `GlState`.
  ///
  /// Only one may exist per thread; a second acquisition fails with
  /// [`StateQueryError::UnavailableState`].
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Ok(Self::fresh())
        }

        None => Err(StateQueryError::UnavailableState),
      }
    })
  }

  fn fresh() -> Self {
    GlState {
      _a: PhantomData,
      bound_array_buffer: 0,
      bound_element_array_buffer: 0,
      bound_vertex_array: 0,
      bound_draw_framebuffer: Cached::unknown(),
      current_program: 0,
      current_texture_unit: Cached::unknown(),
      bound_textures: vec![(gl::TEXTURE_2D, 0); 48], // 48 is the platform minimal requirement
      clear_color: Cached::unknown(),
      viewport: Cached::unknown(),
      depth_test: Cached::unknown(),
      blending: Cached::unknown(),
      face_culling: Cached::unknown(),
      multisample: Cached::unknown(),
    }
  }

  pub(crate) unsafe fn bind_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_array_buffer != handle {
      gl::BindBuffer(gl::ARRAY_BUFFER, handle);
      self.bound_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn bind_element_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_element_array_buffer != handle {
      gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, handle);
      self.bound_element_array_buffer = handle;
    }
  }

  pub(crate) unsafe fn unbind_buffer(&mut self, handle: GLuint) {
    if self.bound_array_buffer == handle {
      self.bind_array_buffer(0, Bind::Cached);
    } else if self.bound_element_array_buffer == handle {
      self.bind_element_array_buffer(0, Bind::Cached);
    }
  }

  pub(crate) unsafe fn bind_vertex_array(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_vertex_array != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;
    }
  }

  pub(crate) unsafe fn unbind_vertex_array(&mut self) {
    self.bind_vertex_array(0, Bind::Cached)
  }

  pub(crate) unsafe fn bind_draw_framebuffer(&mut self, handle: GLuint) {
    if self.bound_draw_framebuffer.is_invalid(&handle) {
      gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, handle);
      self.bound_draw_framebuffer.set(handle);
    }
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) {
    if self.current_program != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }
  }

  pub(crate) unsafe fn set_texture_unit(&mut self, unit: u32) {
    if self.current_texture_unit.is_invalid(&unit) {
      gl::ActiveTexture(gl::TEXTURE0 + unit);
      self.current_texture_unit.set(unit);
    }
  }

  pub(crate) unsafe fn bind_texture(&mut self, target: GLenum, handle: GLuint) {
    let unit = self.current_texture_unit.0.unwrap_or(0) as usize;

    match self.bound_textures.get(unit).cloned() {
      Some((target_, handle_)) if target != target_ || handle != handle_ => {
        gl::BindTexture(target, handle);
        self.bound_textures[unit] = (target, handle);
      }

      None => {
        gl::BindTexture(target, handle);

        // not enough registered texture units; let's grow a bit more
        self.bound_textures.resize(unit + 1, (gl::TEXTURE_2D, 0));
        self.bound_textures[unit] = (target, handle);
      }

      _ => (), // cached
    }
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) {
    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) unsafe fn set_depth_test(&mut self, enabled: bool) {
    if self.depth_test.is_invalid(&enabled) {
      toggle(gl::DEPTH_TEST, enabled);
      self.depth_test.set(enabled);
    }
  }

  pub(crate) unsafe fn set_blending(&mut self, enabled: bool) {
    if self.blending.is_invalid(&enabled) {
      toggle(gl::BLEND, enabled);
      self.blending.set(enabled);
    }
  }

  pub(crate) unsafe fn set_face_culling(&mut self, enabled: bool) {
    if self.face_culling.is_invalid(&enabled) {
      toggle(gl::CULL_FACE, enabled);
      self.face_culling.set(enabled);
    }
  }

  pub(crate) unsafe fn set_multisample(&mut self, enabled: bool) {
    if self.multisample.is_invalid(&enabled) {
      toggle(gl::MULTISAMPLE, enabled);
      self.multisample.set(enabled);
    }
  }

  /// Invalidate the currently in-use draw framebuffer.
  pub(crate) fn invalidate_framebuffer(&mut self) {
    self.bound_draw_framebuffer.invalidate();
  }

  /// Invalidate everything foreign GL code may have touched.
  ///
  /// The UI overlay painter issues its own `glBind*` / `glEnable` calls
  /// without going through this cache, so after compositing the overlay the
  /// caches that overlap with its state writes must be emptied.
  pub(crate) fn invalidate_after_external_draw(&mut self) {
    self.bound_array_buffer = 0;
    self.bound_element_array_buffer = 0;
    self.bound_vertex_array = 0;
    self.current_program = 0;
    self.current_texture_unit.invalidate();
    self.blending.invalidate();

    for t in &mut self.bound_textures {
      *t = (gl::TEXTURE_2D, 0);
    }
  }
}

unsafe fn toggle(cap: GLenum, enabled: bool) {
  if enabled {
    gl::Enable(cap);
  } else {
    gl::Disable(cap);
  }
}

/// An error that might happen when the graphics state is acquired.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The graphics state is unavailable.
  ///
  /// That occurs when a second context is created on a thread that already
  /// owns one.
  UnavailableState,
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableState => write!(f, "unavailable graphics state"),
    }
  }
}

impl error::Error for StateQueryError {}
