//! Off-screen render targets.
//!
//! A [`Framebuffer`] owns a framebuffer object plus its attachments, in one of
//! three shapes:
//!
//! - [`FramebufferMode::Color`]: a color texture and a combined depth+stencil
//!   renderbuffer — the usual render-to-texture target.
//! - [`FramebufferMode::Depth`]: a depth-only 2D texture with color reads and
//!   writes disabled, as used for directional shadow mapping.
//! - [`FramebufferMode::DepthCubemap`]: six depth-only cubemap faces, as used
//!   for omnidirectional shadow mapping.
//!
//! Binding redirects all draws to the target; there is no bind stack, nested
//! bind/unbind is the caller's responsibility. Resizing destroys and recreates
//! every GPU object at the new size; previous contents are lost.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::ptr::null;
use std::rc::Rc;

use crate::state::GlState;

/// Which attachments an off-screen target owns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FramebufferMode {
  /// Color texture plus depth+stencil renderbuffer.
  Color,

  /// Depth-only 2D texture; color draw/read disabled.
  Depth,

  /// Depth-only cubemap; color draw/read disabled.
  DepthCubemap,
}

/// Reason a framebuffer might be incomplete.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IncompleteReason {
  Undefined,
  IncompleteAttachment,
  MissingAttachment,
  IncompleteDrawBuffer,
  IncompleteReadBuffer,
  Unsupported,
  IncompleteMultisample,
  IncompleteLayerTargets,
  /// A status this crate does not know about.
  Unknown(u32),
}

impl fmt::Display for IncompleteReason {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      IncompleteReason::Undefined => f.write_str("default framebuffer does not exist"),
      IncompleteReason::IncompleteAttachment => f.write_str("incomplete attachment"),
      IncompleteReason::MissingAttachment => f.write_str("missing attachment"),
      IncompleteReason::IncompleteDrawBuffer => f.write_str("incomplete draw buffer"),
      IncompleteReason::IncompleteReadBuffer => f.write_str("incomplete read buffer"),
      IncompleteReason::Unsupported => f.write_str("unsupported attachment combination"),
      IncompleteReason::IncompleteMultisample => f.write_str("incomplete multisample setup"),
      IncompleteReason::IncompleteLayerTargets => f.write_str("incomplete layer targets"),
      IncompleteReason::Unknown(status) => write!(f, "unknown incomplete status: {}", status),
    }
  }
}

fn framebuffer_status() -> Result<(), IncompleteReason> {
  let status = unsafe { gl::CheckFramebufferStatus(gl::FRAMEBUFFER) };

  match status {
    gl::FRAMEBUFFER_COMPLETE => Ok(()),
    gl::FRAMEBUFFER_UNDEFINED => Err(IncompleteReason::Undefined),
    gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Err(IncompleteReason::IncompleteAttachment),
    gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Err(IncompleteReason::MissingAttachment),
    gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Err(IncompleteReason::IncompleteDrawBuffer),
    gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Err(IncompleteReason::IncompleteReadBuffer),
    gl::FRAMEBUFFER_UNSUPPORTED => Err(IncompleteReason::Unsupported),
    gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Err(IncompleteReason::IncompleteMultisample),
    gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Err(IncompleteReason::IncompleteLayerTargets),
    _ => Err(IncompleteReason::Unknown(status)),
  }
}

/// Error that might happen while creating an off-screen target.
#[non_exhaustive]
#[derive(Debug)]
pub enum FramebufferError {
  /// The driver refused to hand out a framebuffer object.
  CannotCreate,

  /// The assembled framebuffer is unusable.
  Incomplete(IncompleteReason),
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      FramebufferError::CannotCreate => f.write_str("cannot create framebuffer object"),
      FramebufferError::Incomplete(reason) => write!(f, "incomplete framebuffer: {}", reason),
    }
  }
}

impl error::Error for FramebufferError {}

impl From<IncompleteReason> for FramebufferError {
  fn from(reason: IncompleteReason) -> Self {
    FramebufferError::Incomplete(reason)
  }
}

// GPU objects owned by one framebuffer.
#[derive(Debug)]
struct Attachments {
  fbo: GLuint,
  texture: GLuint,
  renderbuffer: Option<GLuint>,
}

/// An off-screen render target.
#[derive(Debug)]
pub struct Framebuffer {
  attachments: Attachments,
  width: u32,
  height: u32,
  mode: FramebufferMode,
  state: Rc<RefCell<GlState>>,
}

impl Framebuffer {
  pub(crate) fn new(
    state: &Rc<RefCell<GlState>>,
    width: u32,
    height: u32,
    mode: FramebufferMode,
  ) -> Result<Self, FramebufferError> {
    let attachments = create_attachments(state, width, height, mode)?;

    Ok(Framebuffer {
      attachments,
      width,
      height,
      mode,
      state: state.clone(),
    })
  }

  /// Redirect all subsequent draws to this target.
  ///
  /// The viewport is left untouched; set it explicitly when the target's size
  /// differs from the screen's.
  pub fn bind(&self) {
    unsafe {
      self
        .state
        .borrow_mut()
        .bind_draw_framebuffer(self.attachments.fbo);
    }
  }

  /// Restore the default (on-screen) render target.
  pub fn unbind(&self) {
    unsafe {
      self.state.borrow_mut().bind_draw_framebuffer(0);
    }
  }

  /// Reallocate the target at a new size.
  ///
  /// A call with the current dimensions is a no-op and keeps every GPU object
  /// alive. Any other size destroys and recreates them all; previous contents
  /// are lost.
  pub fn resize(&mut self, width: u32, height: u32) -> Result<(), FramebufferError> {
    if width == self.width && height == self.height {
      return Ok(());
    }

    let attachments = create_attachments(&self.state, width, height, self.mode)?;

    self.delete_attachments();
    self.attachments = attachments;
    self.width = width;
    self.height = height;

    Ok(())
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn mode(&self) -> FramebufferMode {
    self.mode
  }

  /// Handle of the color (or depth) attachment, for sampling elsewhere.
  pub(crate) fn texture_handle(&self) -> GLuint {
    self.attachments.texture
  }

  pub(crate) fn texture_target(&self) -> GLenum {
    match self.mode {
      FramebufferMode::Color | FramebufferMode::Depth => gl::TEXTURE_2D,
      FramebufferMode::DepthCubemap => gl::TEXTURE_CUBE_MAP,
    }
  }

  fn delete_attachments(&mut self) {
    unsafe {
      gl::DeleteFramebuffers(1, &self.attachments.fbo);
      gl::DeleteTextures(1, &self.attachments.texture);

      if let Some(rbo) = self.attachments.renderbuffer {
        gl::DeleteRenderbuffers(1, &rbo);
      }

      self.state.borrow_mut().invalidate_framebuffer();
    }
  }
}

impl Drop for Framebuffer {
  fn drop(&mut self) {
    self.delete_attachments();
  }
}

fn create_attachments(
  state: &Rc<RefCell<GlState>>,
  width: u32,
  height: u32,
  mode: FramebufferMode,
) -> Result<Attachments, FramebufferError> {
  match mode {
    FramebufferMode::Color => create_color(state, width, height),
    FramebufferMode::Depth => create_depth(state, width, height),
    FramebufferMode::DepthCubemap => create_depth_cubemap(state, width, height),
  }
}

fn generate_fbo(state: &Rc<RefCell<GlState>>) -> Result<GLuint, FramebufferError> {
  let mut fbo: GLuint = 0;

  unsafe {
    gl::GenFramebuffers(1, &mut fbo);
  }

  if fbo == 0 {
    return Err(FramebufferError::CannotCreate);
  }

  unsafe {
    state.borrow_mut().bind_draw_framebuffer(fbo);
  }

  Ok(fbo)
}

fn create_color(
  state: &Rc<RefCell<GlState>>,
  width: u32,
  height: u32,
) -> Result<Attachments, FramebufferError> {
  let fbo = generate_fbo(state)?;
  let mut texture: GLuint = 0;
  let mut rbo: GLuint = 0;

  unsafe {
    // color attachment texture
    gl::GenTextures(1, &mut texture);
    state.borrow_mut().bind_texture(gl::TEXTURE_2D, texture);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      gl::RGB8 as GLint,
      width as GLsizei,
      height as GLsizei,
      0,
      gl::RGB,
      gl::UNSIGNED_BYTE,
      null(),
    );
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
    gl::FramebufferTexture2D(
      gl::FRAMEBUFFER,
      gl::COLOR_ATTACHMENT0,
      gl::TEXTURE_2D,
      texture,
      0,
    );

    // a single renderbuffer carries both depth and stencil
    gl::GenRenderbuffers(1, &mut rbo);
    gl::BindRenderbuffer(gl::RENDERBUFFER, rbo);
    gl::RenderbufferStorage(
      gl::RENDERBUFFER,
      gl::DEPTH24_STENCIL8,
      width as GLsizei,
      height as GLsizei,
    );
    gl::BindRenderbuffer(gl::RENDERBUFFER, 0);
    gl::FramebufferRenderbuffer(
      gl::FRAMEBUFFER,
      gl::DEPTH_STENCIL_ATTACHMENT,
      gl::RENDERBUFFER,
      rbo,
    );
  }

  let status = framebuffer_status();

  unsafe {
    state.borrow_mut().bind_draw_framebuffer(0);
  }

  if let Err(reason) = status {
    unsafe {
      gl::DeleteFramebuffers(1, &fbo);
      gl::DeleteTextures(1, &texture);
      gl::DeleteRenderbuffers(1, &rbo);
    }

    return Err(reason.into());
  }

  Ok(Attachments {
    fbo,
    texture,
    renderbuffer: Some(rbo),
  })
}

fn create_depth(
  state: &Rc<RefCell<GlState>>,
  width: u32,
  height: u32,
) -> Result<Attachments, FramebufferError> {
  let fbo = generate_fbo(state)?;
  let mut texture: GLuint = 0;

  unsafe {
    gl::GenTextures(1, &mut texture);
    state.borrow_mut().bind_texture(gl::TEXTURE_2D, texture);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      gl::DEPTH_COMPONENT24 as GLint,
      width as GLsizei,
      height as GLsizei,
      0,
      gl::DEPTH_COMPONENT,
      gl::FLOAT,
      null(),
    );
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);

    // texels outside the light frustum read as fully lit
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_WRAP_S,
      gl::CLAMP_TO_BORDER as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_WRAP_T,
      gl::CLAMP_TO_BORDER as GLint,
    );
    let border: [GLfloat; 4] = [1., 1., 1., 1.];
    gl::TexParameterfv(gl::TEXTURE_2D, gl::TEXTURE_BORDER_COLOR, border.as_ptr());

    gl::FramebufferTexture2D(
      gl::FRAMEBUFFER,
      gl::DEPTH_ATTACHMENT,
      gl::TEXTURE_2D,
      texture,
      0,
    );

    // depth-only target: no color is ever written or read
    gl::DrawBuffer(gl::NONE);
    gl::ReadBuffer(gl::NONE);
  }

  let status = framebuffer_status();

  unsafe {
    state.borrow_mut().bind_draw_framebuffer(0);
  }

  if let Err(reason) = status {
    unsafe {
      gl::DeleteFramebuffers(1, &fbo);
      gl::DeleteTextures(1, &texture);
    }

    return Err(reason.into());
  }

  Ok(Attachments {
    fbo,
    texture,
    renderbuffer: None,
  })
}

fn create_depth_cubemap(
  state: &Rc<RefCell<GlState>>,
  width: u32,
  height: u32,
) -> Result<Attachments, FramebufferError> {
  let fbo = generate_fbo(state)?;
  let mut texture: GLuint = 0;

  unsafe {
    gl::GenTextures(1, &mut texture);
    state.borrow_mut().bind_texture(gl::TEXTURE_CUBE_MAP, texture);

    for face in 0..6 {
      gl::TexImage2D(
        gl::TEXTURE_CUBE_MAP_POSITIVE_X + face,
        0,
        gl::DEPTH_COMPONENT24 as GLint,
        width as GLsizei,
        height as GLsizei,
        0,
        gl::DEPTH_COMPONENT,
        gl::FLOAT,
        null(),
      );
    }

    gl::TexParameteri(
      gl::TEXTURE_CUBE_MAP,
      gl::TEXTURE_MIN_FILTER,
      gl::NEAREST as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_CUBE_MAP,
      gl::TEXTURE_MAG_FILTER,
      gl::NEAREST as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_CUBE_MAP,
      gl::TEXTURE_WRAP_S,
      gl::CLAMP_TO_EDGE as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_CUBE_MAP,
      gl::TEXTURE_WRAP_T,
      gl::CLAMP_TO_EDGE as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_CUBE_MAP,
      gl::TEXTURE_WRAP_R,
      gl::CLAMP_TO_EDGE as GLint,
    );

    // the whole cubemap is the sole depth attachment; the geometry stage
    // selects the face per primitive through gl_Layer
    gl::FramebufferTexture(gl::FRAMEBUFFER, gl::DEPTH_ATTACHMENT, texture, 0);

    gl::DrawBuffer(gl::NONE);
    gl::ReadBuffer(gl::NONE);
  }

  let status = framebuffer_status();

  unsafe {
    state.borrow_mut().bind_draw_framebuffer(0);
  }

  if let Err(reason) = status {
    unsafe {
      gl::DeleteFramebuffers(1, &fbo);
      gl::DeleteTextures(1, &texture);
    }

    return Err(reason.into());
  }

  Ok(Attachments {
    fbo,
    texture,
    renderbuffer: None,
  })
}
