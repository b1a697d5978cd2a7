//! GPU buffer objects.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::mem;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::state::{Bind, GlState};

/// Expected update frequency of a buffer's contents.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BufferUsage {
  /// Uploaded once, drawn many times.
  Static,

  /// Re-uploaded regularly.
  Dynamic,
}

fn opengl_usage(usage: BufferUsage) -> GLenum {
  match usage {
    BufferUsage::Static => gl::STATIC_DRAW,
    BufferUsage::Dynamic => gl::DYNAMIC_DRAW,
  }
}

/// Error that might happen while creating a buffer.
#[non_exhaustive]
#[derive(Debug)]
pub enum BufferError {
  /// The driver refused to hand out a buffer object.
  CannotCreate,
}

impl fmt::Display for BufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BufferError::CannotCreate => f.write_str("cannot create buffer object"),
    }
  }
}

impl error::Error for BufferError {}

/// Wrapped OpenGL buffer.
///
/// Used to drop the buffer.
#[derive(Debug)]
struct RawBuffer {
  handle: GLuint,
  state: Rc<RefCell<GlState>>,
}

impl RawBuffer {
  fn generate(state: &Rc<RefCell<GlState>>) -> Result<Self, BufferError> {
    let mut handle: GLuint = 0;

    unsafe {
      gl::GenBuffers(1, &mut handle);
    }

    if handle == 0 {
      return Err(BufferError::CannotCreate);
    }

    Ok(RawBuffer {
      handle,
      state: state.clone(),
    })
  }
}

impl Drop for RawBuffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}

/// A GPU-side vertex buffer holding packed vertex records.
#[derive(Debug)]
pub struct VertexBuffer {
  raw: RawBuffer,
  size_bytes: usize,
}

impl VertexBuffer {
  pub(crate) fn new<V>(
    state: &Rc<RefCell<GlState>>,
    vertices: &[V],
    usage: BufferUsage,
  ) -> Result<Self, BufferError>
  where
    V: Copy,
  {
    let raw = RawBuffer::generate(state)?;
    let size_bytes = mem::size_of_val(vertices);

    unsafe {
      raw.state.borrow_mut().bind_array_buffer(raw.handle, Bind::Forced);
      gl::BufferData(
        gl::ARRAY_BUFFER,
        size_bytes as GLsizeiptr,
        vertices.as_ptr() as *const c_void,
        opengl_usage(usage),
      );
    }

    Ok(VertexBuffer { raw, size_bytes })
  }

  /// Size of the uploaded data in bytes.
  pub fn size_bytes(&self) -> usize {
    self.size_bytes
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.raw.handle
  }
}

/// A GPU-side index buffer of `u32` indices.
#[derive(Debug)]
pub struct IndexBuffer {
  raw: RawBuffer,
  len: usize,
}

impl IndexBuffer {
  pub(crate) fn new(
    state: &Rc<RefCell<GlState>>,
    indices: &[u32],
    usage: BufferUsage,
  ) -> Result<Self, BufferError> {
    let raw = RawBuffer::generate(state)?;

    unsafe {
      raw
        .state
        .borrow_mut()
        .bind_element_array_buffer(raw.handle, Bind::Forced);
      gl::BufferData(
        gl::ELEMENT_ARRAY_BUFFER,
        mem::size_of_val(indices) as GLsizeiptr,
        indices.as_ptr() as *const c_void,
        opengl_usage(usage),
      );
    }

    Ok(IndexBuffer {
      raw,
      len: indices.len(),
    })
  }

  /// Number of indices in the buffer.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.raw.handle
  }
}
