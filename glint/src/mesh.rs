//! GPU meshes.
//!
//! A [`Mesh`] ties a vertex buffer (and optionally an index buffer) to a
//! vertex-array object whose attribute pointers follow a [`VertexLayout`].
//! The mesh owns its buffers; dropping it releases every GPU object involved.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::state::{Bind, GlState};
use crate::vertex::VertexLayout;

/// Primitive kind a mesh is drawn as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Primitive {
  Points,
  Lines,
  LineStrip,
  Triangles,
  /// Only available to non-indexed draws.
  TriangleStrip,
}

pub(crate) fn opengl_primitive(primitive: Primitive) -> GLenum {
  match primitive {
    Primitive::Points => gl::POINTS,
    Primitive::Lines => gl::LINES,
    Primitive::LineStrip => gl::LINE_STRIP,
    Primitive::Triangles => gl::TRIANGLES,
    Primitive::TriangleStrip => gl::TRIANGLE_STRIP,
  }
}

/// Error that might happen while building a mesh.
#[non_exhaustive]
#[derive(Debug)]
pub enum MeshError {
  /// The driver refused to hand out a vertex-array object.
  CannotCreate,

  /// The vertex layout carries no attribute.
  EmptyLayout,
}

impl fmt::Display for MeshError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      MeshError::CannotCreate => f.write_str("cannot create vertex array object"),
      MeshError::EmptyLayout => f.write_str("vertex layout has no attribute"),
    }
  }
}

impl error::Error for MeshError {}

/// A drawable GPU mesh.
#[derive(Debug)]
pub struct Mesh {
  vao: GLuint,
  vertex_buffer: VertexBuffer,
  index_buffer: Option<IndexBuffer>,
  state: Rc<RefCell<GlState>>,
}

impl Mesh {
  pub(crate) fn new(
    state: &Rc<RefCell<GlState>>,
    vertex_buffer: VertexBuffer,
    index_buffer: Option<IndexBuffer>,
    layout: &VertexLayout,
  ) -> Result<Self, MeshError> {
    if layout.is_empty() {
      return Err(MeshError::EmptyLayout);
    }

    let mut vao: GLuint = 0;

    unsafe {
      gl::GenVertexArrays(1, &mut vao);
    }

    if vao == 0 {
      return Err(MeshError::CannotCreate);
    }

    unsafe {
      let mut st = state.borrow_mut();

      st.bind_vertex_array(vao, Bind::Forced);
      st.bind_array_buffer(vertex_buffer.handle(), Bind::Forced);

      if let Some(ib) = &index_buffer {
        // recorded into the VAO
        gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ib.handle());
      }

      for (i, attrib) in layout.attribs().iter().enumerate() {
        gl::EnableVertexAttribArray(i as GLuint);
        gl::VertexAttribPointer(
          i as GLuint,
          attrib.components as GLint,
          gl::FLOAT,
          gl::FALSE,
          layout.stride() as GLsizei,
          attrib.offset as usize as *const c_void,
        );
      }

      st.unbind_vertex_array();

      // the element-array binding travels with the VAO; the global binding
      // cache no longer reflects the driver
      st.bind_element_array_buffer(0, Bind::Forced);
    }

    Ok(Mesh {
      vao,
      vertex_buffer,
      index_buffer,
      state: state.clone(),
    })
  }

  pub fn vertex_buffer(&self) -> &VertexBuffer {
    &self.vertex_buffer
  }

  pub fn index_buffer(&self) -> Option<&IndexBuffer> {
    self.index_buffer.as_ref()
  }

  pub(crate) fn vao(&self) -> GLuint {
    self.vao
  }
}

impl Drop for Mesh {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_vertex_array();
      gl::DeleteVertexArrays(1, &self.vao);
    }
  }
}
