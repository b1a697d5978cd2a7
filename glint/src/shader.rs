//! Shader stages and programs.

use gl::types::*;
use std::error;
use std::ffi::CString;
use std::fmt;
use std::ptr::{null, null_mut};

/// A shader stage kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageKind {
  Vertex,
  Geometry,
  Fragment,
}

impl fmt::Display for StageKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageKind::Vertex => f.write_str("vertex shader"),
      StageKind::Geometry => f.write_str("geometry shader"),
      StageKind::Fragment => f.write_str("fragment shader"),
    }
  }
}

fn opengl_stage_kind(kind: StageKind) -> GLenum {
  match kind {
    StageKind::Vertex => gl::VERTEX_SHADER,
    StageKind::Geometry => gl::GEOMETRY_SHADER,
    StageKind::Fragment => gl::FRAGMENT_SHADER,
  }
}

/// Error that might happen while compiling a shader stage.
#[non_exhaustive]
#[derive(Debug)]
pub enum StageError {
  /// The driver refused to hand out a shader object.
  CannotCreate(StageKind),

  /// Compilation failed; the payload is the driver's info log.
  CompilationFailed(StageKind, String),
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      StageError::CannotCreate(kind) => write!(f, "cannot create {} object", kind),
      StageError::CompilationFailed(kind, log) => {
        write!(f, "{} compilation failed:\n{}", kind, log)
      }
    }
  }
}

impl error::Error for StageError {}

/// Error that might happen while building a program.
#[non_exhaustive]
#[derive(Debug)]
pub enum ProgramError {
  /// A stage failed to compile.
  Stage(StageError),

  /// The driver refused to hand out a program object.
  CannotCreate,

  /// Linking failed; the payload is the driver's info log.
  LinkFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      ProgramError::Stage(e) => write!(f, "{}", e),
      ProgramError::CannotCreate => f.write_str("cannot create program object"),
      ProgramError::LinkFailed(log) => write!(f, "program link failed:\n{}", log),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::Stage(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::Stage(e)
  }
}

fn log_to_string(mut log: Vec<u8>) -> String {
  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}

/// One compiled shader stage; only lives while a program is being linked.
#[derive(Debug)]
struct Stage {
  handle: GLuint,
}

impl Stage {
  fn compile(kind: StageKind, src: &str) -> Result<Self, StageError> {
    let handle = unsafe { gl::CreateShader(opengl_stage_kind(kind)) };

    if handle == 0 {
      return Err(StageError::CannotCreate(kind));
    }

    let c_src = CString::new(src.as_bytes())
      .map_err(|_| StageError::CompilationFailed(kind, "source contains a nul byte".to_owned()))?;

    unsafe {
      gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
      gl::CompileShader(handle);

      let mut compiled: GLint = gl::FALSE.into();
      gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

      if compiled == gl::TRUE.into() {
        Ok(Stage { handle })
      } else {
        let mut log_len: GLint = 0;
        gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = vec![0; log_len as usize];
        gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        gl::DeleteShader(handle);

        Err(StageError::CompilationFailed(kind, log_to_string(log)))
      }
    }
  }
}

impl Drop for Stage {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteShader(self.handle);
    }
  }
}

/// A linked GPU program.
#[derive(Debug)]
pub struct Program {
  handle: GLuint,
}

impl Program {
  /// Compile every stage and link them into a program.
  ///
  /// Compile and link failures carry the driver's full info log.
  pub(crate) fn from_sources(
    vertex_src: &str,
    geometry_src: Option<&str>,
    fragment_src: &str,
  ) -> Result<Self, ProgramError> {
    let vertex = Stage::compile(StageKind::Vertex, vertex_src)?;
    let geometry = geometry_src
      .map(|src| Stage::compile(StageKind::Geometry, src))
      .transpose()?;
    let fragment = Stage::compile(StageKind::Fragment, fragment_src)?;

    let handle = unsafe { gl::CreateProgram() };

    if handle == 0 {
      return Err(ProgramError::CannotCreate);
    }

    let program = Program { handle };

    unsafe {
      gl::AttachShader(handle, vertex.handle);

      if let Some(geometry) = &geometry {
        gl::AttachShader(handle, geometry.handle);
      }

      gl::AttachShader(handle, fragment.handle);
    }

    program.link()?;

    Ok(program)
  }

  fn link(&self) -> Result<(), ProgramError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = vec![0; log_len as usize];
        gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        Err(ProgramError::LinkFailed(log_to_string(log)))
      }
    }
  }

  /// Location of a uniform, `None` if the name is not active in the program.
  pub(crate) fn uniform_location(&self, name: &str) -> Option<GLint> {
    let c_name = CString::new(name.as_bytes()).ok()?;
    let location =
      unsafe { gl::GetUniformLocation(self.handle, c_name.as_ptr() as *const GLchar) };

    if location < 0 {
      None
    } else {
      Some(location)
    }
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.handle
  }
}

impl Drop for Program {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteProgram(self.handle);
    }
  }
}
