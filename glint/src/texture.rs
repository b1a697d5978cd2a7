//! Textures and sampling parameters.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::image::Image;
use crate::state::GlState;
use crate::volume::Volume;

/// How to wrap texture coordinates while sampling textures?
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wrap {
  /// Out-of-range coordinates are clamped to the edge texel.
  ClampToEdge,

  /// Out-of-range coordinates read the texture's border color.
  ClampToBorder,

  /// Coordinates repeat over *[0;1]*.
  Repeat,

  /// Same as `Repeat` but alternating between *[0;1]* and *[1;0]*.
  MirroredRepeat,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MinFilter {
  Nearest,
  Linear,
  NearestMipmapNearest,
  NearestMipmapLinear,
  LinearMipmapNearest,
  LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MagFilter {
  Nearest,
  Linear,
}

/// Sampling parameters applied to a texture at creation.
#[derive(Clone, Copy, Debug)]
pub struct Sampler {
  /// Depth-axis wrapping (3D textures).
  pub wrap_r: Wrap,

  /// Horizontal wrapping.
  pub wrap_s: Wrap,

  /// Vertical wrapping.
  pub wrap_t: Wrap,

  pub min_filter: MinFilter,
  pub mag_filter: MagFilter,
}

impl Sampler {
  /// A sampler using the same wrapping mode on every axis.
  pub fn with_wrap(wrap: Wrap) -> Self {
    Sampler {
      wrap_r: wrap,
      wrap_s: wrap,
      wrap_t: wrap,
      ..Self::default()
    }
  }
}

/// Default sampler: clamp to edge, linear filtering without mipmaps.
impl Default for Sampler {
  fn default() -> Self {
    Sampler {
      wrap_r: Wrap::ClampToEdge,
      wrap_s: Wrap::ClampToEdge,
      wrap_t: Wrap::ClampToEdge,
      min_filter: MinFilter::Linear,
      mag_filter: MagFilter::Linear,
    }
  }
}

fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::ClampToBorder => gl::CLAMP_TO_BORDER,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

fn opengl_min_filter(filter: MinFilter) -> GLenum {
  match filter {
    MinFilter::Nearest => gl::NEAREST,
    MinFilter::Linear => gl::LINEAR,
    MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

fn opengl_mag_filter(filter: MagFilter) -> GLenum {
  match filter {
    MagFilter::Nearest => gl::NEAREST,
    MagFilter::Linear => gl::LINEAR,
  }
}

fn apply_sampler(target: GLenum, sampler: &Sampler) {
  unsafe {
    gl::TexParameteri(
      target,
      gl::TEXTURE_WRAP_R,
      opengl_wrap(sampler.wrap_r) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_WRAP_S,
      opengl_wrap(sampler.wrap_s) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_WRAP_T,
      opengl_wrap(sampler.wrap_t) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_MIN_FILTER,
      opengl_min_filter(sampler.min_filter) as GLint,
    );
    gl::TexParameteri(
      target,
      gl::TEXTURE_MAG_FILTER,
      opengl_mag_filter(sampler.mag_filter) as GLint,
    );
  }
}

/// Error that might happen while creating a texture.
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// The driver refused to hand out a texture object.
  CannotCreate,

  /// The source image or volume holds no texels.
  EmptySource,

  /// The source image has a channel count no texture format maps to.
  UnsupportedChannelCount(u8),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::CannotCreate => f.write_str("cannot create texture object"),
      TextureError::EmptySource => f.write_str("texture source holds no texels"),
      TextureError::UnsupportedChannelCount(n) => {
        write!(f, "unsupported channel count: {}", n)
      }
    }
  }
}

impl error::Error for TextureError {}

/// A GPU-side texture (1D, 2D or 3D).
#[derive(Debug)]
pub struct Texture {
  handle: GLuint,
  target: GLenum,
}

impl Texture {
  fn generate(target: GLenum) -> Result<Self, TextureError> {
    let mut handle: GLuint = 0;

    unsafe {
      gl::GenTextures(1, &mut handle);
    }

    if handle == 0 {
      return Err(TextureError::CannotCreate);
    }

    Ok(Texture { handle, target })
  }

  fn color_formats(image: &Image) -> Result<(GLenum, GLenum), TextureError> {
    match image.channels() {
      3 => Ok((gl::RGB8, gl::RGB)),
      4 => Ok((gl::RGBA8, gl::RGBA)),
      n => Err(TextureError::UnsupportedChannelCount(n)),
    }
  }

  pub(crate) fn new_1d(
    state: &Rc<RefCell<GlState>>,
    image: &Image,
    sampler: &Sampler,
  ) -> Result<Self, TextureError> {
    if image.data().is_empty() {
      return Err(TextureError::EmptySource);
    }

    let (iformat, format) = Self::color_formats(image)?;
    let texture = Self::generate(gl::TEXTURE_1D)?;

    unsafe {
      state.borrow_mut().bind_texture(texture.target, texture.handle);

      gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      gl::TexImage1D(
        gl::TEXTURE_1D,
        0,
        iformat as GLint,
        image.width() as GLsizei,
        0,
        format,
        gl::UNSIGNED_BYTE,
        image.data().as_ptr() as *const c_void,
      );
    }

    apply_sampler(gl::TEXTURE_1D, sampler);

    Ok(texture)
  }

  pub(crate) fn new_2d(
    state: &Rc<RefCell<GlState>>,
    image: &Image,
    sampler: &Sampler,
    mipmaps: bool,
  ) -> Result<Self, TextureError> {
    if image.data().is_empty() {
      return Err(TextureError::EmptySource);
    }

    let (iformat, format) = Self::color_formats(image)?;
    let texture = Self::generate(gl::TEXTURE_2D)?;

    unsafe {
      state.borrow_mut().bind_texture(texture.target, texture.handle);

      gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      gl::TexImage2D(
        gl::TEXTURE_2D,
        0,
        iformat as GLint,
        image.width() as GLsizei,
        image.height() as GLsizei,
        0,
        format,
        gl::UNSIGNED_BYTE,
        image.data().as_ptr() as *const c_void,
      );

      if mipmaps {
        gl::GenerateMipmap(gl::TEXTURE_2D);
      }
    }

    apply_sampler(gl::TEXTURE_2D, sampler);

    Ok(texture)
  }

  pub(crate) fn new_3d(
    state: &Rc<RefCell<GlState>>,
    volume: &Volume,
    sampler: &Sampler,
    mipmaps: bool,
  ) -> Result<Self, TextureError> {
    if volume.is_empty() {
      return Err(TextureError::EmptySource);
    }

    let texture = Self::generate(gl::TEXTURE_3D)?;

    unsafe {
      state.borrow_mut().bind_texture(texture.target, texture.handle);

      gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      gl::TexImage3D(
        gl::TEXTURE_3D,
        0,
        gl::R32F as GLint,
        volume.width() as GLsizei,
        volume.height() as GLsizei,
        volume.depth() as GLsizei,
        0,
        gl::RED,
        gl::FLOAT,
        volume.as_slice().as_ptr() as *const c_void,
      );

      if mipmaps {
        gl::GenerateMipmap(gl::TEXTURE_3D);
      }
    }

    apply_sampler(gl::TEXTURE_3D, sampler);

    Ok(texture)
  }

  /// Build a 3-channel 3D texture holding the volume's gradient field.
  pub(crate) fn new_3d_gradients(
    state: &Rc<RefCell<GlState>>,
    volume: &Volume,
    sampler: &Sampler,
  ) -> Result<Self, TextureError> {
    if volume.is_empty() {
      return Err(TextureError::EmptySource);
    }

    let gradients = volume.gradients();
    let texture = Self::generate(gl::TEXTURE_3D)?;

    unsafe {
      state.borrow_mut().bind_texture(texture.target, texture.handle);

      gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
      gl::TexImage3D(
        gl::TEXTURE_3D,
        0,
        gl::RGB32F as GLint,
        volume.width() as GLsizei,
        volume.height() as GLsizei,
        volume.depth() as GLsizei,
        0,
        gl::RGB,
        gl::FLOAT,
        gradients.as_ptr() as *const c_void,
      );
    }

    apply_sampler(gl::TEXTURE_3D, sampler);

    Ok(texture)
  }

  pub(crate) fn handle(&self) -> GLuint {
    self.handle
  }

  pub(crate) fn target(&self) -> GLenum {
    self.target
  }
}

impl Drop for Texture {
  fn drop(&mut self) {
    unsafe {
      gl::DeleteTextures(1, &self.handle);
    }
  }
}
