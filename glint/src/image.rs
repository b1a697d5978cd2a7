//! Host-side pixel buffers.
//!
//! An [`Image`] owns a decoded pixel buffer ready for texture upload. Images
//! are loaded once and never mutated afterwards.

use std::error;
use std::fmt;
use std::path::Path;

/// Error that might happen while building an [`Image`].
#[non_exhaustive]
#[derive(Debug)]
pub enum ImageError {
  /// The decoder rejected the file (bad path, unreadable or unsupported
  /// format).
  Decode(image::ImageError),

  /// A raw buffer does not match the dimensions it was announced with.
  RawSizeMismatch {
    expected: usize,
    got: usize,
  },
}

impl fmt::Display for ImageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self {
      ImageError::Decode(e) => write!(f, "cannot decode image: {}", e),
      ImageError::RawSizeMismatch { expected, got } => write!(
        f,
        "raw image buffer size mismatch: expected {} bytes, got {}",
        expected, got
      ),
    }
  }
}

impl error::Error for ImageError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ImageError::Decode(e) => Some(e),
      _ => None,
    }
  }
}

impl From<image::ImageError> for ImageError {
  fn from(e: image::ImageError) -> Self {
    ImageError::Decode(e)
  }
}

/// A decoded image: an owned byte buffer of tightly packed rows plus its
/// dimensions and channel count (3 or 4).
#[derive(Clone, Debug)]
pub struct Image {
  data: Vec<u8>,
  width: u32,
  height: u32,
  channels: u8,
}

impl Image {
  /// Decode an image from disk.
  ///
  /// RGB and RGBA files keep their channel count; anything else (grayscale,
  /// paletted, 16-bit…) is converted to RGBA.
  pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageError> {
    let decoded = image::open(path)?;

    let (width, height, channels, data) = match decoded {
      image::DynamicImage::ImageRgb8(buf) => {
        let (w, h) = buf.dimensions();
        (w, h, 3, buf.into_raw())
      }

      image::DynamicImage::ImageRgba8(buf) => {
        let (w, h) = buf.dimensions();
        (w, h, 4, buf.into_raw())
      }

      other => {
        let buf = other.to_rgba8();
        let (w, h) = buf.dimensions();
        (w, h, 4, buf.into_raw())
      }
    };

    Ok(Image {
      data,
      width,
      height,
      channels,
    })
  }

  /// Wrap a caller-owned raw buffer as a single-row image.
  ///
  /// Intended for 1D texture sources; the resulting image always has a height
  /// of 1. The buffer must hold exactly `width * channels` bytes.
  pub fn from_raw(data: &[u8], width: u32, channels: u8) -> Result<Self, ImageError> {
    let expected = width as usize * channels as usize;

    if data.len() != expected {
      return Err(ImageError::RawSizeMismatch {
        expected,
        got: data.len(),
      });
    }

    Ok(Image {
      data: data.to_vec(),
      width,
      height: 1,
      channels,
    })
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  /// Number of color channels per pixel (3 or 4).
  pub fn channels(&self) -> u8 {
    self.channels
  }

  /// The pixel bytes, rows packed tightly from the top-left corner.
  pub fn data(&self) -> &[u8] {
    &self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_buffer_becomes_single_row_image() {
    let texels = [10u8, 20, 30, 40, 50, 60];
    let img = Image::from_raw(&texels, 2, 3).unwrap();

    assert_eq!(img.width(), 2);
    assert_eq!(img.height(), 1);
    assert_eq!(img.channels(), 3);
    assert_eq!(img.data(), &texels);
  }

  #[test]
  fn raw_buffer_size_is_checked() {
    let texels = [0u8; 5];
    let err = Image::from_raw(&texels, 2, 3).unwrap_err();

    match err {
      ImageError::RawSizeMismatch { expected, got } => {
        assert_eq!(expected, 6);
        assert_eq!(got, 5);
      }
      e => panic!("unexpected error: {}", e),
    }
  }

  #[test]
  fn missing_file_is_a_decode_error() {
    let err = Image::open("definitely/not/a/file.png").unwrap_err();
    assert!(matches!(err, ImageError::Decode(_)));
  }
}
