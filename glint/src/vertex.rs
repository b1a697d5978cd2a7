//! Vertex layout description.
//!
//! A [`VertexLayout`] describes how one packed, interleaved vertex record is
//! laid out in GPU memory: an ordered list of [`VertexAttrib`]s, each carrying
//! a semantic name ("POSITION", "TEXCOORD", …), a byte offset and a byte size.
//! Layouts are plain host-side data; they are consumed when a mesh is built.

/// Scalar, vector or matrix kind of a single vertex attribute.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttribKind {
  Vec2,
  Vec3,
  Vec4,
  Float,
  Int,
  Bool,
  Mat3,
  Mat4,
}

impl AttribKind {
  /// Size in bytes of one attribute of this kind.
  pub fn byte_size(self) -> u32 {
    match self {
      AttribKind::Vec2 => 8,
      AttribKind::Vec3 => 12,
      AttribKind::Vec4 => 16,
      AttribKind::Float => 4,
      AttribKind::Int => 4,
      AttribKind::Bool => 1,
      AttribKind::Mat3 => 36,
      AttribKind::Mat4 => 64,
    }
  }

  /// Number of components the attribute contributes to a shader input.
  pub fn components(self) -> u32 {
    match self {
      AttribKind::Vec2 => 2,
      AttribKind::Vec3 => 3,
      AttribKind::Vec4 => 4,
      _ => 1,
    }
  }
}

/// One named field within a per-vertex record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VertexAttrib {
  /// Kind of the vertex element.
  pub kind: AttribKind,

  /// Element start offset in bytes.
  pub offset: u32,

  /// Element size in bytes.
  pub size: u32,

  /// Element component count.
  pub components: u32,

  /// Semantic of the input layout.
  pub semantic: String,
}

impl VertexAttrib {
  /// Build an attribute with size and component count derived from its kind.
  ///
  /// The offset is left at zero; [`VertexLayout::push`] assigns the packed
  /// offset when the attribute joins a layout.
  pub fn new(kind: AttribKind, semantic: impl Into<String>) -> Self {
    VertexAttrib {
      kind,
      offset: 0,
      size: kind.byte_size(),
      components: kind.components(),
      semantic: semantic.into(),
    }
  }

  /// Build an attribute with full manual control over every field.
  pub fn with_offset(
    offset: u32,
    size: u32,
    components: u32,
    kind: AttribKind,
    semantic: impl Into<String>,
  ) -> Self {
    VertexAttrib {
      kind,
      offset,
      size,
      components,
      semantic: semantic.into(),
    }
  }
}

/// An ordered list of vertex attributes forming a packed vertex record.
///
/// Attributes are packed back to back; no padding or alignment is inserted.
/// The layout's [`stride`][VertexLayout::stride] is always the sum of the
/// sizes of its attributes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VertexLayout {
  attribs: Vec<VertexAttrib>,
  stride: u32,
}

impl VertexLayout {
  /// An empty layout.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append an attribute to the layout.
  ///
  /// If the attribute carries no preset offset, it receives the running
  /// stride, i.e. the byte position right after the previously appended
  /// attribute.
  pub fn push(&mut self, mut attrib: VertexAttrib) {
    if attrib.offset == 0 {
      attrib.offset = self.stride;
    }

    self.stride += attrib.size;
    self.attribs.push(attrib);
  }

  /// Total size in bytes of one vertex record.
  pub fn stride(&self) -> u32 {
    self.stride
  }

  /// Number of attributes in the layout.
  pub fn len(&self) -> usize {
    self.attribs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.attribs.is_empty()
  }

  /// The attributes, in declaration order.
  pub fn attribs(&self) -> &[VertexAttrib] {
    &self.attribs
  }
}

impl From<Vec<VertexAttrib>> for VertexLayout {
  fn from(attribs: Vec<VertexAttrib>) -> Self {
    let stride = attribs.iter().map(|a| a.size).sum();
    VertexLayout { attribs, stride }
  }
}

impl FromIterator<VertexAttrib> for VertexLayout {
  fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = VertexAttrib>,
  {
    let mut layout = VertexLayout::new();

    for attrib in iter {
      layout.push(attrib);
    }

    layout
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derived_sizes_and_components() {
    let a = VertexAttrib::new(AttribKind::Vec3, "POSITION");
    assert_eq!(a.size, 12);
    assert_eq!(a.components, 3);

    let b = VertexAttrib::new(AttribKind::Mat4, "MODEL");
    assert_eq!(b.size, 64);
    assert_eq!(b.components, 1);

    let c = VertexAttrib::new(AttribKind::Bool, "FLAG");
    assert_eq!(c.size, 1);
    assert_eq!(c.components, 1);
  }

  #[test]
  fn packing_assigns_running_offsets() {
    let mut layout = VertexLayout::new();
    layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    layout.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

    assert_eq!(layout.stride(), 20);
    assert_eq!(layout.attribs()[0].offset, 0);
    assert_eq!(layout.attribs()[1].offset, 12);
  }

  #[test]
  fn packing_accumulates_over_many_attribs() {
    let kinds = [
      AttribKind::Vec4,
      AttribKind::Vec3,
      AttribKind::Float,
      AttribKind::Vec2,
    ];
    let mut layout = VertexLayout::new();

    for (i, kind) in kinds.iter().enumerate() {
      layout.push(VertexAttrib::new(*kind, format!("ATTR{}", i)));
    }

    let sizes: Vec<u32> = kinds.iter().map(|k| k.byte_size()).collect();
    assert_eq!(layout.stride(), sizes.iter().sum::<u32>());

    let mut expected_offset = 0;
    for (attrib, size) in layout.attribs().iter().zip(&sizes) {
      assert_eq!(attrib.offset, expected_offset);
      expected_offset += size;
    }
  }

  #[test]
  fn preset_offsets_are_kept() {
    let mut layout = VertexLayout::new();
    layout.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    layout.push(VertexAttrib::with_offset(
      32,
      8,
      2,
      AttribKind::Vec2,
      "TEXCOORD",
    ));

    assert_eq!(layout.attribs()[1].offset, 32);
    assert_eq!(layout.stride(), 20);
  }

  #[test]
  fn equality_is_field_wise_and_ordered() {
    let mut a = VertexLayout::new();
    a.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    a.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

    let mut b = VertexLayout::new();
    b.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    b.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));

    assert_eq!(a, b);

    // differing semantic
    let mut c = VertexLayout::new();
    c.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    c.push(VertexAttrib::new(AttribKind::Vec2, "UV"));
    assert_ne!(a, c);

    // differing length
    let mut d = VertexLayout::new();
    d.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    assert_ne!(a, d);

    // differing order
    let mut e = VertexLayout::new();
    e.push(VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"));
    e.push(VertexAttrib::new(AttribKind::Vec3, "POSITION"));
    assert_ne!(a, e);
  }

  #[test]
  fn layout_from_vec_recomputes_stride() {
    let layout = VertexLayout::from(vec![
      VertexAttrib::new(AttribKind::Vec3, "POSITION"),
      VertexAttrib::new(AttribKind::Vec3, "NORMAL"),
      VertexAttrib::new(AttribKind::Vec2, "TEXCOORD"),
    ]);

    assert_eq!(layout.stride(), 32);
    assert_eq!(layout.len(), 3);
  }
}
