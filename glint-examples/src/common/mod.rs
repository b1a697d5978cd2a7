//! Shared demo helpers: an orbit camera and procedural meshes.

#![allow(dead_code)]

use cgmath::{Deg, Matrix4, Point3, Vector3};

/// A camera orbiting the origin, driven by mouse drag and scroll.
pub struct OrbitCamera {
  pub azimuth: f32,
  pub pitch: f32,
  pub radius: f32,
  dragging: bool,
  last_cursor: (f64, f64),
}

impl OrbitCamera {
  pub fn new(radius: f32) -> Self {
    OrbitCamera {
      azimuth: 45.,
      pitch: 30.,
      radius,
      dragging: false,
      last_cursor: (0., 0.),
    }
  }

  pub fn on_button(&mut self, button: glfw::MouseButton, action: glfw::Action) {
    if button == glfw::MouseButton::Button1 {
      self.dragging = action == glfw::Action::Press;
    }
  }

  pub fn on_move(&mut self, x: f64, y: f64) {
    if self.dragging {
      let (lx, ly) = self.last_cursor;
      self.azimuth += (x - lx) as f32 * 0.4;
      self.pitch = (self.pitch + (y - ly) as f32 * 0.4).clamp(-89., 89.);
    }

    self.last_cursor = (x, y);
  }

  pub fn on_scroll(&mut self, yoffset: f64) {
    self.radius = (self.radius - yoffset as f32 * 0.5).max(0.5);
  }

  pub fn eye(&self) -> Point3<f32> {
    let azimuth = self.azimuth.to_radians();
    let pitch = self.pitch.to_radians();

    Point3::new(
      self.radius * pitch.cos() * azimuth.sin(),
      self.radius * pitch.sin(),
      self.radius * pitch.cos() * azimuth.cos(),
    )
  }

  pub fn view(&self) -> Matrix4<f32> {
    Matrix4::look_at_rh(
      self.eye(),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
    )
  }
}

/// A perspective projection matching the current framebuffer aspect ratio.
pub fn projection(width: u32, height: u32) -> Matrix4<f32> {
  let aspect = width as f32 / height.max(1) as f32;
  cgmath::perspective(Deg(45.), aspect, 0.1, 100.)
}

/// A unit cube centered at the origin: position (vec3), normal (vec3),
/// texcoord (vec2), 36 vertices.
pub fn cube_vertices() -> Vec<f32> {
  let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    // normal, tangent u, tangent v
    ([0., 0., 1.], [1., 0., 0.], [0., 1., 0.]),
    ([0., 0., -1.], [-1., 0., 0.], [0., 1., 0.]),
    ([1., 0., 0.], [0., 0., -1.], [0., 1., 0.]),
    ([-1., 0., 0.], [0., 0., 1.], [0., 1., 0.]),
    ([0., 1., 0.], [1., 0., 0.], [0., 0., -1.]),
    ([0., -1., 0.], [1., 0., 0.], [0., 0., 1.]),
  ];

  let corners = [
    ([-1f32, -1.], [0f32, 0.]),
    ([1., -1.], [1., 0.]),
    ([1., 1.], [1., 1.]),
    ([-1., -1.], [0., 0.]),
    ([1., 1.], [1., 1.]),
    ([-1., 1.], [0., 1.]),
  ];

  let mut vertices = Vec::with_capacity(36 * 8);

  for (normal, tu, tv) in &faces {
    let n = Vector3::from(*normal);
    let u = Vector3::from(*tu);
    let v = Vector3::from(*tv);

    for (corner, uv) in &corners {
      let pos = (n + u * corner[0] + v * corner[1]) * 0.5;

      vertices.extend_from_slice(&[pos.x, pos.y, pos.z]);
      vertices.extend_from_slice(&[n.x, n.y, n.z]);
      vertices.extend_from_slice(uv);
    }
  }

  vertices
}

/// A large ground quad at `y = height`: position (vec3), normal (vec3),
/// texcoord (vec2), 6 vertices.
pub fn ground_vertices(half_extent: f32, height: f32) -> Vec<f32> {
  let corners = [
    [-1f32, -1.],
    [1., -1.],
    [1., 1.],
    [-1., -1.],
    [1., 1.],
    [-1., 1.],
  ];

  let mut vertices = Vec::with_capacity(6 * 8);

  for c in &corners {
    vertices.extend_from_slice(&[c[0] * half_extent, height, c[1] * half_extent]);
    vertices.extend_from_slice(&[0., 1., 0.]);
    vertices.extend_from_slice(&[(c[0] + 1.) * 0.5, (c[1] + 1.) * 0.5]);
  }

  vertices
}
