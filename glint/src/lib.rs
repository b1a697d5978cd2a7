//! A small stateful OpenGL 3.3 toolkit.
//!
//! glint wraps a handful of OpenGL object kinds — vertex/index buffers,
//! vertex-array meshes, 1D/2D/3D textures, shader programs and off-screen
//! framebuffers — behind owning Rust types, and drives a single-window render
//! loop with an immediate-mode UI overlay composited on top.
//!
//! The entry point is [`GfxContext`]: create one, register lifecycle
//! callbacks ([`GfxContext::on_init`], [`GfxContext::on_render`], resize and
//! mouse handlers), then call [`GfxContext::run`] to enter the blocking loop.
//! Within a frame, the render callback uses the context's creation, binding
//! and draw entry points; a [`Framebuffer`] can redirect output off-screen.
//!
//! ```no_run
//! use glint::{GfxContext, Primitive};
//!
//! let mut gfx = GfxContext::new("triangle", 800, 600)?;
//! # let (vs, fs) = ("", "");
//! # let (vertices, layout) = ([0f32; 9], glint::VertexLayout::new());
//! let program = gfx.new_program(vs, fs)?;
//! let buffer = gfx.new_vertex_buffer(&vertices, glint::BufferUsage::Static)?;
//! let mesh = gfx.new_mesh(buffer, &layout)?;
//!
//! gfx.on_render(move |gfx| {
//!   gfx.clear();
//!   gfx.bind_program(&program);
//!   gfx.draw(&mesh, Primitive::Triangles, 3);
//! });
//! gfx.run();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Every GPU resource is an owning handle: dropping it deletes the GL object.
//! Creation returns `Result` with a typed, per-module error; a creation
//! failure never aborts the process. Everything is strictly single-threaded —
//! the context and all resources stay on the thread that made the GL context
//! current.

pub mod buffer;
pub mod context;
pub mod framebuffer;
pub mod image;
pub mod mesh;
pub mod overlay;
pub mod shader;
pub mod state;
pub mod texture;
pub mod vertex;
pub mod volume;

pub use buffer::{BufferError, BufferUsage, IndexBuffer, VertexBuffer};
pub use context::{ContextError, GfxContext, RenderOption};
pub use framebuffer::{Framebuffer, FramebufferError, FramebufferMode, IncompleteReason};
pub use image::{Image, ImageError};
pub use mesh::{Mesh, MeshError, Primitive};
pub use overlay::OverlayError;
pub use shader::{Program, ProgramError, StageError, StageKind};
pub use state::StateQueryError;
pub use texture::{MagFilter, MinFilter, Sampler, Texture, TextureError, Wrap};
pub use vertex::{AttribKind, VertexAttrib, VertexLayout};
pub use volume::{Volume, VoxelOutOfBounds};

pub use egui;
pub use glfw;
