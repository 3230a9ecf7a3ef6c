//! GPU rendering subsystem.
//!
//! The wgpu side of batching: [`QuadPipeline`] implements
//! [`BatchBackend`](crate::batch::BatchBackend) so a [`QuadRenderer`] can flush
//! straight to the surface.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod quad_pipeline;
pub mod shader;
pub mod texture;

pub use ctx::RenderCtx;
pub use quad_pipeline::{QuadPipeline, QuadPipelineConfig, QuadRenderer};
pub use shader::ShaderSource;
pub use texture::{GpuTexture, TextureSource};
