/// Uniform values set once per flush.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchUniforms {
    /// Color multiplied into the sampled texture (straight RGB).
    pub tint: [f32; 3],
    /// Texture slot the batch samples from.
    pub texture_slot: i32,
}

/// Rendering capability consumed by [`BatchRenderer::submit`](super::BatchRenderer::submit).
///
/// One flush is always `upload` → `set_uniforms` → `draw_indexed`, and every
/// call must rebind whatever state it needs; no state is assumed to survive
/// between flushes.
pub trait BatchBackend {
    /// Per-frame state required to record a flush (device handles, target view).
    type Frame<'f>;

    /// Replaces the contents of the streaming vertex and index buffers.
    fn upload(&mut self, frame: &mut Self::Frame<'_>, vertices: &[f32], indices: &[u32]);

    fn set_uniforms(&mut self, frame: &mut Self::Frame<'_>, uniforms: BatchUniforms);

    /// Issues one indexed triangle-list draw over the first `index_count` indices.
    fn draw_indexed(&mut self, frame: &mut Self::Frame<'_>, index_count: u32);
}
