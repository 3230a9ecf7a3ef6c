use crate::coords::Viewport;

/// Renderer-facing context for one frame (device/queue + target + viewport).
///
/// This is the frame handed to [`QuadPipeline`](super::QuadPipeline) on every
/// flush. It borrows the acquired surface view, so it lives no longer than the
/// frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        color_view: &'a wgpu::TextureView,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
            color_view,
        }
    }
}
