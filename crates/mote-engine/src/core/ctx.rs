use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::paint::Color;
use crate::render::RenderCtx;
use crate::time::FrameTime;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }

    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }
}

/// Context passed to `core::App::start`.
///
/// The GPU is borrowed immutably: enough to build pipelines and upload
/// resources, not to render.
pub struct StartCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a Gpu<'w>,
}

impl StartCtx<'_, '_> {
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.window.viewport()
    }
}

/// Per-frame context passed to `core::App::update`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.window.viewport()
    }

    /// Acquires the surface, clears it with `clear`, calls `draw` with a ready
    /// [`RenderCtx`], then presents the frame.
    ///
    /// The clear is submitted before `draw` runs; anything `draw` submits lands
    /// on top of it in submission order. Surface errors skip the frame, or
    /// return [`AppControl::Exit`] when they are fatal.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut RenderCtx<'_>),
    {
        let viewport = self.viewport();

        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                return match action {
                    SurfaceErrorAction::Fatal => {
                        log::error!("fatal surface error; exiting");
                        AppControl::Exit
                    }
                    SurfaceErrorAction::Reconfigured => {
                        log::debug!("surface reconfigured; frame skipped");
                        AppControl::Continue
                    }
                    SurfaceErrorAction::SkipFrame => {
                        log::warn!("surface unavailable; frame skipped");
                        AppControl::Continue
                    }
                };
            }
        };

        self.gpu.clear(&frame, clear);

        {
            let mut rctx = RenderCtx::new(
                self.gpu.device(),
                self.gpu.queue(),
                self.gpu.surface_format(),
                viewport,
                &frame.view,
            );
            draw(&mut rctx);
        }

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        AppControl::Continue
    }
}
