use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// Lifecycle: `start` once the window and GPU exist, then `update` on every
/// redraw until either callback asks to exit.
pub trait App {
    /// Called once before the first frame. An error aborts the runtime.
    fn start(&mut self, ctx: &mut StartCtx<'_, '_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn update(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
