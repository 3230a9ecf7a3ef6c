//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring, clearing and presenting frames

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit};
pub use surface::SurfaceErrorAction;
