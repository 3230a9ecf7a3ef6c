//! Mote engine crate.
//!
//! Quad batching on top of wgpu, plus the window/GPU runtime that drives it.
//!
//! - [`batch`]: fixed-capacity vertex/index batching and the flush protocol
//! - [`render`]: the wgpu backend the batch flushes into
//! - [`scene`]: shapes that map onto a single batch quad
//! - [`window`] / [`core`]: event loop and application contract

pub mod batch;
pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
