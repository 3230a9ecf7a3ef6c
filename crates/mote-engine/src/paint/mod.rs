//! Color model shared by the host and the batch renderer.
//!
//! Colors are stored premultiplied; the batch tint uniform takes straight RGB
//! via [`Color::rgb`].

pub mod color;

pub use color::Color;
