//! Color representation shared by the renderer and its backends.
//!
//! Colors are linear with premultiplied alpha.

pub mod color;

pub use color::Color;
