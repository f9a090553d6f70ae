//! Color values handed to the GPU.

pub mod color;

pub use color::Color;
