//! Immediate-mode GUI overlay (imgui).
//!
//! - `layer`: imgui context, winit input backend, per-frame declaration
//! - `renderer`: wgpu backend drawing imgui draw data over the frame
//! - `mesh`: vertex layout, projection and scissor math

mod layer;
mod mesh;
mod renderer;

pub use layer::GuiLayer;
pub use renderer::{GuiRenderer, FONT_TEXTURE_ID};
