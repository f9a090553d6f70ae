//! Desktop host.
//!
//! Owns the `winit` event loop and window, the wgpu device, and the imgui
//! overlay, and exposes them to the render loop through the host traits.

mod host;

pub use host::{HostWindow, WinitHost};
