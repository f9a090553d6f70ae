//! App-core engine crate.
//!
//! A single-window render loop: a window with a graphics surface, one
//! triangle drawn with a minimal shader pair, and an immediate-mode GUI
//! overlay on top.
//!
//! - `core`: the runner and the host traits it drives
//! - `window`: the winit + wgpu + imgui host
//! - `device`, `render`, `gui`: the GPU side of that host

pub mod core;
pub mod device;
pub mod gui;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;

pub use crate::core::{InitError, RenderLoopRunner, RunReport, RunnerConfig};
pub use crate::window::WinitHost;
