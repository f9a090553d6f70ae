//! Render loop contracts.
//!
//! This module defines the seam between the runner (setup, frame loop,
//! teardown) and the collaborators it drives: the window system, the GPU,
//! and the immediate-mode GUI. Hosts implement the traits in this module; the
//! runner never touches a backend API directly.

mod config;
mod error;
mod geometry;
mod host;
mod runner;

#[cfg(test)]
mod testing;

pub use config::{
    FramePolicy, GuiStyle, OverlayLayout, Panel, RunnerConfig, ShaderSources, WindowConfig,
    DEFAULT_TITLE,
};
pub use error::{InitError, ShaderStage};
pub use geometry::{
    AttributeKind, Primitive, TriangleGeometry, VertexAttribute, POSITION_COMPONENTS,
    TRIANGLE_VERTEX_COUNT,
};
pub use host::{GraphicsDevice, Host, Overlay, Windowing};
pub use runner::{Phase, RenderLoopRunner, RunReport};
