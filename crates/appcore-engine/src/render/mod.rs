//! Triangle rendering on wgpu.
//!
//! Maps the driver-level objects of the render loop onto wgpu:
//! - vertex buffer / vertex array → `wgpu::Buffer` + `VertexBufferLayout`
//! - shader stage → `wgpu::ShaderModule` (one WGSL source per stage)
//! - linked program → `wgpu::RenderPipeline`
//! - clear / draw → one render pass each on the frame encoder

mod mesh;
mod pass;
mod program;

pub use mesh::{vertex_format, VertexArray, VertexBuffer};
pub use pass::{record_clear, record_draw};
pub use program::{compile_shader, link_program, Program, ShaderModule};
