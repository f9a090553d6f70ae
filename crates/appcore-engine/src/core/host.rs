use crate::paint::Color;

use super::config::{GuiStyle, OverlayLayout, WindowConfig};
use super::error::{InitError, ShaderStage};
use super::geometry::{Primitive, VertexAttribute};

/// Window + event subsystem.
///
/// All calls happen on the thread that owns the host.
pub trait Windowing {
    /// Opaque window handle. Consumed by [`Windowing::destroy_window`].
    type Window;

    fn init_windowing(&mut self) -> Result<(), InitError>;

    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, InitError>;

    /// Binds the window's graphics context to the calling thread.
    fn make_context_current(&mut self, window: &Self::Window);

    /// Processes pending events without blocking.
    fn poll_events(&mut self, window: &mut Self::Window);

    fn should_close(&self, window: &Self::Window) -> bool;

    /// Presents the back buffer.
    fn swap_buffers(&mut self, window: &mut Self::Window);

    fn destroy_window(&mut self, window: Self::Window);

    fn terminate_windowing(&mut self);
}

/// GPU function loader and driver surface.
///
/// Object handles are opaque and each one is consumed by its delete call.
pub trait GraphicsDevice {
    type Buffer;
    type VertexArray;
    type Shader;
    type Program;

    /// Resolves the GPU entry points for the current context.
    fn init_loader(&mut self) -> Result<(), InitError>;

    /// Uploads immutable vertex data.
    fn create_vertex_buffer(&mut self, data: &[f32]) -> Self::Buffer;

    /// Describes how `buffer` feeds the shader input at `attribute.location`.
    fn create_vertex_array(
        &mut self,
        buffer: &Self::Buffer,
        attribute: VertexAttribute,
    ) -> Self::VertexArray;

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Self::Shader;

    /// Returns the compiler diagnostics if compilation failed.
    fn compile_status(&self, shader: &Self::Shader) -> Result<(), String>;

    fn link_program(
        &mut self,
        vertex: &Self::Shader,
        fragment: &Self::Shader,
        input: &VertexAttribute,
    ) -> Self::Program;

    /// Returns the linker diagnostics if linking failed.
    fn link_status(&self, program: &Self::Program) -> Result<(), String>;

    fn delete_shader(&mut self, shader: Self::Shader);

    fn set_clear_color(&mut self, color: Color);

    /// Clears the color buffer to the current clear color.
    fn clear(&mut self);

    fn use_program(&mut self, program: &Self::Program);

    fn bind_vertex_array(&mut self, vertex_array: &Self::VertexArray);

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32);

    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);

    fn delete_buffer(&mut self, buffer: Self::Buffer);

    fn delete_program(&mut self, program: Self::Program);
}

/// Immediate-mode GUI library together with its windowing and GPU backends.
pub trait Overlay {
    fn create_gui_context(&mut self, style: GuiStyle);

    /// Hooks the GUI library to the window and the graphics backend.
    fn init_gui_backends(&mut self);

    /// Runs one GUI frame: backend, windowing and library new-frame (in that
    /// order), declares `layout`, then finalizes the draw data.
    fn build_gui_frame(&mut self, layout: &OverlayLayout);

    /// Draws the finalized GUI draw data over the current frame.
    fn render_gui(&mut self);

    fn shutdown_gui_backends(&mut self);

    fn destroy_gui_context(&mut self);
}

/// Everything the render loop talks to.
pub trait Host: Windowing + GraphicsDevice + Overlay {}

impl<T> Host for T where T: Windowing + GraphicsDevice + Overlay {}
