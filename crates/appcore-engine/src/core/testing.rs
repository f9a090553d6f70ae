//! Recording host used by the runner tests.

use std::collections::HashMap;

use crate::paint::Color;

use super::config::{GuiStyle, OverlayLayout, WindowConfig};
use super::error::{InitError, ShaderStage};
use super::geometry::{Primitive, VertexAttribute};
use super::host::{GraphicsDevice, Overlay, Windowing};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InitWindowing,
    CreateWindow { title: String, width: u32, height: u32 },
    MakeContextCurrent,
    PollEvents,
    SwapBuffers,
    DestroyWindow,
    TerminateWindowing,

    InitLoader,
    CreateVertexBuffer { id: u32, floats: usize },
    CreateVertexArray { id: u32, buffer: u32, location: u32 },
    CompileShader { id: u32, stage: ShaderStage },
    LinkProgram { id: u32 },
    DeleteShader(u32),
    SetClearColor(Color),
    Clear,
    UseProgram(u32),
    BindVertexArray(u32),
    DrawArrays { mode: Primitive, first: u32, count: u32 },
    DeleteVertexArray(u32),
    DeleteBuffer(u32),
    DeleteProgram(u32),

    CreateGuiContext(GuiStyle),
    InitGuiBackends,
    GuiBackendNewFrame,
    GuiWindowingNewFrame,
    GuiNewFrame,
    DeclarePanel(String),
    DeclareDemoWindow,
    FinalizeGui,
    RenderGui,
    ShutdownGuiBackends,
    DestroyGuiContext,
}

/// State captured at each draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub mode: Primitive,
    pub first: u32,
    pub count: u32,
    pub vertex_data: Vec<f32>,
    pub attribute: VertexAttribute,
    pub program_linked: bool,
}

#[derive(Debug)]
pub struct MockWindow;

#[derive(Debug)]
pub struct MockBuffer(u32);

#[derive(Debug)]
pub struct MockVertexArray {
    id: u32,
}

#[derive(Debug)]
pub struct MockShader {
    id: u32,
    log: Option<String>,
}

#[derive(Debug)]
pub struct MockProgram {
    id: u32,
    log: Option<String>,
}

/// Host that records every call and simulates failures on request.
#[derive(Debug, Default)]
pub struct MockHost {
    pub calls: Vec<Call>,
    pub draws: Vec<DrawRecord>,

    fail_windowing: bool,
    fail_window: bool,
    fail_loader: bool,
    fail_link: bool,
    close_after: u64,
    polls: u64,

    next_id: u32,
    buffers: HashMap<u32, Vec<f32>>,
    vertex_arrays: HashMap<u32, (u32, VertexAttribute)>,
    programs: HashMap<u32, bool>,
    bound_program: Option<u32>,
    bound_vertex_array: Option<u32>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_windowing(mut self) -> Self {
        self.fail_windowing = true;
        self
    }

    pub fn fail_window(mut self) -> Self {
        self.fail_window = true;
        self
    }

    pub fn fail_loader(mut self) -> Self {
        self.fail_loader = true;
        self
    }

    pub fn fail_link(mut self) -> Self {
        self.fail_link = true;
        self
    }

    /// Sets the close flag once `frames` event polls have happened.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = frames;
        self
    }

    /// Ids of GPU objects created and not yet deleted.
    pub fn live_objects(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .buffers
            .keys()
            .chain(self.vertex_arrays.keys())
            .chain(self.programs.keys())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl Windowing for MockHost {
    type Window = MockWindow;

    fn init_windowing(&mut self) -> Result<(), InitError> {
        self.calls.push(Call::InitWindowing);
        if self.fail_windowing {
            return Err(InitError::WindowSystem("no display available".into()));
        }
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<MockWindow, InitError> {
        self.calls.push(Call::CreateWindow {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        });
        if self.fail_window {
            return Err(InitError::WindowCreation("window request denied".into()));
        }
        Ok(MockWindow)
    }

    fn make_context_current(&mut self, _window: &MockWindow) {
        self.calls.push(Call::MakeContextCurrent);
    }

    fn poll_events(&mut self, _window: &mut MockWindow) {
        self.calls.push(Call::PollEvents);
        self.polls += 1;
    }

    fn should_close(&self, _window: &MockWindow) -> bool {
        self.polls >= self.close_after
    }

    fn swap_buffers(&mut self, _window: &mut MockWindow) {
        self.calls.push(Call::SwapBuffers);
    }

    fn destroy_window(&mut self, _window: MockWindow) {
        self.calls.push(Call::DestroyWindow);
    }

    fn terminate_windowing(&mut self) {
        self.calls.push(Call::TerminateWindowing);
    }
}

impl GraphicsDevice for MockHost {
    type Buffer = MockBuffer;
    type VertexArray = MockVertexArray;
    type Shader = MockShader;
    type Program = MockProgram;

    fn init_loader(&mut self) -> Result<(), InitError> {
        self.calls.push(Call::InitLoader);
        if self.fail_loader {
            return Err(InitError::GraphicsLoader("no compatible adapter".into()));
        }
        Ok(())
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> MockBuffer {
        let id = self.alloc_id();
        self.calls.push(Call::CreateVertexBuffer { id, floats: data.len() });
        self.buffers.insert(id, data.to_vec());
        MockBuffer(id)
    }

    fn create_vertex_array(
        &mut self,
        buffer: &MockBuffer,
        attribute: VertexAttribute,
    ) -> MockVertexArray {
        let id = self.alloc_id();
        self.calls.push(Call::CreateVertexArray {
            id,
            buffer: buffer.0,
            location: attribute.location,
        });
        self.vertex_arrays.insert(id, (buffer.0, attribute));
        MockVertexArray { id }
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> MockShader {
        let id = self.alloc_id();
        self.calls.push(Call::CompileShader { id, stage });

        let marker = match stage {
            ShaderStage::Vertex => "@vertex",
            ShaderStage::Fragment => "@fragment",
        };
        let log = (!source.contains(marker))
            .then(|| format!("error: no {marker} entry point found in module"));

        MockShader { id, log }
    }

    fn compile_status(&self, shader: &MockShader) -> Result<(), String> {
        shader.log.clone().map_or(Ok(()), Err)
    }

    fn link_program(
        &mut self,
        vertex: &MockShader,
        fragment: &MockShader,
        _input: &VertexAttribute,
    ) -> MockProgram {
        let id = self.alloc_id();
        self.calls.push(Call::LinkProgram { id });

        let log = if vertex.log.is_some() || fragment.log.is_some() {
            Some("error: attached shader stage is not compiled".to_string())
        } else if self.fail_link {
            Some("error: vertex output does not match fragment input".to_string())
        } else {
            None
        };

        self.programs.insert(id, log.is_none());
        MockProgram { id, log }
    }

    fn link_status(&self, program: &MockProgram) -> Result<(), String> {
        program.log.clone().map_or(Ok(()), Err)
    }

    fn delete_shader(&mut self, shader: MockShader) {
        self.calls.push(Call::DeleteShader(shader.id));
    }

    fn set_clear_color(&mut self, color: Color) {
        self.calls.push(Call::SetClearColor(color));
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn use_program(&mut self, program: &MockProgram) {
        self.calls.push(Call::UseProgram(program.id));
        self.bound_program = Some(program.id);
    }

    fn bind_vertex_array(&mut self, vertex_array: &MockVertexArray) {
        self.calls.push(Call::BindVertexArray(vertex_array.id));
        self.bound_vertex_array = Some(vertex_array.id);
    }

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32) {
        self.calls.push(Call::DrawArrays { mode, first, count });

        let (vertex_data, attribute) = self
            .bound_vertex_array
            .and_then(|vao| self.vertex_arrays.get(&vao))
            .map(|(buffer, attribute)| {
                (self.buffers.get(buffer).cloned().unwrap_or_default(), *attribute)
            })
            .unwrap_or((Vec::new(), VertexAttribute::position()));

        let program_linked = self
            .bound_program
            .and_then(|p| self.programs.get(&p).copied())
            .unwrap_or(false);

        self.draws.push(DrawRecord {
            mode,
            first,
            count,
            vertex_data,
            attribute,
            program_linked,
        });
    }

    fn delete_vertex_array(&mut self, vertex_array: MockVertexArray) {
        self.calls.push(Call::DeleteVertexArray(vertex_array.id));
        self.vertex_arrays.remove(&vertex_array.id);
    }

    fn delete_buffer(&mut self, buffer: MockBuffer) {
        self.calls.push(Call::DeleteBuffer(buffer.0));
        self.buffers.remove(&buffer.0);
    }

    fn delete_program(&mut self, program: MockProgram) {
        self.calls.push(Call::DeleteProgram(program.id));
        self.programs.remove(&program.id);
    }
}

impl Overlay for MockHost {
    fn create_gui_context(&mut self, style: GuiStyle) {
        self.calls.push(Call::CreateGuiContext(style));
    }

    fn init_gui_backends(&mut self) {
        self.calls.push(Call::InitGuiBackends);
    }

    fn build_gui_frame(&mut self, layout: &OverlayLayout) {
        self.calls.push(Call::GuiBackendNewFrame);
        self.calls.push(Call::GuiWindowingNewFrame);
        self.calls.push(Call::GuiNewFrame);
        for panel in &layout.panels {
            self.calls.push(Call::DeclarePanel(panel.title.clone()));
        }
        if layout.show_demo_window {
            self.calls.push(Call::DeclareDemoWindow);
        }
        self.calls.push(Call::FinalizeGui);
    }

    fn render_gui(&mut self) {
        self.calls.push(Call::RenderGui);
    }

    fn shutdown_gui_backends(&mut self) {
        self.calls.push(Call::ShutdownGuiBackends);
    }

    fn destroy_gui_context(&mut self) {
        self.calls.push(Call::DestroyGuiContext);
    }
}
