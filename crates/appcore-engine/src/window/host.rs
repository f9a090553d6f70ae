use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::error::OsError;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::core::{
    GraphicsDevice, GuiStyle, InitError, Overlay, OverlayLayout, Primitive, ShaderStage,
    VertexAttribute, WindowConfig, Windowing,
};
use crate::device::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
use crate::gui::GuiLayer;
use crate::paint::Color;
use crate::render::{self, Program, ShaderModule, VertexArray, VertexBuffer};

/// Pump iterations allowed for the platform to deliver `resumed` before
/// window creation gives up.
const CREATE_WINDOW_ATTEMPTS: u32 = 64;
const CREATE_WINDOW_PUMP_TIMEOUT: Duration = Duration::from_millis(16);

/// The window handle the runner holds between creation and destruction.
pub struct HostWindow {
    window: Arc<Window>,
    close_requested: bool,
}

impl HostWindow {
    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

/// Desktop host: winit for windowing and events, wgpu for drawing, imgui for
/// the overlay.
///
/// Events are pumped from the runner's loop instead of handing control to
/// winit, so the whole lifecycle runs on the calling thread. This needs a
/// platform with `pump_app_events` (Windows, macOS, X11, Wayland).
///
/// The GPU object methods require a successful [`GraphicsDevice::init_loader`]
/// and panic otherwise.
pub struct WinitHost {
    gpu_init: GpuInit,

    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<Window>>,
    instance: Option<wgpu::Instance>,
    gpu: Option<Gpu>,
    gui: Option<GuiLayer>,

    clear_color: Color,
    frame: Option<GpuFrame>,
    bound_pipeline: Option<wgpu::RenderPipeline>,
    bound_vertices: Option<(wgpu::Buffer, u32)>,
    surface_lost: bool,
}

impl WinitHost {
    pub fn new(gpu_init: GpuInit) -> Self {
        Self {
            gpu_init,
            event_loop: None,
            window: None,
            instance: None,
            gpu: None,
            gui: None,
            clear_color: Color::TRANSPARENT,
            frame: None,
            bound_pipeline: None,
            bound_vertices: None,
            surface_lost: false,
        }
    }

    fn gpu(&self) -> &Gpu {
        self.gpu
            .as_ref()
            .expect("GPU objects used before the graphics loader was initialized")
    }

    /// Returns the frame being recorded, acquiring one if needed.
    fn frame(&mut self) -> Option<&mut GpuFrame> {
        if self.frame.is_none() {
            let gpu = self.gpu.as_mut()?;
            self.frame = acquire_frame(gpu, &mut self.surface_lost);
        }
        self.frame.as_mut()
    }
}

impl Default for WinitHost {
    fn default() -> Self {
        Self::new(GpuInit::default())
    }
}

fn acquire_frame(gpu: &mut Gpu, surface_lost: &mut bool) -> Option<GpuFrame> {
    // One retry after a reconfigure.
    for _ in 0..2 {
        match gpu.begin_frame() {
            Ok(frame) => return Some(frame),
            Err(err) => match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Reconfigured => continue,
                SurfaceErrorAction::SkipFrame => return None,
                SurfaceErrorAction::Fatal => {
                    log::error!("surface error is not recoverable; closing window");
                    *surface_lost = true;
                    return None;
                }
            },
        }
    }
    None
}

// ── windowing ─────────────────────────────────────────────────────────────

/// Creates the window once the platform reports the app as resumed.
struct WindowCreator {
    attributes: winit::window::WindowAttributes,
    result: Option<Result<Window, OsError>>,
}

impl ApplicationHandler for WindowCreator {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.result.is_none() {
            self.result = Some(event_loop.create_window(self.attributes.clone()));
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

/// Handles one non-blocking pump of pending events.
struct EventPump<'a> {
    window: &'a Window,
    gui: Option<&'a mut GuiLayer>,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

impl ApplicationHandler for EventPump<'_> {
    fn resumed(&mut self, _: &ActiveEventLoop) {}

    fn window_event(&mut self, _: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if window_id != self.window.id() {
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.resized = Some(*size),
            WindowEvent::ScaleFactorChanged { .. } => {
                self.resized = Some(self.window.inner_size());
            }
            _ => {}
        }

        if let Some(gui) = self.gui.as_deref_mut() {
            gui.handle_event(self.window, &Event::WindowEvent { window_id, event });
        }
    }
}

impl Windowing for WinitHost {
    type Window = HostWindow;

    fn init_windowing(&mut self) -> Result<(), InitError> {
        let event_loop = EventLoop::new().map_err(|e| InitError::WindowSystem(e.to_string()))?;
        self.event_loop = Some(event_loop);
        log::debug!("window system initialized");
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<HostWindow, InitError> {
        let event_loop = self
            .event_loop
            .as_mut()
            .ok_or_else(|| InitError::WindowCreation("window system not initialized".into()))?;

        let mut creator = WindowCreator {
            attributes: Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64)),
            result: None,
        };

        for _ in 0..CREATE_WINDOW_ATTEMPTS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(CREATE_WINDOW_PUMP_TIMEOUT), &mut creator)
            {
                return Err(InitError::WindowCreation(format!(
                    "event loop exited with code {code} before the window was created"
                )));
            }
            if creator.result.is_some() {
                break;
            }
        }

        let window = match creator.result {
            Some(Ok(window)) => Arc::new(window),
            Some(Err(e)) => return Err(InitError::WindowCreation(e.to_string())),
            None => {
                return Err(InitError::WindowCreation(
                    "platform never resumed the application".into(),
                ));
            }
        };

        log::info!(
            "created window `{}` ({}x{})",
            config.title,
            config.width,
            config.height
        );
        self.window = Some(window.clone());
        Ok(HostWindow {
            window,
            close_requested: false,
        })
    }

    fn make_context_current(&mut self, window: &HostWindow) {
        if self.instance.is_none() {
            self.instance = Some(wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: self.gpu_init.backends,
                ..Default::default()
            }));
        }
        self.window = Some(window.window.clone());
    }

    fn poll_events(&mut self, window: &mut HostWindow) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            window.close_requested = true;
            return;
        };

        let mut pump = EventPump {
            window: &window.window,
            gui: self.gui.as_mut(),
            close_requested: false,
            resized: None,
        };
        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);

        let EventPump {
            close_requested,
            resized,
            ..
        } = pump;

        if close_requested || matches!(status, PumpStatus::Exit(_)) {
            window.close_requested = true;
        }
        if let (Some(size), Some(gpu)) = (resized, self.gpu.as_mut()) {
            gpu.resize(size);
        }
    }

    fn should_close(&self, window: &HostWindow) -> bool {
        window.close_requested || self.surface_lost
    }

    fn swap_buffers(&mut self, window: &mut HostWindow) {
        let (Some(frame), Some(gpu)) = (self.frame.take(), self.gpu.as_ref()) else {
            return;
        };
        gpu.present(frame, &window.window);
    }

    fn destroy_window(&mut self, window: HostWindow) {
        // A frame still in flight belongs to the surface going away.
        self.frame = None;
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.detach_surface();
        }
        self.window = None;
        drop(window);
        log::debug!("window destroyed");
    }

    fn terminate_windowing(&mut self) {
        self.event_loop = None;
        log::debug!("window system terminated");
    }
}

// ── graphics device ───────────────────────────────────────────────────────

impl GraphicsDevice for WinitHost {
    type Buffer = VertexBuffer;
    type VertexArray = VertexArray;
    type Shader = ShaderModule;
    type Program = Program;

    fn init_loader(&mut self) -> Result<(), InitError> {
        let (Some(instance), Some(window)) = (self.instance.take(), self.window.clone()) else {
            return Err(InitError::GraphicsLoader("no current graphics context".into()));
        };

        let gpu = pollster::block_on(Gpu::new(instance, window, self.gpu_init.clone()))
            .map_err(|e| InitError::GraphicsLoader(format!("{e:#}")))?;
        log::info!("graphics loader ready, surface format {:?}", gpu.surface_format());
        self.gpu = Some(gpu);
        Ok(())
    }

    fn create_vertex_buffer(&mut self, data: &[f32]) -> VertexBuffer {
        VertexBuffer::new(self.gpu().device(), data)
    }

    fn create_vertex_array(&mut self, buffer: &VertexBuffer, attribute: VertexAttribute) -> VertexArray {
        VertexArray::new(buffer, attribute)
    }

    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> ShaderModule {
        let gpu = self.gpu();
        render::compile_shader(gpu.device(), gpu.diagnostics(), stage, source)
    }

    fn compile_status(&self, shader: &ShaderModule) -> Result<(), String> {
        shader.diagnostics().map_or(Ok(()), |log| Err(log.to_string()))
    }

    fn link_program(
        &mut self,
        vertex: &ShaderModule,
        fragment: &ShaderModule,
        input: &VertexAttribute,
    ) -> Program {
        let gpu = self.gpu();
        render::link_program(
            gpu.device(),
            gpu.diagnostics(),
            vertex,
            fragment,
            input,
            gpu.surface_format(),
        )
    }

    fn link_status(&self, program: &Program) -> Result<(), String> {
        program.diagnostics().map_or(Ok(()), |log| Err(log.to_string()))
    }

    fn delete_shader(&mut self, shader: ShaderModule) {
        log::trace!("deleting {} shader", shader.stage());
    }

    fn set_clear_color(&mut self, color: Color) {
        if !color.is_finite() {
            log::warn!("ignoring non-finite clear color {color:?}");
            return;
        }
        self.clear_color = color.clamped();
    }

    fn clear(&mut self) {
        let color = self.clear_color;
        if let Some(frame) = self.frame() {
            render::record_clear(&mut frame.encoder, &frame.view, color);
        }
    }

    fn use_program(&mut self, program: &Program) {
        self.bound_pipeline = program.pipeline().cloned();
    }

    fn bind_vertex_array(&mut self, vertex_array: &VertexArray) {
        self.bound_vertices = Some((vertex_array.buffer().clone(), vertex_array.vertex_count()));
    }

    fn draw_arrays(&mut self, mode: Primitive, first: u32, count: u32) {
        debug_assert_eq!(mode, Primitive::Triangles);
        // An unlinked program draws nothing.
        let (Some(pipeline), Some((vertices, available))) =
            (self.bound_pipeline.clone(), self.bound_vertices.clone())
        else {
            return;
        };
        let end = first.saturating_add(count).min(available);
        if end <= first {
            return;
        }
        if let Some(frame) = self.frame() {
            render::record_draw(&mut frame.encoder, &frame.view, &pipeline, &vertices, first..end);
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArray) {
        self.bound_vertices = None;
        drop(vertex_array);
    }

    fn delete_buffer(&mut self, buffer: VertexBuffer) {
        buffer.buffer().destroy();
    }

    fn delete_program(&mut self, program: Program) {
        self.bound_pipeline = None;
        drop(program);
    }
}

// ── overlay ───────────────────────────────────────────────────────────────

impl Overlay for WinitHost {
    fn create_gui_context(&mut self, style: GuiStyle) {
        self.gui = Some(GuiLayer::new(style));
    }

    fn init_gui_backends(&mut self) {
        let (Some(gui), Some(window), Some(gpu)) =
            (self.gui.as_mut(), self.window.as_ref(), self.gpu.as_ref())
        else {
            log::warn!("gui backends need a context, a window and a GPU");
            return;
        };
        gui.init_backends(window, gpu.device(), gpu.queue(), gpu.surface_format());
    }

    fn build_gui_frame(&mut self, layout: &OverlayLayout) {
        let (Some(gui), Some(window), Some(gpu)) =
            (self.gui.as_mut(), self.window.as_ref(), self.gpu.as_ref())
        else {
            return;
        };
        gui.build_frame(window, gpu.device(), gpu.queue(), layout);
    }

    fn render_gui(&mut self) {
        if self.gui.as_ref().is_none_or(|gui| !gui.has_backends()) {
            return;
        }
        if self.frame().is_none() {
            return;
        }
        if let (Some(gui), Some(frame)) = (self.gui.as_ref(), self.frame.as_mut()) {
            gui.record(&mut frame.encoder, &frame.view);
        }
    }

    fn shutdown_gui_backends(&mut self) {
        if let Some(gui) = self.gui.as_mut() {
            gui.shutdown_backends();
        }
    }

    fn destroy_gui_context(&mut self) {
        self.gui = None;
    }
}
