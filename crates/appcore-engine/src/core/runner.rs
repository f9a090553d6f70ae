use super::config::RunnerConfig;
use super::error::{InitError, ShaderStage};
use super::geometry::{Primitive, TRIANGLE_VERTEX_COUNT, VertexAttribute};
use super::host::{GraphicsDevice, Host, Windowing};

/// Lifecycle of one runner. Traversed once, front to back.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Phase {
    Uninitialized,
    Initializing,
    Running,
    ShuttingDown,
    Terminated,
}

/// Outcome of a run that got past initialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Completed loop iterations (presented frames).
    pub frames: u64,

    /// Non-fatal initialization errors, in the order they were reported.
    pub diagnostics: Vec<InitError>,
}

/// Drives setup, the per-frame draw cycle, and teardown on the calling thread.
///
/// Initialization errors go through one policy: fatal ones (no window system,
/// no window, no GPU loader) stop the sequence, release everything acquired so
/// far, and are returned; shader and link errors are logged, recorded in the
/// report, and the loop still runs.
pub struct RenderLoopRunner {
    config: RunnerConfig,
    phase: Phase,
}

impl RenderLoopRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            phase: Phase::Uninitialized,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Runs the full sequence until the window's close flag is set.
    pub fn run<H: Host>(mut self, host: &mut H) -> Result<RunReport, InitError> {
        self.advance(Phase::Initializing);

        let mut resources = Resources::<H>::empty();
        let mut diagnostics = Vec::new();

        if let Err(err) = self.initialize(host, &mut resources, &mut diagnostics) {
            log::error!("{err}");
            self.advance(Phase::ShuttingDown);
            resources.release(host);
            self.advance(Phase::Terminated);
            return Err(err);
        }

        self.advance(Phase::Running);
        let frames = self.render_loop(host, &mut resources);
        log::info!("render loop exited after {frames} frames");

        self.advance(Phase::ShuttingDown);
        resources.release(host);
        self.advance(Phase::Terminated);

        Ok(RunReport { frames, diagnostics })
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phase {:?} -> {:?}", self.phase, next);
        log::debug!("runner phase: {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn initialize<H: Host>(
        &self,
        host: &mut H,
        resources: &mut Resources<H>,
        diagnostics: &mut Vec<InitError>,
    ) -> Result<(), InitError> {
        let cfg = &self.config;

        host.init_windowing()?;
        resources.windowing = true;

        let window = host.create_window(&cfg.window)?;
        host.make_context_current(&window);
        resources.window = Some(window);

        host.init_loader()?;

        host.create_gui_context(cfg.overlay.style);
        resources.gui_context = true;
        host.init_gui_backends();
        resources.gui_backends = true;

        let attribute = VertexAttribute::position();
        let buffer = host.create_vertex_buffer(cfg.geometry.as_floats());
        resources.vertex_array = Some(host.create_vertex_array(&buffer, attribute));
        resources.buffer = Some(buffer);

        let vertex = host.compile_shader(ShaderStage::Vertex, &cfg.shaders.vertex);
        triage(
            host.compile_status(&vertex)
                .map_err(|log| InitError::ShaderCompile { stage: ShaderStage::Vertex, log }),
            diagnostics,
        )?;

        let fragment = host.compile_shader(ShaderStage::Fragment, &cfg.shaders.fragment);
        triage(
            host.compile_status(&fragment)
                .map_err(|log| InitError::ShaderCompile { stage: ShaderStage::Fragment, log }),
            diagnostics,
        )?;

        let program = host.link_program(&vertex, &fragment, &attribute);
        let linked = host.link_status(&program).map_err(|log| InitError::ProgramLink { log });
        resources.program = Some(program);
        triage(linked, diagnostics)?;

        host.delete_shader(vertex);
        host.delete_shader(fragment);

        Ok(())
    }

    fn render_loop<H: Host>(&self, host: &mut H, resources: &mut Resources<H>) -> u64 {
        let Resources { window, vertex_array, program, .. } = resources;
        let Some(window) = window.as_mut() else { return 0 };

        let cfg = &self.config;
        let mut frames = 0u64;

        while !host.should_close(window) {
            host.poll_events(window);

            if cfg.frame.redundant_clear {
                host.clear();
            }

            host.build_gui_frame(&cfg.overlay);

            host.set_clear_color(cfg.clear_color);
            host.clear();

            if let (Some(program), Some(vertex_array)) = (program.as_ref(), vertex_array.as_ref()) {
                host.use_program(program);
                host.bind_vertex_array(vertex_array);
                host.draw_arrays(Primitive::Triangles, 0, TRIANGLE_VERTEX_COUNT);
            }

            host.render_gui();
            host.swap_buffers(window);

            frames += 1;
        }

        frames
    }
}

/// Applies the initialization error policy to one step's result.
///
/// Fatal errors pass through for the caller to abort on; anything else is
/// logged and recorded.
fn triage(result: Result<(), InitError>, diagnostics: &mut Vec<InitError>) -> Result<(), InitError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            log::error!("{err}");
            diagnostics.push(err);
            Ok(())
        }
    }
}

/// Everything acquired during initialization, released in teardown order.
struct Resources<H: Host> {
    windowing: bool,
    window: Option<<H as Windowing>::Window>,
    gui_context: bool,
    gui_backends: bool,
    buffer: Option<<H as GraphicsDevice>::Buffer>,
    vertex_array: Option<<H as GraphicsDevice>::VertexArray>,
    program: Option<<H as GraphicsDevice>::Program>,
}

impl<H: Host> Resources<H> {
    fn empty() -> Self {
        Self {
            windowing: false,
            window: None,
            gui_context: false,
            gui_backends: false,
            buffer: None,
            vertex_array: None,
            program: None,
        }
    }

    /// GUI backends, GUI context, window, window system, then the vertex
    /// array, vertex buffer and program. Steps that were never acquired are
    /// skipped.
    fn release(self, host: &mut H) {
        if self.gui_backends {
            host.shutdown_gui_backends();
        }
        if self.gui_context {
            host.destroy_gui_context();
        }
        if let Some(window) = self.window {
            host.destroy_window(window);
        }
        if self.windowing {
            host.terminate_windowing();
        }
        if let Some(vertex_array) = self.vertex_array {
            host.delete_vertex_array(vertex_array);
        }
        if let Some(buffer) = self.buffer {
            host.delete_buffer(buffer);
        }
        if let Some(program) = self.program {
            host.delete_program(program);
        }
    }
}
