use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::window::Window;

use crate::core::{GuiStyle, OverlayLayout};
use crate::time::FrameClock;

use super::renderer::GuiRenderer;

/// Platform and renderer halves of the overlay, alive between backend init
/// and shutdown.
struct Backends {
    platform: WinitPlatform,
    renderer: GuiRenderer,
}

/// Immediate-mode overlay: one imgui context plus its winit and wgpu backends.
pub struct GuiLayer {
    context: imgui::Context,
    backends: Option<Backends>,
    clock: FrameClock,
}

impl GuiLayer {
    /// Creates the context with `style` applied. No settings file is read or
    /// written.
    pub fn new(style: GuiStyle) -> Self {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None);
        apply_style(context.style_mut(), style);

        Self {
            context,
            backends: None,
            clock: FrameClock::new(),
        }
    }

    pub fn has_backends(&self) -> bool {
        self.backends.is_some()
    }

    /// Connects the context to `window` for input and to `device` for drawing.
    pub fn init_backends(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) {
        let mut platform = WinitPlatform::new(&mut self.context);
        platform.attach_window(self.context.io_mut(), window, HiDpiMode::Default);

        let renderer = GuiRenderer::new(&mut self.context, device, queue, target_format);

        self.backends = Some(Backends { platform, renderer });
        self.clock.reset();
        log::debug!("gui backends initialized");
    }

    pub fn shutdown_backends(&mut self) {
        if self.backends.take().is_some() {
            log::debug!("gui backends shut down");
        }
    }

    /// Forwards one window event to the input backend.
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::Event<()>) {
        if let Some(backends) = self.backends.as_mut() {
            backends.platform.handle_event(self.context.io_mut(), window, event);
        }
    }

    /// Starts a frame, declares `layout`, finalizes it and uploads the result.
    pub fn build_frame(
        &mut self,
        window: &Window,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &OverlayLayout,
    ) {
        let Some(backends) = self.backends.as_mut() else { return };

        if let Err(e) = backends.platform.prepare_frame(self.context.io_mut(), window) {
            log::warn!("gui: failed to prepare frame: {e}");
        }
        let dt = self.clock.tick().dt;
        self.context.io_mut().update_delta_time(dt);

        let ui = self.context.new_frame();
        for panel in &layout.panels {
            ui.window(&panel.title).build(|| {
                for line in &panel.lines {
                    ui.text(line);
                }
            });
        }
        if layout.show_demo_window {
            // Reopened every frame: the showcase has no close state of its own.
            let mut open = true;
            ui.show_demo_window(&mut open);
        }
        backends.platform.prepare_render(ui, window);

        let size = window.inner_size();
        let draw_data = self.context.render();
        backends
            .renderer
            .prepare(device, queue, draw_data, [size.width, size.height]);
    }

    /// Records the last built frame over `view`.
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        if let Some(backends) = self.backends.as_ref() {
            backends.renderer.record(encoder, view);
        }
    }
}

fn apply_style(style: &mut imgui::Style, choice: GuiStyle) {
    match choice {
        GuiStyle::Dark => style.use_dark_colors(),
        GuiStyle::Light => style.use_light_colors(),
        GuiStyle::Classic => style.use_classic_colors(),
    };
}
