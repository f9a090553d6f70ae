use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, SurfaceErrorAction};
use super::{DiagnosticSink, GpuInit};

/// A single acquired frame being recorded.
///
/// Holding the surface texture blocks acquisition of the next one, so a frame
/// lives from the first clear of a loop iteration until the swap.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// The device side of the window: adapter, device, queue and the surface
/// they present to.
///
/// The surface can be detached before the device goes away, so GPU objects
/// created on the device may outlive the window.
pub struct Gpu {
    _instance: wgpu::Instance,
    /// `None` once detached.
    surface: Option<wgpu::Surface<'static>>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    /// Physical pixels; may be 0x0 while minimized.
    size: PhysicalSize<u32>,
    diagnostics: DiagnosticSink,
}

impl Gpu {
    /// Acquires an adapter and device compatible with `window` and configures
    /// its surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(instance: wgpu::Instance, window: Arc<Window>, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();

        let GpuInit {
            backends: _,
            power_preference,
            features,
            limits,
            surface: options,
        } = init;

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter `{}` ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("appcore device"),
                required_features: features,
                required_limits: limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let diagnostics = DiagnosticSink::new();
        diagnostics.install(&device);

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps.formats, options.srgb)
            .context("no supported surface formats")?;
        let alpha_mode = surface::choose_alpha_mode(&surface_caps.alpha_modes, options.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: options.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: options.max_frame_latency,
        };

        if size.width > 0 && size.height > 0 {
            surface.configure(&device, &config);
        }

        Ok(Self {
            _instance: instance,
            surface: Some(surface),
            adapter,
            device,
            queue,
            config,
            size,
            diagnostics,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    /// Sink receiving this device's validation errors.
    pub fn diagnostics(&self) -> &DiagnosticSink {
        &self.diagnostics
    }

    /// Reconfigures the surface after a resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(surface) = self.surface.as_ref() else { return };
        surface::apply_resize(surface, &self.device, &mut self.config, &mut self.size, new_size);
    }

    /// Drops the surface. Frames can no longer be acquired afterwards.
    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    /// Acquires the next surface texture and creates an encoder.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(SurfaceError::Lost);
        };
        if self.size.width == 0 || self.size.height == 0 {
            return Err(SurfaceError::Outdated);
        }

        let surface_texture = surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("appcore frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and presents the frame.
    pub fn present(&self, frame: GpuFrame, window: &Window) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        window.pre_present_notify();
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when that is what the error calls for.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let Some(surface) = self.surface.as_ref() else {
            return SurfaceErrorAction::SkipFrame;
        };

        let action = surface::classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured {
            if self.size.width == 0 || self.size.height == 0 {
                return SurfaceErrorAction::SkipFrame;
            }
            surface.configure(&self.device, &self.config);
        }
        action
    }
}
