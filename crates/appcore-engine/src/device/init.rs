/// How the surface presents frames.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// Pick an sRGB-encoding format when one is offered.
    ///
    /// Off by default: clear colors and GUI vertex colors are authored for a
    /// framebuffer that stores values without sRGB encoding.
    pub srgb: bool,

    /// FIFO waits for vblank, which is the only frame pacing the loop has.
    pub present_mode: wgpu::PresentMode,

    /// Used when the surface supports it, otherwise the first supported mode.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Hint for how many frames may be queued ahead of presentation.
    pub max_frame_latency: u32,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            max_frame_latency: 2,
        }
    }
}

/// Parameters for bringing up the GPU behind a window.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub features: wgpu::Features,
    pub limits: wgpu::Limits,
    pub surface: SurfaceOptions,
}

impl GpuInit {
    pub fn backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.surface.present_mode = mode;
        self
    }

    pub fn srgb(mut self, on: bool) -> Self {
        self.surface.srgb = on;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            surface: SurfaceOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_vsync_without_srgb() {
        let init = GpuInit::default();
        assert_eq!(init.surface.present_mode, wgpu::PresentMode::Fifo);
        assert!(!init.surface.srgb);
        assert_eq!(init.surface.max_frame_latency, 2);
    }

    #[test]
    fn setters_touch_only_their_field() {
        let init = GpuInit::default()
            .srgb(true)
            .present_mode(wgpu::PresentMode::Mailbox)
            .backends(wgpu::Backends::VULKAN);
        assert!(init.surface.srgb);
        assert_eq!(init.surface.present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(init.backends, wgpu::Backends::VULKAN);
        assert_eq!(init.power_preference, wgpu::PowerPreference::HighPerformance);
    }
}
