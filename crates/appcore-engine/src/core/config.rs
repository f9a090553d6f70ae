use crate::paint::Color;

use super::geometry::TriangleGeometry;

/// Window title used by [`WindowConfig::default`].
pub const DEFAULT_TITLE: &str = "App-Core Graphics Template";

/// Window creation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: 1280,
            height: 960,
        }
    }
}

/// Source text for the two programmable stages.
///
/// Each stage is compiled on its own and must contain exactly one entry point
/// for that stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: include_str!("../render/shaders/triangle.vert.wgsl").to_string(),
            fragment: include_str!("../render/shaders/triangle.frag.wgsl").to_string(),
        }
    }
}

/// Built-in color scheme applied when the GUI context is created.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum GuiStyle {
    #[default]
    Dark,
    Light,
    Classic,
}

/// A GUI window declared every frame with static text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub lines: Vec<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), lines: Vec::new() }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push(text.into());
        self
    }
}

/// What the overlay declares each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub style: GuiStyle,
    pub panels: Vec<Panel>,
    /// Declares the GUI library's built-in showcase window.
    pub show_demo_window: bool,
}

impl Default for OverlayLayout {
    fn default() -> Self {
        Self {
            style: GuiStyle::Dark,
            panels: vec![Panel::new("Hello, world!").line("Bla bla bla bla bla. ^^;")],
            show_demo_window: true,
        }
    }
}

/// Per-frame command policy.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FramePolicy {
    /// Clears the color buffer at the top of the frame as well as right before
    /// the triangle draw. The first clear is always overwritten.
    pub redundant_clear: bool,
}

impl Default for FramePolicy {
    fn default() -> Self {
        Self { redundant_clear: true }
    }
}

/// Everything the render loop needs, fixed for the lifetime of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub window: WindowConfig,
    pub shaders: ShaderSources,
    /// Color the frame is cleared to before the triangle is drawn.
    pub clear_color: Color,
    pub geometry: TriangleGeometry,
    pub overlay: OverlayLayout,
    pub frame: FramePolicy,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            shaders: ShaderSources::default(),
            clear_color: Color::new(0.45, 0.55, 0.60, 1.00),
            geometry: TriangleGeometry::default(),
            overlay: OverlayLayout::default(),
            frame: FramePolicy::default(),
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    pub fn shaders(mut self, vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.shaders = ShaderSources {
            vertex: vertex.into(),
            fragment: fragment.into(),
        };
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn geometry(mut self, geometry: TriangleGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn overlay(mut self, overlay: OverlayLayout) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn redundant_clear(mut self, enabled: bool) -> Self {
        self.frame.redundant_clear = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_matches_template() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.window.title, "App-Core Graphics Template");
        assert_eq!((cfg.window.width, cfg.window.height), (1280, 960));
    }

    #[test]
    fn default_overlay_has_hello_panel_and_demo() {
        let overlay = OverlayLayout::default();
        assert_eq!(overlay.panels.len(), 1);
        assert_eq!(overlay.panels[0].title, "Hello, world!");
        assert_eq!(overlay.panels[0].lines, vec!["Bla bla bla bla bla. ^^;".to_string()]);
        assert!(overlay.show_demo_window);
        assert_eq!(overlay.style, GuiStyle::Dark);
    }

    #[test]
    fn default_shaders_have_one_entry_point_each() {
        let shaders = ShaderSources::default();
        assert!(shaders.vertex.contains("@vertex"));
        assert!(!shaders.vertex.contains("@fragment"));
        assert!(shaders.fragment.contains("@fragment"));
        assert!(!shaders.fragment.contains("@vertex"));
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = RunnerConfig::new()
            .title("t")
            .size(640, 480)
            .clear_color(Color::new(1.0, 0.0, 0.0, 1.0))
            .redundant_clear(false);
        assert_eq!(cfg.window.title, "t");
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.window.height, 480);
        assert_eq!(cfg.clear_color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert!(!cfg.frame.redundant_clear);
    }
}
