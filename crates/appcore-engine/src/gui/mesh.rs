//! CPU-side shapes of imgui draw data: vertices, projection, scissor rects.

use bytemuck::{Pod, Zeroable};

/// One imgui vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct GuiVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4], // RGBA8, unorm
}

impl GuiVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Unorm8x4];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GuiVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<&imgui::DrawVert> for GuiVertex {
    fn from(v: &imgui::DrawVert) -> Self {
        Self {
            pos: v.pos,
            uv: v.uv,
            color: v.col,
        }
    }
}

/// Maps imgui display coordinates (origin top-left, y down) to clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(super) struct Projection {
    pub scale: [f32; 2],
    pub translate: [f32; 2],
}

impl Projection {
    pub(super) fn new(display_pos: [f32; 2], display_size: [f32; 2]) -> Self {
        let w = display_size[0].max(1.0);
        let h = display_size[1].max(1.0);
        let scale = [2.0 / w, -2.0 / h];
        Self {
            scale,
            translate: [
                -1.0 - display_pos[0] * scale[0],
                1.0 - display_pos[1] * scale[1],
            ],
        }
    }
}

/// Scissor rectangle `[x, y, width, height]` in framebuffer pixels, or `None`
/// if the clip rect falls outside the framebuffer.
pub(super) fn scissor_rect(
    clip_rect: [f32; 4],
    display_pos: [f32; 2],
    framebuffer_scale: [f32; 2],
    framebuffer_size: [u32; 2],
) -> Option<[u32; 4]> {
    let [fb_w, fb_h] = framebuffer_size;

    let x0 = ((clip_rect[0] - display_pos[0]) * framebuffer_scale[0]).max(0.0);
    let y0 = ((clip_rect[1] - display_pos[1]) * framebuffer_scale[1]).max(0.0);
    let x1 = ((clip_rect[2] - display_pos[0]) * framebuffer_scale[0]).min(fb_w as f32);
    let y1 = ((clip_rect[3] - display_pos[1]) * framebuffer_scale[1]).min(fb_h as f32);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let x = x0 as u32;
    let y = y0 as u32;
    let w = (x1 as u32).saturating_sub(x);
    let h = (y1 as u32).saturating_sub(y);
    (w > 0 && h > 0).then_some([x, y, w, h])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(p: &Projection, pos: [f32; 2]) -> [f32; 2] {
        [
            pos[0] * p.scale[0] + p.translate[0],
            pos[1] * p.scale[1] + p.translate[1],
        ]
    }

    fn assert_near(got: [f32; 2], want: [f32; 2]) {
        for (g, w) in got.into_iter().zip(want) {
            assert!((g - w).abs() < 1e-5, "{got:?} != {want:?}");
        }
    }

    #[test]
    fn vertex_is_twenty_bytes() {
        assert_eq!(std::mem::size_of::<GuiVertex>(), 20);
        assert_eq!(std::mem::size_of::<GuiVertex>(), std::mem::size_of::<imgui::DrawVert>());
    }

    #[test]
    fn projection_maps_display_corners_to_clip_corners() {
        let p = Projection::new([0.0, 0.0], [1280.0, 960.0]);
        assert_near(apply(&p, [0.0, 0.0]), [-1.0, 1.0]);
        assert_near(apply(&p, [1280.0, 960.0]), [1.0, -1.0]);
    }

    #[test]
    fn projection_accounts_for_display_offset() {
        let p = Projection::new([100.0, 50.0], [200.0, 100.0]);
        assert_near(apply(&p, [100.0, 50.0]), [-1.0, 1.0]);
        assert_near(apply(&p, [300.0, 150.0]), [1.0, -1.0]);
    }

    #[test]
    fn scissor_scales_by_framebuffer_scale() {
        let r = scissor_rect([10.0, 20.0, 110.0, 70.0], [0.0, 0.0], [2.0, 2.0], [1000, 1000]);
        assert_eq!(r, Some([20, 40, 200, 100]));
    }

    #[test]
    fn scissor_is_clamped_to_framebuffer() {
        let r = scissor_rect([-50.0, -50.0, 5000.0, 40.0], [0.0, 0.0], [1.0, 1.0], [640, 480]);
        assert_eq!(r, Some([0, 0, 640, 40]));
    }

    #[test]
    fn offscreen_clip_rect_is_skipped() {
        let r = scissor_rect([700.0, 0.0, 800.0, 10.0], [0.0, 0.0], [1.0, 1.0], [640, 480]);
        assert_eq!(r, None);
    }
}
