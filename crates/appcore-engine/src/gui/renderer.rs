use wgpu::util::DeviceExt;

use super::mesh::{GuiVertex, Projection, scissor_rect};

/// Texture id the font atlas is registered under.
pub const FONT_TEXTURE_ID: usize = 0;

/// One scissored, indexed draw.
#[derive(Debug, Clone, PartialEq)]
struct GuiDraw {
    scissor: [u32; 4],
    indices: std::ops::Range<u32>,
    base_vertex: i32,
}

/// Geometry of one imgui frame, uploaded and ready to record.
struct PreparedFrame {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    draws: Vec<GuiDraw>,
}

/// Draws imgui draw data on top of a frame with wgpu.
///
/// Supports the font atlas only; commands referencing other textures are
/// skipped.
pub struct GuiRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    projection_ubo: wgpu::Buffer,

    _font_texture: wgpu::Texture,
    font_texture_id: imgui::TextureId,

    frame: Option<PreparedFrame>,
}

impl GuiRenderer {
    /// Builds the pipeline and uploads the font atlas of `context`.
    pub fn new(
        context: &mut imgui::Context,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
        let font_texture_id = imgui::TextureId::from(FONT_TEXTURE_ID);
        let font_texture = {
            let fonts = context.fonts();
            let atlas = fonts.build_rgba32_texture();
            let texture = upload_rgba8(device, queue, atlas.width, atlas.height, atlas.data);
            fonts.tex_id = font_texture_id;
            texture
        };
        let font_view = font_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("appcore gui sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let projection_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("appcore gui projection ubo"),
            size: std::mem::size_of::<Projection>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("appcore gui bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<Projection>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("appcore gui bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: projection_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&font_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("appcore gui shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/imgui.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("appcore gui pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("appcore gui pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GuiVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(gui_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Cw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            projection_ubo,
            _font_texture: font_texture,
            font_texture_id,
            frame: None,
        }
    }

    /// Uploads `draw_data` for the next [`record`](Self::record).
    ///
    /// `framebuffer_size` is the size of the target in physical pixels.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        draw_data: &imgui::DrawData,
        framebuffer_size: [u32; 2],
    ) {
        self.frame = None;
        if draw_data.total_vtx_count == 0 || draw_data.total_idx_count == 0 {
            return;
        }

        queue.write_buffer(
            &self.projection_ubo,
            0,
            bytemuck::bytes_of(&Projection::new(draw_data.display_pos, draw_data.display_size)),
        );

        let mut vertices = Vec::with_capacity(draw_data.total_vtx_count as usize);
        let mut indices: Vec<imgui::DrawIdx> = Vec::with_capacity(draw_data.total_idx_count as usize);
        let mut draws = Vec::new();

        for draw_list in draw_data.draw_lists() {
            let base_vertex = vertices.len() as i32;
            let base_index = indices.len() as u32;
            vertices.extend(draw_list.vtx_buffer().iter().map(GuiVertex::from));
            indices.extend_from_slice(draw_list.idx_buffer());

            for command in draw_list.commands() {
                match command {
                    imgui::DrawCmd::Elements { count, cmd_params } => {
                        if cmd_params.texture_id != self.font_texture_id {
                            log::warn!("gui: skipping draw with unknown texture {:?}", cmd_params.texture_id);
                            continue;
                        }
                        let Some(scissor) = scissor_rect(
                            cmd_params.clip_rect,
                            draw_data.display_pos,
                            draw_data.framebuffer_scale,
                            framebuffer_size,
                        ) else {
                            continue;
                        };
                        let first = base_index + cmd_params.idx_offset as u32;
                        draws.push(GuiDraw {
                            scissor,
                            indices: first..first + count as u32,
                            base_vertex: base_vertex + cmd_params.vtx_offset as i32,
                        });
                    }
                    // Nothing is bound per command, so there is no state to reset.
                    imgui::DrawCmd::ResetRenderState => {}
                    imgui::DrawCmd::RawCallback { .. } => {
                        log::warn!("gui: raw draw callbacks are not supported");
                    }
                }
            }
        }

        if draws.is_empty() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("appcore gui vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("appcore gui ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        self.frame = Some(PreparedFrame {
            vertex_buffer,
            index_buffer,
            draws,
        });
    }

    /// Records the prepared frame over the current contents of `view`.
    pub fn record(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let Some(frame) = self.frame.as_ref() else { return };

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("appcore gui pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, frame.vertex_buffer.slice(..));
        rpass.set_index_buffer(frame.index_buffer.slice(..), index_format());

        for draw in &frame.draws {
            let [x, y, w, h] = draw.scissor;
            rpass.set_scissor_rect(x, y, w, h);
            rpass.draw_indexed(draw.indices.clone(), draw.base_vertex, 0..1);
        }
    }
}

const fn index_format() -> wgpu::IndexFormat {
    match std::mem::size_of::<imgui::DrawIdx>() {
        2 => wgpu::IndexFormat::Uint16,
        _ => wgpu::IndexFormat::Uint32,
    }
}

/// Straight-alpha "over" for color, premultiplied accumulation for alpha.
fn gui_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn upload_rgba8(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    data: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("appcore gui font atlas"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imgui_indices_are_sixteen_bit() {
        assert_eq!(index_format(), wgpu::IndexFormat::Uint16);
    }

    #[test]
    fn gui_blend_is_source_over() {
        let blend = gui_blend();
        assert_eq!(blend.color.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(blend.color.dst_factor, wgpu::BlendFactor::OneMinusSrcAlpha);
        assert_eq!(blend.alpha.src_factor, wgpu::BlendFactor::One);
    }
}
