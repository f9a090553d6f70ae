use crate::core::{ShaderStage, VertexAttribute};
use crate::device::DiagnosticSink;
use crate::device::join_diagnostics;

use super::mesh::vertex_format;

/// One compiled shader stage.
///
/// A module that failed to compile is kept so it can be deleted like any
/// other; `diagnostics` then holds the compiler output.
pub struct ShaderModule {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
    diagnostics: Option<String>,
}

impl ShaderModule {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn diagnostics(&self) -> Option<&str> {
        self.diagnostics.as_deref()
    }

    pub fn is_compiled(&self) -> bool {
        self.diagnostics.is_none()
    }
}

/// A linked render pipeline.
///
/// When linking fails the program still exists but has no pipeline; drawing
/// with it produces nothing.
pub struct Program {
    pipeline: Option<wgpu::RenderPipeline>,
    diagnostics: Option<String>,
}

impl Program {
    /// Pipeline to draw with, `None` if linking failed.
    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        if self.diagnostics.is_some() {
            return None;
        }
        self.pipeline.as_ref()
    }

    pub fn diagnostics(&self) -> Option<&str> {
        self.diagnostics.as_deref()
    }
}

/// Compiles one WGSL stage, collecting validation errors as diagnostics.
pub fn compile_shader(
    device: &wgpu::Device,
    sink: &DiagnosticSink,
    stage: ShaderStage,
    source: &str,
) -> ShaderModule {
    let label = match stage {
        ShaderStage::Vertex => "appcore vertex shader",
        ShaderStage::Fragment => "appcore fragment shader",
    };

    let (module, errors) = sink.capture(|| {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    });

    ShaderModule {
        stage,
        module,
        diagnostics: join_diagnostics(errors),
    }
}

/// Links a vertex and a fragment stage into a pipeline drawing triangle lists
/// into `target_format`.
pub fn link_program(
    device: &wgpu::Device,
    sink: &DiagnosticSink,
    vertex: &ShaderModule,
    fragment: &ShaderModule,
    input: &VertexAttribute,
    target_format: wgpu::TextureFormat,
) -> Program {
    if let Some(log) = precheck(vertex, fragment, input) {
        return Program {
            pipeline: None,
            diagnostics: Some(log),
        };
    }

    // `precheck` guarantees a format.
    let Some(format) = vertex_format(input) else {
        return Program {
            pipeline: None,
            diagnostics: Some("unsupported vertex attribute".to_string()),
        };
    };
    let attributes = [wgpu::VertexAttribute {
        format,
        offset: input.offset,
        shader_location: input.location,
    }];

    let (pipeline, errors) = sink.capture(|| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("appcore triangle pipeline"),
            layout: None,

            vertex: wgpu::VertexState {
                module: &vertex.module,
                entry_point: None,
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: input.stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fragment.module,
                entry_point: None,
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        })
    });

    Program {
        pipeline: Some(pipeline),
        diagnostics: join_diagnostics(errors),
    }
}

/// Link-time checks that do not need the device.
fn precheck(vertex: &ShaderModule, fragment: &ShaderModule, input: &VertexAttribute) -> Option<String> {
    link_problems(
        [
            (ShaderStage::Vertex, vertex.stage, vertex.is_compiled()),
            (ShaderStage::Fragment, fragment.stage, fragment.is_compiled()),
        ],
        input,
    )
}

fn link_problems(stages: [(ShaderStage, ShaderStage, bool); 2], input: &VertexAttribute) -> Option<String> {
    let mut problems = Vec::new();

    for (expected, stage, compiled) in stages {
        if stage != expected {
            problems.push(format!("{stage} shader attached as {expected} stage"));
        }
        if !compiled {
            problems.push(format!("{stage} shader is not compiled"));
        }
    }

    if vertex_format(input).is_none() {
        problems.push(format!(
            "vertex input at location {} has no format for {} x {:?}",
            input.location, input.components, input.kind
        ));
    }

    join_diagnostics(problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK: [(ShaderStage, ShaderStage, bool); 2] = [
        (ShaderStage::Vertex, ShaderStage::Vertex, true),
        (ShaderStage::Fragment, ShaderStage::Fragment, true),
    ];

    #[test]
    fn compiled_stages_with_position_input_pass() {
        assert_eq!(link_problems(OK, &VertexAttribute::position()), None);
    }

    #[test]
    fn failed_stage_is_named() {
        let mut stages = OK;
        stages[1].2 = false;
        let log = link_problems(stages, &VertexAttribute::position()).unwrap();
        assert_eq!(log, "fragment shader is not compiled");
    }

    #[test]
    fn swapped_stages_are_reported() {
        let stages = [
            (ShaderStage::Vertex, ShaderStage::Fragment, true),
            (ShaderStage::Fragment, ShaderStage::Vertex, true),
        ];
        let log = link_problems(stages, &VertexAttribute::position()).unwrap();
        assert!(log.contains("fragment shader attached as vertex stage"));
        assert!(log.contains("vertex shader attached as fragment stage"));
    }

    #[test]
    fn unsupported_input_is_reported() {
        let input = VertexAttribute {
            components: 7,
            ..VertexAttribute::position()
        };
        let log = link_problems(OK, &input).unwrap();
        assert!(log.starts_with("vertex input at location 0"));
    }
}
