use std::num::NonZeroU64;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

use super::fan::push_fan_indices;
use super::shader::{COLOR_BINDING, COLOR_GROUP, POSITION_LOCATION};
use super::{DrawCmd, DrawList, RenderCtx, RenderTarget, ShaderProgram};

/// Replays a recorded [`DrawList`] on the GPU.
///
/// Per frame:
/// - the vertex arena goes into one vertex buffer
/// - every fan is expanded to indexed triangles in one index buffer
/// - every fan gets its own color slot in a dynamic-offset uniform buffer
/// - each `Clear` starts a new render pass with `LoadOp::Clear`
///
/// GPU buffers grow to the next power of two and are reused across frames.
#[derive(Default)]
pub struct PolygonPipeline {
    pipeline_key: Option<(wgpu::TextureFormat, ShaderProgram)>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    color_ubo: Option<wgpu::Buffer>,
    color_capacity: usize,
    color_stride: u64,

    vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    ibo: Option<wgpu::Buffer>,
    index_capacity: usize,

    // CPU staging, reused across frames.
    indices: Vec<u32>,
    uniform_bytes: Vec<u8>,
}

/// One render pass worth of draws.
struct PassBatch {
    clear: Option<Color>,
    draws: Range<usize>,
}

impl PolygonPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the commands of `list` into `target` using `program`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        program: &ShaderProgram,
        list: &DrawList,
    ) {
        self.ensure_pipeline(ctx, program);

        // Split the command stream into passes and index ranges.
        self.indices.clear();
        let mut colors: Vec<ColorUniform> = Vec::new();
        let mut draws: Vec<Range<u32>> = Vec::new();
        let mut passes: Vec<PassBatch> = Vec::new();

        for cmd in list.commands() {
            match cmd {
                DrawCmd::Clear(c) => passes.push(PassBatch {
                    clear: Some(*c),
                    draws: draws.len()..draws.len(),
                }),
                DrawCmd::Fan(fan) => {
                    if passes.is_empty() {
                        passes.push(PassBatch { clear: None, draws: 0..0 });
                    }
                    let start = self.indices.len() as u32;
                    push_fan_indices(fan.first_vertex, fan.vertex_count, &mut self.indices);
                    draws.push(start..self.indices.len() as u32);
                    colors.push(ColorUniform::from(fan.color));
                    if let Some(pass) = passes.last_mut() {
                        pass.draws.end = draws.len();
                    }
                }
            }
        }

        if passes.is_empty() {
            return;
        }

        // Mutating methods must happen before borrowing pipeline/buffers immutably.
        self.upload_vertices(ctx, list.vertices());
        self.upload_indices(ctx);
        self.upload_colors(ctx, &colors);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some([vx, vy, vw, vh]) = full_viewport(ctx.size) else { return };

        for pass in &passes {
            let load = match pass.clear {
                Some(c) => wgpu::LoadOp::Clear(c.into()),
                None => wgpu::LoadOp::Load,
            };

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mosaic polygon pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if pass.draws.is_empty() {
                continue;
            }

            let (Some(bind_group), Some(vbo), Some(ibo)) =
                (self.bind_group.as_ref(), self.vbo.as_ref(), self.ibo.as_ref())
            else {
                continue;
            };

            rpass.set_pipeline(pipeline);
            rpass.set_viewport(vx, vy, vw, vh, 0.0, 1.0);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

            // One draw per fan, in recorded order, each with its own color slot.
            for i in pass.draws.clone() {
                let offset = (i as u64 * self.color_stride) as u32;
                rpass.set_bind_group(COLOR_GROUP, bind_group, &[offset]);
                rpass.draw_indexed(draws[i].clone(), 0, 0..1);
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, program: &ShaderProgram) {
        if let Some((format, linked)) = &self.pipeline_key {
            if *format == ctx.surface_format && linked == program && self.pipeline.is_some() {
                return;
            }
        }

        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mosaic polygon vs"),
            source: wgpu::ShaderSource::Wgsl(program.vertex_source().into()),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mosaic polygon fs"),
            source: wgpu::ShaderSource::Wgsl(program.fragment_source().into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("mosaic polygon bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: COLOR_BINDING,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: true,
                            min_binding_size: Some(color_binding_size()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("mosaic polygon pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mosaic polygon pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(program.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[position_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(program.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    // Later polygons overwrite earlier ones; no blending.
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Fan winding depends on dataset point order.
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

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment as u64;
        self.color_stride = align_to(std::mem::size_of::<ColorUniform>() as u64, alignment);

        self.pipeline_key = Some((ctx.surface_format, program.clone()));
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.color_ubo = None;
        self.color_capacity = 0;

        log::debug!("polygon pipeline built for {:?}", ctx.surface_format);
    }

    fn upload_vertices(&mut self, ctx: &RenderCtx<'_>, vertices: &[[f32; 2]]) {
        if vertices.is_empty() {
            return;
        }
        if vertices.len() > self.vertex_capacity || self.vbo.is_none() {
            let cap = vertices.len().next_power_of_two().max(256);
            self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mosaic polygon vbo"),
                size: (cap * std::mem::size_of::<[f32; 2]>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }
        if let Some(vbo) = self.vbo.as_ref() {
            ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));
        }
    }

    fn upload_indices(&mut self, ctx: &RenderCtx<'_>) {
        if self.indices.is_empty() {
            return;
        }
        if self.indices.len() > self.index_capacity || self.ibo.is_none() {
            let cap = self.indices.len().next_power_of_two().max(512);
            self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mosaic polygon ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
        if let Some(ibo) = self.ibo.as_ref() {
            ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(&self.indices));
        }
    }

    fn upload_colors(&mut self, ctx: &RenderCtx<'_>, colors: &[ColorUniform]) {
        if colors.is_empty() {
            return;
        }
        self.ensure_color_capacity(ctx, colors.len());

        let stride = self.color_stride as usize;
        self.uniform_bytes.clear();
        self.uniform_bytes.resize(colors.len() * stride, 0);
        for (slot, c) in self.uniform_bytes.chunks_exact_mut(stride).zip(colors) {
            slot[..std::mem::size_of::<ColorUniform>()].copy_from_slice(bytemuck::bytes_of(c));
        }

        if let Some(ubo) = self.color_ubo.as_ref() {
            ctx.queue.write_buffer(ubo, 0, &self.uniform_bytes);
        }
    }

    fn ensure_color_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.color_capacity && self.color_ubo.is_some() && self.bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let cap = required.next_power_of_two().max(64);
        let color_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mosaic polygon color ubo"),
            size: cap as u64 * self.color_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mosaic polygon bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: COLOR_BINDING,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &color_ubo,
                    offset: 0,
                    size: Some(color_binding_size()),
                }),
            }],
        });

        self.color_ubo = Some(color_ubo);
        self.bind_group = Some(bind_group);
        self.color_capacity = cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ColorUniform {
    rgba: [f32; 4],
}

impl From<Color> for ColorUniform {
    #[inline]
    fn from(c: Color) -> Self {
        Self { rgba: c.to_array() }
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![POSITION_LOCATION => Float32x2];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

/// Size of one color slot as seen by the shader.
fn color_binding_size() -> NonZeroU64 {
    NonZeroU64::new(std::mem::size_of::<ColorUniform>() as u64)
        .expect("ColorUniform has non-zero size by construction")
}

/// Viewport covering the whole surface, `None` for an empty one.
fn full_viewport((width, height): (u32, u32)) -> Option<[f32; 4]> {
    if width == 0 || height == 0 {
        return None;
    }
    Some([0.0, 0.0, width as f32, height as f32])
}

#[inline]
fn align_to(value: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    value.div_ceil(alignment) * alignment
}
