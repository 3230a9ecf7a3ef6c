use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use crate::batch::geometry::FLOATS_PER_VERTEX;
use crate::batch::{BatchBackend, BatchCapacity, BatchRenderer, BatchUniforms};
use crate::coords::Viewport;
use crate::device::Gpu;
use crate::paint::Color;

use super::shader::ShaderSource;
use super::texture::{self, GpuTexture, TextureSource};
use super::RenderCtx;

/// Batch renderer flushing through wgpu.
pub type QuadRenderer = BatchRenderer<QuadPipeline>;

/// Everything needed to build a [`QuadRenderer`].
#[derive(Debug, Clone)]
pub struct QuadPipelineConfig {
    pub capacity: BatchCapacity,
    pub shader: ShaderSource,
    pub texture: TextureSource,
    pub tint: Color,
}

impl Default for QuadPipelineConfig {
    fn default() -> Self {
        Self {
            capacity: BatchCapacity::default(),
            shader: ShaderSource::Builtin,
            texture: TextureSource::default(),
            tint: Color::WHITE,
        }
    }
}

impl BatchRenderer<QuadPipeline> {
    /// Builds the pipeline for the GPU's surface and wraps it in a renderer.
    pub fn from_config(gpu: &Gpu<'_>, config: &QuadPipelineConfig) -> Result<Self> {
        let pipeline = QuadPipeline::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            config,
        )?;

        let mut renderer = Self::new(pipeline, config.capacity);
        renderer.set_tint(config.tint);
        Ok(renderer)
    }
}

/// wgpu backend for the quad batch.
///
/// Owns one streaming vertex buffer and one index buffer sized for the batch
/// capacity, a uniform buffer and the sampled texture. Each flush writes the
/// buffers through the queue and submits its own render pass that loads the
/// existing target contents.
pub struct QuadPipeline {
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipeline_format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,

    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,

    texture: GpuTexture,
}

impl QuadPipeline {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: &QuadPipelineConfig,
    ) -> Result<Self> {
        let capacity = config.capacity;
        anyhow::ensure!(
            capacity.max_quads() > 0,
            "batch capacity of {} vertex scalars / {} indices cannot hold one quad",
            capacity.vertex_scalars,
            capacity.indices
        );

        let source = config.shader.load()?;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(config.shader.label()),
            source: wgpu::ShaderSource::Wgsl(source),
        });

        let texture = texture::load_texture(device, queue, &config.texture)?;

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mote batch sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mote batch bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(QuadUniform::SIZE),
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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mote batch pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = create_pipeline(device, &shader, &pipeline_layout, surface_format);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mote batch ubo"),
            size: QuadUniform::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertex_bytes = (capacity.vertex_scalars * std::mem::size_of::<f32>()) as u64;
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mote batch vbo"),
            size: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_bytes = (capacity.indices * std::mem::size_of::<u32>()) as u64;
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mote batch ibo"),
            size: index_bytes,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mote batch bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!(
            "quad pipeline ready: {:?}, vbo {} B, ibo {} B, texture {:?}",
            surface_format,
            vertex_bytes,
            index_bytes,
            texture.size()
        );

        Ok(Self {
            shader,
            pipeline_layout,
            pipeline_format: surface_format,
            pipeline,
            bind_group,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            texture,
        })
    }

    /// Size of the sampled texture in texels.
    pub fn texture_size(&self) -> (u32, u32) {
        self.texture.size()
    }

    fn ensure_pipeline(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.pipeline_format == format {
            return;
        }
        log::debug!("rebuilding quad pipeline for {format:?}");
        self.pipeline = create_pipeline(device, &self.shader, &self.pipeline_layout, format);
        self.pipeline_format = format;
    }
}

impl BatchBackend for QuadPipeline {
    type Frame<'f> = RenderCtx<'f>;

    fn upload(&mut self, frame: &mut RenderCtx<'_>, vertices: &[f32], indices: &[u32]) {
        if !vertices.is_empty() {
            frame
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        if !indices.is_empty() {
            frame
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }
    }

    fn set_uniforms(&mut self, frame: &mut RenderCtx<'_>, uniforms: BatchUniforms) {
        let uniform = QuadUniform::new(uniforms, frame.viewport);
        frame
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw_indexed(&mut self, frame: &mut RenderCtx<'_>, index_count: u32) {
        if index_count == 0 {
            return;
        }
        self.ensure_pipeline(frame.device, frame.surface_format);

        let mut encoder = frame
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("mote batch encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mote batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.color_view,
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
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }

        frame.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("mote batch pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
}

// ── GPU types ─────────────────────────────────────────────────────────────

const VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x2  // uv
];

/// Layout of one `[x, y, z, u, v]` record from the batch buffer.
fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

/// Uniform block (32 bytes):
///
///  offset  0  tint          vec3<f32>
///  offset 12  texture_slot  i32
///  offset 16  viewport      vec2<f32>
///  offset 24  _pad          vec2<f32>
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadUniform {
    tint: [f32; 3],
    texture_slot: i32,
    viewport: [f32; 2],
    _pad: [f32; 2],
}

impl QuadUniform {
    const SIZE: u64 = std::mem::size_of::<QuadUniform>() as u64;

    fn new(uniforms: BatchUniforms, viewport: Viewport) -> Self {
        Self {
            tint: uniforms.tint,
            texture_slot: uniforms.texture_slot,
            viewport: viewport.to_uniform(),
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── vertex layout ─────────────────────────────────────────────────────

    #[test]
    fn vertex_layout_matches_batch_record() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);

        let attrs = layout.attributes;
        assert_eq!(attrs.len(), 2);
        assert_eq!((attrs[0].shader_location, attrs[0].offset), (0, 0));
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!((attrs[1].shader_location, attrs[1].offset), (1, 12));
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x2);
    }

    // ── uniform packing ───────────────────────────────────────────────────

    #[test]
    fn uniform_is_32_bytes() {
        assert_eq!(QuadUniform::SIZE, 32);
    }

    #[test]
    fn uniform_packs_tint_slot_and_viewport() {
        let u = QuadUniform::new(
            BatchUniforms {
                tint: [1.0, 0.5, 0.25],
                texture_slot: 0,
            },
            Viewport::new(1280.0, 720.0),
        );

        let words: &[u32] = bytemuck::cast_slice(bytemuck::bytes_of(&u));
        assert_eq!(f32::from_bits(words[0]), 1.0);
        assert_eq!(f32::from_bits(words[1]), 0.5);
        assert_eq!(f32::from_bits(words[2]), 0.25);
        assert_eq!(words[3], 0);
        assert_eq!(f32::from_bits(words[4]), 1280.0);
        assert_eq!(f32::from_bits(words[5]), 720.0);
    }

    #[test]
    fn uniform_viewport_never_zero() {
        let u = QuadUniform::new(
            BatchUniforms {
                tint: [1.0; 3],
                texture_slot: 0,
            },
            Viewport::new(0.0, 0.0),
        );
        assert_eq!(u.viewport, [1.0, 1.0]);
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn default_config_uses_builtin_shader_and_mask() {
        let c = QuadPipelineConfig::default();
        assert_eq!(c.capacity, BatchCapacity::default());
        assert_eq!(c.shader, ShaderSource::Builtin);
        assert_eq!(c.tint, Color::WHITE);
        assert!(matches!(&c.texture, TextureSource::Image(img) if img.width() == texture::DEFAULT_MASK_SIZE));
    }
}
