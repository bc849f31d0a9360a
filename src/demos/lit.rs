//! Pipeline and bindings for `point_light.wgsl`.
//!
//! Group 0 holds the per-frame light and camera block and is bound once per
//! pass. Every drawn object owns its group 1 uniform buffer and its group 2
//! material (colour map, specular map, sampler), so writing one object's
//! uniforms never clobbers another's before the queue is submitted.

use bytemuck::Zeroable;
use nalgebra_glm::Mat4;
use wgpu::util::DeviceExt;

use crate::gpu::{self, depth_stencil_state};
use crate::lighting::{FrameUniforms, Material, ObjectUniforms};
use crate::mesh::{GpuMesh, VertexPositionTextureNormal};
use crate::sampler;
use crate::texture::Texture;

// =============================================================================
// Pipeline
// =============================================================================

pub struct LitPipeline {
    pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    material_layout: wgpu::BindGroupLayout,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
}

impl LitPipeline {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lit Frame Layout"),
            entries: &[gpu::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lit Object Layout"),
            entries: &[gpu::uniform_layout_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lit Material Layout"),
            entries: &[
                gpu::texture_layout_entry(0),
                gpu::texture_layout_entry(1),
                gpu::sampler_layout_entry(2),
            ],
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lit Frame Uniforms"),
            contents: bytemuck::cast_slice(&[FrameUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lit Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Light Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/point_light.wgsl").into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Lit Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &object_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Lit Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[VertexPositionTextureNormal::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        LitPipeline {
            pipeline,
            object_layout,
            material_layout,
            frame_buffer,
            frame_bind_group,
            sampler: sampler::trilinear_wrap(device),
        }
    }

    pub fn write_frame(&self, queue: &wgpu::Queue, frame: &FrameUniforms) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[*frame]));
    }

    pub fn create_object(
        &self,
        device: &wgpu::Device,
        label: &str,
        color_map: &Texture,
        specular_map: &Texture,
        material: Material,
    ) -> LitObject {
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Object Uniforms")),
            contents: bytemuck::cast_slice(&[ObjectUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Object Bind Group")),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Material Bind Group")),
            layout: &self.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&specular_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        LitObject {
            material,
            uniform_buffer,
            object_bind_group,
            material_bind_group,
        }
    }

    /// Sets the pipeline and the per-frame group.
    pub fn bind<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
    }
}

// =============================================================================
// Objects
// =============================================================================

pub struct LitObject {
    pub material: Material,
    uniform_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
}

impl LitObject {
    pub fn write(&self, queue: &wgpu::Queue, world: &Mat4, view_projection: &Mat4) {
        let uniforms = ObjectUniforms::new(world, view_projection, &self.material);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Expects the pipeline and `mesh` to be bound already.
    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, mesh: &GpuMesh) {
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        pass.set_bind_group(2, &self.material_bind_group, &[]);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}
