use wgpu::util::DeviceExt;
use winit::keyboard::KeyCode;

use super::Demo;
use crate::camera::FirstPersonCamera;
use crate::config::AppConfig;
use crate::game_time::GameTime;
use crate::gpu::{self, depth_stencil_state, GpuContext};
use crate::input::InputState;
use crate::mesh::{self, GpuMesh, VertexPositionTexture};
use crate::sampler::FilteringMode;
use crate::texture::{self, ColorSpace, Texture};

const QUAD_SIZE: f32 = 10.0;

const CONTROLS: &[&str] = &[
    "Cycle Filtering Mode (Space)",
    "Reset Camera (Q)",
    "Camera Controls (WASD + Left Mouse)",
    "Exit (Esc)",
];

/// A textured quad drawn with one of several samplers.
pub struct FilteringModesDemo {
    pipeline: wgpu::RenderPipeline,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    // One per mode, in `FilteringMode::ALL` order
    texture_bind_groups: Vec<wgpu::BindGroup>,
    mesh: GpuMesh,
    mode: FilteringMode,
}

impl FilteringModesDemo {
    pub fn new(gpu: &GpuContext, config: &AppConfig) -> Self {
        let device = &gpu.device;

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Filtering Object Layout"),
            entries: &[gpu::uniform_layout_entry(0, wgpu::ShaderStages::VERTEX)],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Filtering Texture Layout"),
            entries: &[gpu::texture_layout_entry(0), gpu::sampler_layout_entry(1)],
        });

        let identity: [[f32; 4]; 4] = nalgebra_glm::Mat4::identity().into();
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Filtering Object Uniforms"),
            contents: bytemuck::cast_slice(&[identity]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Filtering Object Bind Group"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
        });

        let texture = Texture::load_or(
            device,
            &gpu.queue,
            &config.resolve(&config.filtering.texture),
            || texture::checkerboard(256, 16, [255, 255, 255, 255], [40, 40, 40, 255]),
            ColorSpace::Srgb,
        );

        log::info!(
            "Filtering texture has {} mip levels",
            texture.texture.mip_level_count()
        );

        let texture_bind_groups = FilteringMode::ALL
            .iter()
            .map(|mode| {
                let sampler = device.create_sampler(&mode.descriptor());
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(mode.display_name()),
                    layout: &texture_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&texture.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                })
            })
            .collect();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Filtering Modes Shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../shaders/filtering_modes.wgsl").into(),
            ),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Filtering Pipeline Layout"),
            bind_group_layouts: &[&object_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Filtering Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[VertexPositionTexture::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.color_format(),
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
            depth_stencil: Some(depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let mesh = GpuMesh::upload(device, "Filtering Quad", &mesh::quad(QUAD_SIZE));

        FilteringModesDemo {
            pipeline,
            object_buffer,
            object_bind_group,
            texture_bind_groups,
            mesh,
            mode: FilteringMode::default(),
        }
    }
}

impl Demo for FilteringModesDemo {
    fn update(&mut self, _time: &GameTime, input: &InputState) {
        if input.was_key_pressed_this_frame(KeyCode::Space) {
            self.mode = self.mode.next();
            log::info!("Filtering mode: {}", self.mode.display_name());
        }
    }

    fn prepare(&self, queue: &wgpu::Queue, camera: &FirstPersonCamera) {
        // The quad's world matrix is the identity
        let world_view_projection: [[f32; 4]; 4] = camera.view_projection().into();
        queue.write_buffer(
            &self.object_buffer,
            0,
            bytemuck::cast_slice(&[world_view_projection]),
        );
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.object_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_groups[self.mode.index()], &[]);
        self.mesh.bind(pass);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }

    fn status(&self) -> String {
        format!("Filtering: {}", self.mode.display_name())
    }

    fn controls(&self) -> &'static [&'static str] {
        CONTROLS
    }
}
