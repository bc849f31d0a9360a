use std::collections::HashMap;
use std::path::PathBuf;

use nalgebra_glm::Vec3;
use winit::keyboard::KeyCode;

use super::lit::{LitObject, LitPipeline};
use super::Demo;
use crate::camera::FirstPersonCamera;
use crate::config::AppConfig;
use crate::error::RenderError;
use crate::game_time::GameTime;
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::lighting::{FrameUniforms, Material, PointLight};
use crate::mesh::{self, GpuMesh};
use crate::orbit::SolarSystemModel;
use crate::texture::{self, ColorSpace, Texture};

const CONTROLS: &[&str] = &[
    "Decrease/Increase Rotational & Orbital Velocities (E/R)",
    "Reset Camera to Center of Solar System (Q)",
    "Camera Controls (WASD + Left Mouse)",
    "Toggle Animation (Space)",
    "Exit (Esc)",
];

/// Sun, planets and moons sharing one sphere mesh, lit by a point light at the origin.
pub struct SolarSystem {
    model: SolarSystemModel,
    bodies: Vec<LitObject>,
    lit: LitPipeline,
    mesh: GpuMesh,
    light: PointLight,
}

impl SolarSystem {
    pub fn new(gpu: &GpuContext, config: &AppConfig) -> Result<Self, RenderError> {
        let solar = &config.solar_system;
        let model = SolarSystemModel::from_config(solar)?;

        let geometry = match &solar.model {
            Some(path) => mesh::load_obj(&config.resolve(path))?,
            None => mesh::sphere(solar.sphere_subdivisions),
        };
        let mesh = GpuMesh::upload(&gpu.device, "Celestial Body", &geometry);
        let lit = LitPipeline::new(&gpu.device, gpu.color_format());

        // Most bodies share a specular map, load each file once
        let mut specular_maps: HashMap<PathBuf, Texture> = HashMap::new();
        let mut bodies = Vec::with_capacity(solar.bodies.len());

        for descriptor in &solar.bodies {
            let [r, g, b] = descriptor.fallback_color;
            let color_map = Texture::load_or(
                &gpu.device,
                &gpu.queue,
                &config.resolve(&descriptor.texture),
                || texture::solid([r, g, b, 255]),
                ColorSpace::Srgb,
            );

            let specular_path = config.resolve(&descriptor.specular_map);
            let specular_map = specular_maps
                .entry(specular_path.clone())
                .or_insert_with(|| {
                    Texture::load_or(
                        &gpu.device,
                        &gpu.queue,
                        &specular_path,
                        || texture::solid([0, 0, 0, 255]),
                        ColorSpace::Linear,
                    )
                });

            let material = Material {
                ambient: descriptor.ambient,
                specular_color: Vec3::from(solar.specular_color),
                specular_power: solar.specular_power,
            };
            bodies.push(lit.create_object(
                &gpu.device,
                &descriptor.name,
                &color_map,
                specular_map,
                material,
            ));
        }

        let mut light = PointLight::new(Vec3::zeros(), solar.light_radius);
        light.color = Vec3::from(solar.light_color);

        log::info!("Solar system ready with {} bodies", model.len());
        for (index, descriptor) in solar.bodies.iter().enumerate() {
            log::debug!("{} starts at {:?}", descriptor.name, model.position(index));
        }

        Ok(SolarSystem {
            model,
            bodies,
            lit,
            mesh,
            light,
        })
    }
}

impl Demo for SolarSystem {
    fn update(&mut self, time: &GameTime, input: &InputState) {
        if input.was_key_pressed_this_frame(KeyCode::Space) {
            self.model.toggle_animation();
            log::info!(
                "Animation {}",
                if self.model.animation_enabled() { "enabled" } else { "paused" }
            );
        }
        if input.was_key_pressed_this_frame(KeyCode::KeyR) {
            self.model.increase_speed();
            log::debug!("Speed factor {}", self.model.speed_factor());
        }
        if input.was_key_pressed_this_frame(KeyCode::KeyE) {
            self.model.decrease_speed();
            log::debug!("Speed factor {}", self.model.speed_factor());
        }

        self.model.update(time.elapsed_seconds());
    }

    fn prepare(&self, queue: &wgpu::Queue, camera: &FirstPersonCamera) {
        self.lit
            .write_frame(queue, &FrameUniforms::new(&self.light, camera.position));

        let view_projection = camera.view_projection();
        for (index, body) in self.bodies.iter().enumerate() {
            body.write(queue, self.model.world(index), &view_projection);
        }
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.lit.bind(pass);
        self.mesh.bind(pass);
        for body in &self.bodies {
            body.draw(pass, &self.mesh);
        }
    }

    fn status(&self) -> String {
        format!(
            "{} | speed x{:.3}",
            if self.model.animation_enabled() { "running" } else { "paused" },
            self.model.speed_factor()
        )
    }

    fn controls(&self) -> &'static [&'static str] {
        CONTROLS
    }
}
