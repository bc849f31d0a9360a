use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use super::lit::{LitObject, LitPipeline};
use super::Demo;
use crate::camera::FirstPersonCamera;
use crate::config::{AppConfig, PointLightConfig};
use crate::game_time::GameTime;
use crate::gpu::GpuContext;
use crate::input::InputState;
use crate::lighting::{FrameUniforms, Material, PointLight};
use crate::mesh::{self, GpuMesh};
use crate::texture::{self, ColorSpace, Texture};

/// Units per second.
pub const LIGHT_MOVEMENT_RATE: f32 = 10.0;
/// Ambient and specular-power change per second, on a 0-255 scale.
pub const LIGHT_MODULATION_RATE: f32 = 255.0;
/// Radians per second.
pub const ROTATION_RATE: f32 = std::f32::consts::FRAC_PI_2;

const SPHERE_SUBDIVISIONS: u32 = 48;

const CONTROLS: &[&str] = &[
    "Move Point Light (Numpad 4/6, 8/2, 3/9)",
    "Ambient Intensity (Numpad +/-)",
    "Specular Power (Insert/Delete)",
    "Toggle Rotation (Space)",
    "Camera Controls (WASD + Left Mouse, Q to reset)",
    "Exit (Esc)",
];

const LIGHT_AXES: [(KeyCode, KeyCode, usize); 3] = [
    (KeyCode::Numpad6, KeyCode::Numpad4, 0),
    (KeyCode::Numpad8, KeyCode::Numpad2, 1),
    (KeyCode::Numpad9, KeyCode::Numpad3, 2),
];

// =============================================================================
// Light state
// =============================================================================

/// Light placement, material levels and sphere spin, driven by the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLightState {
    pub light: PointLight,
    pub ambient_intensity: f32,
    pub specular_power: f32,
    pub rotation: f32,
    pub animation_enabled: bool,
}

impl PointLightState {
    pub fn new(config: &PointLightConfig) -> Self {
        PointLightState {
            light: PointLight::new(Vec3::from(config.light_position), config.light_radius),
            ambient_intensity: config.ambient_intensity.clamp(0.0, 255.0),
            specular_power: config.specular_power.clamp(0.0, 255.0),
            rotation: 0.0,
            animation_enabled: true,
        }
    }

    pub fn update(&mut self, elapsed: f32, input: &InputState) {
        if input.was_key_pressed_this_frame(KeyCode::Space) {
            self.animation_enabled = !self.animation_enabled;
        }
        if self.animation_enabled {
            self.rotation = (self.rotation + ROTATION_RATE * elapsed) % std::f32::consts::TAU;
        }

        let step = LIGHT_MOVEMENT_RATE * elapsed;
        for (positive, negative, axis) in LIGHT_AXES {
            if input.is_key_down(positive) {
                self.light.position[axis] += step;
            }
            if input.is_key_down(negative) {
                self.light.position[axis] -= step;
            }
        }

        let modulation = LIGHT_MODULATION_RATE * elapsed;
        self.ambient_intensity = modulate(
            self.ambient_intensity,
            modulation,
            input.is_key_down(KeyCode::NumpadAdd),
            input.is_key_down(KeyCode::NumpadSubtract),
        );
        self.specular_power = modulate(
            self.specular_power,
            modulation,
            input.is_key_down(KeyCode::Insert),
            input.is_key_down(KeyCode::Delete),
        );
    }

    pub fn material(&self) -> Material {
        Material {
            ambient: self.ambient_intensity / 255.0,
            specular_color: Vec3::new(1.0, 1.0, 1.0),
            specular_power: self.specular_power,
        }
    }

    pub fn sphere_world(&self, scale: f32) -> Mat4 {
        let spin = glm::rotate_y(&Mat4::identity(), self.rotation);
        glm::scale(&spin, &Vec3::new(scale, scale, scale))
    }

    pub fn proxy_world(&self, scale: f32) -> Mat4 {
        let translation = glm::translate(&Mat4::identity(), &self.light.position);
        glm::scale(&translation, &Vec3::new(scale, scale, scale))
    }
}

fn modulate(value: f32, amount: f32, raise: bool, lower: bool) -> f32 {
    let mut value = value;
    if raise {
        value += amount;
    }
    if lower {
        value -= amount;
    }
    value.clamp(0.0, 255.0)
}

// =============================================================================
// Demo
// =============================================================================

pub struct PointLightDemo {
    state: PointLightState,
    sphere_scale: f32,
    proxy_scale: f32,
    lit: LitPipeline,
    mesh: GpuMesh,
    sphere: LitObject,
    proxy: LitObject,
}

impl PointLightDemo {
    pub fn new(gpu: &GpuContext, config: &AppConfig) -> Self {
        let settings = &config.point_light;
        let state = PointLightState::new(settings);
        let lit = LitPipeline::new(&gpu.device, gpu.color_format());
        let mesh = GpuMesh::upload(&gpu.device, "Sphere", &mesh::sphere(SPHERE_SUBDIVISIONS));

        let color_map = Texture::load_or(
            &gpu.device,
            &gpu.queue,
            &config.resolve(&settings.texture),
            || texture::solid([70, 110, 200, 255]),
            ColorSpace::Srgb,
        );
        let specular_map = Texture::load_or(
            &gpu.device,
            &gpu.queue,
            &config.resolve(&settings.specular_map),
            || texture::solid([255, 255, 255, 255]),
            ColorSpace::Linear,
        );
        let sphere = lit.create_object(
            &gpu.device,
            "Sphere",
            &color_map,
            &specular_map,
            state.material(),
        );

        let white = Texture::from_image(
            &gpu.device,
            &gpu.queue,
            "Light Proxy",
            &texture::solid([255, 255, 255, 255]),
            ColorSpace::Srgb,
        );
        let black = Texture::from_image(
            &gpu.device,
            &gpu.queue,
            "Light Proxy Specular",
            &texture::solid([0, 0, 0, 255]),
            ColorSpace::Linear,
        );
        // Full ambient keeps the marker at the light colour regardless of shading
        let proxy = lit.create_object(
            &gpu.device,
            "Light Proxy",
            &white,
            &black,
            Material {
                ambient: 1.0,
                specular_color: Vec3::zeros(),
                specular_power: 1.0,
            },
        );

        PointLightDemo {
            state,
            sphere_scale: settings.sphere_scale,
            proxy_scale: settings.proxy_scale,
            lit,
            mesh,
            sphere,
            proxy,
        }
    }
}

impl Demo for PointLightDemo {
    fn update(&mut self, time: &GameTime, input: &InputState) {
        self.state.update(time.elapsed_seconds(), input);
        self.sphere.material = self.state.material();
    }

    fn prepare(&self, queue: &wgpu::Queue, camera: &FirstPersonCamera) {
        self.lit.write_frame(
            queue,
            &FrameUniforms::new(&self.state.light, camera.position),
        );

        let view_projection = camera.view_projection();
        self.sphere.write(
            queue,
            &self.state.sphere_world(self.sphere_scale),
            &view_projection,
        );
        self.proxy.write(
            queue,
            &self.state.proxy_world(self.proxy_scale),
            &view_projection,
        );
    }

    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        self.lit.bind(pass);
        self.mesh.bind(pass);
        self.sphere.draw(pass, &self.mesh);
        self.proxy.draw(pass, &self.mesh);
    }

    fn status(&self) -> String {
        let position = self.state.light.position;
        format!(
            "Light ({:.1}, {:.1}, {:.1}) | ambient {:.0} | specular power {:.0}",
            position.x,
            position.y,
            position.z,
            self.state.ambient_intensity,
            self.state.specular_power
        )
    }

    fn controls(&self) -> &'static [&'static str] {
        CONTROLS
    }
}
