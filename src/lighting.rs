//! Point light and the uniform blocks shared by the lit shaders.
//!
//! Layouts mirror `shaders/point_light.wgsl`: vec3 members are padded to 16 bytes.

use nalgebra_glm::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub radius: f32,
    pub color: Vec3,
}

impl PointLight {
    pub fn new(position: Vec3, radius: f32) -> Self {
        PointLight {
            position,
            radius,
            color: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Group 0: written once per frame, shared by every object drawn with the lit pipeline.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub light_position: [f32; 3],
    pub light_radius: f32,
    pub camera_position: [f32; 3],
    pub _padding0: f32,
    pub light_color: [f32; 3],
    pub _padding1: f32,
}

impl FrameUniforms {
    pub fn new(light: &PointLight, camera_position: Vec3) -> Self {
        FrameUniforms {
            light_position: light.position.into(),
            light_radius: light.radius,
            camera_position: camera_position.into(),
            _padding0: 0.0,
            light_color: light.color.into(),
            _padding1: 0.0,
        }
    }
}

/// Group 1: one buffer per drawn object.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub world_view_projection: [[f32; 4]; 4],
    pub world: [[f32; 4]; 4],
    pub ambient_color: [f32; 3],
    pub specular_power: f32,
    pub specular_color: [f32; 3],
    pub _padding: f32,
}

impl ObjectUniforms {
    pub fn new(world: &Mat4, view_projection: &Mat4, material: &Material) -> Self {
        ObjectUniforms {
            world_view_projection: (view_projection * world).into(),
            world: (*world).into(),
            ambient_color: [material.ambient; 3],
            specular_power: material.specular_power,
            specular_color: material.specular_color.into(),
            _padding: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Uniform grey ambient term in [0, 1].
    pub ambient: f32,
    pub specular_color: Vec3,
    pub specular_power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            ambient: 0.0,
            specular_color: Vec3::new(1.0, 1.0, 1.0),
            specular_power: 128.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 48);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 160);
    }

    #[test]
    fn matrices_are_stored_column_major() {
        let world = glm::translation(&Vec3::new(1.0, 2.0, 3.0));
        let uniforms = ObjectUniforms::new(&world, &Mat4::identity(), &Material::default());
        assert_eq!(uniforms.world[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.world_view_projection[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn world_view_projection_applies_world_first() {
        let world = glm::translation(&Vec3::new(0.0, 0.0, 5.0));
        let view_projection = glm::scaling(&Vec3::new(2.0, 2.0, 2.0));
        let uniforms = ObjectUniforms::new(&world, &view_projection, &Material::default());
        assert_eq!(uniforms.world_view_projection[3], [0.0, 0.0, 10.0, 1.0]);
    }

    #[test]
    fn frame_uniforms_copy_light() {
        let mut light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), 50.0);
        light.color = Vec3::new(0.5, 0.25, 1.0);
        let frame = FrameUniforms::new(&light, Vec3::new(0.0, 2.5, 25.0));
        assert_eq!(frame.light_position, [1.0, 2.0, 3.0]);
        assert_eq!(frame.light_radius, 50.0);
        assert_eq!(frame.camera_position, [0.0, 2.5, 25.0]);
        assert_eq!(frame.light_color, [0.5, 0.25, 1.0]);
    }
}
