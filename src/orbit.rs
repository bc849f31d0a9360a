//! Orbital animation and parent-relative world matrix composition.
//!
//! Every body spins about its own Y axis (tilted about Z), is pushed out to its
//! orbit radius and then swung around the Y axis of its parent's frame. A body
//! with a parent composes its local matrix onto the parent's world matrix, so
//! the Moon follows Earth wherever Earth goes.

use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};

use crate::config::SolarSystemConfig;
use crate::error::ConfigError;

pub const MIN_SPEED_FACTOR: f32 = 0.001;
pub const MAX_SPEED_FACTOR: f32 = 100.0;

// =============================================================================
// Orbital parameters
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalParameters {
    /// Distance from the parent in world units.
    pub orbit_radius: f32,
    pub scale: f32,
    /// Years per orbit. Zero or negative means the body does not orbit.
    pub orbital_period: f32,
    /// Years per revolution about the body's own axis.
    pub rotational_period: f32,
    /// Radians about Z.
    pub axial_tilt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalState {
    pub axial_angle: f32,
    pub orbital_angle: f32,
}

/// Radians per second for a period measured in years.
pub fn angular_rate(period: f32, speed_factor: f32) -> f32 {
    if period > 0.0 {
        speed_factor / period
    } else {
        0.0
    }
}

// =============================================================================
// Body transforms
// =============================================================================

#[derive(Debug, Clone)]
pub struct BodyTransform {
    pub params: OrbitalParameters,
    pub state: OrbitalState,
    pub parent: Option<usize>,
    world: Mat4,
}

impl BodyTransform {
    pub fn new(params: OrbitalParameters, parent: Option<usize>) -> Self {
        let mut transform = BodyTransform {
            params,
            state: OrbitalState::default(),
            parent,
            world: Mat4::identity(),
        };
        transform.compose(None);
        transform
    }

    pub fn advance(&mut self, elapsed_seconds: f32, speed_factor: f32) {
        self.state.axial_angle +=
            elapsed_seconds * angular_rate(self.params.rotational_period, speed_factor);
        self.state.orbital_angle +=
            elapsed_seconds * angular_rate(self.params.orbital_period, speed_factor);
    }

    pub fn local_matrix(&self) -> Mat4 {
        let up = Vec3::y();
        let scale = glm::scaling(&Vec3::repeat(self.params.scale));
        let axial_rotation = glm::rotation(self.state.axial_angle, &up);
        let axial_tilt = glm::rotation(self.params.axial_tilt, &Vec3::z());
        let translation = glm::translation(&Vec3::new(0.0, 0.0, self.params.orbit_radius));
        let orbital_rotation = glm::rotation(self.state.orbital_angle, &up);

        orbital_rotation * translation * axial_tilt * axial_rotation * scale
    }

    pub fn compose(&mut self, parent_world: Option<&Mat4>) {
        let local = self.local_matrix();
        self.world = match parent_world {
            Some(parent) => parent * local,
            None => local,
        };
    }

    pub fn world(&self) -> &Mat4 {
        &self.world
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.world[(0, 3)], self.world[(1, 3)], self.world[(2, 3)])
    }
}

// =============================================================================
// Solar system model
// =============================================================================

/// CPU side of the solar system: transforms, animation toggle and speed.
#[derive(Debug, Clone)]
pub struct SolarSystemModel {
    bodies: Vec<BodyTransform>,
    animation_enabled: bool,
    speed_factor: f32,
    speed_step: f32,
}

impl SolarSystemModel {
    /// Parents must come before their children in `bodies`.
    pub fn new(
        bodies: Vec<BodyTransform>,
        speed_factor: f32,
        speed_step: f32,
    ) -> Result<Self, ConfigError> {
        for (index, body) in bodies.iter().enumerate() {
            if let Some(parent) = body.parent {
                if parent >= index {
                    return Err(ConfigError::Invalid(format!(
                        "body {index} has parent {parent}, parents must precede children"
                    )));
                }
            }
        }

        let mut model = SolarSystemModel {
            bodies,
            animation_enabled: false,
            speed_factor: speed_factor.clamp(MIN_SPEED_FACTOR, MAX_SPEED_FACTOR),
            speed_step,
        };
        model.compose_all();
        Ok(model)
    }

    pub fn from_config(config: &SolarSystemConfig) -> Result<Self, ConfigError> {
        let parents = config.resolve_parents()?;
        let bodies = config
            .bodies
            .iter()
            .zip(parents)
            .map(|(body, parent)| {
                let params = OrbitalParameters {
                    orbit_radius: body.orbit_radius * config.distance_multiplier,
                    scale: body.scale,
                    orbital_period: body.orbital_period,
                    rotational_period: body.rotational_period,
                    axial_tilt: body.axial_tilt,
                };
                BodyTransform::new(params, parent)
            })
            .collect();

        let mut model = SolarSystemModel::new(bodies, config.speed_factor, config.speed_step)?;
        model.set_animation_enabled(config.start_animated);
        Ok(model)
    }

    pub fn update(&mut self, elapsed_seconds: f32) {
        if self.animation_enabled {
            let speed_factor = self.speed_factor;
            for body in &mut self.bodies {
                body.advance(elapsed_seconds, speed_factor);
            }
        }
        self.compose_all();
    }

    fn compose_all(&mut self) {
        for index in 0..self.bodies.len() {
            let (earlier, rest) = self.bodies.split_at_mut(index);
            let body = &mut rest[0];
            let parent_world = body.parent.map(|parent| *earlier[parent].world());
            body.compose(parent_world.as_ref());
        }
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    pub fn set_animation_enabled(&mut self, enabled: bool) {
        self.animation_enabled = enabled;
    }

    pub fn toggle_animation(&mut self) {
        self.animation_enabled = !self.animation_enabled;
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    pub fn increase_speed(&mut self) {
        self.speed_factor = (self.speed_factor * self.speed_step).min(MAX_SPEED_FACTOR);
    }

    pub fn decrease_speed(&mut self) {
        self.speed_factor = (self.speed_factor / self.speed_step).max(MIN_SPEED_FACTOR);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn world(&self, index: usize) -> &Mat4 {
        self.bodies[index].world()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.bodies[index].position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn params(orbit_radius: f32, orbital_period: f32, rotational_period: f32) -> OrbitalParameters {
        OrbitalParameters {
            orbit_radius,
            scale: 1.0,
            orbital_period,
            rotational_period,
            axial_tilt: 0.0,
        }
    }

    fn transform_point(matrix: &Mat4, point: Vec3) -> Vec3 {
        (matrix * glm::vec4(point.x, point.y, point.z, 1.0)).xyz()
    }

    #[test]
    fn zero_period_does_not_move() {
        assert_eq!(angular_rate(0.0, 0.1), 0.0);
        assert_eq!(angular_rate(-1.0, 0.1), 0.0);
        assert_relative_eq!(angular_rate(0.5, 0.1), 0.2);
    }

    #[test]
    fn body_starts_on_positive_z_at_orbit_radius() {
        let body = BodyTransform::new(params(50.0, 1.0, 1.0), None);
        assert_relative_eq!(body.position(), Vec3::new(0.0, 0.0, 50.0), epsilon = 1e-5);
    }

    #[test]
    fn advance_accumulates_angles_by_period() {
        let mut body = BodyTransform::new(params(10.0, 2.0, 0.5), None);
        body.advance(1.0, 0.1);
        body.advance(1.0, 0.1);
        assert_relative_eq!(body.state.orbital_angle, 0.1);
        assert_relative_eq!(body.state.axial_angle, 0.4);
    }

    #[test]
    fn quarter_orbit_swings_from_z_to_x() {
        let mut body = BodyTransform::new(params(10.0, 1.0, 0.0), None);
        body.state.orbital_angle = FRAC_PI_2;
        body.compose(None);
        assert_relative_eq!(body.position(), Vec3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn local_matrix_applies_scale_spin_tilt_translate_orbit_in_order() {
        let mut body = BodyTransform::new(
            OrbitalParameters {
                orbit_radius: 20.0,
                scale: 2.0,
                orbital_period: 1.0,
                rotational_period: 1.0,
                axial_tilt: FRAC_PI_2,
            },
            None,
        );
        body.state.axial_angle = FRAC_PI_2;
        body.state.orbital_angle = PI;
        body.compose(None);

        // (1,0,0) -> scale (2,0,0) -> spin about Y (0,0,-2) -> tilt about Z (0,0,-2)
        // -> translate (0,0,18) -> half orbit (0,0,-18)
        let moved = transform_point(body.world(), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Vec3::new(0.0, 0.0, -18.0), epsilon = 1e-4);

        // (0,1,0) -> scale (0,2,0) -> spin keeps it -> tilt about Z (-2,0,0)
        // -> translate (-2,0,20) -> half orbit (2,0,-20)
        let up = transform_point(body.world(), Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(up, Vec3::new(2.0, 0.0, -20.0), epsilon = 1e-4);
    }

    #[test]
    fn child_world_is_parent_world_times_local() {
        let bodies = vec![
            BodyTransform::new(params(50.0, 1.0, 0.0), None),
            BodyTransform::new(params(10.0, 0.5, 0.0), Some(0)),
        ];
        let mut model = SolarSystemModel::new(bodies, 1.0, 2.0).unwrap();
        model.set_animation_enabled(true);
        model.update(0.3);

        let expected = model.world(0) * model.bodies[1].local_matrix();
        assert_relative_eq!(*model.world(1), expected, epsilon = 1e-5);
        let distance = glm::distance(&model.position(0), &model.position(1));
        assert_relative_eq!(distance, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn moon_inherits_earth_scale() {
        let mut earth = params(50.0, 1.0, 0.0);
        earth.scale = 3.0;
        let bodies = vec![
            BodyTransform::new(earth, None),
            BodyTransform::new(params(10.0, 0.5, 0.0), Some(0)),
        ];
        let model = SolarSystemModel::new(bodies, 1.0, 2.0).unwrap();
        let distance = glm::distance(&model.position(0), &model.position(1));
        assert_relative_eq!(distance, 30.0, epsilon = 1e-4);
    }

    #[test]
    fn parent_after_child_is_rejected() {
        let bodies = vec![
            BodyTransform::new(params(10.0, 1.0, 1.0), Some(1)),
            BodyTransform::new(params(50.0, 1.0, 1.0), None),
        ];
        assert!(SolarSystemModel::new(bodies, 1.0, 2.0).is_err());

        let own_parent = vec![BodyTransform::new(params(10.0, 1.0, 1.0), Some(0))];
        assert!(SolarSystemModel::new(own_parent, 1.0, 2.0).is_err());
    }

    #[test]
    fn paused_model_keeps_angles_but_has_placed_bodies() {
        let config = SolarSystemConfig::default();
        let mut model = SolarSystemModel::from_config(&config).unwrap();
        assert!(!model.animation_enabled());

        let before = model.position(3);
        model.update(5.0);
        assert_eq!(model.bodies[3].state, OrbitalState::default());
        assert_relative_eq!(model.position(3), before);
        assert_relative_eq!(before, Vec3::new(0.0, 0.0, 50.0), epsilon = 1e-4);
    }

    #[test]
    fn toggle_starts_and_stops_animation() {
        let config = SolarSystemConfig::default();
        let mut model = SolarSystemModel::from_config(&config).unwrap();

        model.toggle_animation();
        model.update(1.0);
        let moved = model.bodies[3].state;
        assert_relative_eq!(moved.orbital_angle, 0.1, epsilon = 1e-6);

        model.toggle_animation();
        model.update(1.0);
        assert_eq!(model.bodies[3].state, moved);
    }

    #[test]
    fn sun_stays_at_origin() {
        let config = SolarSystemConfig::default();
        let mut model = SolarSystemModel::from_config(&config).unwrap();
        model.set_animation_enabled(true);
        for _ in 0..100 {
            model.update(0.016);
        }
        assert_relative_eq!(model.position(0), Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn moon_follows_earth() {
        let config = SolarSystemConfig::default();
        let mut model = SolarSystemModel::from_config(&config).unwrap();
        model.set_animation_enabled(true);
        for _ in 0..250 {
            model.update(0.02);
        }
        // Moon orbit 0.2 AU * 50, Earth scale 1.0
        let distance = glm::distance(&model.position(3), &model.position(10));
        assert_relative_eq!(distance, 10.0, epsilon = 1e-3);
    }

    #[test]
    fn speed_steps_are_clamped() {
        let bodies = vec![BodyTransform::new(params(1.0, 1.0, 1.0), None)];
        let mut model = SolarSystemModel::new(bodies, 0.1, 2.0).unwrap();

        model.increase_speed();
        assert_relative_eq!(model.speed_factor(), 0.2);
        model.decrease_speed();
        model.decrease_speed();
        assert_relative_eq!(model.speed_factor(), 0.05);

        for _ in 0..64 {
            model.increase_speed();
        }
        assert_eq!(model.speed_factor(), MAX_SPEED_FACTOR);
        for _ in 0..64 {
            model.decrease_speed();
        }
        assert_eq!(model.speed_factor(), MIN_SPEED_FACTOR);
    }
}
