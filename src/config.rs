//! Runtime configuration, loaded from TOML with every field defaulted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mesh::{MAX_SPHERE_SUBDIVISIONS, MIN_SPHERE_SUBDIVISIONS};

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root that relative texture and model paths are resolved against.
    pub content_dir: PathBuf,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub solar_system: SolarSystemConfig,
    pub filtering: FilteringConfig,
    pub point_light: PointLightConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            content_dir: PathBuf::from("content"),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            solar_system: SolarSystemConfig::default(),
            filtering: FilteringConfig::default(),
            point_light: PointLightConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "Solar System".to_string(),
            width: 1024,
            height: 768,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Units per second for WASD movement.
    pub movement_rate: f32,
    /// Radians per pixel of mouse drag.
    pub mouse_sensitivity: f32,
    /// Vertical field of view in radians.
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            position: [0.0, 2.5, 25.0],
            movement_rate: 100.0,
            mouse_sensitivity: 0.005,
            field_of_view: std::f32::consts::FRAC_PI_4,
            near_plane: 0.1,
            far_plane: 5000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarSystemConfig {
    /// Scales orbit radii from astronomical units to world units.
    pub distance_multiplier: f32,
    pub speed_factor: f32,
    /// Factor applied by one press of the speed up/down keys.
    pub speed_step: f32,
    pub start_animated: bool,
    pub sphere_subdivisions: u32,
    /// OBJ model used for every body instead of the generated sphere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    pub light_radius: f32,
    pub light_color: [f32; 3],
    pub specular_color: [f32; 3],
    pub specular_power: f32,
    pub bodies: Vec<BodyDescriptor>,
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        SolarSystemConfig {
            distance_multiplier: 50.0,
            speed_factor: 0.1,
            speed_step: 2.0,
            start_animated: false,
            sphere_subdivisions: 48,
            model: None,
            light_radius: 100_000.0,
            light_color: [1.0, 1.0, 1.0],
            specular_color: [1.0, 1.0, 1.0],
            specular_power: 128.0,
            bodies: default_bodies(),
        }
    }
}

// =============================================================================
// Body table
// =============================================================================

/// One celestial body. Radii in AU, periods in years, tilt in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDescriptor {
    pub name: String,
    pub orbit_radius: f32,
    pub scale: f32,
    pub orbital_period: f32,
    pub rotational_period: f32,
    pub axial_tilt: f32,
    pub texture: PathBuf,
    pub specular_map: PathBuf,
    #[serde(default)]
    pub ambient: f32,
    /// Solid colour used when the texture cannot be loaded.
    #[serde(default = "default_fallback_color")]
    pub fallback_color: [u8; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

fn default_fallback_color() -> [u8; 3] {
    [128, 128, 128]
}

const SHARED_SPECULAR_MAP: &str = "textures/MarsSpecularMap.png";

#[allow(clippy::too_many_arguments)]
fn body(
    name: &str,
    orbit_radius: f32,
    scale: f32,
    orbital_period: f32,
    rotational_period: f32,
    axial_tilt: f32,
    fallback_color: [u8; 3],
    parent: Option<&str>,
) -> BodyDescriptor {
    BodyDescriptor {
        name: name.to_string(),
        orbit_radius,
        scale,
        orbital_period,
        rotational_period,
        axial_tilt,
        texture: PathBuf::from(format!("textures/{name}Composite.dds")),
        specular_map: PathBuf::from(SHARED_SPECULAR_MAP),
        ambient: 0.0,
        fallback_color,
        parent: parent.map(str::to_string),
    }
}

pub fn default_bodies() -> Vec<BodyDescriptor> {
    let mut sun = body("Sun", 0.0, 5.0, 0.0, 0.07, 0.0, [255, 200, 60], None);
    sun.ambient = 0.8;

    vec![
        sun,
        body("Mercury", 0.387, 0.382, 0.241, 0.161, 0.0, [150, 140, 130], None),
        body("Venus", 0.723, 0.949, 0.616, 0.666, 3.096, [220, 180, 120], None),
        body("Earth", 1.0, 1.0, 1.0, 0.003, 0.410, [60, 110, 200], None),
        body("Mars", 1.524, 0.532, 1.88, 0.003, 0.436, [190, 90, 50], None),
        body("Jupiter", 5.203, 11.19, 11.86, 0.001, 0.052, [200, 160, 120], None),
        body("Saturn", 9.582, 9.26, 29.41, 0.001, 0.471, [210, 190, 140], None),
        body("Uranus", 19.2, 4.01, 84.04, 0.002, 1.709, [150, 210, 220], None),
        body("Neptune", 30.05, 3.88, 163.72, 0.002, 0.517, [70, 100, 210], None),
        body("Pluto", 39.48, 0.18, 247.93, 0.017, 2.129, [180, 160, 140], None),
        body("Moon", 0.2, 0.272, 0.074, 0.074, 0.026, [170, 170, 170], Some("Earth")),
    ]
}

// =============================================================================
// Demo sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    pub texture: PathBuf,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        FilteringConfig {
            texture: PathBuf::from("textures/EarthComposite.dds"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    pub texture: PathBuf,
    pub specular_map: PathBuf,
    pub sphere_scale: f32,
    pub light_position: [f32; 3],
    pub light_radius: f32,
    /// Ambient intensity on a 0-255 scale.
    pub ambient_intensity: f32,
    pub specular_power: f32,
    pub proxy_scale: f32,
}

impl Default for PointLightConfig {
    fn default() -> Self {
        PointLightConfig {
            texture: PathBuf::from("textures/EarthComposite.dds"),
            specular_map: PathBuf::from("textures/EarthSpecularMap.png"),
            sphere_scale: 5.0,
            light_position: [0.0, 0.0, 10.0],
            light_radius: 50.0,
            ambient_intensity: 0.0,
            specular_power: 25.0,
            proxy_scale: 0.5,
        }
    }
}

// =============================================================================
// Loading and validation
// =============================================================================

impl AppConfig {
    /// Built-in defaults when `path` is `None`, otherwise the parsed file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => AppConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.content_dir.join(relative)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }

        let camera = &self.camera;
        finite("camera.position", &camera.position)?;
        non_negative("camera.movement_rate", camera.movement_rate)?;
        finite("camera.mouse_sensitivity", &[camera.mouse_sensitivity])?;
        if !(camera.near_plane > 0.0 && camera.far_plane > camera.near_plane) {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far (near {}, far {})",
                camera.near_plane, camera.far_plane
            )));
        }
        if !camera.far_plane.is_finite() {
            return Err(ConfigError::Invalid("camera far_plane must be finite".into()));
        }
        if !(camera.field_of_view > 0.0 && camera.field_of_view < std::f32::consts::PI) {
            return Err(ConfigError::Invalid(
                "camera field_of_view must be in (0, pi)".into(),
            ));
        }

        let solar = &self.solar_system;
        positive("solar_system.distance_multiplier", solar.distance_multiplier)?;
        positive("solar_system.speed_factor", solar.speed_factor)?;
        if !(solar.speed_step > 1.0 && solar.speed_step.is_finite()) {
            return Err(ConfigError::Invalid("speed_step must be greater than 1".into()));
        }
        if !(MIN_SPHERE_SUBDIVISIONS..=MAX_SPHERE_SUBDIVISIONS)
            .contains(&solar.sphere_subdivisions)
        {
            return Err(ConfigError::Invalid(format!(
                "sphere_subdivisions must be in {MIN_SPHERE_SUBDIVISIONS}..={MAX_SPHERE_SUBDIVISIONS}, got {}",
                solar.sphere_subdivisions
            )));
        }
        positive("solar_system.light_radius", solar.light_radius)?;
        finite("solar_system.light_color", &solar.light_color)?;
        finite("solar_system.specular_color", &solar.specular_color)?;
        non_negative("solar_system.specular_power", solar.specular_power)?;
        solar.resolve_parents()?;

        let light = &self.point_light;
        positive("point_light.sphere_scale", light.sphere_scale)?;
        positive("point_light.proxy_scale", light.proxy_scale)?;
        positive("point_light.light_radius", light.light_radius)?;
        finite("point_light.light_position", &light.light_position)?;
        non_negative("point_light.ambient_intensity", light.ambient_intensity)?;
        non_negative("point_light.specular_power", light.specular_power)?;
        Ok(())
    }
}

fn finite(field: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be finite, got {values:?}"
        )))
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be a finite positive number, got {value}"
        )))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be a finite non-negative number, got {value}"
        )))
    }
}

impl SolarSystemConfig {
    /// Maps every body's parent name to its index. Parents must precede children.
    pub fn resolve_parents(&self) -> Result<Vec<Option<usize>>, ConfigError> {
        if self.bodies.is_empty() {
            return Err(ConfigError::Invalid("solar system has no bodies".into()));
        }

        let mut indices: HashMap<&str, usize> = HashMap::new();
        let mut parents = Vec::with_capacity(self.bodies.len());

        for (index, body) in self.bodies.iter().enumerate() {
            body.validate()?;

            let parent = match body.parent.as_deref() {
                Some(parent_name) => match indices.get(parent_name) {
                    Some(&parent_index) => Some(parent_index),
                    None => {
                        return Err(ConfigError::Invalid(format!(
                            "body '{}' names parent '{}' which is not listed before it",
                            body.name, parent_name
                        )))
                    }
                },
                None => None,
            };
            parents.push(parent);

            if indices.insert(body.name.as_str(), index).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "duplicate body name '{}'",
                    body.name
                )));
            }
        }

        Ok(parents)
    }
}

impl BodyDescriptor {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("body name must not be empty".into()));
        }
        let non_negative = [
            ("orbit_radius", self.orbit_radius),
            ("orbital_period", self.orbital_period),
            ("rotational_period", self.rotational_period),
            ("ambient", self.ambient),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "body '{}': {field} must be a finite non-negative number, got {value}",
                    self.name
                )));
            }
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "body '{}': scale must be positive, got {}",
                self.name, self.scale
            )));
        }
        if !self.axial_tilt.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "body '{}': axial_tilt must be finite",
                self.name
            )));
        }
        Ok(())
    }
}
