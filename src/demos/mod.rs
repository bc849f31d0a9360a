pub mod filtering_modes;
pub mod lit;
pub mod point_light;
pub mod solar_system;

use crate::camera::FirstPersonCamera;
use crate::config::AppConfig;
use crate::error::RenderError;
use crate::game_time::GameTime;
use crate::gpu::GpuContext;
use crate::input::InputState;

/// A drawable scene component driven by the game loop.
///
/// Per frame the loop calls `update`, then `prepare` to stage uniform writes on
/// the queue, then `draw` inside the frame's render pass.
pub trait Demo {
    fn update(&mut self, time: &GameTime, input: &InputState);
    fn prepare(&self, queue: &wgpu::Queue, camera: &FirstPersonCamera);
    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>);
    /// Short state summary shown in the window title.
    fn status(&self) -> String;
    fn controls(&self) -> &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DemoKind {
    #[default]
    SolarSystem,
    FilteringModes,
    PointLight,
}

pub fn create(
    kind: DemoKind,
    gpu: &GpuContext,
    config: &AppConfig,
) -> Result<Box<dyn Demo>, RenderError> {
    let demo: Box<dyn Demo> = match kind {
        DemoKind::SolarSystem => Box::new(solar_system::SolarSystem::new(gpu, config)?),
        DemoKind::FilteringModes => {
            Box::new(filtering_modes::FilteringModesDemo::new(gpu, config))
        }
        DemoKind::PointLight => Box::new(point_light::PointLightDemo::new(gpu, config)),
    };
    Ok(demo)
}
