use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;
use winit::window::Window;

use crate::camera::FirstPersonCamera;
use crate::config::AppConfig;
use crate::demos::{self, Demo, DemoKind};
use crate::error::RenderError;
use crate::fps::FpsCounter;
use crate::game_time::GameClock;
use crate::gpu::GpuContext;
use crate::input::InputState;

/// Everything one frame of the game loop touches.
pub struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: FirstPersonCamera,
    input: InputState,
    clock: GameClock,
    fps: FpsCounter,
    demo: Box<dyn Demo>,
    title: TitleBar,
}

/// Window title made of the base title, the demo status and the last FPS reading.
#[derive(Debug)]
struct TitleBar {
    base: String,
    status: Option<String>,
    fps: u32,
}

impl TitleBar {
    fn new(base: String) -> Self {
        TitleBar {
            base,
            status: None,
            fps: 0,
        }
    }

    /// Returns the new title when the status changed or a new FPS reading arrived.
    fn refresh(&mut self, status: String, fps: Option<u32>) -> Option<String> {
        let status_changed = self.status.as_deref() != Some(status.as_str());
        if !status_changed && fps.is_none() {
            return None;
        }
        if let Some(fps) = fps {
            self.fps = fps;
        }
        let title = format!("{} - {} - {} FPS", self.base, status, self.fps);
        self.status = Some(status);
        Some(title)
    }
}

impl App {
    pub async fn new(
        window: Arc<Window>,
        config: &AppConfig,
        kind: DemoKind,
    ) -> Result<Self, RenderError> {
        let gpu = GpuContext::new(window.clone(), config.window.vsync).await?;
        let size = gpu.size;
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let camera = FirstPersonCamera::new(&config.camera, aspect);
        let demo = demos::create(kind, &gpu, config)?;

        log::info!("Started {kind:?} at {}x{}", size.width, size.height);

        Ok(App {
            window,
            gpu,
            camera,
            input: InputState::new(),
            clock: GameClock::start(),
            fps: FpsCounter::new(),
            demo,
            title: TitleBar::new(config.window.title.clone()),
        })
    }

    pub fn controls(&self) -> &'static [&'static str] {
        self.demo.controls()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
        self.camera.set_aspect(new_size.width, new_size.height);
    }

    /// Rebuilds the swap chain after it was lost or went stale.
    pub fn reconfigure(&mut self) {
        log::debug!("Reconfiguring surface");
        self.gpu.reconfigure();
    }

    /// Feeds keyboard, mouse and focus events into the input state.
    pub fn handle_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.input.process_key(*code, *state),
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(*button, *state)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_cursor_moved(*position)
            }
            WindowEvent::Focused(false) => self.input.clear(),
            _ => {}
        }
    }

    pub fn update(&mut self) {
        let time = self.clock.tick();

        let fps = if self.fps.update(&time) {
            log::debug!("{} FPS at {:.0}s", self.fps.fps(), time.total_seconds());
            Some(self.fps.fps())
        } else {
            None
        };

        self.camera.update(&time, &self.input);
        self.demo.update(&time, &self.input);
        if let Some(title) = self.title.refresh(self.demo.status(), fps) {
            self.window.set_title(&title);
        }
        self.demo.prepare(&self.gpu.queue, &self.camera);
        self.input.end_frame();
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.demo.draw(&mut render_pass);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_refresh_sets_title() {
        let mut title = TitleBar::new("Solar System".into());
        assert_eq!(
            title.refresh("paused | speed x0.100".into(), None).as_deref(),
            Some("Solar System - paused | speed x0.100 - 0 FPS")
        );
    }

    #[test]
    fn unchanged_status_without_reading_keeps_title() {
        let mut title = TitleBar::new("Solar System".into());
        title.refresh("paused".into(), None);
        assert_eq!(title.refresh("paused".into(), None), None);
    }

    #[test]
    fn status_change_updates_title_with_last_fps() {
        let mut title = TitleBar::new("Solar System".into());
        title.refresh("paused".into(), Some(60));
        assert_eq!(
            title.refresh("running".into(), None).as_deref(),
            Some("Solar System - running - 60 FPS")
        );
    }

    #[test]
    fn fps_reading_updates_title() {
        let mut title = TitleBar::new("Demo".into());
        title.refresh("Filtering: Point".into(), None);
        assert_eq!(
            title.refresh("Filtering: Point".into(), Some(144)).as_deref(),
            Some("Demo - Filtering: Point - 144 FPS")
        );
    }
}
