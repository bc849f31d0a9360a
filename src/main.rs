mod app;
mod camera;
mod config;
mod demos;
mod error;
mod fps;
mod game_time;
mod gpu;
mod input;
mod lighting;
mod mesh;
mod orbit;
mod sampler;
mod texture;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use app::App;
use config::AppConfig;
use demos::DemoKind;

/// Animated solar system, texture filtering and point light demos.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Scene to run.
    #[arg(long, value_enum, default_value_t = DemoKind::SolarSystem)]
    demo: DemoKind,

    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the directory textures and models are loaded from.
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("solar_system=info,wgpu=warn"),
    )
    .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(content_dir) = cli.content_dir {
        config.content_dir = content_dir;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .build(&event_loop)
            .context("creating window")?,
    );

    let mut app = pollster::block_on(App::new(window.clone(), &config, cli.demo))
        .context("initialising renderer")?;

    println!("===========================================");
    println!("{}", config.window.title);
    println!("===========================================");
    println!("Controls:");
    for line in app.controls() {
        println!("  {line}");
    }
    println!("===========================================");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(physical_size) => {
                app.resize(*physical_size);
            }
            WindowEvent::RedrawRequested => {
                app.update();
                match app.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        app.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory, exiting");
                        elwt.exit();
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }
            other => app.handle_input(other),
        },
        Event::AboutToWait => {
            window.request_redraw();
        }
        _ => {}
    })?;

    Ok(())
}
