//! Raptor reveal - a rocket engine that assembles itself as you scroll
//!
//! Mouse wheel scrolls the virtual page, Home returns to the top, Escape quits.
//! `--scrub <P>` evaluates a single frame headlessly and prints the scene.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use raptor_reveal::choreography::Choreography;
use raptor_reveal::cli::Args;
use raptor_reveal::clock::{ManualClock, SystemClock};
use raptor_reveal::driver::{FrameDriver, FrameReport};
use raptor_reveal::params::*;
use raptor_reveal::parts::{PartRegistry, SceneSnapshot};
use raptor_reveal::progress::{ProgressHandle, ScrollObserver};
use raptor_reveal::rendering::RenderSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Scroll source and choreography
    driver: FrameDriver<SystemClock>,
    observer: Option<ScrollObserver>,

    // Configuration
    camera_config: CameraConfig,
    render_config: RenderConfig,
    scroll_config: ScrollConfig,

    title: String,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(driver: FrameDriver<SystemClock>, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            render_system: None,
            driver,
            observer: None,
            camera_config: CameraConfig::default(),
            render_config,
            scroll_config: ScrollConfig::default(),
            title: String::new(),
            fatal: None,
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Raptor Reveal")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.driver.registry().len(),
            self.camera_config.clone(),
            self.render_config.clone(),
        ))?;

        let size = window.inner_size();
        self.driver.resize(size.width, size.height);
        self.observer = Some(ScrollObserver::new(
            self.driver.progress_handle(),
            self.scroll_config.clone(),
            size.height.max(1) as f32,
        ));

        log::info!("Scroll to assemble; Home returns to top, ESC quits");

        self.window = Some(window);
        self.render_system = Some(render_system);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.stop();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init_window(event_loop) {
            log::error!("Initialization failed: {:#}", e);
            self.fatal = Some(e);
            self.shutdown(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::Home => {
                    if let Some(observer) = self.observer.as_mut() {
                        observer.scroll_to_top();
                    }
                }
                _ => {}
            },
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(observer) = self.observer.as_mut() {
                    match delta {
                        MouseScrollDelta::LineDelta(_, lines) => observer.scroll_lines(lines),
                        MouseScrollDelta::PixelDelta(pos) => observer.scroll_by(-pos.y as f32),
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(observer) = self.observer.as_mut() {
                    observer.resize_viewport(size.height as f32);
                }
                self.driver.resize(size.width, size.height);
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

impl App {
    /// Evaluate and draw a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(report) = self.driver.tick() else {
            event_loop.exit();
            return;
        };
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        let snapshot = self.driver.registry().snapshot();
        match render_system.render(&snapshot) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                self.shutdown(event_loop);
                return;
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        let title = format!(
            "Raptor Reveal - {} ({}%)",
            report.display.label, report.display.percent
        );
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

fn build_scene(
    preset: ChoreographyPreset,
    aspect: f32,
) -> anyhow::Result<(Choreography, PartRegistry)> {
    let config = preset.config();
    let registry = PartRegistry::from_specs(&config.parts, config.camera_start, aspect)
        .with_context(|| format!("Invalid part table in preset '{}'", preset.name()))?;
    let choreography = Choreography::new(config, &registry)
        .with_context(|| format!("Invalid stage table in preset '{}'", preset.name()))?;

    log::info!(
        "Preset '{}': {} parts, {} stages",
        preset.name(),
        registry.len(),
        choreography.stages().len()
    );
    for stage in choreography.stages() {
        log::info!(
            "  [{:.2}, {:.2}) {:<10} {}",
            stage.start,
            stage.end,
            stage.name,
            stage.label
        );
    }
    Ok((choreography, registry))
}

/// Evaluate one frame at a fixed progress and clock, then print it
fn scrub(
    choreography: Choreography,
    registry: PartRegistry,
    spin_clock: SpinClock,
    progress: f32,
    time_ms: f64,
) -> anyhow::Result<()> {
    let handle = ProgressHandle::new();
    handle.publish(progress);

    let clock = ManualClock::starting_at(time_ms);
    let mut driver = FrameDriver::new(choreography, registry, handle, clock, spin_clock)
        .context("Choreography does not match its part registry")?;
    let report = driver
        .tick()
        .context("Frame driver stopped before the first frame")?;

    print_snapshot(&report, &driver.registry().snapshot());
    Ok(())
}

fn print_snapshot(report: &FrameReport, snapshot: &SceneSnapshot) {
    println!(
        "progress {:.4}  stage {} {}  ({}%)  local {:.4}",
        report.progress,
        report.display.index,
        report.display.label,
        report.display.percent,
        report.sample.local
    );
    let cam = snapshot.camera.position;
    println!("camera       pos ({:8.3}, {:8.3}, {:8.3})", cam.x, cam.y, cam.z);
    for part in &snapshot.parts {
        let t = &part.transform;
        print!(
            "{:<12} pos ({:8.3}, {:8.3}, {:8.3})  rot ({:7.3}, {:7.3}, {:7.3})  scale {:.3}",
            part.id.name(),
            t.position.x,
            t.position.y,
            t.position.z,
            t.rotation.x,
            t.rotation.y,
            t.rotation.z,
            t.scale.x
        );
        if let Some(emissive) = part.emissive {
            print!("  emissive {:.3}", emissive);
        }
        if let Some(light) = part.light {
            print!("  light {:.3} @ {:.1}", light.intensity, light.distance);
        }
        println!();
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let preset = args.parse_preset();
    let spin_clock = args.parse_spin_clock();
    let render_config = RenderConfig::default();

    let (choreography, registry) = build_scene(preset, render_config.aspect_ratio())?;

    if let Some(progress) = args.scrub {
        return scrub(choreography, registry, spin_clock, progress, args.time_ms);
    }

    log::info!("Idle spin clock: {:?}", spin_clock);
    let driver = FrameDriver::new(
        choreography,
        registry,
        ProgressHandle::new(),
        SystemClock::new(),
        spin_clock,
    )
    .context("Choreography does not match its part registry")?;

    let mut app = App::new(driver, render_config);
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
