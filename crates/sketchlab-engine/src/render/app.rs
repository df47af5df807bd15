//! Windowed application runner for the scene renderer.
//!
//! Provides [`run_windowed`], which records a lab run and shows it in a
//! winit window. The scene is redrawn only when the window asks for it.
//!
//! Controls:
//!
//! - `Space` -- re-roll the seed and draw a new scene
//! - `Escape` -- quit
//!
//! This module is feature-gated behind `renderer`.

use std::sync::Arc;

use rand::Rng;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use super::renderer::{Camera2D, SceneRenderer};
use crate::lab::{Lab, LabConfig, LabRun};

/// Show `lab` drawn with `config` in a window until it is closed.
///
/// The window is sized to the config's canvas. If `config.seed` is `None` a
/// random seed is picked so that re-rolls can be reported in the logs.
///
/// # Errors
///
/// Returns an error if the config is invalid, the event loop cannot be
/// created, or the window/renderer fails to initialize.
pub fn run_windowed(lab: Lab, config: LabConfig, window_title: &str) -> Result<(), anyhow::Error> {
    let mut config = config;
    if config.seed.is_none() {
        config.seed = Some(rand::thread_rng().gen());
    }
    let run = lab.run(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        lab,
        config,
        run,
        title: window_title.to_owned(),
        renderer: None,
        init_failed: false,
    };

    event_loop.run_app(&mut app)?;

    if app.init_failed {
        return Err(anyhow::anyhow!(
            "failed to initialize windowed renderer (see logs for details)"
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// The winit application handler that shows a lab run.
struct App {
    lab: Lab,
    config: LabConfig,
    run: LabRun,
    title: String,
    /// `None` until `resumed` creates the window.
    renderer: Option<SceneRenderer>,
    /// Set to `true` if initialization fails (window or renderer), so
    /// `run_windowed` can return an error after the event loop exits.
    init_failed: bool,
}

impl App {
    /// Pick a fresh seed and re-record the scene.
    fn reroll(&mut self) {
        let seed = rand::thread_rng().gen();
        self.config.seed = Some(seed);
        match self.lab.run(&self.config) {
            Ok(run) => {
                tracing::info!(
                    seed,
                    nodes = run.stats.nodes,
                    digest = %run.scene.digest(),
                    "re-rolled scene"
                );
                self.run = run;
            }
            Err(e) => tracing::warn!(error = %e, "re-roll failed -- keeping previous scene"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let size = self.config.canvas_size.round() as u32;
        let window_attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(size, size));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!(error = %e, "failed to create window -- exiting");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(SceneRenderer::new(window.clone())) {
            Ok(mut renderer) => {
                let canvas = self.config.canvas_size as f32;
                renderer.camera = Camera2D::for_canvas(canvas, canvas);
                tracing::info!(
                    lab = self.lab.name(),
                    seed = ?self.config.seed,
                    nodes = self.run.stats.nodes,
                    "scene window created"
                );
                window.request_redraw();
                self.renderer = Some(renderer);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to initialize scene renderer -- exiting");
                self.init_failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.renderer.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested -- shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!(
                    width = new_size.width,
                    height = new_size.height,
                    "window resized"
                );
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(new_size);
                }
            }
            WindowEvent::KeyboardInput { event: key_ev, .. } => {
                if key_ev.state != ElementState::Pressed {
                    return;
                }
                match key_ev.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
                    PhysicalKey::Code(KeyCode::Space) => {
                        self.reroll();
                        if let Some(renderer) = self.renderer.as_ref() {
                            renderer.window().request_redraw();
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };
                match renderer.render(&self.run.scene) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = renderer.window().inner_size();
                        renderer.resize(size);
                        renderer.window().request_redraw();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory -- exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "surface error during render");
                    }
                }
            }
            _ => {}
        }
    }
}
