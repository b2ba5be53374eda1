//! Real-time 3D window around a [`SimulationDriver`]
//!
//! Each redraw runs the driver up to its next render checkpoint (or several,
//! depending on the speed setting) and uploads the captured frame.
//!
//! Controls:
//! - Left mouse drag: Orbit camera
//! - Scroll: Zoom in/out
//! - Space: Pause/resume
//! - R: Reset view
//! - +/-: Frames simulated per redraw
//! - Escape: Quit

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use celestial::{DriverState, IntegrationScheme, Renderer, SimError, SimulationDriver};
use common::{Camera3D, GraphicsContext, WindowOptions};
use log::{error, info, warn};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::diagnostics_ui::DiagnosticsPanel;
use crate::renderer::OrbitRenderer;
use crate::scene::SceneCapture;

const MAX_BODIES: usize = 4096;
const MAX_FRAMES_PER_REDRAW: u32 = 64;
const SECONDS_PER_DAY: f64 = 86_400.0;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: OrbitRenderer,
    driver: SimulationDriver<SceneCapture>,
    camera: Camera3D,
    paused: bool,
    frames_per_redraw: u32,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    diagnostics: DiagnosticsPanel,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, mut driver: SimulationDriver<SceneCapture>) -> Self {
        let mut renderer = OrbitRenderer::new(&ctx, MAX_BODIES);
        let camera = Camera3D::new(ctx.aspect_ratio());

        if driver.engine().bodies().len() > MAX_BODIES {
            warn!("only the first {MAX_BODIES} bodies will be drawn");
        }

        // Show the initial state before the first checkpoint
        let initial = driver.engine().bodies().to_vec();
        driver.renderer_mut().display(&initial);
        renderer.update_bodies(&ctx.queue, driver.renderer().instances());
        let mut diagnostics = DiagnosticsPanel::default();
        diagnostics.sample(driver.engine(), driver.renderer().frames());

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            driver,
            camera,
            paused: false,
            frames_per_redraw: 1,
            mouse_pressed: false,
            last_mouse_pos: None,
            diagnostics,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
        self.renderer
            .resize(&self.ctx.device, new_size.width, new_size.height);
    }

    fn update(&mut self) -> Result<(), SimError> {
        if self.paused {
            return Ok(());
        }

        for _ in 0..self.frames_per_redraw {
            if self.driver.run_until_frame()? != DriverState::Running {
                break;
            }
        }
        self.renderer
            .update_bodies(&self.ctx.queue, self.driver.renderer().instances());
        self.diagnostics
            .sample(self.driver.engine(), self.driver.renderer().frames());
        Ok(())
    }

    fn status_line(&self) -> (String, String) {
        let engine = self.driver.engine();
        let config = engine.config();
        let scheme = match config.integrator {
            IntegrationScheme::Leapfrog => format!("leapfrog, dt {} s", config.dt),
            IntegrationScheme::EulerCromer => "euler-cromer".to_string(),
        };
        let summary = format!(
            "Bodies: {} | Day {:.1} | Tick {} | Merges {} | {} | ε {:.1e} m | {}x",
            engine.bodies().len(),
            engine.elapsed_time() / SECONDS_PER_DAY,
            self.driver.ticks(),
            self.driver.merges(),
            scheme,
            config.softening,
            self.frames_per_redraw,
        );
        let state = match self.driver.state() {
            DriverState::Stopped(reason) => format!("STOPPED ({reason:?})"),
            DriverState::Running if self.paused => "PAUSED".to_string(),
            DriverState::Running => "RUNNING".to_string(),
        };
        (summary, state)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);

        let (summary, state) = self.status_line();
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            self.diagnostics.show(ctx);

            egui::TopBottomPanel::top("status").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(&summary);
                    ui.separator();
                    let color = match state.as_str() {
                        "RUNNING" => egui::Color32::GREEN,
                        "PAUSED" => egui::Color32::YELLOW,
                        _ => egui::Color32::LIGHT_RED,
                    };
                    ui.label(egui::RichText::new(&state).color(color));
                });
            });
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Returns true when the key asks to quit
    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Escape => return true,
            KeyCode::Space => self.paused = !self.paused,
            KeyCode::KeyR => self.camera.reset(),
            KeyCode::Equal | KeyCode::NumpadAdd => {
                self.frames_per_redraw = (self.frames_per_redraw * 2).min(MAX_FRAMES_PER_REDRAW);
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                self.frames_per_redraw = (self.frames_per_redraw / 2).max(1);
            }
            _ => {}
        }
        false
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.mouse_pressed {
            if let Some((last_x, last_y)) = self.last_mouse_pos {
                let dx = (x - last_x) as f32 * 0.01;
                let dy = (y - last_y) as f32 * 0.01;
                self.camera.orbit(dx, dy);
            }
            self.last_mouse_pos = Some((x, y));
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }

    /// Window is going away: stop the driver so its final state is logged
    fn shut_down(&mut self) {
        self.driver.stop();
        info!(
            "closed after {} ticks ({:.1} simulated days), {} frames, {} merges, {} bodies left",
            self.driver.ticks(),
            self.driver.engine().elapsed_time() / SECONDS_PER_DAY,
            self.driver.renderer().frames(),
            self.driver.merges(),
            self.driver.engine().bodies().len()
        );
    }
}

/// Opens the viewer window and blocks until it is closed.
pub fn run(driver: SimulationDriver<SceneCapture>, options: &WindowOptions) -> Result<()> {
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(options))?;

    let mut app = App::new(ctx, driver);
    let failure: Rc<RefCell<Option<SimError>>> = Rc::new(RefCell::new(None));
    let failure_slot = Rc::clone(&failure);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                if app.handle_window_event(event) {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => {
                        app.shut_down();
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::MouseInput { state, button, .. } => {
                        if *button == MouseButton::Left {
                            app.mouse_pressed = *state == ElementState::Pressed;
                            if !app.mouse_pressed {
                                app.last_mouse_pos = None;
                            }
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        app.handle_mouse_move(position.x, position.y);
                    }
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } => {
                        if app.handle_key(*key, *state) {
                            app.shut_down();
                            elwt.exit();
                        }
                    }
                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => *y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                        };
                        app.camera.zoom(scroll);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = app.update() {
                            error!("simulation failed: {e}");
                            *failure_slot.borrow_mut() = Some(e);
                            elwt.exit();
                            return;
                        }
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                error!("GPU out of memory");
                                app.shut_down();
                                elwt.exit();
                            }
                            Err(e) => warn!("render error: {e:?}"),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    let outcome = failure.borrow_mut().take();
    match outcome {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
