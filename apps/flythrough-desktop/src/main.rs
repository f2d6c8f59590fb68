use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use flythrough_input::{Action, Command};
use flythrough_kernel::{FlightConfig, FlightLoop, FrameOutput};
use flythrough_pacing::FrameTimer;
use flythrough_render::{Extent, FrameUniforms};
use flythrough_render_wgpu::ShaderRenderer;
use flythrough_tools::FrameInspector;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "flythrough-desktop", about = "Adaptive-resolution shader flythrough")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Loop configuration file (.yaml, .yml or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the default render scale
    #[arg(long)]
    scale: Option<f32>,

    /// Initial window width
    #[arg(long, default_value = "1280")]
    width: u32,

    /// Initial window height
    #[arg(long, default_value = "720")]
    height: u32,

    /// Use the high-detail shader path
    #[arg(long)]
    high_detail: bool,
}

/// Fly-camera key layout.
fn command_for(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::KeyW => Command::Forward,
        KeyCode::KeyS => Command::Back,
        KeyCode::KeyA => Command::Left,
        KeyCode::KeyD => Command::Right,
        KeyCode::KeyR => Command::Up,
        KeyCode::KeyF => Command::Down,
        KeyCode::ArrowUp => Command::PitchUp,
        KeyCode::ArrowDown => Command::PitchDown,
        KeyCode::ArrowLeft => Command::YawLeft,
        KeyCode::ArrowRight => Command::YawRight,
        KeyCode::KeyQ => Command::RollLeft,
        KeyCode::KeyE => Command::RollRight,
        _ => return None,
    };
    Some(command)
}

fn quality_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Equal | KeyCode::NumpadAdd => Some(Action::IncreaseQuality),
        KeyCode::Minus | KeyCode::NumpadSubtract => Some(Action::DecreaseQuality),
        KeyCode::Digit0 | KeyCode::Numpad0 => Some(Action::ResetQuality),
        _ => None,
    }
}

fn target_label(base: Extent, target: Extent) -> String {
    format!(
        "Target: {}x{} of {}x{}",
        target.width, target.height, base.width, base.height
    )
}

/// Application state.
struct AppState {
    flight: FlightLoop,
    timer: FrameTimer,
    /// Origin of the timestamps fed to the loop.
    clock: Instant,
    show_stats: bool,
    initial_size: PhysicalSize<u32>,
}

impl AppState {
    fn new(config: FlightConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            flight: FlightLoop::new(config),
            timer: FrameTimer::default(),
            clock: Instant::now(),
            show_stats: true,
            initial_size,
        }
    }

    fn tick(&mut self) -> FrameOutput {
        let frame = self.flight.tick(self.clock.elapsed());
        if !frame.dt.is_zero() {
            self.timer.record(frame.dt);
        }
        frame
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(command) = command_for(key) {
            self.flight.apply(Action::key(command, pressed));
            return;
        }

        if !pressed {
            return;
        }

        if let Some(action) = quality_action(key) {
            self.flight.apply(action);
            tracing::info!(scale = self.flight.scale(), "quality {action:?}");
            return;
        }

        if key == KeyCode::F1 {
            self.show_stats = !self.show_stats;
        }
    }

    fn draw_ui(&self, ctx: &EguiContext, base: Extent, target: Extent) {
        if !self.show_stats {
            return;
        }

        let summary = FrameInspector::summary(&self.flight, &self.timer);

        egui::Window::new("stats")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .show(ctx, |ui| {
                ui.heading(format!("{:.0} FPS", summary.fps));
                ui.label(format!(
                    "{:.1} ms (min {:.1} / max {:.1})",
                    summary.avg_ms, summary.min_ms, summary.max_ms
                ));
                ui.label(format!("Scale: {:.2} ({})", summary.scale, summary.phase));
                ui.label(target_label(base, target));
                ui.label(format!(
                    "Camera: ({:.1}, {:.1}, {:.1})",
                    summary.position.x, summary.position.y, summary.position.z
                ));
                ui.separator();
                ui.small("WASD/RF: Move | Arrows: Look | QE: Roll");
                ui.small("+/-: Quality | 0: Reset | F1: Stats");
            });
    }
}

/// Everything that exists only once a window and GPU device are up.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: ShaderRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, size: PhysicalSize<u32>) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Flythrough")
            .with_inner_size(size);
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("find adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("flythrough_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = ShaderRenderer::new(
            &device,
            surface_format,
            Extent::new(config.width, config.height),
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) -> Extent {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        let base = Extent::new(self.config.width, self.config.height);
        self.renderer.resize(base);
        base
    }

    fn render_frame(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
        let frame = state.tick();

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = FrameUniforms::new(&frame, state.flight.scene(), self.renderer.base());
        self.renderer
            .render(&self.device, &self.queue, &view, &uniforms);

        let base = self.renderer.base();
        let target = self.renderer.target_extent();
        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx, base, target);
        });
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
        self.window.request_redraw();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: FlightConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(config, initial_size),
            gpu: None,
            egui_ctx: EguiContext::default(),
            init_error: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx, self.state.initial_size) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize rendering: {e:#}");
                self.init_error = Some(e);
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
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let base = gpu.resize(new_size);
                self.state.flight.apply(Action::Resized {
                    width: base.width,
                    height: base.height,
                });
            }
            WindowEvent::Focused(false) => {
                self.state.flight.release_all();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                gpu.render_frame(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => FlightConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => FlightConfig::default(),
    };
    if let Some(scale) = cli.scale {
        config.scheduler.default_scale = scale;
    }
    if cli.high_detail {
        config.scene.high_detail = true;
    }
    config.validate()?;

    tracing::info!("flythrough-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.init_error.take() {
        return Err(e);
    }
    Ok(())
}
