use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use fieldscape_kernel::{FieldKernel, KernelConfig};
use fieldscape_render_wgpu::{OrbitCamera, WgpuRenderer};
use fieldscape_scene::{FrameClock, FrameTimer, Scene, SceneConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Longest wall-clock step fed to the animation clock, in seconds.
const MAX_FRAME_STEP: f32 = 0.1;

#[derive(Parser)]
#[command(name = "fieldscape-desktop", about = "Fieldscape desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Kernel constants (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of spiral particles
    #[arg(long, default_value_t = 150)]
    particles: usize,
}

/// Everything that is not GPU state.
struct AppState {
    kernel: FieldKernel,
    scene: Scene,
    clock: FrameClock,
    camera: OrbitCamera,
    frame_times: FrameTimer,
    last_frame: Instant,
    dragging: bool,
    show_panel: bool,
}

impl AppState {
    fn new(kernel: FieldKernel, scene: Scene) -> Self {
        Self {
            kernel,
            scene,
            clock: FrameClock::new(),
            camera: OrbitCamera::default(),
            frame_times: FrameTimer::new(120),
            last_frame: Instant::now(),
            dragging: false,
            show_panel: true,
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        self.frame_times.record(now - self.last_frame);
        self.last_frame = now;

        self.camera.update();
        let t = self.clock.tick(MAX_FRAME_STEP);
        if let Err(e) = self.scene.update(&self.kernel, t) {
            tracing::error!("scene update failed: {e}");
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let layers = &mut self.scene.layers;
        match key {
            KeyCode::Space => {
                self.clock.toggle_pause();
                tracing::info!(paused = self.clock.is_paused(), "animation toggled");
            }
            KeyCode::Digit1 => layers.terrain = !layers.terrain,
            KeyCode::Digit2 => layers.particles = !layers.particles,
            KeyCode::Digit3 => layers.cube = !layers.cube,
            KeyCode::F1 => self.show_panel = !self.show_panel,
            _ => {}
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_panel {
            return;
        }

        egui::SidePanel::left("controls")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Fieldscape");
                ui.colored_label(
                    egui::Color32::from_rgb(0x4a, 0x90, 0xe2),
                    "All motion and color computed by the field kernel",
                );
                ui.separator();

                ui.checkbox(&mut self.scene.layers.terrain, "Wave Terrain");
                ui.checkbox(&mut self.scene.layers.particles, "Spiral Particles");
                ui.checkbox(&mut self.scene.layers.cube, "Color Cube");
                ui.separator();

                ui.horizontal(|ui| {
                    let label = if self.clock.is_paused() { "Resume" } else { "Pause" };
                    if ui.button(label).clicked() {
                        self.clock.toggle_pause();
                    }
                    let mut scale = self.clock.time_scale();
                    if ui
                        .add(egui::Slider::new(&mut scale, 0.0..=4.0).text("speed"))
                        .changed()
                    {
                        self.clock.set_time_scale(scale);
                    }
                });
                ui.separator();

                let summary = self.scene.summary();
                ui.label(format!("Time: {:.2}s  Frame: {}", summary.time, summary.frame));
                ui.label(format!("FPS: {:.0}", self.frame_times.fps()));
                ui.label(format!(
                    "Scene update: {:.0} µs avg",
                    self.scene.timer().average().as_secs_f64() * 1e6
                ));
                ui.label(format!(
                    "Terrain: {} vertices, height [{:.2}, {:.2}]",
                    summary.terrain_vertices, summary.height_min, summary.height_max
                ));
                ui.label(format!("Particles: {}", summary.particle_count));
                let eye = self.camera.eye();
                ui.label(format!("Camera: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z));

                ui.separator();
                ui.small("F1: panel | LMB drag: orbit | wheel: zoom | Space: pause | 1-3: layers");
            });
    }
}

/// Window, device and the two renderers drawing into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, scene: &Scene) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Fieldscape")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
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
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("fieldscape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
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

        let renderer = WgpuRenderer::new(
            &device,
            surface_format,
            config.width,
            config.height,
            scene.terrain(),
            scene.particles().len() + 1,
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

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn draw(&mut self, state: &mut AppState, egui_ctx: &EguiContext) {
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

        state.camera.aspect = self.aspect();
        self.renderer
            .render(&self.device, &self.queue, &view, &state.camera, &state.scene);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
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
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx, &self.state.scene) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
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
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        if gpu.egui_winit.on_window_event(&gpu.window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state.dragging = btn_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 50.0,
                };
                self.state.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                gpu.draw(&mut self.state, &self.egui_ctx);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.dragging {
                self.state.camera.drag(delta.0 as f32, delta.1 as f32);
            }
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

    tracing::info!("fieldscape-desktop starting");

    let kernel_config = match &cli.config {
        Some(path) => KernelConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => KernelConfig::default(),
    };
    let kernel = FieldKernel::new(kernel_config)?;
    let scene_config = SceneConfig {
        particle_count: cli.particles,
        ..SceneConfig::default()
    };
    let scene = Scene::new(&kernel, &scene_config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp {
        state: AppState::new(kernel, scene),
        gpu: None,
        egui_ctx: EguiContext::default(),
    };
    event_loop.run_app(&mut app)?;

    Ok(())
}
