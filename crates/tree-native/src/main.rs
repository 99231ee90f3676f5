use std::sync::Arc;
use std::time::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::{EventLoop, EventLoopWindowTarget},
    keyboard::{Key, NamedKey},
    window::{Window, WindowBuilder},
};

use glam::Vec2;
use tree_core::{
    CameraShake, FrameTimer, HealthSignal, InstanceData, MotionOptions, OrbitCamera, QualitySelector,
    QualityState, QualityTier, RenderError, SceneComposer, SceneUniforms, TreeConfig,
};

const DEFAULT_PHOTO_COUNT: usize = 35;
const DEFAULT_PHOTO_SEED_OFFSET: usize = 100;
const ORBIT_RADIANS_PER_PX: f32 = 0.005;
const ZOOM_PER_LINE: f32 = 0.1;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const QUAD_CORNERS: [f32; 12] = [
    -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
];

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
    1 => Float32x4,
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Why GPU setup failed, and what the selector should hear.
struct InitFailure {
    signal: HealthSignal,
    error: anyhow::Error,
}

struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl InstanceBuffer {
    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            buffer: instance_buffer(device, label, 64),
            capacity: 64,
            len: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[InstanceData]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = instance_buffer(device, self.label, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }
}

fn instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<InstanceData>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    additive_pipeline: wgpu::RenderPipeline,
    card_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth: wgpu::TextureView,
    stars: InstanceBuffer,
    stars_tier: Option<QualityTier>,
    particles: InstanceBuffer,
    glows: InstanceBuffer,
    photos: InstanceBuffer,
}

impl GpuState {
    async fn new(window: Arc<Window>) -> Result<Self, InitFailure> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| InitFailure {
                signal: HealthSignal::Unsupported,
                error: e.into(),
            })?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| InitFailure {
                signal: HealthSignal::Unsupported,
                error: anyhow::anyhow!("No GPU adapter"),
            })?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| InitFailure {
                signal: HealthSignal::ContextLost,
                error: e.into(),
            })?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| InitFailure {
                signal: HealthSignal::Unsupported,
                error: anyhow::anyhow!("surface reports no formats"),
            })?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("decor_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::DECOR_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |label: &str, blend: wgpu::BlendState, depth_write: bool| {
            let vertex_buffers = [
                // slot 0: quad corners
                wgpu::VertexBufferLayout {
                    array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                },
                // slot 1: instance data
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &INSTANCE_ATTRIBUTES,
                },
            ];
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let additive_pipeline = make_pipeline("additive", ADDITIVE, false);
        let card_pipeline = make_pipeline("cards", wgpu::BlendState::ALPHA_BLENDING, true);

        log::info!(
            "[native] GPU ready {}x{} format={:?}",
            config.width,
            config.height,
            format
        );
        Ok(Self {
            depth: depth_view(&device, config.width, config.height),
            stars: InstanceBuffer::new(&device, "stars_vb"),
            stars_tier: None,
            particles: InstanceBuffer::new(&device, "particles_vb"),
            glows: InstanceBuffer::new(&device, "glows_vb"),
            photos: InstanceBuffer::new(&device, "photos_vb"),
            surface,
            device,
            queue,
            config,
            additive_pipeline,
            card_pipeline,
            uniform_buffer,
            quad_vb,
            bind_group,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = depth_view(&self.device, new_size.width, new_size.height);
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn render(
        &mut self,
        composer: &SceneComposer,
        uniforms: &SceneUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        let tier = composer.tier();
        if self.stars_tier != Some(tier) {
            self.stars
                .upload(&self.device, &self.queue, &composer.backdrop().stars);
            self.stars_tier = Some(tier);
        }
        let batches = composer.batches();
        self.particles
            .upload(&self.device, &self.queue, &batches.particles);
        self.glows.upload(&self.device, &self.queue, &batches.glows);
        self.photos.upload(&self.device, &self.queue, &batches.photos);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        let [r, g, b, a] = composer.backdrop().clear_color;
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for (pipeline, buf) in [
                (&self.additive_pipeline, &self.stars),
                (&self.card_pipeline, &self.photos),
                (&self.additive_pipeline, &self.glows),
                (&self.additive_pipeline, &self.particles),
            ] {
                if buf.len == 0 {
                    continue;
                }
                rpass.set_pipeline(pipeline);
                rpass.set_vertex_buffer(1, buf.buffer.slice(..));
                rpass.draw(0..6, 0..buf.len);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

struct App {
    window: Arc<Window>,
    selector: QualitySelector,
    gpu: Option<GpuState>,
    composer: SceneComposer,
    config: TreeConfig,
    orbit: OrbitCamera,
    shake: CameraShake,
    timer: FrameTimer,
    cursor: Option<Vec2>,
    dragging: bool,
    hovered: Option<u32>,
}

impl App {
    fn new(window: Arc<Window>, photos: &[String]) -> Self {
        let selector = QualitySelector::default();
        let composer = SceneComposer::new(photos, selector.tier(), MotionOptions::default(), None);
        let mut app = Self {
            window,
            selector,
            gpu: None,
            composer,
            config: TreeConfig::default(),
            orbit: OrbitCamera::default(),
            shake: CameraShake::default(),
            timer: FrameTimer::new(),
            cursor: None,
            dragging: false,
            hovered: None,
        };
        app.start_attempt();
        app
    }

    /// Blocking init for the current attempt. A success that lands after the
    /// deadline is reported as a timeout and discarded.
    fn start_attempt(&mut self) {
        self.gpu = None;
        let attempt = self.selector.attempt_count();
        let deadline = Duration::from_millis(u64::from(self.selector.init_timeout_ms()));
        let started = Instant::now();
        match pollster::block_on(GpuState::new(Arc::clone(&self.window))) {
            Ok(gpu) if started.elapsed() <= deadline => {
                self.gpu = Some(gpu);
                self.selector.handle(HealthSignal::ContextCreated);
            }
            Ok(_) => {
                log::warn!("[native] init attempt {} exceeded {:?}", attempt, deadline);
                self.selector.handle(HealthSignal::InitTimeout { attempt });
            }
            Err(failure) => {
                log::error!("[native] init failed: {:#}", failure.error);
                self.selector.handle(failure.signal);
            }
        }
        self.composer.set_tier(self.selector.tier());
        self.update_title();
    }

    fn update_title(&self) {
        let msg = self
            .selector
            .state()
            .status_message(self.selector.attempt_count(), self.selector.tier());
        let title = if msg.visible {
            format!("Photo Tree - {}: {}", msg.title, msg.detail)
        } else {
            format!("Photo Tree ({} quality)", self.selector.tier().name())
        };
        self.window.set_title(&title);
    }

    fn retry(&mut self) {
        match self.selector.retry() {
            Ok(tier) => {
                log::info!("[native] retrying at {} quality", tier.name());
                self.start_attempt();
            }
            Err(e) => log::warn!("[native] retry rejected: {}", e),
        }
    }

    fn toggle_pulse(&mut self) {
        let mut opts = self.composer.motion_options();
        opts.particle_pulse = !opts.particle_pulse;
        self.composer.set_motion_options(opts);
        log::info!("[native] motion options {:?}", opts);
    }

    fn try_restore(&mut self) {
        if self.selector.state() != QualityState::Error(RenderError::ContextLost) {
            return;
        }
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.resize(self.window.inner_size());
            self.selector.handle(HealthSignal::ContextRestored);
            self.update_title();
        }
    }

    fn redraw(&mut self) {
        let clock = self.timer.tick();
        if !self.selector.is_rendering() {
            return;
        }
        let Some(aspect) = self.gpu.as_ref().map(GpuState::aspect) else {
            return;
        };
        let camera = self.orbit.camera(aspect);

        let view = self.shake.apply(camera.view_matrix(), clock.elapsed);
        self.hovered = self.cursor.and_then(|c| {
            let size = self.window.inner_size();
            let w = size.width.max(1) as f32;
            let h = size.height.max(1) as f32;
            let (ro, rd) =
                camera.ray_from_ndc_with_view(view, 2.0 * c.x / w - 1.0, 1.0 - 2.0 * c.y / h);
            self.composer.pick_photo(ro, rd)
        });

        let uniforms = self.composer.uniforms(&camera, view, clock, &self.config);
        self.composer
            .frame(clock, &self.config, camera.eye, self.hovered);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(&self.composer, &uniforms) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.selector.handle(HealthSignal::ContextLost);
                self.update_title();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[native] out of GPU memory");
                self.gpu = None;
                self.selector.handle(HealthSignal::ContextLost);
                self.update_title();
            }
            Err(e) => log::debug!("[native] surface error: {:?}", e),
        }
    }

    fn handle(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(size) => {
                    if let Some(gpu) = self.gpu.as_mut() {
                        gpu.resize(size);
                    }
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => match logical_key.as_ref() {
                    Key::Character("r") | Key::Character("R") => self.retry(),
                    Key::Named(NamedKey::Space) => self.toggle_pulse(),
                    Key::Named(NamedKey::Escape) => elwt.exit(),
                    _ => {}
                },
                WindowEvent::CursorMoved { position, .. } => {
                    let pos = Vec2::new(position.x as f32, position.y as f32);
                    if let (true, Some(prev)) = (self.dragging, self.cursor) {
                        let d = pos - prev;
                        self.orbit
                            .rotate(-d.x * ORBIT_RADIANS_PER_PX, -d.y * ORBIT_RADIANS_PER_PX);
                    }
                    self.cursor = Some(pos);
                }
                WindowEvent::CursorLeft { .. } => {
                    self.cursor = None;
                    self.dragging = false;
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => self.dragging = state == ElementState::Pressed,
                WindowEvent::MouseWheel { delta, .. } => {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                    };
                    // scrolling up zooms in
                    self.orbit.zoom((1.0 - lines * ZOOM_PER_LINE).clamp(0.8, 1.25));
                }
                WindowEvent::RedrawRequested => self.redraw(),
                _ => {}
            },
            Event::AboutToWait => {
                self.try_restore();
                self.window.request_redraw();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut photos: Vec<String> = std::env::args().skip(1).collect();
    if photos.is_empty() {
        photos = (0..DEFAULT_PHOTO_COUNT)
            .map(|i| {
                format!(
                    "https://picsum.photos/400/500?random={}",
                    i + DEFAULT_PHOTO_SEED_OFFSET
                )
            })
            .collect();
    }
    log::info!("[native] {} photos", photos.len());

    let event_loop = EventLoop::new().expect("event loop");
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Photo Tree (native)")
            .build(&event_loop)
            .expect("window"),
    );

    let mut app = App::new(window, &photos);
    event_loop
        .run(move |event, elwt| app.handle(event, elwt))
        .expect("event loop run");
}
