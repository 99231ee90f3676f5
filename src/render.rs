use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tree_core::{FrameBatches, HealthSignal, QualityTier, SceneUniforms, BLOOM_THRESHOLD, TONE_EXPOSURE};
use wasm_bindgen::JsValue;
use web_sys as web;
use wgpu;

use crate::constants::INITIAL_INSTANCE_CAPACITY;

mod decor;
mod helpers;
mod post;
mod targets;

use decor::{DecorResources, InstanceBuffer};
use post::{PostBindGroups, PostResources, PostUniforms};
use targets::RenderTargets;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("WebGPU unavailable: {0}")]
    Unsupported(String),
    #[error("GPU device request failed: {0}")]
    Device(String),
}

impl InitError {
    /// How the quality selector should hear about this failure.
    pub fn signal(&self) -> HealthSignal {
        match self {
            InitError::Unsupported(_) => HealthSignal::Unsupported,
            InitError::Device(_) => HealthSignal::ContextLost,
        }
    }
}

/// Everything the renderer needs for one frame.
pub struct FrameInputs<'a> {
    pub uniforms: &'a SceneUniforms,
    pub batches: &'a FrameBatches,
    pub clear_color: [f64; 4],
    pub bloom_strength: f32,
    pub time: f32,
}

/// `navigator.gpu` exists; checked before touching wgpu so a missing API
/// reports as unsupported instead of failing deeper in adapter setup.
fn webgpu_available() -> bool {
    let Some(window) = web::window() else {
        return false;
    };
    js_sys::Reflect::get(&window, &JsValue::from_str("navigator"))
        .and_then(|nav| js_sys::Reflect::get(&nav, &JsValue::from_str("gpu")))
        .map(|gpu| !gpu.is_undefined() && !gpu.is_null())
        .unwrap_or(false)
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    decor: DecorResources,
    stars: InstanceBuffer,
    stars_tier: Option<QualityTier>,
    particles: InstanceBuffer,
    glows: InstanceBuffer,
    photos: InstanceBuffer,
    targets: RenderTargets,
    post: PostResources,
    post_groups: PostBindGroups,
    width: u32,
    height: u32,
    device_lost: Arc<AtomicBool>,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> Result<Self, InitError> {
        if !webgpu_available() {
            return Err(InitError::Unsupported("navigator.gpu is missing".into()));
        }
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| InitError::Unsupported(format!("{:?}", e)))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| InitError::Unsupported("no WebGPU adapter".into()))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| InitError::Device(format!("{:?}", e)))?;

        let device_lost = Arc::new(AtomicBool::new(false));
        {
            let flag = Arc::clone(&device_lost);
            device.set_device_lost_callback(move |reason, message| {
                log::warn!("[render] device lost ({:?}): {}", reason, message);
                flag.store(true, Ordering::Release);
            });
        }
        device.on_uncaptured_error(Box::new(|e: wgpu::Error| {
            log::error!("[render] uncaptured GPU error: {}", e);
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| InitError::Unsupported("surface reports no formats".into()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let decor = decor::create_decor_resources(&device);
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::POST_WGSL.into()),
        });
        let post = post::create_post_resources(&device, &post_shader, format);
        let targets = RenderTargets::new(&device, width, height);
        let post_groups = post.bind_groups(&device, &targets);

        let cap = INITIAL_INSTANCE_CAPACITY;
        log::info!(
            "[render] WebGPU ready {}x{} format={:?}",
            width,
            height,
            format
        );
        Ok(Self {
            stars: InstanceBuffer::new(&device, "stars_vb", cap),
            stars_tier: None,
            particles: InstanceBuffer::new(&device, "particles_vb", cap),
            glows: InstanceBuffer::new(&device, "glows_vb", cap),
            photos: InstanceBuffer::new(&device, "photos_vb", cap),
            surface,
            device,
            queue,
            config,
            decor,
            targets,
            post,
            post_groups,
            width,
            height,
            device_lost,
        })
    }

    /// Set by the device-lost callback; the device is unusable afterwards.
    #[inline]
    pub fn device_lost(&self) -> bool {
        self.device_lost.load(Ordering::Acquire)
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
            self.post_groups = self.post.bind_groups(&self.device, &self.targets);
        }
    }

    /// Reconfigure the surface after it was lost. Fails if the device is gone.
    pub fn reconfigure(&mut self) -> bool {
        if self.device_lost() {
            return false;
        }
        self.surface.configure(&self.device, &self.config);
        log::info!("[render] surface reconfigured");
        true
    }

    /// Star field changes only with the tier.
    #[inline]
    pub fn needs_stars(&self, tier: QualityTier) -> bool {
        self.stars_tier != Some(tier)
    }

    pub fn upload_stars(&mut self, tier: QualityTier, stars: &[tree_core::InstanceData]) {
        self.stars.upload(&self.device, &self.queue, stars);
        self.stars_tier = Some(tier);
    }

    pub fn render(&mut self, input: &FrameInputs<'_>) -> Result<(), wgpu::SurfaceError> {
        let batches = input.batches;
        self.particles
            .upload(&self.device, &self.queue, &batches.particles);
        self.glows.upload(&self.device, &self.queue, &batches.glows);
        self.photos.upload(&self.device, &self.queue, &batches.photos);
        self.queue.write_buffer(
            &self.decor.uniform_buffer,
            0,
            bytemuck::bytes_of(input.uniforms),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        let [r, g, b, a] = input.clear_color;
        let clear = wgpu::Color { r, g, b, a };

        // Pass 1: scene into HDR
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // cards first so glows and particles depth-test against them
            self.decor
                .draw(&mut rpass, &self.decor.additive_pipeline, &self.stars);
            self.decor
                .draw(&mut rpass, &self.decor.card_pipeline, &self.photos);
            self.decor
                .draw(&mut rpass, &self.decor.additive_pipeline, &self.glows);
            self.decor
                .draw(&mut rpass, &self.decor.additive_pipeline, &self.particles);
        }

        let (bw, bh) = self.targets.bloom_size;
        self.post.write_uniforms(
            &self.queue,
            PostUniforms {
                resolution: [bw as f32, bh as f32],
                time: input.time,
                exposure: TONE_EXPOSURE,
                blur_dir: [0.0, 0.0],
                bloom_strength: input.bloom_strength,
                threshold: BLOOM_THRESHOLD,
            },
        );

        // Pass 2: bright pass -> bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.post_groups.hdr,
            None,
        );
        // Pass 3: blur horizontal bloom_a -> bloom_b
        post::blit(
            &mut encoder,
            "blur_h",
            &self.targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_groups.from_bloom_a,
            None,
        );
        // Pass 4: blur vertical bloom_b -> bloom_a
        post::blit(
            &mut encoder,
            "blur_v",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.blur_pipeline,
            &self.post_groups.from_bloom_b,
            None,
        );
        // Pass 5: composite to swapchain
        post::blit(
            &mut encoder,
            "composite",
            &view,
            clear,
            &self.post.composite_pipeline,
            &self.post_groups.hdr,
            Some(&self.post_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
