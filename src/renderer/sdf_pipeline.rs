//! SDF-based WebGPU render pipeline
//!
//! Renders the entire scene in the fragment shader using signed distance
//! fields. The draw calls from [`Renderer`] only stage data on the CPU;
//! `present` uploads it and draws a single fullscreen triangle.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::backdrop::Backdrop;
use crate::present::Renderer;
use crate::settings::Settings;
use crate::sim::{Obstacle, Player};
use crate::tuning::Tuning;

/// Maximum obstacles drawn (far more than fit on screen)
const MAX_OBSTACLES: usize = 16;
/// Maximum stars drawn
const MAX_STARS: usize = 128;
/// Maximum hills drawn
const MAX_HILLS: usize = 8;

const FLAG_HALO: u32 = 1;
const FLAG_STRIPES: u32 = 2;
const FLAG_HILLS: u32 = 4;

// ============================================================================
// GPU DATA STRUCTURES (must match shader)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    resolution: [f32; 2], // offset 0
    arena: [f32; 2],      // offset 8
    ground_line: f32,     // offset 16
    stripe_phase: f32,    // offset 20
    obstacle_count: u32,  // offset 24
    star_count: u32,      // offset 28
    hill_count: u32,      // offset 32
    flags: u32,           // offset 36
    _pad: [u32; 2],       // offset 40 - align player to 16 bytes
    player: [f32; 4],     // offset 48 - x, y, w, h
}

/// Uniform arrays use a 16-byte stride, so everything is packed as vec4
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneData {
    obstacles: [[f32; 4]; MAX_OBSTACLES], // x, y, w, h
    stars: [[f32; 4]; MAX_STARS],         // x, y, size, unused
    hills: [[f32; 4]; MAX_HILLS],         // x, y, w, h
}

// ============================================================================
// SDF RENDER STATE
// ============================================================================

pub struct SdfRenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    globals_buffer: wgpu::Buffer,
    scene_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,

    pub size: (u32, u32),
    settings: Settings,

    // Staged by the Renderer calls, uploaded in present()
    globals: Globals,
    scene: SceneData,
}

impl SdfRenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        tuning: &Tuning,
        settings: Settings,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("sdf-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        log::info!("Surface config: {}x{}", width, height);
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sdf_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sdf_shader.wgsl").into()),
        });

        let globals = Globals {
            resolution: [width as f32, height as f32],
            arena: [tuning.arena_width, tuning.arena_height],
            ground_line: tuning.ground_line(),
            stripe_phase: 0.0,
            obstacle_count: 0,
            star_count: 0,
            hill_count: 0,
            flags: 0,
            _pad: [0; 2],
            player: [
                tuning.player_x,
                tuning.player_floor_y(),
                tuning.player_width,
                tuning.player_height,
            ],
        };
        let scene = SceneData::zeroed();

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("globals"),
            contents: bytemuck::bytes_of(&globals),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene"),
            contents: bytemuck::bytes_of(&scene),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sdf_bind_group_layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sdf_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: scene_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sdf_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sdf_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[], // No vertex buffers - fullscreen triangle
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            globals_buffer,
            scene_buffer,
            bind_group,
            size: (width, height),
            settings,
            globals,
            scene,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload the staged frame and draw it
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.globals.resolution = [self.size.0 as f32, self.size.1 as f32];
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&self.globals));
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&self.scene));

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sdf_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sdf_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1); // Fullscreen triangle
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Renderer for SdfRenderState {
    fn draw_background(&mut self, backdrop: &Backdrop) {
        let quality = self.settings.quality;

        let star_count = self.settings.star_count().min(MAX_STARS).min(backdrop.stars.len());
        for (slot, star) in self.scene.stars.iter_mut().zip(&backdrop.stars[..star_count]) {
            *slot = [star.pos.x, star.pos.y, star.size, 0.0];
        }

        let hill_count = if quality.hills_enabled() {
            backdrop.hills.len().min(MAX_HILLS)
        } else {
            0
        };
        for (slot, hill) in self.scene.hills.iter_mut().zip(&backdrop.hills[..hill_count]) {
            *slot = [hill.pos.x, hill.pos.y, hill.size.x, hill.size.y];
        }

        let mut flags = 0;
        if quality.halo_enabled() {
            flags |= FLAG_HALO;
        }
        if self.settings.ground_stripes {
            flags |= FLAG_STRIPES;
        }
        if hill_count > 0 {
            flags |= FLAG_HILLS;
        }

        self.globals.arena = [backdrop.width, backdrop.height];
        self.globals.ground_line = backdrop.ground_line;
        self.globals.stripe_phase = backdrop.stripe_phase;
        self.globals.star_count = star_count as u32;
        self.globals.hill_count = hill_count as u32;
        self.globals.flags = flags;
    }

    fn draw_obstacles(&mut self, obstacles: &[Obstacle]) {
        let count = obstacles.len().min(MAX_OBSTACLES);
        for (slot, obstacle) in self.scene.obstacles.iter_mut().zip(&obstacles[..count]) {
            *slot = [obstacle.pos.x, obstacle.pos.y, obstacle.size.x, obstacle.size.y];
        }
        self.globals.obstacle_count = count as u32;
    }

    fn draw_player(&mut self, player: &Player) {
        self.globals.player = [player.pos.x, player.pos.y, player.size.x, player.size.y];
    }

    fn present(&mut self) {
        match self.render() {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost) => {
                self.resize(self.size.0, self.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
