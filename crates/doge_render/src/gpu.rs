//! wgpu backend
//!
//! Every render request becomes one flat-colored quad. Textures are not
//! loaded; each `TextureId` maps to a fixed palette color instead, tinted by
//! the entity's `Color` when present. Queued text is drawn last by the
//! glyphon text pass.

use std::sync::Arc;

use doge_core::components::{Camera, EffectId, ScreenState, TextureId};
use doge_core::ecs::BaseRegistry;
use doge_core::math::{Vec2, Vec3};
use tracing::{error, info, warn};
use winit::window::Window;

use crate::text::TextPass;
use crate::{build_draw_list, mesh_for, DrawItem, RenderError, Renderer, TextRequest};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
}

const VERTICES_PER_QUAD: usize = 6;
const INITIAL_QUAD_CAPACITY: usize = 256;
const CLEAR_COLOR: Vec3 = Vec3::new(0.05, 0.05, 0.08);

pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    text_pass: TextPass,
    pending_texts: Vec<TextRequest>,
}

impl WgpuRenderer {
    /// Open a device for `window` and configure its surface.
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let info = adapter.get_info();
        info!(adapter = %info.name, backend = ?info.backend, "graphics adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Doge Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = create_pipeline(&device, config.format);
        let vertex_capacity = INITIAL_QUAD_CAPACITY * VERTICES_PER_QUAD;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);
        let text_pass = TextPass::new(&device, &queue, config.format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertex_buffer,
            vertex_capacity,
            text_pass,
            pending_texts: Vec::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn present(&mut self, vertices: &[Vertex], clear: Vec3) {
        let texts = std::mem::take(&mut self.pending_texts);
        if vertices.len() > self.vertex_capacity {
            self.vertex_capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.device, self.vertex_capacity);
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("surface timed out, skipping frame");
                return;
            }
            Err(err) => {
                error!(%err, "failed to acquire surface texture");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = self.viewport();
        let has_text = self
            .text_pass
            .prepare(&self.device, &self.queue, size, &texts);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear.x),
                            g: f64::from(clear.y),
                            b: f64::from(clear.z),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !vertices.is_empty() {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..vertices.len() as u32, 0..1);
            }
            if has_text {
                self.text_pass.render(&mut pass);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.text_pass.trim();
    }
}

impl Renderer for WgpuRenderer {
    fn viewport(&self) -> Vec2 {
        Vec2::new(self.config.width as f32, self.config.height as f32)
    }

    fn add_text(&mut self, text: TextRequest) {
        self.pending_texts.push(text);
    }

    fn draw(&mut self, registry: &BaseRegistry) {
        let shade = screen_shade(registry.screen_state());
        let world = View::world(registry.camera());
        let screen = View::screen(registry.camera());

        let mut vertices = Vec::new();
        for item in build_draw_list(registry) {
            let view = if item.screen_space { &screen } else { &world };
            vertices.extend_from_slice(&quad_vertices(&item, view, shade));
        }

        self.present(&vertices, CLEAR_COLOR * shade);
    }

    fn render_text_only(&mut self, registry: &BaseRegistry, background: Vec3) {
        let shade = screen_shade(registry.screen_state());
        self.present(&[], background * shade);
    }
}

/// Maps world (or screen) pixels to clip space.
struct View {
    center: Vec2,
    half_extent: Vec2,
}

impl View {
    fn world(camera: Option<&Camera>) -> Self {
        let camera = camera.copied().unwrap_or_default();
        Self {
            center: camera.position,
            half_extent: camera.fov * 0.5,
        }
    }

    fn screen(camera: Option<&Camera>) -> Self {
        let fov = camera.copied().unwrap_or_default().fov;
        Self {
            center: fov * 0.5,
            half_extent: fov * 0.5,
        }
    }

    fn to_clip(&self, point: Vec2) -> [f32; 2] {
        let v = (point - self.center) / self.half_extent;
        [v.x, -v.y]
    }
}

fn screen_shade(screen: Option<&ScreenState>) -> f32 {
    let Some(screen) = screen else {
        return 1.0;
    };
    let darken = if screen.darken_screen_factor > 0.0 {
        1.0 - screen.darken_screen_factor.min(1.0)
    } else {
        1.0
    };
    screen.screen_brightness * darken
}

fn quad_vertices(item: &DrawItem, view: &View, shade: f32) -> [Vertex; VERTICES_PER_QUAD] {
    let size = item.scale * mesh_for(item.geometry).original_size;
    let rotation = Vec2::from_angle(item.rotation);
    let corner = |x: f32, y: f32| {
        let local = rotation.rotate(Vec2::new(x, y) * size);
        view.to_clip(item.position + local)
    };

    let base = match item.effect {
        EffectId::Textured => texture_color(item.texture) * item.color.unwrap_or(Vec3::ONE),
        EffectId::Colored => item.color.unwrap_or(Vec3::ONE),
    };
    let color = (base * shade).to_array();

    let [a, b, c, d] = [
        corner(-0.5, -0.5),
        corner(0.5, -0.5),
        corner(0.5, 0.5),
        corner(-0.5, 0.5),
    ];
    [a, b, c, a, c, d].map(|position| Vertex { position, color })
}

fn texture_color(texture: TextureId) -> Vec3 {
    match texture {
        TextureId::SpaceBackground => Vec3::new(0.04, 0.04, 0.15),
        TextureId::BoardBackground => Vec3::new(0.35, 0.6, 0.3),
        TextureId::ShowerBackground => Vec3::new(0.6, 0.8, 0.9),
        TextureId::ArenaBackground => Vec3::new(0.25, 0.2, 0.3),
        TextureId::DaycareBackground => Vec3::new(0.9, 0.8, 0.6),
        TextureId::Doge => Vec3::new(0.95, 0.75, 0.35),
        TextureId::Dice => Vec3::new(1.0, 1.0, 1.0),
        TextureId::StartSpace => Vec3::new(0.9, 0.9, 0.2),
        TextureId::BlueSpace => Vec3::new(0.2, 0.4, 0.95),
        TextureId::RedSpace => Vec3::new(0.9, 0.2, 0.2),
        TextureId::Rock => Vec3::new(0.5, 0.45, 0.4),
        TextureId::Sushi => Vec3::new(1.0, 0.5, 0.4),
        TextureId::Cat => Vec3::new(0.3, 0.3, 0.3),
        TextureId::Planet => Vec3::new(0.4, 0.7, 0.9),
        TextureId::Target => Vec3::new(0.9, 0.3, 0.6),
        TextureId::Weapon => Vec3::new(0.8, 0.8, 0.85),
        TextureId::Goal => Vec3::new(0.3, 0.9, 0.4),
        TextureId::Puppy => Vec3::new(0.85, 0.65, 0.45),
        TextureId::Bowl => Vec3::new(0.6, 0.3, 0.8),
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Quad Vertex Buffer"),
        size: (std::mem::size_of::<Vertex>() * vertices) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Quad Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Quad Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Quad Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x3],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use doge_core::components::{GeometryId, RenderLayer};
    use doge_core::ecs::Entity;

    fn item(position: Vec2, scale: Vec2) -> DrawItem {
        DrawItem {
            entity: Entity::new(),
            texture: TextureId::Doge,
            effect: EffectId::Colored,
            geometry: GeometryId::Sprite,
            layer: RenderLayer::World,
            position,
            rotation: 0.0,
            scale,
            color: Some(Vec3::new(1.0, 0.5, 0.0)),
            screen_space: false,
        }
    }

    #[test]
    fn test_camera_center_maps_to_origin() {
        let view = View::world(Some(&Camera::default()));
        assert_eq!(view.to_clip(Camera::default().position), [0.0, 0.0]);
        assert_eq!(view.to_clip(Vec2::ZERO), [-1.0, 1.0]);
    }

    #[test]
    fn test_quad_covers_scaled_extent() {
        let camera = Camera::default();
        let view = View::world(Some(&camera));
        let vertices = quad_vertices(&item(camera.position, camera.fov), &view, 0.5);

        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[2].position, [1.0, -1.0]);
        assert_eq!(vertices[0].color, [0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_darkening_reduces_shade() {
        let screen = ScreenState {
            darken_screen_factor: 0.25,
            ..ScreenState::default()
        };
        assert_eq!(screen_shade(Some(&screen)), 0.75);
        assert_eq!(screen_shade(None), 1.0);
    }
}
