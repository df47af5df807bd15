//! Scene renderer using wgpu.
//!
//! Tessellates a recorded [`Scene`] into colored triangles and draws them.
//! The renderer does NOT own the event loop -- the window app drives it.
//! Each frame:
//!
//! 1. [`SceneRenderer::build_vertices`] maps every paint call to canvas
//!    space and emits two triangles per rect and per line.
//! 2. [`SceneRenderer::render`] uploads the vertices and renders a frame.
//!
//! # Tessellation
//!
//! | Paint call | Triangles |
//! |------------|-----------|
//! | Filled rect | The four transformed corners, split along one diagonal |
//! | Stroked line | A quad `line_width` wide around the segment |

use std::sync::Arc;

use sketchlab_canvas::recording::{PaintCall, Shape};
use sketchlab_canvas::scene::Scene;
use sketchlab_canvas::transform::Point;
use wgpu::util::DeviceExt;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A single vertex with 2D canvas position and RGBA color, sent to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Vertex buffer layout for the shader.
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Camera2D
// ---------------------------------------------------------------------------

/// A 2D orthographic camera over canvas space.
///
/// Canvas space has its origin at the top-left and y growing downward, so
/// the [`orthographic_matrix`](Self::orthographic_matrix) flips y: the top
/// edge of the visible area maps to clip `+1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    /// Width of the visible area in canvas pixels.
    pub width: f32,
    /// Height of the visible area in canvas pixels.
    pub height: f32,
    /// Camera center X in canvas pixels.
    pub x: f32,
    /// Camera center Y in canvas pixels.
    pub y: f32,
}

impl Camera2D {
    /// A camera that frames a `width` x `height` canvas exactly.
    pub fn for_canvas(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            x: width / 2.0,
            y: height / 2.0,
        }
    }

    /// Produce a column-major 4x4 orthographic projection matrix.
    ///
    /// Maps `[left, right]` to `[-1, 1]` on x and `[top, bottom]` to
    /// `[1, -1]` on y.
    pub fn orthographic_matrix(&self) -> [f32; 16] {
        let left = self.x - self.width / 2.0;
        let right = self.x + self.width / 2.0;
        let top = self.y - self.height / 2.0;
        let bottom = self.y + self.height / 2.0;

        let sx = 2.0 / (right - left);
        let sy = 2.0 / (top - bottom);
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);

        [
            sx, 0.0, 0.0, 0.0, // column 0
            0.0, sy, 0.0, 0.0, // column 1
            0.0, 0.0, 1.0, 0.0, // column 2
            tx, ty, 0.0, 1.0, // column 3
        ]
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::for_canvas(700.0, 700.0)
    }
}

// ---------------------------------------------------------------------------
// Buffer sizing
// ---------------------------------------------------------------------------

/// Each paint call becomes one quad: two triangles.
const VERTICES_PER_QUAD: usize = 6;

/// Initial vertex buffer capacity in quads. The buffer grows on demand.
const INITIAL_QUADS: usize = 4096;

/// Background color behind the scene.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.1,
    a: 1.0,
};

// ---------------------------------------------------------------------------
// SceneRenderer
// ---------------------------------------------------------------------------

/// Scene renderer using wgpu.
///
/// Holds the GPU device, pipeline, and buffers for drawing [`Scene`]s.
///
/// # GPU Initialization
///
/// Call [`SceneRenderer::new`] with an `Arc<winit::window::Window>`. This
/// performs async wgpu device/adapter selection, surface creation, and
/// pipeline setup. If no suitable GPU is available, the error is returned.
pub struct SceneRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    window: Arc<winit::window::Window>,
    /// The 2D orthographic camera.
    pub camera: Camera2D,
    /// Stroke width for line paint calls, in canvas pixels.
    pub line_width: f32,
}

impl SceneRenderer {
    /// Initialize wgpu: surface, device, queue, pipeline.
    ///
    /// This is an async function because wgpu adapter/device selection is
    /// asynchronous. Call with `.await` or use `pollster::block_on`.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable GPU adapter or device is available.
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, anyhow::Error> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no suitable GPU adapter found"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("sketchlab_scene_renderer"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        // Canvas colors are authored in sRGB; a non-sRGB target passes them
        // through unchanged.
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no supported formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_renderer_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders.wgsl").into()),
        });

        let camera = Camera2D::for_canvas(width as f32, height as f32);
        let camera_matrix = camera.orthographic_matrix();
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_uniform"),
            contents: bytemuck::cast_slice(&camera_matrix),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("camera_bind_group_layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_renderer_pipeline_layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_renderer_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        });

        let vertex_capacity = INITIAL_QUADS * VERTICES_PER_QUAD;
        let vertex_buffer = create_vertex_buffer(&device, vertex_capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            vertex_capacity,
            camera_buffer,
            camera_bind_group,
            window,
            camera,
            line_width: 1.0,
        })
    }

    /// Tessellate a scene into triangle-list vertices in canvas space.
    ///
    /// This is a pure function that does not require a GPU -- suitable for
    /// headless testing. Degenerate (zero-length) lines are skipped.
    pub fn build_vertices(scene: &Scene, line_width: f32) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(scene.calls.len() * VERTICES_PER_QUAD);
        for call in &scene.calls {
            if let Some(quad) = quad_for_call(call, f64::from(line_width)) {
                push_quad(&mut vertices, quad, call.color.to_f32_array());
            }
        }
        vertices
    }

    /// Render a frame from a scene.
    ///
    /// # Errors
    ///
    /// Returns a [`wgpu::SurfaceError`] if the surface cannot provide an
    /// output texture (e.g., window minimized, surface lost).
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        let camera_matrix = self.camera.orthographic_matrix();
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&camera_matrix));

        let vertices = Self::build_vertices(scene, self.line_width);
        if vertices.len() > self.vertex_capacity {
            let capacity = vertices.len().next_power_of_two();
            tracing::debug!(
                old = self.vertex_capacity,
                new = capacity,
                "growing vertex buffer"
            );
            self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
            self.vertex_capacity = capacity;
        }
        if !vertices.is_empty() {
            self.queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_renderer_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

            let vertex_count = vertices.len() as u32;
            if vertex_count > 0 {
                render_pass.draw(0..vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Resize the surface when the window size changes.
    ///
    /// The camera keeps framing the same canvas area; only the surface is
    /// reconfigured. Zero-sized windows are ignored.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Get a reference to the window.
    pub fn window(&self) -> &winit::window::Window {
        &self.window
    }
}

// ---------------------------------------------------------------------------
// Tessellation helpers
// ---------------------------------------------------------------------------

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("vertex_buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// The four canvas-space corners of the quad covering a paint call, in
/// winding order.
fn quad_for_call(call: &PaintCall, line_width: f64) -> Option<[Point; 4]> {
    match call.shape {
        Shape::Rect { .. } => {
            let pts = call.canvas_points();
            Some([pts[0], pts[1], pts[2], pts[3]])
        }
        Shape::Line { .. } => {
            let pts = call.canvas_points();
            let (a, b) = (pts[0], pts[1]);
            let length = a.distance(b);
            if length <= f64::EPSILON {
                return None;
            }
            // Unit normal scaled to half the stroke width.
            let half = line_width / 2.0;
            let nx = -(b.y - a.y) / length * half;
            let ny = (b.x - a.x) / length * half;
            Some([
                Point::new(a.x + nx, a.y + ny),
                Point::new(b.x + nx, b.y + ny),
                Point::new(b.x - nx, b.y - ny),
                Point::new(a.x - nx, a.y - ny),
            ])
        }
    }
}

fn push_quad(vertices: &mut Vec<Vertex>, quad: [Point; 4], color: [f32; 4]) {
    let v = |p: Point| Vertex {
        position: [p.x as f32, p.y as f32],
        color,
    };
    // Triangle 1: corners 0, 1, 2. Triangle 2: corners 0, 2, 3.
    vertices.extend_from_slice(&[
        v(quad[0]),
        v(quad[1]),
        v(quad[2]),
        v(quad[0]),
        v(quad[2]),
        v(quad[3]),
    ]);
}
