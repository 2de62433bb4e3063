//! wgpu renderer for the room
//!
//! Draws every scene object each frame with a single Lambert pipeline: box
//! panels face by face with their own material slots, the sound emitter
//! sphere, loaded models and finally the controller visual. A cube-map
//! background goes down first once all its faces have loaded; until then
//! the pass clears to a dark clear color.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::assets::{ImageData, TextureId};
use crate::error::{KeepsakeError, Result};
use crate::gfx::camera::Camera;
use crate::gfx::geometry::{
    box_face_indices, generate_box, generate_sphere, GeometryData, BOX_FACE_COUNT,
};
use crate::gfx::scene::{
    hex_to_rgb, Geometry, MaterialSlot, ObjectId, Scene, SceneObject, SkyboxState, Surface,
    TextureState, Vertex3D, VideoHandle,
};
use crate::interaction::{Controller, ControllerVisual};
use crate::wgpu_utils::{sampler_entry, texture_entry, uniform_entry, UniformBuffer};

use super::texture_resource::TextureResource;
use super::Renderer;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.03,
    a: 1.0,
};

const SKY_COLOR: u32 = 0x606060;
const GROUND_COLOR: u32 = 0x404040;
const LIGHT_POSITION: [f32; 3] = [1.0, 2.0, 1.0];
const LIGHT_INTENSITY: f32 = 0.5;
const LIGHT_COLOR: u32 = 0xffffff;

const SPHERE_SEGMENTS: (u32, u32) = (32, 16);
const POINTER_COLOR: u32 = 0xffffff;
const POINTER_OPACITY: f32 = 1.0;
const RING_OPACITY: f32 = 0.5;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
}

impl GlobalUniform {
    fn new(camera: &Camera) -> Self {
        let camera = camera.uniform();
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            sky_color: rgba(hex_to_rgb(SKY_COLOR), 1.0),
            ground_color: rgba(hex_to_rgb(GROUND_COLOR), 1.0),
            light_position: rgba(LIGHT_POSITION, LIGHT_INTENSITY),
            light_color: rgba(hex_to_rgb(LIGHT_COLOR), 1.0),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SkyUniform {
    /// Maps far-plane NDC back to view directions
    inv_view_proj: [[f32; 4]; 4],
}

impl SkyUniform {
    fn new(camera: &Camera) -> Self {
        let inverse = camera
            .orientation_view_projection_matrix()
            .invert()
            .unwrap_or_else(Matrix4::identity);
        Self {
            inv_view_proj: inverse.into(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
struct DrawUniform {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    /// `w > 0.5` skips lighting
    emissive: [f32; 4],
}

impl DrawUniform {
    fn lit(model: Matrix4<f32>, color: [f32; 3], emissive: [f32; 3]) -> Self {
        let normal_matrix = model.invert().map(|m| m.transpose()).unwrap_or(model);
        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            color: rgba(color, 1.0),
            emissive: rgba(emissive, 0.0),
        }
    }

    fn unlit(model: Matrix4<f32>, color: [f32; 3], opacity: f32) -> Self {
        Self {
            color: rgba(color, opacity),
            emissive: [0.0, 0.0, 0.0, 1.0],
            ..Self::lit(model, color, [0.0; 3])
        }
    }
}

fn rgba(rgb: [f32; 3], a: f32) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], a]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MeshKey {
    UnitBox,
    UnitSphere,
    Model(ObjectId),
    Pointer,
    GazeRing,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TextureKey {
    White,
    Image(TextureId),
    Video(String),
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, data: &GeometryData, label: &str) -> Self {
        let vertices: Vec<Vertex3D> = data.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&data.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: data.indices.len() as u32,
        }
    }
}

/// Texture plus a counter bumped whenever the GPU texture is recreated
struct GpuTexture {
    resource: TextureResource,
    generation: u64,
}

/// Video texture and the frame it currently holds
struct VideoTexture {
    texture: GpuTexture,
    frame: u64,
}

struct DrawCommand {
    mesh: MeshKey,
    indices: Option<Range<u32>>,
    uniform: DrawUniform,
    texture: TextureKey,
}

enum Background {
    /// No cube yet; the clear color shows
    Waiting,
    Ready {
        _cube: TextureResource,
        bind_group: wgpu::BindGroup,
    },
    /// The faces can never form a cube
    Unavailable,
}

/// Uniform buffer and bind group reused by the n-th draw of every frame
struct DrawSlot {
    uniform: UniformBuffer<DrawUniform>,
    bind_group: wgpu::BindGroup,
    bound: (TextureKey, u64),
}

/// Renders the room into a window surface
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pipeline: wgpu::RenderPipeline,

    globals: UniformBuffer<GlobalUniform>,
    globals_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_slots: Vec<DrawSlot>,

    sky_pipeline: wgpu::RenderPipeline,
    sky_layout: wgpu::BindGroupLayout,
    sky_uniform: UniformBuffer<SkyUniform>,
    background: Background,

    meshes: HashMap<MeshKey, GpuMesh>,
    white: GpuTexture,
    images: HashMap<TextureId, GpuTexture>,
    videos: HashMap<String, VideoTexture>,
    next_generation: u64,
}

impl WgpuRenderer {
    /// Creates a renderer for the given window
    ///
    /// Fails when no adapter or device is available or the surface reports no
    /// usable format.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| KeepsakeError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| KeepsakeError::Gpu(e.to_string()))?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Keepsake Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| KeepsakeError::Gpu(e.to_string()))?;
        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or_else(|| KeepsakeError::Surface("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
            ],
        });
        let sky_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sky Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                texture_entry(1, wgpu::TextureViewDimension::Cube),
                sampler_entry(2),
            ],
        });

        let globals = UniformBuffer::<GlobalUniform>::new(&device);
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.binding_resource(),
            }],
        });

        let pipeline = create_pipeline(&device, format, &[&globals_layout, &draw_layout]);
        let sky_pipeline = create_sky_pipeline(&device, format, &sky_layout);
        let sky_uniform = UniformBuffer::<SkyUniform>::new(&device);

        let white_image = ImageData::solid_color(1, 1, [255, 255, 255, 255]);
        let white = GpuTexture {
            resource: TextureResource::from_image(&device, &queue, &white_image, "white"),
            generation: 0,
        };

        let mut meshes = HashMap::new();
        meshes.insert(
            MeshKey::UnitBox,
            GpuMesh::new(&device, &generate_box([1.0, 1.0, 1.0]), "unit box"),
        );
        meshes.insert(
            MeshKey::UnitSphere,
            GpuMesh::new(
                &device,
                &generate_sphere(1.0, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1),
                "unit sphere",
            ),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            pipeline,
            globals,
            globals_bind_group,
            draw_layout,
            draw_slots: Vec::new(),
            sky_pipeline,
            sky_layout,
            sky_uniform,
            background: Background::Waiting,
            meshes,
            white,
            images: HashMap::new(),
            videos: HashMap::new(),
            next_generation: 1,
        })
    }

    fn generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Uploads ready images once and refreshes video textures whose frame changed
    fn sync_textures(&mut self, scene: &Scene) {
        for object in scene.objects() {
            for slot in &object.materials {
                match &slot.surface {
                    Surface::Texture(TextureState::Ready(id, image)) => {
                        if !self.images.contains_key(id) {
                            let generation = self.generation();
                            let resource = TextureResource::from_image(
                                &self.device,
                                &self.queue,
                                image,
                                &format!("texture {}", id.0),
                            );
                            self.images.insert(*id, GpuTexture { resource, generation });
                        }
                    }
                    Surface::Video(handle) => self.sync_video(handle.0.name(), handle),
                    _ => {}
                }
            }
        }
    }

    /// Builds the cube once every background face has arrived
    fn sync_background(&mut self, scene: &Scene) {
        if !matches!(self.background, Background::Waiting) {
            return;
        }
        let Some(skybox) = scene.background.as_ref() else {
            return;
        };

        match skybox.state() {
            SkyboxState::Loading => {}
            SkyboxState::Unavailable(reason) => {
                log::warn!("Skybox unavailable ({}), keeping the clear color", reason);
                self.background = Background::Unavailable;
            }
            SkyboxState::Ready(faces) => {
                let cube = TextureResource::cube_from_faces(&self.device, &self.queue, &faces, "skybox");
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Sky Bind Group"),
                    layout: &self.sky_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: self.sky_uniform.binding_resource(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&cube.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&cube.sampler),
                        },
                    ],
                });
                log::info!("Skybox ready with {}px faces", faces[0].width);
                self.background = Background::Ready {
                    _cube: cube,
                    bind_group,
                };
            }
        }
    }

    fn sync_video(&mut self, name: &str, handle: &VideoHandle) {
        let Some(frame) = handle.0.current_frame() else {
            return;
        };
        if let Some(video) = self.videos.get_mut(name) {
            if video.frame == frame.index {
                return;
            }
            if video.texture.resource.matches_size(&frame.image) {
                video.texture.resource.write_image(&self.queue, &frame.image);
                video.frame = frame.index;
                return;
            }
        }

        let generation = self.generation();
        let resource = TextureResource::from_image(
            &self.device,
            &self.queue,
            &frame.image,
            &format!("video {name}"),
        );
        self.videos.insert(
            name.to_string(),
            VideoTexture {
                texture: GpuTexture { resource, generation },
                frame: frame.index,
            },
        );
    }

    /// Base color and texture for one slot
    fn slot_appearance(&self, slot: &MaterialSlot) -> ([f32; 3], TextureKey) {
        match &slot.surface {
            Surface::Texture(TextureState::Ready(id, _)) if self.images.contains_key(id) => {
                (slot.effective_color(), TextureKey::Image(*id))
            }
            Surface::Video(handle) if self.videos.contains_key(handle.0.name()) => {
                (slot.color, TextureKey::Video(handle.0.name().to_string()))
            }
            Surface::Video(_) => (MaterialSlot::neutral().color, TextureKey::White),
            _ => (slot.effective_color(), TextureKey::White),
        }
    }

    fn texture(&self, key: &TextureKey) -> &GpuTexture {
        match key {
            TextureKey::White => &self.white,
            TextureKey::Image(id) => self.images.get(id).unwrap_or(&self.white),
            TextureKey::Video(name) => self
                .videos
                .get(name)
                .map(|video| &video.texture)
                .unwrap_or(&self.white),
        }
    }

    fn collect_object(&mut self, scene: &Scene, object: &SceneObject, commands: &mut Vec<DrawCommand>) {
        let world = scene.world_matrix(object);
        let fallback = MaterialSlot::neutral();
        let slot_at = |index: usize| object.materials.get(index).unwrap_or(&fallback);

        match &object.geometry {
            Geometry::Box { size } => {
                let model = world * Matrix4::from_nonuniform_scale(size.x, size.y, size.z);
                for face in 0..BOX_FACE_COUNT {
                    let slot = slot_at(face);
                    let (color, texture) = self.slot_appearance(slot);
                    commands.push(DrawCommand {
                        mesh: MeshKey::UnitBox,
                        indices: Some(box_face_indices(face)),
                        uniform: DrawUniform::lit(model, color, slot.emissive),
                        texture,
                    });
                }
            }
            Geometry::Sphere { radius } => {
                let slot = slot_at(0);
                let (color, texture) = self.slot_appearance(slot);
                commands.push(DrawCommand {
                    mesh: MeshKey::UnitSphere,
                    indices: None,
                    uniform: DrawUniform::lit(world * Matrix4::from_scale(*radius), color, slot.emissive),
                    texture,
                });
            }
            Geometry::Mesh(data) => {
                let key = MeshKey::Model(object.id());
                if !self.meshes.contains_key(&key) {
                    let mesh = GpuMesh::new(&self.device, data, &object.name);
                    self.meshes.insert(key, mesh);
                }
                let slot = slot_at(0);
                let (color, texture) = self.slot_appearance(slot);
                commands.push(DrawCommand {
                    mesh: key,
                    indices: None,
                    uniform: DrawUniform::lit(world, color, slot.emissive),
                    texture,
                });
            }
        }
    }

    fn collect_controller(&mut self, controller: &Controller, commands: &mut Vec<DrawCommand>) {
        let Some(visual) = controller.visual() else {
            return;
        };
        let (key, opacity) = match visual {
            ControllerVisual::PointerLine { .. } => (MeshKey::Pointer, POINTER_OPACITY),
            ControllerVisual::GazeRing { .. } => (MeshKey::GazeRing, RING_OPACITY),
        };
        if !self.meshes.contains_key(&key) {
            let mesh = GpuMesh::new(&self.device, &visual.geometry(), "controller");
            self.meshes.insert(key, mesh);
        }
        let model =
            Matrix4::from_translation(controller.position) * Matrix4::from(controller.rotation);
        commands.push(DrawCommand {
            mesh: key,
            indices: None,
            uniform: DrawUniform::unlit(model, hex_to_rgb(POINTER_COLOR), opacity),
            texture: TextureKey::White,
        });
    }

    /// Writes each command's uniform into its slot and rebinds changed textures
    fn prepare_slots(&mut self, commands: &[DrawCommand]) {
        for (index, command) in commands.iter().enumerate() {
            let generation = self.texture(&command.texture).generation;
            let bound = (command.texture.clone(), generation);

            if index == self.draw_slots.len() {
                let uniform = UniformBuffer::<DrawUniform>::new(&self.device);
                let bind_group = self.create_draw_bind_group(&uniform, &command.texture);
                self.draw_slots.push(DrawSlot {
                    uniform,
                    bind_group,
                    bound,
                });
            } else if self.draw_slots[index].bound != bound {
                let bind_group =
                    self.create_draw_bind_group(&self.draw_slots[index].uniform, &command.texture);
                let slot = &mut self.draw_slots[index];
                slot.bind_group = bind_group;
                slot.bound = bound;
            }

            self.draw_slots[index]
                .uniform
                .update_content(&self.queue, command.uniform);
        }
    }

    fn create_draw_bind_group(
        &self,
        uniform: &UniformBuffer<DrawUniform>,
        key: &TextureKey,
    ) -> wgpu::BindGroup {
        let texture = &self.texture(key).resource;
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout: &self.draw_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        })
    }

    fn acquire_frame(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(e) => {
                log::warn!("Dropped frame: {}", e);
                None
            }
        }
    }
}

impl Renderer for WgpuRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera, controller: &Controller) {
        self.globals
            .update_content(&self.queue, GlobalUniform::new(camera));
        self.sync_textures(scene);
        self.sync_background(scene);
        if matches!(self.background, Background::Ready { .. }) {
            self.sky_uniform
                .update_content(&self.queue, SkyUniform::new(camera));
        }

        let mut commands = Vec::with_capacity(scene.len() * BOX_FACE_COUNT + 1);
        for object in scene.objects() {
            self.collect_object(scene, object, &mut commands);
        }
        // Drawn last so the translucent ring blends over the room
        self.collect_controller(controller, &mut commands);
        self.prepare_slots(&commands);

        let Some(frame) = self.acquire_frame() else {
            return;
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Room Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Background::Ready { bind_group, .. } = &self.background {
                render_pass.set_pipeline(&self.sky_pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (command, slot) in commands.iter().zip(&self.draw_slots) {
                let Some(mesh) = self.meshes.get(&command.mesh) else {
                    continue;
                };
                render_pass.set_bind_group(1, &slot.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                let indices = command.indices.clone().unwrap_or(0..mesh.index_count);
                render_pass.draw_indexed(indices, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Room Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Room Pipeline Layout"),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Room Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex3D::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Models are viewed from inside as well as outside
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Screen-covering triangle behind everything; it neither tests nor writes depth
fn create_sky_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    sky_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Sky Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("sky.wgsl").into()),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Sky Pipeline Layout"),
        bind_group_layouts: &[sky_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Sky Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_sky"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_sky"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
