//! wgpu implementation of the renderer seam

use std::collections::{HashMap, HashSet};

use crate::core::camera::Camera;
use crate::core::config::RendererConfig;
use crate::core::types::Result;
use crate::scene::{Geometry, SceneGraph, SceneNode, SceneNodeId};

use super::context::GpuContext;
use super::mesh_pipeline::{CameraUniform, DEPTH_FORMAT, MeshPipeline, MeshUniform, UniformBinding};
use super::renderer::Renderer;

/// GPU copy of one mesh
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_count: usize,
    uniform: UniformBinding,
    last_uniform: Option<MeshUniform>,
}

/// Attachments that follow the surface size
struct FrameTargets {
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

/// Draws scene meshes into a window surface
pub struct GpuRenderer {
    context: GpuContext,
    pipeline: MeshPipeline,
    camera: UniformBinding,
    meshes: HashMap<SceneNodeId, GpuMesh>,
    targets: FrameTargets,
    sample_count: u32,
    clear_color: wgpu::Color,
    pixel_ratio: f64,
    size: (u32, u32),
    pending_clear: bool,
}

impl GpuRenderer {
    pub fn new(context: GpuContext, config: &RendererConfig) -> Self {
        let sample_count = if config.antialias { 4 } else { 1 };
        let pipeline = MeshPipeline::new(&context.device, context.format(), sample_count);
        let camera = UniformBinding::new::<CameraUniform>(&context.device, pipeline.camera_layout(), "camera_uniform");
        let (width, height) = context.size();
        let targets = create_targets(&context, width, height, sample_count);
        let [r, g, b, a] = config.clear_color;

        log::info!("GpuRenderer: {}x{} surface, {}x MSAA", width, height, sample_count);

        Self {
            context,
            pipeline,
            camera,
            meshes: HashMap::new(),
            targets,
            sample_count,
            clear_color: wgpu::Color { r, g, b, a },
            pixel_ratio: 1.0,
            size: (width, height),
            pending_clear: false,
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    /// Upload or refresh the GPU copy of a mesh node
    fn sync_mesh(&mut self, node: &SceneNode) {
        let Some(mesh) = &node.mesh else { return };
        let device = &self.context.device;
        let queue = &self.context.queue;

        let stale = self
            .meshes
            .get(&node.id)
            .is_none_or(|gpu| gpu.vertex_count != mesh.geometry.positions.len());
        if stale {
            let uniform = UniformBinding::new::<MeshUniform>(device, self.pipeline.mesh_layout(), "mesh_uniform");
            self.meshes.insert(node.id, upload_geometry(device, queue, &mesh.geometry, uniform));
        }

        let value = MeshUniform::new(node.world_transform, &mesh.material);
        if let Some(gpu) = self.meshes.get_mut(&node.id) {
            let changed = gpu
                .last_uniform
                .is_none_or(|last| bytemuck::bytes_of(&last) != bytemuck::bytes_of(&value));
            if changed {
                gpu.uniform.write(queue, &value);
                gpu.last_uniform = Some(value);
            }
        }
    }
}

fn upload_geometry(device: &wgpu::Device, queue: &wgpu::Queue, geometry: &Geometry, uniform: UniformBinding) -> GpuMesh {
    let vertex_bytes: &[u8] = bytemuck::cast_slice(&geometry.positions);
    let index_bytes: &[u8] = bytemuck::cast_slice(&geometry.indices);

    // Buffers must not be zero-sized; index writes need 4-byte multiples
    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{}_vertices", geometry.name)),
        size: (vertex_bytes.len() as u64).max(16),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{}_indices", geometry.name)),
        size: (index_bytes.len() as u64).max(16),
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    if !vertex_bytes.is_empty() {
        queue.write_buffer(&vertex_buffer, 0, vertex_bytes);
    }
    if !index_bytes.is_empty() {
        queue.write_buffer(&index_buffer, 0, index_bytes);
    }

    log::debug!(
        "GpuRenderer: uploaded '{}' ({} vertices, {} triangles)",
        geometry.name,
        geometry.positions.len(),
        geometry.indices.len() / 3
    );

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: geometry.indices.len() as u32,
        vertex_count: geometry.positions.len(),
        uniform,
        last_uniform: None,
    }
}

fn create_targets(context: &GpuContext, width: u32, height: u32, sample_count: u32) -> FrameTargets {
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };

    let depth = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("mesh_depth"),
        size,
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    let msaa_view = (sample_count > 1).then(|| {
        context
            .device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("mesh_msaa"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: context.format(),
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    });

    FrameTargets {
        depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
        msaa_view,
    }
}

impl Renderer for GpuRenderer {
    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = if ratio > 0.0 { ratio } else { 1.0 };
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn set_size(&mut self, width: u32, height: u32) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);

        let buffer_width = (width as f64 * self.pixel_ratio).round() as u32;
        let buffer_height = (height as f64 * self.pixel_ratio).round() as u32;
        if buffer_width == 0 || buffer_height == 0 {
            return;
        }
        self.context.resize(buffer_width, buffer_height);
        self.targets = create_targets(&self.context, buffer_width, buffer_height, self.sample_count);
        log::debug!("GpuRenderer: resized to {}x{}", buffer_width, buffer_height);
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self) {
        self.pending_clear = true;
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()> {
        let nodes: Vec<&SceneNode> = scene.visible_nodes().into_iter().filter(|n| n.mesh.is_some()).collect();

        let live: HashSet<SceneNodeId> = nodes.iter().map(|n| n.id).collect();
        self.meshes.retain(|id, _| live.contains(id));
        for node in &nodes {
            self.sync_mesh(node);
        }
        self.camera.write(&self.context.queue, &CameraUniform::from_camera(camera));

        // Opaque first, then blended back to front; fully transparent meshes are skipped
        let mut opaque = Vec::new();
        let mut blended = Vec::new();
        for node in &nodes {
            let Some(mesh) = &node.mesh else { continue };
            if mesh.material.transparent || mesh.material.opacity < 1.0 {
                if mesh.material.opacity > 0.0 {
                    let centre = node.world_transform.transform_point3(
                        mesh.geometry.bounding_box.map_or(glam::Vec3::ZERO, |b| b.center()),
                    );
                    blended.push((node.id, centre.distance_squared(camera.position)));
                }
            } else {
                opaque.push(node.id);
            }
        }
        blended.sort_by(|a, b| b.1.total_cmp(&a.1));

        let output = self.context.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let (color_view, resolve_target) = match &self.targets.msaa_view {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };

        let load = if std::mem::take(&mut self.pending_clear) {
            wgpu::LoadOp::Clear(self.clear_color)
        } else {
            wgpu::LoadOp::Load
        };

        let mut encoder = self.context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mesh_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mesh_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.camera.bind_group, &[]);

            pass.set_pipeline(self.pipeline.opaque());
            for id in &opaque {
                draw_mesh(&mut pass, self.meshes.get(id));
            }

            pass.set_pipeline(self.pipeline.transparent());
            for (id, _) in &blended {
                draw_mesh(&mut pass, self.meshes.get(id));
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn draw_mesh(pass: &mut wgpu::RenderPass<'_>, mesh: Option<&GpuMesh>) {
    let Some(mesh) = mesh else { return };
    if mesh.index_count == 0 {
        return;
    }
    pass.set_bind_group(1, &mesh.uniform.bind_group, &[]);
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
}
