use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::scene::{
    Light, Material, NodeId, NodeKind, PerspectiveCamera, PointsMaterial, RenderList, RenderPhase,
    Scene, ShadowConfig,
};

use super::common::{
    alpha_blend, create_uniform_buffer, mat4_cols, uniform_layout_entry, FrameUniform, MeshVertex,
    ObjectUniform, QuadVertex, DEPTH_FORMAT, HDR_FORMAT, QUAD_INDICES, QUAD_VERTICES,
};
use super::targets::RenderTexture;
use super::RenderCtx;

/// Forward renderer for a `Scene`.
///
/// Passes per frame:
/// 1. shadow depth for the first shadow-casting directional light
/// 2. opaque meshes (front-to-back)
/// 3. point sprites
/// 4. transparent meshes (back-to-front)
///
/// Output is linear HDR into the caller's color/depth targets.
#[derive(Default)]
pub struct SceneRenderer {
    pipelines: Option<Pipelines>,

    frame_ubo: Option<wgpu::Buffer>,
    frame_bind_group: Option<wgpu::BindGroup>,

    shadow_map: Option<RenderTexture>,
    shadow_sampler: Option<wgpu::Sampler>,
    shadow_bind_group: Option<wgpu::BindGroup>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    nodes: HashMap<NodeId, NodeGpu>,
    list: RenderList,
}

struct Pipelines {
    frame_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    shadow_layout: wgpu::BindGroupLayout,

    opaque: wgpu::RenderPipeline,
    transparent: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    shadow: wgpu::RenderPipeline,
}

struct NodeGpu {
    revision: u64,
    geometry: Geometry,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

enum Geometry {
    Mesh {
        vbo: wgpu::Buffer,
        ibo: wgpu::Buffer,
        vertex_count: usize,
        index_count: u32,
    },
    Points {
        instances: wgpu::Buffer,
        count: u32,
    },
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PointInstance {
    position: [f32; 3],
    color: [f32; 3],
}

impl PointInstance {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Float32x3, // position
        2 => Float32x3  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Shadow-casting directional light resolved for this frame.
struct ShadowSetup {
    view_proj: Mat4,
    config: ShadowConfig,
}

impl SceneRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes with live GPU buffers.
    pub fn cached_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        camera: &PerspectiveCamera,
        color: &wgpu::TextureView,
        depth: &wgpu::TextureView,
    ) {
        self.ensure_pipelines(ctx);
        self.ensure_static_buffers(ctx);

        let shadow = resolve_shadow(scene);
        self.ensure_shadow_map(ctx, shadow.as_ref().map_or(1, |s| s.config.map_size));
        self.ensure_frame_bindings(ctx);

        self.list.rebuild(scene, camera);

        let Some(pipelines) = self.pipelines.as_ref() else { return };
        sync_nodes(ctx, &mut self.nodes, &pipelines.object_layout, &self.list, scene);
        // Drop buffers for nodes that no longer draw.
        let live: std::collections::HashSet<NodeId> = self.list.items().iter().map(|i| i.node).collect();
        self.nodes.retain(|id, _| live.contains(id));

        let Some(frame_ubo) = self.frame_ubo.as_ref() else { return };
        let uniform = frame_uniform(scene, camera, shadow.as_ref());
        ctx.queue.write_buffer(frame_ubo, 0, bytemuck::bytes_of(&uniform));

        let Some(frame_bg) = self.frame_bind_group.as_ref() else { return };
        let Some(shadow_bg) = self.shadow_bind_group.as_ref() else { return };
        let Some(shadow_map) = self.shadow_map.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        // Always clear the shadow map so a disabled light never samples stale depth.
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("axolotl shadow pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &shadow_map.view,
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

            if shadow.is_some() {
                pass.set_pipeline(&pipelines.shadow);
                pass.set_bind_group(0, frame_bg, &[]);
                for item in self.list.items() {
                    if item.key.phase == RenderPhase::Points {
                        continue;
                    }
                    let casts = scene.get(item.node).is_some_and(|n| n.cast_shadow);
                    if !casts {
                        continue;
                    }
                    let Some(gpu) = self.nodes.get(&item.node) else { continue };
                    if let Geometry::Mesh { vbo, ibo, index_count, .. } = &gpu.geometry {
                        pass.set_bind_group(1, &gpu.bind_group, &[]);
                        pass.set_vertex_buffer(0, vbo.slice(..));
                        pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                }
            }
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("axolotl scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth,
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

        pass.set_bind_group(0, frame_bg, &[]);

        for phase in [RenderPhase::Opaque, RenderPhase::Points, RenderPhase::Transparent] {
            match phase {
                RenderPhase::Opaque => pass.set_pipeline(&pipelines.opaque),
                RenderPhase::Points => pass.set_pipeline(&pipelines.points),
                RenderPhase::Transparent => pass.set_pipeline(&pipelines.transparent),
            }
            if phase != RenderPhase::Points {
                pass.set_bind_group(2, shadow_bg, &[]);
            }

            for item in self.list.phase(phase) {
                let Some(gpu) = self.nodes.get(&item.node) else { continue };
                pass.set_bind_group(1, &gpu.bind_group, &[]);

                match &gpu.geometry {
                    Geometry::Mesh { vbo, ibo, index_count, .. } => {
                        pass.set_vertex_buffer(0, vbo.slice(..));
                        pass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
                        pass.draw_indexed(0..*index_count, 0, 0..1);
                    }
                    Geometry::Points { instances, count } => {
                        pass.set_vertex_buffer(0, quad_vbo.slice(..));
                        pass.set_vertex_buffer(1, instances.slice(..));
                        pass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
                        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..*count);
                    }
                }
            }
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipelines.is_some() {
            return;
        }
        self.pipelines = Some(create_pipelines(ctx.device));
        self.frame_bind_group = None;
        self.shadow_bind_group = None;
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("axolotl sprite quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("axolotl sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(p) = self.pipelines.as_ref() else { return };

        let ubo = create_uniform_buffer::<FrameUniform>(ctx.device, "axolotl frame ubo");
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("axolotl frame bind group"),
            layout: &p.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.frame_ubo = Some(ubo);
        self.frame_bind_group = Some(bind_group);
    }

    fn ensure_shadow_map(&mut self, ctx: &RenderCtx<'_>, size: u32) {
        let size = size.max(1);
        let current = self.shadow_map.as_ref().map(|m| m.width);
        if current == Some(size) && self.shadow_bind_group.is_some() {
            return;
        }
        let Some(p) = self.pipelines.as_ref() else { return };

        let map = RenderTexture::new(
            ctx.device,
            "axolotl shadow map",
            (size, size),
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );

        let sampler = self.shadow_sampler.get_or_insert_with(|| {
            ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("axolotl shadow sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                compare: Some(wgpu::CompareFunction::LessEqual),
                ..Default::default()
            })
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("axolotl shadow bind group"),
            layout: &p.shadow_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!("shadow map allocated at {size}x{size}");
        self.shadow_map = Some(map);
        self.shadow_bind_group = Some(bind_group);
    }
}

fn resolve_shadow(scene: &Scene) -> Option<ShadowSetup> {
    scene.lights().find_map(|(id, light)| match light {
        Light::Directional {
            target,
            shadow: Some(config),
            ..
        } if scene.is_visible(id) => {
            let position = scene.world_matrix(id).w_axis.truncate();
            Some(ShadowSetup {
                view_proj: config.view_projection(position, *target),
                config: *config,
            })
        }
        _ => None,
    })
}

fn frame_uniform(scene: &Scene, camera: &PerspectiveCamera, shadow: Option<&ShadowSetup>) -> FrameUniform {
    let mut ambient = Vec3::ZERO;
    let mut light_dir = [0.0, 1.0, 0.0, 0.0];
    let mut light_color = [0.0; 4];
    let mut have_directional = false;

    for (id, light) in scene.lights() {
        if !scene.is_visible(id) {
            continue;
        }
        match *light {
            Light::Ambient { color, intensity } => {
                ambient += Vec3::from(color.to_array()) * intensity;
            }
            Light::Directional {
                color,
                intensity,
                target,
                ..
            } if !have_directional => {
                let position = scene.world_matrix(id).w_axis.truncate();
                let towards = (position - target).try_normalize().unwrap_or(Vec3::Y);
                light_dir = [towards.x, towards.y, towards.z, intensity];
                light_color = color.with_alpha(0.0);
                have_directional = true;
            }
            Light::Directional { .. } => {
                log::trace!("only the first directional light is shaded");
            }
        }
    }

    if shadow.is_some() {
        light_color[3] = 1.0;
    }

    let (fog_color, fog_params) = match scene.fog {
        Some(fog) => (fog.color().with_alpha(1.0), fog.shader_params()),
        None => ([0.0; 4], [0.0; 4]),
    };

    let (right, up) = camera.basis();
    let p = camera.position;

    FrameUniform {
        view_proj: mat4_cols(camera.view_projection()),
        light_view_proj: mat4_cols(shadow.map_or(Mat4::IDENTITY, |s| s.view_proj)),
        camera_pos: [p.x, p.y, p.z, 1.0],
        camera_right: right.extend(0.0).to_array(),
        camera_up: up.extend(0.0).to_array(),
        light_dir,
        light_color,
        ambient: ambient.extend(1.0).to_array(),
        fog_color,
        fog_params,
        shadow_params: match shadow {
            Some(s) => [s.config.bias, 1.0 / s.config.map_size.max(1) as f32, 0.0, 0.0],
            None => [0.0; 4],
        },
    }
}

fn mesh_object(world: Mat4, material: &Material, receive_shadow: bool) -> ObjectUniform {
    let (sky, ground, has_probe) = match material.probe {
        Some(p) => (p.sky, p.ground, 1.0),
        None => (Default::default(), Default::default(), 0.0),
    };

    ObjectUniform {
        model: mat4_cols(world),
        normal_matrix: mat4_cols(world.inverse().transpose()),
        color: material.color.with_alpha(material.opacity),
        emissive: material.emissive.with_alpha(if receive_shadow { 1.0 } else { 0.0 }),
        probe_sky: sky.with_alpha(material.env_intensity),
        probe_ground: ground.with_alpha(has_probe),
        params: [0.0, if material.double_sided { 1.0 } else { 0.0 }, 0.0, 0.0],
    }
}

fn points_object(world: Mat4, material: &PointsMaterial) -> ObjectUniform {
    ObjectUniform {
        model: mat4_cols(world),
        normal_matrix: mat4_cols(Mat4::IDENTITY),
        color: [1.0, 1.0, 1.0, material.opacity],
        emissive: [0.0; 4],
        probe_sky: [0.0; 4],
        probe_ground: [0.0; 4],
        params: [material.size, 0.0, 0.0, 0.0],
    }
}

/// Creates or refreshes GPU state for every item in `list`.
///
/// Geometry is re-uploaded only when the CPU revision changed; same-sized
/// data is written in place, otherwise buffers are reallocated.
fn sync_nodes(
    ctx: &RenderCtx<'_>,
    nodes: &mut HashMap<NodeId, NodeGpu>,
    object_layout: &wgpu::BindGroupLayout,
    list: &RenderList,
    scene: &Scene,
) {
    for item in list.items() {
        let Some(node) = scene.get(item.node) else { continue };

        let (revision, object) = match &node.kind {
            NodeKind::Mesh { mesh, material } => (
                mesh.revision(),
                mesh_object(item.world, material, node.receive_shadow),
            ),
            NodeKind::Points { cloud, material } => {
                (cloud.revision(), points_object(item.world, material))
            }
            _ => continue,
        };

        match nodes.get_mut(&item.node) {
            Some(gpu) => {
                if gpu.revision != revision {
                    refresh_geometry(ctx, &mut gpu.geometry, &node.kind);
                    gpu.revision = revision;
                }
                ctx.queue.write_buffer(&gpu.ubo, 0, bytemuck::bytes_of(&object));
            }
            None => {
                let Some(geometry) = create_geometry(ctx.device, &node.kind) else { continue };
                let ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("axolotl object ubo"),
                    contents: bytemuck::bytes_of(&object),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("axolotl object bind group"),
                    layout: object_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: ubo.as_entire_binding(),
                    }],
                });
                nodes.insert(
                    item.node,
                    NodeGpu {
                        revision,
                        geometry,
                        ubo,
                        bind_group,
                    },
                );
            }
        }
    }
}

fn mesh_vertices(kind: &NodeKind) -> Option<(Vec<MeshVertex>, &[u32])> {
    let NodeKind::Mesh { mesh, .. } = kind else { return None };
    let vertices = mesh
        .positions
        .iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: p.to_array(),
            normal: mesh.normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
            color: mesh.colors.get(i).copied().unwrap_or([1.0; 3]),
        })
        .collect();
    Some((vertices, &mesh.indices))
}

fn point_instances(kind: &NodeKind) -> Option<Vec<PointInstance>> {
    let NodeKind::Points { cloud, .. } = kind else { return None };
    Some(
        cloud
            .positions
            .iter()
            .zip(&cloud.colors)
            .map(|(p, c)| PointInstance {
                position: p.to_array(),
                color: *c,
            })
            .collect(),
    )
}

fn create_geometry(device: &wgpu::Device, kind: &NodeKind) -> Option<Geometry> {
    if let Some((vertices, indices)) = mesh_vertices(kind) {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("axolotl mesh vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("axolotl mesh ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        });
        return Some(Geometry::Mesh {
            vbo,
            ibo,
            vertex_count: vertices.len(),
            index_count: indices.len() as u32,
        });
    }

    let instances = point_instances(kind)?;
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("axolotl points instance vbo"),
        contents: bytemuck::cast_slice(&instances),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    Some(Geometry::Points {
        instances: buffer,
        count: instances.len() as u32,
    })
}

fn refresh_geometry(ctx: &RenderCtx<'_>, geometry: &mut Geometry, kind: &NodeKind) {
    let in_place = match (&*geometry, kind) {
        (
            Geometry::Mesh {
                vertex_count,
                index_count,
                ..
            },
            NodeKind::Mesh { mesh, .. },
        ) => *vertex_count == mesh.positions.len() && *index_count as usize == mesh.indices.len(),
        (Geometry::Points { count, .. }, NodeKind::Points { cloud, .. }) => *count as usize == cloud.len(),
        _ => false,
    };

    if !in_place {
        if let Some(fresh) = create_geometry(ctx.device, kind) {
            *geometry = fresh;
        }
        return;
    }

    match geometry {
        Geometry::Mesh { vbo, ibo, .. } => {
            if let Some((vertices, indices)) = mesh_vertices(kind) {
                ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));
                ctx.queue.write_buffer(ibo, 0, bytemuck::cast_slice(indices));
            }
        }
        Geometry::Points { instances, .. } => {
            if let Some(data) = point_instances(kind) {
                ctx.queue.write_buffer(instances, 0, bytemuck::cast_slice(&data));
            }
        }
    }
}

fn primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        // Back faces are resolved per material in the fragment shader.
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn color_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: primitive_state(),
        depth_stencil: Some(depth_state(depth_write)),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn create_pipelines(device: &wgpu::Device) -> Pipelines {
    let scene_vf = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

    let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("axolotl frame bgl"),
        entries: &[uniform_layout_entry::<FrameUniform>(0, scene_vf)],
    });
    let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("axolotl object bgl"),
        entries: &[uniform_layout_entry::<ObjectUniform>(0, scene_vf)],
    });
    let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("axolotl shadow bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Depth,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                count: None,
            },
        ],
    });

    let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("axolotl lit pipeline layout"),
        bind_group_layouts: &[&frame_layout, &object_layout, &shadow_layout],
        immediate_size: 0,
    });
    let unlit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("axolotl unlit pipeline layout"),
        bind_group_layouts: &[&frame_layout, &object_layout],
        immediate_size: 0,
    });

    let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("axolotl mesh shader"),
        source: wgpu::ShaderSource::Wgsl(
            concat!(include_str!("shaders/scene_common.wgsl"), include_str!("shaders/mesh.wgsl")).into(),
        ),
    });
    let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("axolotl points shader"),
        source: wgpu::ShaderSource::Wgsl(
            concat!(include_str!("shaders/scene_common.wgsl"), include_str!("shaders/points.wgsl")).into(),
        ),
    });
    let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("axolotl shadow shader"),
        source: wgpu::ShaderSource::Wgsl(
            concat!(include_str!("shaders/scene_common.wgsl"), include_str!("shaders/shadow.wgsl")).into(),
        ),
    });

    let opaque = color_pipeline(
        device,
        "axolotl opaque pipeline",
        &lit_layout,
        &mesh_shader,
        &[MeshVertex::layout()],
        None,
        true,
    );
    let transparent = color_pipeline(
        device,
        "axolotl transparent pipeline",
        &lit_layout,
        &mesh_shader,
        &[MeshVertex::layout()],
        Some(alpha_blend()),
        false,
    );
    let points = color_pipeline(
        device,
        "axolotl points pipeline",
        &unlit_layout,
        &points_shader,
        &[QuadVertex::layout(), PointInstance::layout()],
        Some(alpha_blend()),
        false,
    );

    let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("axolotl shadow pipeline"),
        layout: Some(&unlit_layout),
        vertex: wgpu::VertexState {
            module: &shadow_shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[MeshVertex::layout()],
        },
        fragment: None,
        primitive: primitive_state(),
        depth_stencil: Some(wgpu::DepthStencilState {
            bias: wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
            ..depth_state(true)
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    Pipelines {
        frame_layout,
        object_layout,
        shadow_layout,
        opaque,
        transparent,
        points,
        shadow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, Fog, Node, Transform};

    fn sun_scene() -> Scene {
        let mut scene = Scene::new();
        scene.fog = Some(Fog::Exponential {
            color: Color::WHITE,
            density: 0.05,
        });
        scene.add(Node::light(
            "ambient",
            Light::Ambient {
                color: Color::WHITE,
                intensity: 0.3,
            },
        ));
        scene.add(
            Node::light(
                "sun",
                Light::Directional {
                    color: Color::WHITE,
                    intensity: 2.0,
                    target: Vec3::ZERO,
                    shadow: Some(ShadowConfig::default()),
                },
            )
            .with_transform(Transform::from_translation(Vec3::new(0.0, 10.0, 0.0))),
        );
        scene
    }

    #[test]
    fn frame_uniform_packs_lights_and_fog() {
        let scene = sun_scene();
        let camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        let shadow = resolve_shadow(&scene);
        assert!(shadow.is_some());

        let u = frame_uniform(&scene, &camera, shadow.as_ref());
        assert_eq!(u.ambient[0], 0.3);
        assert_eq!(u.light_dir, [0.0, 1.0, 0.0, 2.0]);
        assert_eq!(u.light_color[3], 1.0);
        assert_eq!(u.fog_params[3], 2.0);
        assert_eq!(u.shadow_params[1], 1.0 / 2048.0);
    }

    #[test]
    fn hidden_shadow_light_is_ignored() {
        let mut scene = sun_scene();
        if let Some(id) = scene.find("sun") {
            if let Some(n) = scene.get_mut(id) {
                n.visible = false;
            }
        }
        assert!(resolve_shadow(&scene).is_none());
    }

    #[test]
    fn frame_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniform>() % 16, 0);
    }
}
