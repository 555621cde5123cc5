use crate::render::common::{uniform_layout_entry, HDR_FORMAT};

use super::params::PostParams;

macro_rules! post_shader {
    ($body:literal) => {
        concat!(
            include_str!("../shaders/fullscreen.wgsl"),
            include_str!("../shaders/post_bindings.wgsl"),
            include_str!($body)
        )
    };
}

/// Fullscreen pipelines for every post pass.
///
/// Everything except `output` targets `HDR_FORMAT`; `output` targets the
/// surface and is rebuilt when the surface format changes.
pub(super) struct PostPipelines {
    pub pass_layout: wgpu::BindGroupLayout,
    pub mask_layout: wgpu::BindGroupLayout,

    pub glitch: wgpu::RenderPipeline,
    pub bright: wgpu::RenderPipeline,
    pub blur: wgpu::RenderPipeline,
    pub composite: wgpu::RenderPipeline,
    pub rays_mask: wgpu::RenderPipeline,
    pub rays_blur: wgpu::RenderPipeline,
    pub output: wgpu::RenderPipeline,
    pub output_format: wgpu::TextureFormat,
}

impl PostPipelines {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat) -> Self {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let pass_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("axolotl post bgl"),
            entries: &[
                uniform_layout_entry::<PostParams>(0, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                texture_entry(2),
                texture_entry(3),
            ],
        });

        let mask_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("axolotl rays mask bgl"),
            entries: &[
                uniform_layout_entry::<PostParams>(0, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
            ],
        });

        let pass_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("axolotl post pipeline layout"),
            bind_group_layouts: &[&pass_layout],
            immediate_size: 0,
        });
        let mask_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("axolotl rays mask pipeline layout"),
            bind_group_layouts: &[&mask_layout],
            immediate_size: 0,
        });

        let module = |label: &str, src: &str| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(src.into()),
            })
        };

        let glitch_sm = module("axolotl glitch shader", post_shader!("../shaders/glitch.wgsl"));
        let bloom_sm = module("axolotl bloom shader", post_shader!("../shaders/bloom.wgsl"));
        let composite_sm = module("axolotl composite shader", post_shader!("../shaders/composite.wgsl"));
        let rays_sm = module("axolotl god rays shader", post_shader!("../shaders/god_rays.wgsl"));
        let output_sm = module("axolotl output shader", post_shader!("../shaders/output.wgsl"));
        let mask_sm = module(
            "axolotl rays mask shader",
            concat!(
                include_str!("../shaders/fullscreen.wgsl"),
                include_str!("../shaders/god_rays_mask.wgsl")
            ),
        );

        Self {
            glitch: fullscreen_pipeline(device, "axolotl glitch", &pass_pl, &glitch_sm, "fs_main", HDR_FORMAT),
            bright: fullscreen_pipeline(device, "axolotl bloom bright", &pass_pl, &bloom_sm, "fs_bright", HDR_FORMAT),
            blur: fullscreen_pipeline(device, "axolotl bloom blur", &pass_pl, &bloom_sm, "fs_blur", HDR_FORMAT),
            composite: fullscreen_pipeline(
                device,
                "axolotl composite",
                &pass_pl,
                &composite_sm,
                "fs_main",
                HDR_FORMAT,
            ),
            rays_mask: fullscreen_pipeline(device, "axolotl rays mask", &mask_pl, &mask_sm, "fs_main", HDR_FORMAT),
            rays_blur: fullscreen_pipeline(device, "axolotl rays blur", &pass_pl, &rays_sm, "fs_main", HDR_FORMAT),
            output: fullscreen_pipeline(device, "axolotl output", &pass_pl, &output_sm, "fs_main", output_format),
            output_format,
            pass_layout,
            mask_layout,
        }
    }
}

fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
