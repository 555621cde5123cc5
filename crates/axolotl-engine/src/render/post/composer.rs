use glam::Vec2;

use crate::effects::{Effect, EffectChain};
use crate::render::common::create_uniform_buffer;
use crate::render::{RenderCtx, RenderTarget, SceneRenderer};
use crate::scene::{PerspectiveCamera, Scene};

use super::params::{sun_screen, PostParams, BLOOM_INTENSITY_SCALE};
use super::pipelines::PostPipelines;
use super::targets::ComposerTargets;

/// Uniform slots; each pass writes its own buffer once per frame.
#[derive(Debug, Copy, Clone)]
enum Slot {
    Glitch,
    Bright,
    BlurH,
    BlurV,
    BloomComposite,
    RaysMask,
    RaysBlur,
    RaysComposite,
    Output,
}

const SLOT_COUNT: usize = 9;

/// Runs an `EffectChain`: the `Render` effect draws the scene into an HDR
/// buffer, later effects ping-pong between two HDR buffers, and a final
/// tonemapping pass writes the surface.
pub struct EffectComposer {
    scene: SceneRenderer,

    targets: Option<ComposerTargets>,
    pipelines: Option<PostPipelines>,
    sampler: Option<wgpu::Sampler>,
    uniforms: Vec<wgpu::Buffer>,

    /// Exposure applied before tonemapping.
    pub exposure: f32,
}

impl Default for EffectComposer {
    fn default() -> Self {
        Self {
            scene: SceneRenderer::new(),
            targets: None,
            pipelines: None,
            sampler: None,
            uniforms: Vec::new(),
            exposure: 1.0,
        }
    }
}

impl EffectComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes with live GPU buffers in the scene pass.
    pub fn cached_nodes(&self) -> usize {
        self.scene.cached_nodes()
    }

    /// Current HDR render size, once targets exist.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.targets.as_ref().map(|t| t.size)
    }

    /// Reallocates offscreen targets for a new render size.
    pub fn set_size(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        let size = (size.0.max(1), size.1.max(1));
        if self.size() == Some(size) {
            return;
        }
        log::debug!("effect composer targets resized to {}x{}", size.0, size.1);
        self.targets = Some(ComposerTargets::new(device, size));
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &Scene,
        camera: &PerspectiveCamera,
        chain: &EffectChain,
    ) {
        self.set_size(ctx.device, ctx.render_size());
        self.ensure_pipelines(ctx);
        self.ensure_uniforms(ctx);

        let Some(t) = self.targets.as_ref() else { return };
        let Some(p) = self.pipelines.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let uniforms = &self.uniforms;
        let write = |slot: Slot, params: PostParams| {
            if let Some(buf) = uniforms.get(slot as usize) {
                ctx.queue.write_buffer(buf, 0, bytemuck::bytes_of(&params));
            }
        };
        let ubo = move |slot: Slot| &uniforms[slot as usize];

        let mut cur = 0usize;
        let mut rendered = false;

        for effect in chain.effects() {
            match effect {
                Effect::Render => {
                    self.scene.render(
                        ctx,
                        target.encoder,
                        scene,
                        camera,
                        &t.hdr[0].view,
                        &t.depth.view,
                    );
                    cur = 0;
                    rendered = true;
                }

                Effect::Glitch(glitch) => {
                    let strength = glitch.active_strength();
                    if strength <= 0.0 {
                        continue;
                    }
                    write(Slot::Glitch, PostParams::glitch(strength, glitch.timer.seed()));
                    let pass = FullscreenPass::new(ctx.device, p, sampler);
                    pass.run(
                        target.encoder,
                        "axolotl glitch pass",
                        &p.glitch,
                        ubo(Slot::Glitch),
                        &t.hdr[cur].view,
                        &t.hdr[cur].view,
                        &t.hdr[cur ^ 1].view,
                    );
                    cur ^= 1;
                }

                Effect::Bloom(bloom) => {
                    let quarter = t.bloom[0].size();
                    write(Slot::Bright, PostParams::bright_pass(bloom));
                    write(Slot::BlurH, PostParams::blur(Vec2::X, quarter));
                    write(Slot::BlurV, PostParams::blur(Vec2::Y, quarter));
                    write(
                        Slot::BloomComposite,
                        PostParams::composite(bloom.intensity.max(0.0) * BLOOM_INTENSITY_SCALE),
                    );

                    let pass = FullscreenPass::new(ctx.device, p, sampler);
                    let src = &t.hdr[cur].view;
                    pass.run(target.encoder, "axolotl bloom bright", &p.bright, ubo(Slot::Bright), src, src, &t.bloom[0].view);
                    pass.run(
                        target.encoder,
                        "axolotl bloom blur h",
                        &p.blur,
                        ubo(Slot::BlurH),
                        &t.bloom[0].view,
                        &t.bloom[0].view,
                        &t.bloom[1].view,
                    );
                    pass.run(
                        target.encoder,
                        "axolotl bloom blur v",
                        &p.blur,
                        ubo(Slot::BlurV),
                        &t.bloom[1].view,
                        &t.bloom[1].view,
                        &t.bloom[0].view,
                    );
                    pass.run(
                        target.encoder,
                        "axolotl bloom composite",
                        &p.composite,
                        ubo(Slot::BloomComposite),
                        src,
                        &t.bloom[0].view,
                        &t.hdr[cur ^ 1].view,
                    );
                    cur ^= 1;
                }

                Effect::GodRays(rays) => {
                    let Some(sun) = sun_screen(camera, rays) else { continue };
                    write(Slot::RaysMask, PostParams::rays_mask(&sun, rays, ctx.viewport.aspect()));
                    write(Slot::RaysBlur, PostParams::rays_blur(&sun, rays));
                    write(Slot::RaysComposite, PostParams::composite(1.0));

                    let mask_bg = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("axolotl rays mask bind group"),
                        layout: &p.mask_layout,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: ubo(Slot::RaysMask).as_entire_binding(),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::TextureView(&t.depth.view),
                            },
                        ],
                    });
                    draw_fullscreen(target.encoder, "axolotl rays mask", &p.rays_mask, &mask_bg, &t.rays[0].view);

                    let pass = FullscreenPass::new(ctx.device, p, sampler);
                    pass.run(
                        target.encoder,
                        "axolotl rays blur",
                        &p.rays_blur,
                        ubo(Slot::RaysBlur),
                        &t.rays[0].view,
                        &t.rays[0].view,
                        &t.rays[1].view,
                    );
                    pass.run(
                        target.encoder,
                        "axolotl rays composite",
                        &p.composite,
                        ubo(Slot::RaysComposite),
                        &t.hdr[cur].view,
                        &t.rays[1].view,
                        &t.hdr[cur ^ 1].view,
                    );
                    cur ^= 1;
                }
            }
        }

        if !rendered {
            clear_view(target.encoder, &t.hdr[cur].view, scene.background.to_wgpu());
        }

        write(
            Slot::Output,
            PostParams::output(self.exposure, ctx.needs_manual_srgb()),
        );
        let pass = FullscreenPass::new(ctx.device, p, sampler);
        pass.run(
            target.encoder,
            "axolotl output pass",
            &p.output,
            ubo(Slot::Output),
            &t.hdr[cur].view,
            &t.hdr[cur].view,
            target.color_view,
        );
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self
            .pipelines
            .as_ref()
            .is_some_and(|p| p.output_format == ctx.surface_format)
        {
            return;
        }
        self.pipelines = Some(PostPipelines::new(ctx.device, ctx.surface_format));
    }

    fn ensure_uniforms(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("axolotl post sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            }));
        }

        if self.uniforms.len() != SLOT_COUNT {
            self.uniforms = (0..SLOT_COUNT)
                .map(|_| create_uniform_buffer::<PostParams>(ctx.device, "axolotl post ubo"))
                .collect();
        }
    }
}

/// Builds per-frame bind groups for the shared post layout.
struct FullscreenPass<'a> {
    device: &'a wgpu::Device,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
}

impl<'a> FullscreenPass<'a> {
    fn new(device: &'a wgpu::Device, pipelines: &'a PostPipelines, sampler: &'a wgpu::Sampler) -> Self {
        Self {
            device,
            layout: &pipelines.pass_layout,
            sampler,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        ubo: &wgpu::Buffer,
        src: &wgpu::TextureView,
        aux: &wgpu::TextureView,
        dst: &wgpu::TextureView,
    ) {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(src),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(aux),
                },
            ],
        });
        draw_fullscreen(encoder, label, pipeline, &bind_group, dst);
    }
}

fn draw_fullscreen(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
    dst: &wgpu::TextureView,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: dst,
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
    rpass.set_pipeline(pipeline);
    rpass.set_bind_group(0, bind_group, &[]);
    rpass.draw(0..3, 0..1);
}

fn clear_view(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, color: wgpu::Color) {
    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("axolotl hdr clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
