use crate::render::common::{DEPTH_FORMAT, HDR_FORMAT};
use crate::render::targets::{scaled_size, RenderTexture};

/// Offscreen buffers for one render size.
pub(super) struct ComposerTargets {
    pub size: (u32, u32),
    pub depth: RenderTexture,
    /// Ping-pong full-resolution HDR buffers.
    pub hdr: [RenderTexture; 2],
    /// Quarter-resolution bright-pass / blur buffers.
    pub bloom: [RenderTexture; 2],
    /// Half-resolution light mask / radial blur buffers.
    pub rays: [RenderTexture; 2],
}

impl ComposerTargets {
    pub fn new(device: &wgpu::Device, size: (u32, u32)) -> Self {
        let quarter = scaled_size(size, 4);
        let half = scaled_size(size, 2);

        Self {
            size,
            depth: RenderTexture::new(
                device,
                "axolotl scene depth",
                size,
                DEPTH_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            ),
            hdr: [
                RenderTexture::color(device, "axolotl hdr a", size, HDR_FORMAT),
                RenderTexture::color(device, "axolotl hdr b", size, HDR_FORMAT),
            ],
            bloom: [
                RenderTexture::color(device, "axolotl bloom a", quarter, HDR_FORMAT),
                RenderTexture::color(device, "axolotl bloom b", quarter, HDR_FORMAT),
            ],
            rays: [
                RenderTexture::color(device, "axolotl rays a", half, HDR_FORMAT),
                RenderTexture::color(device, "axolotl rays b", half, HDR_FORMAT),
            ],
        }
    }
}
