/// Offscreen texture plus its default view.
pub struct RenderTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl RenderTexture {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        (width, height): (u32, u32),
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Color target that later passes sample from.
    pub fn color(device: &wgpu::Device, label: &str, size: (u32, u32), format: wgpu::TextureFormat) -> Self {
        Self::new(
            device,
            label,
            size,
            format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Divides a render size, keeping each axis at least one pixel.
pub(crate) fn scaled_size((w, h): (u32, u32), divisor: u32) -> (u32, u32) {
    let d = divisor.max(1);
    ((w / d).max(1), (h / d).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_size_never_reaches_zero() {
        assert_eq!(scaled_size((1920, 1080), 4), (480, 270));
        assert_eq!(scaled_size((3, 2), 4), (1, 1));
        assert_eq!(scaled_size((10, 10), 0), (10, 10));
    }
}
