use crate::coords::Viewport;

/// What every renderer in a frame shares: the device, the queue, the surface
/// format and the logical viewport the app resolved on its last resize.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self { device, queue, surface_format, viewport }
    }

    /// Physical size of the HDR targets, capped by the viewport's pixel ratio.
    #[inline]
    pub fn render_size(&self) -> (u32, u32) {
        self.viewport.render_size()
    }

    /// True when the output pass must apply the sRGB curve itself.
    #[inline]
    pub fn needs_manual_srgb(&self) -> bool {
        !self.surface_format.is_srgb()
    }
}

/// The swapchain image for this frame and the encoder that writes it.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
