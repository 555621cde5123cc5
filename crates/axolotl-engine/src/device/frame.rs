/// A single acquired surface frame.
///
/// Short-lived: the surface texture must be released (via `Gpu::submit`) before
/// the next one can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
