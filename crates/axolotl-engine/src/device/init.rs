/// How the drift scene asks for its adapter, device and surface.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may pick from. `WGPU_BACKEND` overrides this at startup.
    pub backends: wgpu::Backends,

    /// Tonemapped output goes to an sRGB surface when one exists.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Default limits cover the 2048px shadow map and the HDR ping-pong targets.
    pub required_limits: wgpu::Limits,

    /// Frame latency hint for the surface.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoVsync,
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}
