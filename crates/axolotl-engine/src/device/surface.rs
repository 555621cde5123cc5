use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// The tonemap pass encodes to sRGB itself when the surface cannot, so any
/// format works; an sRGB one is preferred when asked for.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first().copied())
}

/// The scene always clears to an opaque background.
pub(crate) fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

pub(crate) fn choose_present_mode(
    modes: &[wgpu::PresentMode],
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    match requested {
        // wgpu resolves the Auto* modes itself.
        wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync => requested,
        mode if modes.contains(&mode) => mode,
        _ => wgpu::PresentMode::Fifo,
    }
}

/// Applies a new drawable size. A 0x0 size is recorded but not configured
/// (minimized windows); configuration resumes on the next non-zero size.
pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) {
    *size = new_size;
    if new_size.width == 0 || new_size.height == 0 {
        return;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            SurfaceErrorAction::Reconfigured
        }
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, PresentMode, TextureFormat};

    #[test]
    fn srgb_preference_falls_back_to_first_format() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(
            choose_surface_format(&[TextureFormat::Rgba16Float], true),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn opaque_alpha_is_preferred() {
        let modes = [CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(choose_alpha_mode(&modes), CompositeAlphaMode::Opaque);
        assert_eq!(
            choose_alpha_mode(&[CompositeAlphaMode::PostMultiplied]),
            CompositeAlphaMode::PostMultiplied
        );
        assert_eq!(choose_alpha_mode(&[]), CompositeAlphaMode::Auto);
    }

    #[test]
    fn unsupported_present_mode_falls_back_to_fifo() {
        let modes = [PresentMode::Fifo, PresentMode::Immediate];
        assert_eq!(choose_present_mode(&modes, PresentMode::Mailbox), PresentMode::Fifo);
        assert_eq!(choose_present_mode(&modes, PresentMode::Immediate), PresentMode::Immediate);
        assert_eq!(choose_present_mode(&[], PresentMode::AutoVsync), PresentMode::AutoVsync);
    }
}
