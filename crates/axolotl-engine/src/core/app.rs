use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called for every raw window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once after the surface is created and again on every resize or
    /// scale-factor change. Never called with a zero-sized surface.
    fn on_resize(&mut self, gpu: &Gpu<'_>, size: PhysicalSize<u32>, scale_factor: f64) {
        let _ = (gpu, size, scale_factor);
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
