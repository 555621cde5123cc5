/// What the runtime should do after the surface refused a frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated surface, now reconfigured. The drift scene keeps its
    /// state; the next redraw renders normally.
    Reconfigured,
    /// Timeout or other transient failure. Drop this frame only.
    SkipFrame,
    /// Out of memory. The event loop should stop.
    Fatal,
}

impl SurfaceErrorAction {
    #[inline]
    pub fn is_fatal(self) -> bool {
        self == SurfaceErrorAction::Fatal
    }
}
