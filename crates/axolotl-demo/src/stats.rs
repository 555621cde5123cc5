//! Frame-time statistics and their on-screen panel.

use std::collections::VecDeque;

use glam::Vec2;

use axolotl_engine::coords::Rect;
use axolotl_engine::render::OverlayRect;

/// Frame time the bars are scaled against (30 fps).
const BAR_FULL_MS: f32 = 1000.0 / 30.0;
const BUDGET_MS: f32 = 1000.0 / 60.0;

const PANEL: [f32; 4] = [0.0, 0.03, 0.06, 0.75];
const BAR_OK: [f32; 4] = [0.2, 0.9, 0.5, 0.9];
const BAR_SLOW: [f32; 4] = [1.0, 0.6, 0.15, 0.9];

/// Published once per second.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSample {
    pub fps: f32,
    pub frame_ms: f32,
}

impl FrameSample {
    pub fn title(&self) -> String {
        format!("axolotl | {:.0} fps | {:.2} ms", self.fps, self.frame_ms)
    }
}

#[derive(Debug, Clone)]
pub struct FrameStats {
    history: VecDeque<f32>,
    capacity: usize,
    window: f32,
    frames: u32,
    latest: Option<FrameSample>,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(90)
    }
}

impl FrameStats {
    /// Keeps the last `capacity` frame times for the panel.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            window: 0.0,
            frames: 0,
            latest: None,
        }
    }

    pub fn latest(&self) -> Option<FrameSample> {
        self.latest
    }

    pub fn history(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    /// Adds one frame of `dt` seconds. Returns a sample when a full second
    /// has accumulated.
    pub fn record(&mut self, dt: f32) -> Option<FrameSample> {
        if !dt.is_finite() || dt <= 0.0 {
            return None;
        }

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(dt * 1000.0);

        self.window += dt;
        self.frames += 1;
        if self.window < 1.0 {
            return None;
        }

        let sample = FrameSample {
            fps: self.frames as f32 / self.window,
            frame_ms: self.window * 1000.0 / self.frames as f32,
        };
        self.window = 0.0;
        self.frames = 0;
        self.latest = Some(sample);
        Some(sample)
    }

    /// Panel background plus one bar per recorded frame, newest on the right.
    pub fn overlay_rects(&self, origin: Vec2, size: Vec2) -> Vec<OverlayRect> {
        let panel = Rect::new(origin.x, origin.y, size.x, size.y);
        let mut rects = vec![OverlayRect::new(panel, PANEL)];

        let inner = panel.inset(4.0);
        if inner.is_empty() {
            return rects;
        }

        let skip = self.capacity - self.history.len();
        for (slot, ms) in inner.columns(self.capacity).skip(skip).zip(self.history()) {
            let h = (ms / BAR_FULL_MS).clamp(0.0, 1.0) * slot.size.y;
            let bar = Rect::new(slot.origin.x, slot.max().y - h, (slot.size.x - 1.0).max(1.0), h);
            let color = if ms <= BUDGET_MS { BAR_OK } else { BAR_SLOW };
            rects.push(OverlayRect::new(bar, color));
        }
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn publishes_once_per_second() {
        let mut stats = FrameStats::default();
        let mut samples = Vec::new();
        for _ in 0..125 {
            if let Some(s) = stats.record(1.0 / 60.0) {
                samples.push(s);
            }
        }
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[0].fps, 60.0, epsilon = 0.5);
        assert_relative_eq!(samples[0].frame_ms, 16.67, epsilon = 0.1);
        assert!(samples[0].title().contains("fps"));
    }

    #[test]
    fn history_is_bounded() {
        let mut stats = FrameStats::new(4);
        for i in 1..=10 {
            stats.record(i as f32 / 1000.0);
        }
        let kept: Vec<f32> = stats.history().collect();
        assert_eq!(kept.len(), 4);
        assert_relative_eq!(kept[3], 10.0, epsilon = 1e-3);
    }

    #[test]
    fn bars_sit_inside_the_panel() {
        let mut stats = FrameStats::new(8);
        stats.record(0.010);
        stats.record(0.050);
        stats.record(f32::NAN);

        let rects = stats.overlay_rects(Vec2::new(10.0, 10.0), Vec2::new(120.0, 48.0));
        assert_eq!(rects.len(), 3);
        let panel = rects[0].rect;
        for bar in &rects[1..] {
            assert!(bar.rect.origin.x >= panel.origin.x && bar.rect.max().x <= panel.max().x + 1e-3);
            assert!(bar.rect.origin.y >= panel.origin.y && bar.rect.max().y <= panel.max().y + 1e-3);
        }
        assert_eq!(rects[2].color, BAR_SLOW);
    }
}
