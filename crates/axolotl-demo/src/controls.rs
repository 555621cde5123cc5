//! Orbit camera controls.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use axolotl_engine::input::{InputFrame, InputState, MouseButton};
use axolotl_engine::scene::PerspectiveCamera;

/// One frame's worth of orbit input.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct OrbitDelta {
    /// Azimuth change, radians.
    pub theta: f32,
    /// Polar change, radians.
    pub phi: f32,
    /// Pan in logical pixels (x right, y down).
    pub pan: Vec2,
    /// Wheel lines; positive moves closer.
    pub dolly: f32,
}

/// Orbits the camera around `target`.
///
/// Left drag rotates, right drag (or shift + left drag) pans, the wheel
/// dollies. The camera position is read back every update, so external
/// moves are picked up.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    /// Radians per logical pixel of drag.
    pub rotate_speed: f32,
    /// Pan distance per pixel, as a fraction of the orbit radius.
    pub pan_speed: f32,
    /// Fractional radius change per wheel line.
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    /// Fraction of the remaining rotation applied per update; `None` applies
    /// input immediately.
    pub damping: Option<f32>,
    pending: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_step: 0.05,
            min_distance: 0.5,
            max_distance: 30.0,
            min_polar: 0.01,
            max_polar: PI - 0.01,
            damping: Some(0.1),
            pending: Vec2::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Re-centers on the camera's target and drops any residual motion.
    pub fn sync(&mut self, camera: &PerspectiveCamera) {
        self.target = camera.target;
        self.pending = Vec2::ZERO;
    }

    /// Reads this frame's drag and wheel input.
    pub fn delta_from_input(&self, input: &InputState, frame: &InputFrame) -> OrbitDelta {
        let (dx, dy) = frame.pointer_delta;
        let drag = Vec2::new(dx, dy);
        let left = input.buttons_down.contains(&MouseButton::Left);
        let right = input.buttons_down.contains(&MouseButton::Right);
        let panning = right || (left && input.modifiers.shift);

        let mut delta = OrbitDelta {
            dolly: frame.wheel_lines(),
            ..OrbitDelta::default()
        };
        if panning {
            delta.pan = drag;
        } else if left {
            delta.theta = -drag.x * self.rotate_speed;
            delta.phi = -drag.y * self.rotate_speed;
        }
        delta
    }

    pub fn update(&mut self, camera: &mut PerspectiveCamera, input: &InputState, frame: &InputFrame) {
        let delta = self.delta_from_input(input, frame);
        self.apply(camera, delta);
    }

    pub fn apply(&mut self, camera: &mut PerspectiveCamera, delta: OrbitDelta) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if !radius.is_finite() || radius < 1e-6 {
            return;
        }

        let rotation = match self.damping {
            Some(factor) => {
                let factor = factor.clamp(0.0, 1.0);
                self.pending += Vec2::new(delta.theta, delta.phi);
                let step = self.pending * factor;
                self.pending -= step;
                step
            }
            None => Vec2::new(delta.theta, delta.phi),
        };

        let theta = offset.x.atan2(offset.z) + rotation.x;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + rotation.y).clamp(self.min_polar, self.max_polar);
        let scale = (1.0 - self.zoom_step).powf(delta.dolly);
        let radius = (radius * scale).clamp(self.min_distance, self.max_distance);

        if delta.pan != Vec2::ZERO {
            let (right, up) = camera.basis();
            let shift = (right * -delta.pan.x + up * delta.pan.y) * radius * self.pan_speed;
            self.target += shift;
        }

        camera.position = self.target
            + radius * Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
        camera.look_at(self.target);
    }
}
