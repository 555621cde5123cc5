use glam::{Quat, Vec3};

use axolotl_engine::scene::Transform;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Interpolation {
    Step,
    Linear,
    /// Keys store `[in_tangent, value, out_tangent]` triples.
    CubicSpline,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

/// Keyframes for one property of one rig node.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub node: usize,
    pub interpolation: Interpolation,
    pub times: Vec<f32>,
    pub values: ChannelValues,
}

impl Channel {
    fn values_per_key(&self) -> usize {
        match self.interpolation {
            Interpolation::CubicSpline => 3,
            _ => 1,
        }
    }

    /// Whether the value array matches the key count.
    pub fn is_well_formed(&self) -> bool {
        let len = match &self.values {
            ChannelValues::Translation(v) | ChannelValues::Scale(v) => v.len(),
            ChannelValues::Rotation(v) => v.len(),
        };
        !self.times.is_empty() && len == self.times.len() * self.values_per_key()
    }

    /// Writes the channel's value at time `t` into `target`.
    pub fn apply(&self, t: f32, target: &mut Transform) {
        if !self.is_well_formed() {
            return;
        }
        let key = locate(&self.times, t);
        match &self.values {
            ChannelValues::Translation(v) => target.translation = self.sample_vec3(v, key),
            ChannelValues::Scale(v) => target.scale = self.sample_vec3(v, key),
            ChannelValues::Rotation(v) => target.rotation = self.sample_quat(v, key),
        }
    }

    fn sample_vec3(&self, values: &[Vec3], key: Key) -> Vec3 {
        match self.interpolation {
            Interpolation::Step => values[key.index],
            Interpolation::Linear => values[key.index].lerp(values[key.next], key.s),
            Interpolation::CubicSpline => {
                let [a, b] = [key.index * 3, key.next * 3];
                hermite(values[a + 1], values[a + 2], values[b + 1], values[b], key)
            }
        }
    }

    fn sample_quat(&self, values: &[Quat], key: Key) -> Quat {
        let q = match self.interpolation {
            Interpolation::Step => values[key.index],
            Interpolation::Linear => values[key.index].slerp(values[key.next], key.s),
            Interpolation::CubicSpline => {
                let [a, b] = [key.index * 3, key.next * 3];
                let v = hermite(
                    glam::Vec4::from(values[a + 1]),
                    glam::Vec4::from(values[a + 2]),
                    glam::Vec4::from(values[b + 1]),
                    glam::Vec4::from(values[b]),
                    key,
                );
                Quat::from_vec4(v)
            }
        };
        normalize_or_identity(q)
    }
}

fn normalize_or_identity(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > 1e-6 { q / len } else { Quat::IDENTITY }
}

/// Surrounding keys and the blend factor between them.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Key {
    index: usize,
    next: usize,
    s: f32,
    /// Time between the two keys.
    span: f32,
}

fn locate(times: &[f32], t: f32) -> Key {
    let last = times.len() - 1;
    if t <= times[0] {
        return Key { index: 0, next: 0, s: 0.0, span: 0.0 };
    }
    if t >= times[last] {
        return Key { index: last, next: last, s: 0.0, span: 0.0 };
    }
    // First key strictly after t; t lies in [times[next - 1], times[next]).
    let next = times.partition_point(|&k| k <= t).clamp(1, last);
    let index = next - 1;
    let span = times[next] - times[index];
    let s = if span > 0.0 { (t - times[index]) / span } else { 0.0 };
    Key { index, next, s, span }
}

fn hermite<T>(p0: T, m0: T, p1: T, m1: T, key: Key) -> T
where
    T: Copy + std::ops::Add<Output = T> + std::ops::Mul<f32, Output = T>,
{
    let s = key.s;
    let (s2, s3) = (s * s, s * s * s);
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    p0 * h00 + m0 * (h10 * key.span) + p1 * h01 + m1 * (h11 * key.span)
}

/// Named set of channels. Duration is the latest key time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    channels: Vec<Channel>,
    duration: f32,
}

impl AnimationClip {
    /// Drops channels whose value count does not match their keys.
    pub fn new(name: impl Into<String>, channels: Vec<Channel>) -> Self {
        let name = name.into();
        let total = channels.len();
        let channels: Vec<Channel> = channels.into_iter().filter(Channel::is_well_formed).collect();
        if channels.len() != total {
            log::warn!("clip {name:?}: dropped {} malformed channels", total - channels.len());
        }
        let duration = channels
            .iter()
            .filter_map(|c| c.times.last().copied())
            .fold(0.0f32, f32::max);
        Self { name, channels, duration }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Overwrites animated properties of `pose` at time `t`.
    pub fn sample(&self, t: f32, pose: &mut [Transform]) {
        for channel in &self.channels {
            if let Some(target) = pose.get_mut(channel.node) {
                channel.apply(t, target);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn translation(interpolation: Interpolation, xs: &[f32]) -> Channel {
        Channel {
            node: 0,
            interpolation,
            times: (0..xs.len()).map(|i| i as f32).collect(),
            values: ChannelValues::Translation(xs.iter().map(|&x| Vec3::new(x, 0.0, 0.0)).collect()),
        }
    }

    fn sample_x(clip: &AnimationClip, t: f32) -> f32 {
        let mut pose = [Transform::IDENTITY];
        clip.sample(t, &mut pose);
        pose[0].translation.x
    }

    #[test]
    fn linear_interpolates_and_clamps() {
        let clip = AnimationClip::new("walk", vec![translation(Interpolation::Linear, &[0.0, 2.0, 4.0])]);
        assert_relative_eq!(clip.duration(), 2.0);
        assert_relative_eq!(sample_x(&clip, 0.5), 1.0);
        assert_relative_eq!(sample_x(&clip, 1.5), 3.0);
        assert_relative_eq!(sample_x(&clip, -1.0), 0.0);
        assert_relative_eq!(sample_x(&clip, 9.0), 4.0);
    }

    #[test]
    fn step_holds_previous_key() {
        let clip = AnimationClip::new("blink", vec![translation(Interpolation::Step, &[0.0, 2.0])]);
        assert_relative_eq!(sample_x(&clip, 0.99), 0.0);
        assert_relative_eq!(sample_x(&clip, 1.0), 2.0);
    }

    #[test]
    fn cubic_spline_with_flat_tangents_hits_keys() {
        // in, value, out per key.
        let values = vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
        ];
        let clip = AnimationClip::new(
            "swim",
            vec![Channel {
                node: 0,
                interpolation: Interpolation::CubicSpline,
                times: vec![0.0, 1.0],
                values: ChannelValues::Translation(values),
            }],
        );
        assert_relative_eq!(sample_x(&clip, 0.0), 0.0);
        assert_relative_eq!(sample_x(&clip, 0.5), 1.0, epsilon = 1e-5);
        assert_relative_eq!(sample_x(&clip, 1.0), 2.0);
    }

    #[test]
    fn rotation_slerps() {
        let clip = AnimationClip::new(
            "turn",
            vec![Channel {
                node: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 1.0],
                values: ChannelValues::Rotation(vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)]),
            }],
        );
        let mut pose = [Transform::IDENTITY];
        clip.sample(0.5, &mut pose);
        let (axis, angle) = pose[0].rotation.to_axis_angle();
        assert_relative_eq!(angle, FRAC_PI_2 / 2.0, epsilon = 1e-4);
        assert_relative_eq!(axis.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn malformed_channels_are_dropped() {
        let mut bad = translation(Interpolation::Linear, &[0.0, 1.0]);
        bad.times.push(2.0);
        let clip = AnimationClip::new("bad", vec![bad]);
        assert!(clip.channels().is_empty());
        assert_eq!(clip.duration(), 0.0);
    }
}
