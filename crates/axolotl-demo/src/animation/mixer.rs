use axolotl_engine::scene::Transform;

use super::{AnimationClip, Rig};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopMode {
    /// Holds the last frame once the clip ends.
    Once,
    Repeat,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Playback {
    clip: usize,
    time: f32,
    mode: LoopMode,
}

/// Plays one clip at a time over a rig.
#[derive(Debug, Clone)]
pub struct AnimationMixer {
    clips: Vec<AnimationClip>,
    playback: Option<Playback>,
    pub time_scale: f32,
}

impl AnimationMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            playback: None,
            time_scale: 1.0,
        }
    }

    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    /// Starts clip `index` from time zero. Returns `false` (and keeps the
    /// current playback) when the index is out of range.
    pub fn play(&mut self, index: usize, mode: LoopMode) -> bool {
        if index >= self.clips.len() {
            return false;
        }
        self.playback = Some(Playback {
            clip: index,
            time: 0.0,
            mode,
        });
        true
    }

    pub fn stop(&mut self) {
        self.playback = None;
    }

    pub fn current_clip(&self) -> Option<usize> {
        self.playback.map(|p| p.clip)
    }

    pub fn time(&self) -> f32 {
        self.playback.map_or(0.0, |p| p.time)
    }

    pub fn update(&mut self, dt: f32) {
        let Some(playback) = self.playback.as_mut() else { return };
        let Some(clip) = self.clips.get(playback.clip) else { return };

        let duration = clip.duration();
        let t = playback.time + dt.max(0.0) * self.time_scale;
        playback.time = match playback.mode {
            LoopMode::Repeat if duration > 0.0 => t.rem_euclid(duration),
            LoopMode::Repeat => 0.0,
            LoopMode::Once => t.min(duration),
        };
    }

    /// Local transforms for every rig node: rest pose overwritten by the
    /// current clip.
    pub fn pose(&self, rig: &Rig) -> Vec<Transform> {
        let mut pose = rig.rest_pose();
        if let Some(playback) = self.playback {
            if let Some(clip) = self.clips.get(playback.clip) {
                clip.sample(playback.time, &mut pose);
            }
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Channel, ChannelValues, Interpolation, RigNode};
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn bob() -> AnimationClip {
        AnimationClip::new(
            "bob",
            vec![Channel {
                node: 0,
                interpolation: Interpolation::Linear,
                times: vec![0.0, 2.0],
                values: ChannelValues::Translation(vec![Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)]),
            }],
        )
    }

    fn rig() -> Rig {
        Rig::new(
            vec![RigNode {
                name: "root".into(),
                parent: None,
                rest: Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)),
            }],
            Vec::new(),
        )
    }

    #[test]
    fn repeat_wraps_time() {
        let mut mixer = AnimationMixer::new(vec![bob()]);
        assert!(mixer.play(0, LoopMode::Repeat));
        mixer.update(2.5);
        assert_relative_eq!(mixer.time(), 0.5, epsilon = 1e-6);
        let pose = mixer.pose(&rig());
        assert_relative_eq!(pose[0].translation.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn once_holds_last_frame() {
        let mut mixer = AnimationMixer::new(vec![bob()]);
        mixer.play(0, LoopMode::Once);
        mixer.update(10.0);
        assert_relative_eq!(mixer.time(), 2.0);
    }

    #[test]
    fn out_of_range_play_is_rejected() {
        let mut mixer = AnimationMixer::new(vec![bob()]);
        assert!(!mixer.play(3, LoopMode::Repeat));
        assert_eq!(mixer.current_clip(), None);
        // Without playback the pose is the rest pose.
        assert_eq!(mixer.pose(&rig())[0].translation, Vec3::new(1.0, 0.0, 0.0));
    }
}
