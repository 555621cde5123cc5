//! Scene reset driven by the glitch timer.

use glam::Vec3;
use rand::Rng;

use axolotl_engine::effects::GlitchTransition;
use axolotl_engine::scene::PerspectiveCamera;

use crate::composer::SceneComposer;
use crate::config::GlitchConfig;

/// Where the camera went on a reset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraReset {
    Random(Vec3),
    /// Index into the configured viewpoints.
    Viewpoint(usize),
}

/// Reacts to glitch transitions: nothing on enter, a drift reset and camera
/// teleport on leave.
#[derive(Debug, Clone)]
pub struct GlitchCycle {
    config: GlitchConfig,
}

impl GlitchCycle {
    pub fn new(config: GlitchConfig) -> Self {
        Self { config }
    }

    pub fn handle<R: Rng>(
        &self,
        transition: GlitchTransition,
        composer: &mut SceneComposer,
        camera: &mut PerspectiveCamera,
        rng: &mut R,
    ) -> Option<CameraReset> {
        match transition {
            GlitchTransition::Entered => {
                log::debug!("glitch entered");
                None
            }
            GlitchTransition::Left => {
                let reset = self.on_leave(composer, camera, rng);
                log::debug!("glitch left, camera reset: {reset:?}");
                Some(reset)
            }
        }
    }

    pub fn on_leave<R: Rng>(
        &self,
        composer: &mut SceneComposer,
        camera: &mut PerspectiveCamera,
        rng: &mut R,
    ) -> CameraReset {
        composer.reset_drift();

        let reset = self.pick_reset(rng);
        camera.position = self.position_of(reset);
        camera.look_at(Vec3::ZERO);
        reset
    }

    /// Random position with the configured probability, otherwise one of the
    /// two viewpoints with equal odds.
    pub fn pick_reset<R: Rng>(&self, rng: &mut R) -> CameraReset {
        let p = self.config.random_probability.clamp(0.0, 1.0);
        let r: f64 = rng.gen_range(0.0..1.0);
        if r < p {
            let (min, max) = (self.config.random_min, self.config.random_max);
            CameraReset::Random(Vec3::new(
                uniform(rng, min.x, max.x),
                uniform(rng, min.y, max.y),
                uniform(rng, min.z, max.z),
            ))
        } else if r < p + (1.0 - p) / 2.0 {
            CameraReset::Viewpoint(0)
        } else {
            CameraReset::Viewpoint(1)
        }
    }

    pub fn position_of(&self, reset: CameraReset) -> Vec3 {
        match reset {
            CameraReset::Random(p) => p,
            CameraReset::Viewpoint(i) => self.config.viewpoints[i.min(self.config.viewpoints.len() - 1)],
        }
    }
}

fn uniform<R: Rng>(rng: &mut R, a: f32, b: f32) -> f32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn resets_stay_in_bounds_and_hit_both_viewpoints() {
        let config = GlitchConfig::default();
        let cycle = GlitchCycle::new(config.clone());
        let mut rng = StdRng::seed_from_u64(21);

        let (mut random, mut fixed) = (0, [0; 2]);
        for _ in 0..2000 {
            match cycle.pick_reset(&mut rng) {
                CameraReset::Random(p) => {
                    assert!((-4.0..=4.0).contains(&p.x) && (-4.0..=4.0).contains(&p.z), "{p}");
                    assert!((-2.0..=1.0).contains(&p.y), "{p}");
                    random += 1;
                }
                CameraReset::Viewpoint(i) => {
                    assert_eq!(cycle.position_of(CameraReset::Viewpoint(i)), config.viewpoints[i]);
                    fixed[i] += 1;
                }
            }
        }

        // 0.8 / 0.1 / 0.1 split, loosely.
        assert!((1450..=1750).contains(&random), "random {random}");
        assert!(fixed.iter().all(|&n| n > 100), "fixed {fixed:?}");
    }
}
