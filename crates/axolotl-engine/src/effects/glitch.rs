use rand::Rng;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlitchState {
    Idle,
    Active,
}

/// Emitted when the timer changes state.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GlitchTransition {
    Entered,
    Left,
}

/// Alternates between idle and active with random durations.
///
/// Idle lasts a uniform random time in `delay`; active lasts a uniform random
/// time in `duration`. The first idle interval is drawn on the first update.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchTimer {
    state: GlitchState,
    remaining: Option<f32>,
    delay: (f32, f32),
    duration: (f32, f32),
    /// Per-activation random value the distortion shader keys its bands on.
    seed: f32,
}

impl GlitchTimer {
    pub fn new(delay: (f32, f32), duration: (f32, f32)) -> Self {
        Self {
            state: GlitchState::Idle,
            remaining: None,
            delay: ordered(delay),
            duration: ordered(duration),
            seed: 0.0,
        }
    }

    pub fn state(&self) -> GlitchState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == GlitchState::Active
    }

    pub fn seed(&self) -> f32 {
        self.seed
    }

    /// Time left in the current state, if it has been drawn yet.
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Advances by `dt` seconds; at most one transition per call.
    pub fn update<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Option<GlitchTransition> {
        let remaining = match self.remaining {
            Some(r) => r - dt.max(0.0),
            None => sample(rng, self.delay) - dt.max(0.0),
        };

        if remaining > 0.0 {
            self.remaining = Some(remaining);
            return None;
        }

        match self.state {
            GlitchState::Idle => {
                self.state = GlitchState::Active;
                self.remaining = Some(sample(rng, self.duration));
                self.seed = rng.gen_range(0.0..1.0);
                Some(GlitchTransition::Entered)
            }
            GlitchState::Active => {
                self.state = GlitchState::Idle;
                self.remaining = Some(sample(rng, self.delay));
                Some(GlitchTransition::Left)
            }
        }
    }
}

fn ordered((a, b): (f32, f32)) -> (f32, f32) {
    if a <= b { (a, b) } else { (b, a) }
}

fn sample<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// Row-shift distortion driven by a `GlitchTimer`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchEffect {
    /// Maximum horizontal band shift as a fraction of the screen width.
    /// Zero keeps the timer running without visible distortion.
    pub strength: f32,
    pub timer: GlitchTimer,
}

impl GlitchEffect {
    pub fn new(strength: f32, delay: (f32, f32), duration: (f32, f32)) -> Self {
        Self {
            strength,
            timer: GlitchTimer::new(delay, duration),
        }
    }

    /// Distortion amount the composer should apply this frame.
    pub fn active_strength(&self) -> f32 {
        if self.timer.is_active() { self.strength } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 0.01;

    #[test]
    fn transitions_alternate_and_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut timer = GlitchTimer::new((1.5, 3.5), (0.6, 1.0));

        let mut last_change = 0.0f32;
        let mut expected = GlitchTransition::Entered;
        let mut seen = 0;

        for step in 1..=6000 {
            let t = step as f32 * DT;
            if let Some(tr) = timer.update(DT, &mut rng) {
                assert_eq!(tr, expected);
                let held = t - last_change;
                match tr {
                    GlitchTransition::Entered => {
                        assert!((1.5 - DT..=3.5 + DT).contains(&held), "idle held {held}");
                        expected = GlitchTransition::Left;
                    }
                    GlitchTransition::Left => {
                        assert!((0.6 - DT..=1.0 + DT).contains(&held), "active held {held}");
                        expected = GlitchTransition::Entered;
                    }
                }
                last_change = t;
                seen += 1;
            }
        }

        assert!(seen >= 20, "only {seen} transitions in 60s");
    }

    #[test]
    fn zero_strength_never_distorts() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut glitch = GlitchEffect::new(0.0, (0.1, 0.1), (1.0, 1.0));
        assert_eq!(glitch.timer.update(0.2, &mut rng), Some(GlitchTransition::Entered));
        assert!(glitch.timer.is_active());
        assert_eq!(glitch.active_strength(), 0.0);
    }

    #[test]
    fn swapped_ranges_are_normalized() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut timer = GlitchTimer::new((2.0, 1.0), (0.5, 0.5));
        timer.update(0.0, &mut rng);
        let r = timer.remaining().unwrap_or_default();
        assert!((1.0..=2.0).contains(&r));
    }
}
