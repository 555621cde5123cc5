use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Sum of all clamped deltas since the clock started, in seconds.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    pub frame_index: u64,
}

/// Free-running frame clock.
///
/// Delta time is clamped so that a stalled or minimized window does not feed a
/// huge step into the drift and animation systems.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Clamps: 100µs minimum, 250ms maximum.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the delta baseline without touching `elapsed`.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.advance_to(Instant::now())
    }

    fn advance_to(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dt_is_clamped_to_max_after_a_stall() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let ft = clock.advance_to(start + Duration::from_secs(5));
        assert_relative_eq!(ft.dt, 0.25);
    }

    #[test]
    fn dt_is_clamped_to_min_for_back_to_back_ticks() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let ft = clock.advance_to(start);
        assert_relative_eq!(ft.dt, 0.0001);
    }

    #[test]
    fn elapsed_accumulates_clamped_deltas() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        clock.advance_to(start + Duration::from_millis(16));
        clock.advance_to(start + Duration::from_secs(10));
        let ft = clock.advance_to(start + Duration::from_millis(10_020));
        assert_relative_eq!(ft.elapsed, 0.016 + 0.25 + 0.02, epsilon = 1e-5);
        assert_eq!(ft.frame_index, 2);
    }
}
