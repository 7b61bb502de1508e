//! Variable-rate frame timing.

use std::time::Instant;

use tracing::warn;

/// Longest frame delta handed to movement; longer stalls (window drags,
/// breakpoints) are clamped so the camera does not leap.
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Measures the time between frames and since startup.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    delta: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            delta: 0.0,
            frame_count: 0,
        }
    }

    /// Start a new frame now. Returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let raw = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        if raw > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                raw * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
        }
        self.delta = raw.min(MAX_FRAME_TIME);
        self.frame_count += 1;
        self.delta
    }

    /// Delta of the current frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds from startup to the current frame; drives the orbits.
    pub fn elapsed(&self) -> f32 {
        self.last.saturating_duration_since(self.start).as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
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
    use std::time::Duration;

    #[test]
    fn test_delta_and_elapsed() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
        clock.tick_at(start + Duration::from_millis(48));
        assert!((clock.delta() - 0.032).abs() < 1e-6);
        assert!((clock.elapsed() - 0.048).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let dt = clock.tick_at(start + Duration::from_secs(3));
        assert_eq!(dt, MAX_FRAME_TIME);
        // Orbits still follow wall time.
        assert!((clock.elapsed() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_going_backwards_is_zero() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut clock = FrameClock::starting_at(start);
        assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0.0);
    }
}
