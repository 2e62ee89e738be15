//! Logical animation clock
//!
//! The engine never reads wall-clock time. Preview feeds elapsed seconds,
//! export computes the time of each frame directly, and both land on the same
//! clock value for the same logical moment.

use serde::{Deserialize, Serialize};

use crate::consts::CLOCK_UNITS_PER_SECOND;

/// Seconds to clock units
#[inline]
pub fn seconds_to_clock(seconds: f32) -> f32 {
    seconds * CLOCK_UNITS_PER_SECOND
}

/// Clock value of export frame `frame` at `fps`
///
/// Computed from the frame index rather than accumulated, so long exports do
/// not drift.
pub fn frame_time(frame: u32, fps: f32) -> f32 {
    if fps > 0.0 && fps.is_finite() {
        frame as f32 * CLOCK_UNITS_PER_SECOND / fps
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationClock {
    time: f32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(time: f32) -> Self {
        Self { time }
    }

    /// Current clock value
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by wall-clock seconds (preview); bad deltas are ignored
    pub fn advance_seconds(&mut self, dt: f32) -> f32 {
        if dt > 0.0 && dt.is_finite() {
            self.time += seconds_to_clock(dt);
        }
        self.time
    }

    /// Advance by one frame at `fps`
    pub fn step_frame(&mut self, fps: f32) -> f32 {
        if fps > 0.0 && fps.is_finite() {
            self.time += CLOCK_UNITS_PER_SECOND / fps;
        }
        self.time
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_and_export_agree() {
        let mut preview = AnimationClock::new();
        for _ in 0..30 {
            preview.advance_seconds(1.0 / 30.0);
        }
        assert!((preview.time() - frame_time(30, 30.0)).abs() < 1e-3);
        assert_eq!(frame_time(30, 30.0), 60.0);
    }

    #[test]
    fn test_step_frame() {
        let mut clock = AnimationClock::at(10.0);
        clock.step_frame(60.0);
        assert!((clock.time() - 11.0).abs() < 1e-6);
        clock.step_frame(0.0);
        assert!((clock.time() - 11.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut clock = AnimationClock::new();
        clock.advance_seconds(-1.0);
        clock.advance_seconds(f32::NAN);
        assert_eq!(clock.time(), 0.0);
        clock.advance_seconds(0.5);
        assert_eq!(clock.time(), 30.0);
        clock.reset();
        assert_eq!(clock.time(), 0.0);
    }

    #[test]
    fn test_seconds_to_clock() {
        assert_eq!(seconds_to_clock(0.5), 30.0);
        assert_eq!(frame_time(5, 0.0), 0.0);
    }
}
