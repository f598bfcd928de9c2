//! Frame rate cap for the background loop

use crate::consts::MAX_FRAME_DT;

/// Accepts at most `cap` frames per second from a faster callback source
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_ms: f64,
    last_ms: Option<f64>,
}

impl FrameLimiter {
    pub fn new(cap: u32) -> Self {
        Self {
            frame_ms: 1000.0 / cap.max(1) as f64,
            last_ms: None,
        }
    }

    /// Returns the step (seconds, clamped) if a frame should be drawn at `now_ms`
    pub fn accept(&mut self, now_ms: f64) -> Option<f32> {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return Some(0.0);
        };
        let elapsed = now_ms - last;
        if elapsed < self.frame_ms {
            return None;
        }
        self.last_ms = Some(now_ms);
        Some(((elapsed / 1000.0) as f32).min(MAX_FRAME_DT))
    }

    /// Forget the last frame (after the loop was paused)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_draws() {
        let mut limiter = FrameLimiter::new(40);
        assert_eq!(limiter.accept(1_000.0), Some(0.0));
    }

    #[test]
    fn test_skips_fast_frames() {
        let mut limiter = FrameLimiter::new(40);
        limiter.accept(0.0);
        assert_eq!(limiter.accept(16.7), None);
        let dt = limiter.accept(33.4).unwrap();
        assert!((dt - 0.0334).abs() < 1e-4);
        assert_eq!(limiter.accept(50.0), None);
    }

    #[test]
    fn test_clamps_long_gaps() {
        let mut limiter = FrameLimiter::new(40);
        limiter.accept(0.0);
        assert_eq!(limiter.accept(5_000.0), Some(MAX_FRAME_DT));
        limiter.reset();
        assert_eq!(limiter.accept(9_000.0), Some(0.0));
    }
}
