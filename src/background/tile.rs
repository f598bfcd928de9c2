//! A single brick and its lifecycle

use glam::Vec2;

use super::color::Rgb;
use crate::consts::FALL_LIMIT;

/// Pop impulse lost per frame
pub const POP_DECAY: f32 = 0.02;

/// Brick lifecycle: Resting -> Perturbed -> Falling -> Removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TileState {
    /// In the wall, oscillating with pointer proximity
    Resting,
    /// Hit by a nearby click; `pop` decays back to Resting
    Perturbed { pop: f32 },
    /// Knocked out of the wall
    Falling { velocity: f32, distance: f32 },
    /// Fell off screen; never drawn or hit again
    Removed,
}

/// A brick in the background wall
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    /// Top-left corner in the wall
    pub base: Vec2,
    pub size: Vec2,
    pub color: Rgb,
    /// Oscillation phase (radians)
    pub phase: f32,
    /// Per-brick amplitude variation (0-1)
    pub mix: f32,
    /// Vertical spring velocity from clicks and pointer proximity
    pub spring: f32,
    /// Pointer proximity factor from the last step (0-1)
    pub proximity: f32,
    /// Draw offset from `base` computed by the last step
    pub offset: Vec2,
    pub state: TileState,
}

impl Tile {
    pub fn new(row: usize, col: usize, base: Vec2, size: Vec2, color: Rgb, phase: f32, mix: f32) -> Self {
        Self {
            row,
            col,
            base,
            size,
            color,
            phase,
            mix,
            spring: 0.0,
            proximity: 0.0,
            offset: Vec2::ZERO,
            state: TileState::Resting,
        }
    }

    /// Center of the brick's wall slot (used for hit-testing)
    pub fn center(&self) -> Vec2 {
        self.base + self.size / 2.0
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.state, TileState::Removed)
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.state, TileState::Falling { .. })
    }

    /// Still part of the wall (can be popped or knocked out)
    pub fn in_wall(&self) -> bool {
        matches!(self.state, TileState::Resting | TileState::Perturbed { .. })
    }

    pub fn pop(&self) -> f32 {
        match self.state {
            TileState::Perturbed { pop } => pop,
            _ => 0.0,
        }
    }

    pub fn fall_distance(&self) -> f32 {
        match self.state {
            TileState::Falling { distance, .. } => distance,
            _ => 0.0,
        }
    }

    /// Fades linearly as the brick falls
    pub fn opacity(&self, viewport_height: f32) -> f32 {
        match self.state {
            TileState::Removed => 0.0,
            TileState::Falling { distance, .. } => {
                (1.0 - distance / (viewport_height * FALL_LIMIT)).max(0.0)
            }
            _ => 1.0,
        }
    }

    /// Spin applied while falling (radians)
    pub fn rotation(&self, viewport_height: f32) -> f32 {
        match self.state {
            TileState::Falling { distance, .. } => {
                self.phase.fract() * (distance / (viewport_height / 3.0)) * 0.4
            }
            _ => 0.0,
        }
    }

    /// Ripple from a nearby click; bricks out of the wall ignore it
    pub fn kick(&mut self, pop: f32, spring: f32) {
        if !self.in_wall() {
            return;
        }
        self.state = TileState::Perturbed {
            pop: self.pop().max(pop),
        };
        self.spring += spring;
    }

    /// Knock the brick out of the wall; false if it already left
    pub fn start_fall(&mut self, velocity: f32) -> bool {
        if !self.in_wall() {
            return false;
        }
        self.state = TileState::Falling {
            velocity,
            distance: 0.0,
        };
        true
    }

    /// One frame of pop decay
    pub fn decay_pop(&mut self) {
        if let TileState::Perturbed { pop } = self.state {
            let pop = pop - POP_DECAY;
            self.state = if pop > 0.0 {
                TileState::Perturbed { pop }
            } else {
                TileState::Resting
            };
        }
    }

    /// Gravity step; removes the brick once it has fallen past the limit
    pub fn advance_fall(&mut self, dt: f32, gravity: f32, viewport_height: f32) {
        if let TileState::Falling { velocity, distance } = self.state {
            let velocity = velocity + gravity * dt;
            let distance = distance + velocity * dt;
            self.state = if distance > viewport_height * FALL_LIMIT {
                TileState::Removed
            } else {
                TileState::Falling { velocity, distance }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> Tile {
        Tile::new(0, 0, Vec2::new(10.0, 20.0), Vec2::new(96.0, 44.0), Rgb::default(), 1.25, 0.5)
    }

    #[test]
    fn test_center() {
        assert_eq!(tile().center(), Vec2::new(58.0, 42.0));
    }

    #[test]
    fn test_kick_and_decay() {
        let mut t = tile();
        t.kick(0.05, 3.0);
        assert_eq!(t.state, TileState::Perturbed { pop: 0.05 });
        assert_eq!(t.spring, 3.0);
        t.kick(0.01, 1.0);
        assert_eq!(t.pop(), 0.05);
        t.decay_pop();
        t.decay_pop();
        t.decay_pop();
        assert_eq!(t.state, TileState::Resting);
    }

    #[test]
    fn test_fall_to_removed() {
        let mut t = tile();
        assert!(t.start_fall(300.0));
        assert!(!t.start_fall(300.0));
        t.kick(1.0, 5.0);
        assert!(t.is_falling());

        let height = 100.0;
        let mut frames = 0;
        while !t.is_removed() {
            t.advance_fall(0.025, 900.0, height);
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(t.opacity(height), 0.0);
        // terminal
        t.advance_fall(0.025, 900.0, height);
        t.kick(1.0, 1.0);
        assert!(!t.start_fall(100.0));
        assert!(t.is_removed());
    }

    #[test]
    fn test_opacity_fades_with_distance() {
        let mut t = tile();
        t.state = TileState::Falling {
            velocity: 0.0,
            distance: 60.0,
        };
        assert!((t.opacity(100.0) - 0.5).abs() < 1e-6);
        assert!((t.rotation(300.0) - 0.25 * 0.6 * 0.4).abs() < 1e-6);
    }
}
