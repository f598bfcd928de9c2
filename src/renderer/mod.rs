//! Canvas 2D rendering
//!
//! Paints `TileSprite`s produced by the background simulation.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

/// Bricks are inset by this much inside their slot
pub const BRICK_INSET: f32 = 6.0;
/// Corner radius of a brick
pub const BRICK_RADIUS: f32 = 6.0;
/// Backdrop painted under the wall each frame
pub const BACKDROP: &str = "rgba(4,6,10,0.46)";

/// Inset rectangle actually filled for a brick slot at `pos` of `size`
pub fn brick_rect(pos: Vec2, size: Vec2) -> (Vec2, Vec2) {
    let inner = (size - Vec2::splat(BRICK_INSET * 2.0)).max(Vec2::ZERO);
    (pos + Vec2::splat(BRICK_INSET), inner)
}

/// Corner radius that fits inside a `size` rectangle
pub fn corner_radius(radius: f32, size: Vec2) -> f32 {
    radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_rect_inset() {
        let (pos, size) = brick_rect(Vec2::new(10.0, 20.0), Vec2::new(96.0, 44.0));
        assert_eq!(pos, Vec2::new(16.0, 26.0));
        assert_eq!(size, Vec2::new(84.0, 32.0));
        let (_, tiny) = brick_rect(Vec2::ZERO, Vec2::new(8.0, 8.0));
        assert_eq!(tiny, Vec2::ZERO);
    }

    #[test]
    fn test_corner_radius_fits() {
        assert_eq!(corner_radius(6.0, Vec2::new(84.0, 32.0)), 6.0);
        assert_eq!(corner_radius(6.0, Vec2::new(4.0, 32.0)), 2.0);
    }
}
