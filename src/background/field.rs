//! Brick wall simulation
//!
//! Owns every brick, steps them once per accepted frame and answers pointer
//! hit-tests. Drawing is left to the renderer through `sprites()`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::color::{Rgb, random_palette_color};
use super::grid::GridLayout;
use super::tile::Tile;
use crate::consts::{GRAVITY, POP_RADIUS};

/// Vertical spring damping per frame
const SPRING_DAMPING: f32 = 0.92;
/// Upward pull from pointer proximity
const SPRING_PULL: f32 = 20.0;
const MAX_LIFT: f32 = 14.0;
const VIBRATION_FREQ: f32 = 6.0;
/// Proximity falls to zero at this fraction of the longer viewport side
const PROXIMITY_RADIUS: f32 = 0.6;
/// Hover recolor radius: max(MIN, FACTOR * shorter side)
const HOVER_RADIUS_MIN: f32 = 48.0;
const HOVER_RADIUS_FACTOR: f32 = 0.06;
/// Knocked-out bricks start at MIN + U[0, SPREAD) px/s
const FALL_SPEED_MIN: f32 = 220.0;
const FALL_SPEED_SPREAD: f32 = 240.0;
/// Bricks darken toward the edge of the gradient by this much
const SHADE: u8 = 16;

/// Light strip drawn on bricks near the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub alpha: f32,
    pub height: f32,
}

/// Everything the renderer needs to draw one brick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSprite {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Rotation about the brick center (radians)
    pub rotation: f32,
    pub alpha: f32,
    pub color: Rgb,
    /// Darker gradient start color
    pub shade: Rgb,
    pub highlight: Option<Highlight>,
}

/// The animated brick wall
#[derive(Debug, Clone)]
pub struct TileField {
    viewport: Vec2,
    max_tiles: usize,
    layout: GridLayout,
    tiles: Vec<Tile>,
    rng: Pcg32,
    /// Seconds, from the last step
    time: f32,
    reduced_motion: bool,
}

impl TileField {
    /// Build a wall for `viewport`
    pub fn new(viewport: Vec2, max_tiles: usize, seed: u64) -> Self {
        let mut field = Self {
            viewport,
            max_tiles,
            layout: GridLayout::compute(viewport, max_tiles),
            tiles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            reduced_motion: false,
        };
        field.build();
        field
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Bricks not yet removed
    pub fn live_count(&self) -> usize {
        self.tiles.iter().filter(|t| !t.is_removed()).count()
    }

    /// Re-layout for a new viewport (rebuilds the wall)
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.layout = GridLayout::compute(viewport, self.max_tiles);
        self.build();
        log::debug!(
            "Brick wall resized: {}x{} bricks of {}x{}",
            self.layout.cols,
            self.layout.rows,
            self.layout.tile_size.x,
            self.layout.tile_size.y
        );
    }

    /// Change the tile cap and rebuild
    pub fn set_max_tiles(&mut self, max_tiles: usize) {
        self.max_tiles = max_tiles;
        self.resize(self.viewport);
    }

    fn build(&mut self) {
        let layout = self.layout;
        self.tiles.clear();
        self.tiles.reserve(layout.tile_count());
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let color = random_palette_color(&mut self.rng);
                let phase = self.rng.random::<f32>() * std::f32::consts::TAU;
                let mix = self.rng.random::<f32>();
                self.tiles.push(Tile::new(
                    row,
                    col,
                    layout.origin(row, col),
                    layout.tile_size,
                    color,
                    phase,
                    mix,
                ));
            }
        }
    }

    /// Advance every brick by `dt` seconds at absolute time `time`
    pub fn step(&mut self, dt: f32, time: f32, pointer: Vec2) {
        self.time = time;
        let height = self.viewport.y;
        let max_distance = self.viewport.x.max(self.viewport.y) * PROXIMITY_RADIUS;

        for tile in self.tiles.iter_mut().filter(|t| !t.is_removed()) {
            tile.advance_fall(dt, GRAVITY, height);
            if tile.is_removed() {
                continue;
            }

            let distance = tile.center().distance(pointer);
            let t = if max_distance > 0.0 {
                (1.0 - distance / max_distance).max(0.0).powf(0.95)
            } else {
                0.0
            };
            tile.proximity = t;
            tile.spring *= SPRING_DAMPING;
            tile.spring -= SPRING_PULL * dt * t;
            tile.decay_pop();

            let falling = tile.is_falling();
            if self.reduced_motion {
                tile.offset = Vec2::new(0.0, tile.fall_distance());
                continue;
            }

            let lift = if falling {
                0.0
            } else {
                (10.0 * t + tile.pop() * 20.0).min(MAX_LIFT)
            };
            let vibration = if falling {
                Vec2::ZERO
            } else {
                let amp_x = 6.0 * (0.6 + 0.6 * tile.mix) * t * 0.45;
                let amp_y = 6.0 * 0.45 * (0.5 + 0.5 * tile.mix) * t;
                Vec2::new(
                    (time * VIBRATION_FREQ + tile.phase).sin() * amp_x,
                    (time * VIBRATION_FREQ * 1.1 + tile.phase).cos() * amp_y,
                )
            };
            tile.offset = Vec2::new(
                vibration.x,
                vibration.y - lift + tile.spring * dt * 50.0 + tile.fall_distance(),
            );
        }
    }

    /// Nearest brick (by slot center) that hasn't been removed
    pub fn nearest(&self, point: Vec2) -> Option<(usize, f32)> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_removed())
            .map(|(i, t)| (i, t.center().distance(point)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Click: knock out the 2x2 block at the nearest brick and ripple the rest.
    /// Returns how many bricks started falling.
    pub fn pop_at(&mut self, point: Vec2) -> usize {
        let Some((nearest, _)) = self.nearest(point) else {
            return 0;
        };
        let (row, col) = (self.tiles[nearest].row, self.tiles[nearest].col);

        let mut knocked = 0;
        for r in row..row + 2 {
            for c in col..col + 2 {
                let Some(index) = self.layout.index(r, c) else {
                    continue;
                };
                let speed = FALL_SPEED_MIN + self.rng.random::<f32>() * FALL_SPEED_SPREAD;
                if self.tiles[index].start_fall(speed) {
                    knocked += 1;
                }
            }
        }

        for tile in self.tiles.iter_mut().filter(|t| t.in_wall()) {
            let distance = tile.center().distance(point);
            if distance < POP_RADIUS {
                let norm = 1.0 - distance / POP_RADIUS;
                let kick = 6.0 * norm + self.rng.random::<f32>() * 3.0;
                tile.kick(0.35 * norm + 0.02, kick);
            }
        }

        log::debug!("Popped {} bricks at ({:.0}, {:.0})", knocked, point.x, point.y);
        knocked
    }

    /// Pointer movement: recolor the nearest brick if it is close enough
    pub fn hover_at(&mut self, point: Vec2) -> bool {
        let radius = HOVER_RADIUS_MIN.max(self.viewport.x.min(self.viewport.y) * HOVER_RADIUS_FACTOR);
        match self.nearest(point) {
            Some((index, distance)) if distance < radius => {
                let color = random_palette_color(&mut self.rng);
                let mix = self.rng.random::<f32>();
                let tile = &mut self.tiles[index];
                tile.color = color;
                tile.mix = mix;
                true
            }
            _ => false,
        }
    }

    /// Drawable bricks, in wall order; removed bricks are skipped
    pub fn sprites(&self) -> impl Iterator<Item = TileSprite> + '_ {
        let height = self.viewport.y;
        let time = self.time;
        self.tiles.iter().filter(|t| !t.is_removed()).map(move |tile| {
            let t = tile.proximity;
            let color = tile.color.shimmer(time, tile.phase);
            let alpha = tile.opacity(height) * (0.98 - (1.0 - t) * 0.08);
            let highlight = (t > 0.06 && !tile.is_falling()).then(|| Highlight {
                alpha: 0.02 * t + 0.02 * tile.pop(),
                height: (3.0 * t).clamp(2.0, 5.0),
            });
            TileSprite {
                pos: tile.base + tile.offset,
                size: tile.size,
                rotation: tile.rotation(height),
                alpha,
                color,
                shade: color.darken(SHADE),
                highlight,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::TileState;

    fn field() -> TileField {
        TileField::new(Vec2::new(1280.0, 720.0), 700, 42)
    }

    #[test]
    fn test_builds_row_major_grid() {
        let f = field();
        assert_eq!(f.tiles().len(), f.layout().tile_count());
        let t = &f.tiles()[f.layout().index(2, 3).unwrap()];
        assert_eq!((t.row, t.col), (2, 3));
        assert_eq!(f.live_count(), f.tiles().len());
    }

    #[test]
    fn test_seeded_wall_is_deterministic() {
        assert_eq!(field().tiles(), field().tiles());
    }

    #[test]
    fn test_pop_knocks_out_two_by_two() {
        let mut f = field();
        let target = f.tiles()[f.layout().index(4, 4).unwrap()].center();
        assert_eq!(f.pop_at(target), 4);

        for (r, c) in [(4, 4), (4, 5), (5, 4), (5, 5)] {
            assert!(f.tiles()[f.layout().index(r, c).unwrap()].is_falling());
        }
        let neighbour = &f.tiles()[f.layout().index(3, 4).unwrap()];
        assert!(matches!(neighbour.state, TileState::Perturbed { .. }));
        assert!(neighbour.spring > 0.0);
    }

    #[test]
    fn test_pop_at_grid_edge() {
        let mut f = field();
        let (rows, cols) = (f.layout().rows, f.layout().cols);
        let corner = f.tiles()[f.layout().index(rows - 1, cols - 1).unwrap()].center();
        assert_eq!(f.pop_at(corner), 1);
    }

    #[test]
    fn test_fallen_bricks_are_removed_and_skipped() {
        let mut f = TileField::new(Vec2::new(1280.0, 100.0), 700, 1);
        let total = f.tiles().len();
        let target = f.tiles()[0].center();
        let knocked = f.pop_at(target);
        assert_eq!(knocked, 4);

        for frame in 0..200 {
            f.step(0.025, frame as f32 * 0.025, Vec2::ZERO);
        }
        assert_eq!(f.live_count(), total - knocked);
        assert_eq!(f.sprites().count(), total - knocked);

        // removed bricks are never targeted again
        let removed: Vec<usize> = (0..total).filter(|&i| f.tiles()[i].is_removed()).collect();
        for &i in &removed {
            let center = f.tiles()[i].center();
            if let Some((nearest, _)) = f.nearest(center) {
                assert!(!removed.contains(&nearest));
            }
            f.pop_at(center);
            f.step(0.025, 10.0, Vec2::ZERO);
            assert!(f.tiles()[i].is_removed());
        }
    }

    #[test]
    fn test_pop_with_everything_removed_is_noop() {
        let mut f = TileField::new(Vec2::new(100.0, 50.0), 700, 3);
        for _ in 0..10 {
            let Some((i, _)) = f.nearest(Vec2::ZERO) else { break };
            let center = f.tiles()[i].center();
            f.pop_at(center);
            for frame in 0..100 {
                f.step(0.025, frame as f32 * 0.025, Vec2::ZERO);
            }
        }
        assert_eq!(f.live_count(), 0);
        assert_eq!(f.pop_at(Vec2::new(10.0, 10.0)), 0);
        assert!(!f.hover_at(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_hover_recolors_only_nearby() {
        let mut f = field();
        let center = f.tiles()[0].center();
        assert!(f.hover_at(center));
        assert!(!f.hover_at(Vec2::new(-500.0, -500.0)));
    }

    #[test]
    fn test_pointer_lifts_nearby_bricks() {
        let mut f = field();
        let index = f.layout().index(5, 5).unwrap();
        let pointer = f.tiles()[index].center();
        f.step(0.025, 1.0, pointer);
        let near = &f.tiles()[index];
        assert!(near.proximity > 0.9);
        assert!(near.offset.y < 0.0);
        let sprite = f.sprites().nth(index).unwrap();
        assert!(sprite.highlight.is_some());
    }

    #[test]
    fn test_reduced_motion_keeps_wall_still() {
        let mut f = field();
        f.set_reduced_motion(true);
        let pointer = f.tiles()[10].center();
        f.step(0.025, 1.0, pointer);
        assert!(f.tiles().iter().all(|t| t.offset == Vec2::ZERO));
    }

    #[test]
    fn test_resize_respects_cap() {
        let mut f = field();
        f.resize(Vec2::new(5120.0, 2880.0));
        assert!(f.tiles().len() <= 700);
        f.set_max_tiles(300);
        assert!(f.tiles().len() <= 300);
        assert_eq!(f.viewport(), Vec2::new(5120.0, 2880.0));
    }
}
