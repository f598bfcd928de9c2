//! Brick grid layout for a viewport

use glam::Vec2;

use crate::consts::{NARROW_VIEWPORT, TILE_HEIGHT, TILE_HEIGHT_NARROW, TILE_WIDTH, TILE_WIDTH_NARROW};

/// Grid dimensions and brick size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    pub tile_size: Vec2,
}

impl GridLayout {
    /// Fit bricks to `viewport`, growing them until at most `max_tiles` fit
    pub fn compute(viewport: Vec2, max_tiles: usize) -> Self {
        let max_tiles = max_tiles.max(1);
        let width = finite_or_one(viewport.x);
        let height = finite_or_one(viewport.y);

        let mut tile_size = if width < NARROW_VIEWPORT {
            Vec2::new(TILE_WIDTH_NARROW, TILE_HEIGHT_NARROW)
        } else {
            Vec2::new(TILE_WIDTH, TILE_HEIGHT)
        };
        let (mut cols, mut rows) = fit(width, height, tile_size);

        while cols * rows > max_tiles {
            let scale = ((cols * rows) as f32 / max_tiles as f32).sqrt();
            tile_size = Vec2::new(
                (tile_size.x * scale).ceil().max(tile_size.x + 1.0),
                (tile_size.y * scale).ceil().max(tile_size.y + 1.0),
            );
            (cols, rows) = fit(width, height, tile_size);
        }

        Self {
            cols,
            rows,
            tile_size,
        }
    }

    pub fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Top-left corner of a brick; odd rows are offset by half a brick
    pub fn origin(&self, row: usize, col: usize) -> Vec2 {
        let offset = if row % 2 == 1 { self.tile_size.x / 2.0 } else { 0.0 };
        Vec2::new(
            col as f32 * self.tile_size.x + offset,
            row as f32 * self.tile_size.y,
        )
    }

    /// Index into a row-major tile list
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }
}

fn finite_or_one(v: f32) -> f32 {
    if v.is_finite() { v.max(1.0) } else { 1.0 }
}

fn fit(width: f32, height: f32, tile: Vec2) -> (usize, usize) {
    let cols = (width / tile.x).ceil().max(1.0) as usize;
    let rows = (height / tile.y).ceil().max(1.0) as usize;
    (cols, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_layout() {
        let grid = GridLayout::compute(Vec2::new(1280.0, 720.0), 700);
        assert_eq!(grid.tile_size, Vec2::new(96.0, 44.0));
        assert_eq!(grid.cols, 14);
        assert_eq!(grid.rows, 17);
    }

    #[test]
    fn test_narrow_layout() {
        let grid = GridLayout::compute(Vec2::new(390.0, 844.0), 700);
        assert_eq!(grid.tile_size, Vec2::new(120.0, 56.0));
        assert_eq!((grid.cols, grid.rows), (4, 16));
    }

    #[test]
    fn test_large_viewport_is_capped() {
        let grid = GridLayout::compute(Vec2::new(7680.0, 4320.0), 700);
        assert!(grid.tile_count() <= 700);
        assert!(grid.tile_size.x > 96.0 && grid.tile_size.y > 44.0);
    }

    #[test]
    fn test_degenerate_viewport() {
        let grid = GridLayout::compute(Vec2::new(0.0, f32::NAN), 0);
        assert_eq!(grid.tile_count(), 1);
    }

    #[test]
    fn test_odd_rows_offset() {
        let grid = GridLayout::compute(Vec2::new(1280.0, 720.0), 700);
        assert_eq!(grid.origin(0, 1), Vec2::new(96.0, 0.0));
        assert_eq!(grid.origin(1, 1), Vec2::new(144.0, 44.0));
        assert_eq!(grid.index(1, 2), Some(16));
        assert_eq!(grid.index(17, 0), None);
    }
}
