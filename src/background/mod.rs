//! Animated brick-wall background
//!
//! Simulation only; it must stay free of browser dependencies:
//! - Step size comes from `FrameLimiter`
//! - Seeded RNG only
//! - Row-major tile order (index = row * cols + col)

pub mod color;
pub mod field;
pub mod frame;
pub mod grid;
pub mod tile;

pub use color::{PALETTE, Rgb};
pub use field::{Highlight, TileField, TileSprite};
pub use frame::FrameLimiter;
pub use grid::GridLayout;
pub use tile::{Tile, TileState};
