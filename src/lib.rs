//! Brick Survey - a gamified questionnaire over an animated brick wall
//!
//! Core modules:
//! - `survey`: Questions, scoring, achievements and the session state machine
//! - `background`: Deterministic brick-wall tile simulation
//! - `pointer`: Shared pointer position and the custom cursor follower
//! - `persistence`: Key-value storage and the progress codec
//! - `settings`: Player preferences (quality, cursor, motion)
//! - `ui`: HUD view model, toasts and screen markup
//! - `renderer`: Canvas 2D drawing (wasm only)
//! - `platform`: Browser glue - storage, listeners, timers (wasm only)

pub mod background;
pub mod persistence;
pub mod platform;
pub mod pointer;
pub mod renderer;
pub mod settings;
pub mod survey;
pub mod ui;

pub use persistence::{KeyValueStore, MemoryStore, ProgressStore, StorageError};
pub use settings::{QualityPreset, Settings, SettingsChange};
pub use survey::{Survey, SurveyError};

/// Tuning constants
pub mod consts {
    /// Answers faster than this earn the speed bonus (exclusive)
    pub const SPEED_BONUS_WINDOW_MS: f64 = 10_000.0;
    /// Flat speed bonus, added to both points and XP
    pub const SPEED_BONUS_POINTS: u64 = 5;
    /// XP = max(XP_FLOOR, round(base * XP_FACTOR)) + bonus
    pub const XP_FACTOR: f64 = 1.7;
    pub const XP_FLOOR: u64 = 6;

    /// Render loop cap (frames per second)
    pub const FRAME_CAP: u32 = 40;
    /// Longest step a single frame may simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.040;

    /// Brick size on wide screens
    pub const TILE_WIDTH: f32 = 96.0;
    pub const TILE_HEIGHT: f32 = 44.0;
    /// Brick size below `NARROW_VIEWPORT`
    pub const TILE_WIDTH_NARROW: f32 = 120.0;
    pub const TILE_HEIGHT_NARROW: f32 = 56.0;
    pub const NARROW_VIEWPORT: f32 = 640.0;
    /// Default tile cap (Medium quality)
    pub const MAX_TILES: usize = 700;

    /// Falling bricks (pixels/s²)
    pub const GRAVITY: f32 = 900.0;
    /// Bricks are removed once they fall this many viewport heights
    pub const FALL_LIMIT: f32 = 1.2;
    /// Ripple radius around a click (pixels)
    pub const POP_RADIUS: f32 = 160.0;

    /// Canvas backing-store pixel ratio cap
    pub const MAX_DEVICE_PIXEL_RATIO: f64 = 1.2;

    /// Toast/effect lifetimes (ms)
    pub const ACHIEVEMENT_TOAST_MS: f64 = 3_600.0;
    pub const CONFETTI_MS: f64 = 8_000.0;
    pub const SCORE_PULSE_MS: f64 = 650.0;
}

/// Linear interpolation from `a` to `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (1.0 - t) * a + t * b
}
