//! Presentation helpers
//!
//! View models and markup only; the DOM is touched by the wasm glue.

pub mod effects;
pub mod view;

pub use effects::{Effects, Toast};
pub use view::{escape, hud, screen, settings_bar, timer_hint};
