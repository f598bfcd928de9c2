//! Platform abstraction layer
//!
//! Browser-only pieces, compiled for wasm32:
//! - `storage`: LocalStorage-backed `KeyValueStore`
//! - `web`: Scoped event listeners, intervals and the frame loop
//!
//! Native builds use `persistence::MemoryStore` and drive time by hand.

#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use web::{AnimationLoop, Interval, Listener};

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
