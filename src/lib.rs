//! Fish Jump - a spatial-memory canvas game
//!
//! Core modules:
//! - `sim`: Deterministic session logic (layout, phases, timers, hit-testing)
//! - `renderer`: Immediate-mode scene drawing over a `Surface`
//! - `assets`: Image catalogue and load readiness
//! - `settings`: Round variants and sound preferences
//! - `ui`: HUD text derived from session state

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use assets::{AssetTracker, ImageId};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 400.0;

    /// Puddles per session, home puddle included
    pub const PUDDLE_COUNT: usize = 5;
    pub const PUDDLE_RADIUS: f32 = 40.0;
    pub const HOME_PUDDLE_RADIUS: f32 = 55.0;
    /// Minimum distance between any two puddle centers
    pub const MIN_PUDDLE_SPACING: f32 = PUDDLE_RADIUS * 3.0;
    /// Resample budget per puddle
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;
    /// Whole-layout regenerations before accepting a short layout
    pub const MAX_LAYOUT_RETRIES: u32 = 16;
    /// Number of distinct pond images
    pub const POND_VARIANTS: u8 = 6;

    pub const FISH_SIZE: f32 = 15.0;
    pub const LANDMARK_SIZE: f32 = 8.0;

    /// Memorization countdown (seconds)
    pub const MEMORIZE_SECONDS: u32 = 5;
    pub const COUNTDOWN_INTERVAL_MS: f64 = 1000.0;
    /// Each half of the fade-to-black transition
    pub const FADE_DURATION_MS: f64 = 500.0;
}
