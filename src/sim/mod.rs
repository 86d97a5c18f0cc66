//! Deterministic session module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time arrives only through `GameInput::Advance`
//! - Seeded RNG only
//! - Stable iteration order (generation order for puddles)
//! - No rendering or platform dependencies

pub mod alarm;
pub mod layout;
pub mod state;
pub mod step;
pub mod transform;

pub use alarm::{Alarm, AlarmKind, Alarms};
pub use layout::{LayoutReport, generate_landmarks, generate_puddles};
pub use state::{
    Fade, FadeStage, Fish, GameEvent, GamePhase, GameState, Landmark, LandmarkKind, Puddle,
};
pub use step::{GameInput, reduce, step};
pub use transform::{layout_to_screen, rotate_about, screen_to_layout};
