//! HUD text derived from session state
//!
//! The page shows a banner over the canvas, an instruction line under it,
//! and one action button whose meaning depends on the phase.

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{GamePhase, GameState};

/// What the action button does right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionButton {
    Start,
    PlayAgain,
}

impl ActionButton {
    pub fn label(self) -> &'static str {
        match self {
            ActionButton::Start => "Start Game",
            ActionButton::PlayAgain => "Play Again",
        }
    }
}

/// Banner over the canvas, if any
pub fn banner(state: &GameState) -> Option<String> {
    match state.phase {
        GamePhase::Memorize => Some(format!("Memorize in: {}s", state.time_left)),
        GamePhase::Won => Some("You Won!".to_string()),
        GamePhase::Lost => Some("Game Over!".to_string()),
        _ => None,
    }
}

/// Instruction line under the canvas
pub fn prompt(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Ready => "Press Start to begin! Memorize the puddle locations.",
        GamePhase::Memorize => "Memorize the puddle locations!",
        GamePhase::Rotating => "Hold on...",
        GamePhase::Playing => "Click on a puddle to make the fish jump!",
        GamePhase::Won | GamePhase::Lost => "",
    }
}

/// Button to show, if any
pub fn action_button(phase: GamePhase) -> Option<ActionButton> {
    match phase {
        GamePhase::Ready => Some(ActionButton::Start),
        GamePhase::Won | GamePhase::Lost => Some(ActionButton::PlayAgain),
        _ => None,
    }
}

/// Map an offset inside the displayed canvas box (border excluded) to
/// logical canvas coordinates
pub fn to_logical(dx: f64, dy: f64, box_width: f64, box_height: f64) -> (f64, f64) {
    let sx = if box_width > 0.0 { CANVAS_WIDTH as f64 / box_width } else { 1.0 };
    let sy = if box_height > 0.0 { CANVAS_HEIGHT as f64 / box_height } else { 1.0 };
    (dx * sx, dy * sy)
}
