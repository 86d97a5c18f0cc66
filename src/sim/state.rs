//! Session state and entity types
//!
//! A `GameState` is one round: a puddle layout, two landmarks, the fish, and
//! the phase bookkeeping. Starting a new round builds a fresh value rather
//! than mutating the old entities.

use glam::Vec2;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::alarm::Alarms;
use super::layout::{LayoutReport, generate_landmarks, generate_puddles};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Layout generated, waiting for the start action
    Ready,
    /// Countdown running, everything visible and unrotated
    Memorize,
    /// Fade-to-black disorientation transition
    Rotating,
    /// Waiting for the single jump click
    Playing,
    /// Fish reached another puddle
    Won,
    /// Fish missed
    Lost,
}

impl GamePhase {
    /// Whether the scene is drawn in the rotated frame
    pub fn is_rotated(self) -> bool {
        !matches!(self, GamePhase::Ready | GamePhase::Memorize)
    }

    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// A puddle the fish can jump to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puddle {
    pub pos: Vec2,
    pub radius: f32,
    pub is_home: bool,
    /// Pond image index for non-home puddles
    pub pond_variant: Option<u8>,
}

impl Puddle {
    pub fn home(pos: Vec2) -> Self {
        Self {
            pos,
            radius: HOME_PUDDLE_RADIUS,
            is_home: true,
            pond_variant: None,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }
}

/// The player's fish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    pub pos: Vec2,
    /// Heading (radians, canvas frame)
    pub heading: f32,
    /// Index of the puddle the fish sits in; `None` when stranded in open water
    pub puddle: Option<usize>,
}

impl Fish {
    /// Teleport to `target`, facing along the jump
    pub fn jump_to(&mut self, target: Vec2, puddle: Option<usize>) {
        let d = target - self.pos;
        if d.length_squared() > 0.0 {
            self.heading = d.y.atan2(d.x);
        }
        self.pos = target;
        self.puddle = puddle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandmarkKind {
    Rock,
    Plant,
}

/// Memory aid drawn inside the home puddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub pos: Vec2,
    pub kind: LandmarkKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeStage {
    /// Overlay ramping up to opaque
    Darkening,
    /// Overlay ramping back to transparent
    Lifting,
}

/// Active fade overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub stage: FadeStage,
    pub started_ms: f64,
}

impl Fade {
    /// Overlay opacity at `now_ms`
    pub fn alpha_at(&self, now_ms: f64) -> f32 {
        let t = ((now_ms - self.started_ms) / FADE_DURATION_MS).clamp(0.0, 1.0) as f32;
        match self.stage {
            FadeStage::Darkening => t,
            FadeStage::Lifting => 1.0 - t,
        }
    }
}

/// Notable things that happened during a step (drained by the front end)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    /// Seconds left after the tick
    CountdownTick { remaining: u32 },
    /// Scene rotated and other puddles hidden
    Disoriented { rotation: f32 },
    /// Fish reached a puddle
    Landed { puddle: usize },
    /// Fish jumped into open water
    Splashed { at: Vec2 },
    /// Missed and stayed put
    Missed,
    RoundReset,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Seconds left in the memorization countdown
    pub time_left: u32,
    /// Scene rotation about the home puddle (radians)
    pub rotation: f32,
    /// Whether non-home puddles are drawn
    pub show_all_puddles: bool,
    pub fade: Option<Fade>,
    /// Current overlay opacity (0 = clear)
    pub overlay_alpha: f32,
    /// Puddles in generation order, home first
    pub puddles: Vec<Puddle>,
    pub landmarks: Vec<Landmark>,
    pub fish: Fish,
    pub layout_report: LayoutReport,
    pub alarms: Alarms,
    /// Events since the front end last drained
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh round with the given seed
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let home = Puddle::home(Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0));

        let (puddles, layout_report) = generate_puddles(&mut rng, home.clone());
        let landmarks = generate_landmarks(&mut rng, &home);
        let fish = Fish {
            pos: home.pos,
            heading: rng.random_range(0.0..std::f32::consts::TAU),
            puddle: Some(0),
        };

        Self {
            seed,
            rng,
            settings,
            phase: GamePhase::Ready,
            time_left: MEMORIZE_SECONDS,
            rotation: 0.0,
            show_all_puddles: true,
            fade: None,
            overlay_alpha: 0.0,
            puddles,
            landmarks,
            fish,
            layout_report,
            alarms: Alarms::new(),
            events: Vec::new(),
        }
    }

    /// Replace this round with a fresh one, keeping settings and the clock
    pub fn next_round(&mut self) {
        let seed = self.rng.next_u64();
        let mut alarms = std::mem::take(&mut self.alarms);
        alarms.cancel_all();
        let events = std::mem::take(&mut self.events);

        *self = GameState::new(seed, self.settings.clone());
        self.alarms = alarms;
        self.events = events;
    }

    /// The home puddle (rotation pivot). Generated layouts always put it
    /// first; `None` only for a hand-built state with no puddles.
    pub fn home(&self) -> Option<&Puddle> {
        self.puddles.first().filter(|p| p.is_home)
    }

    /// The rotation has been applied (past the fade's darkest point)
    pub fn is_disoriented(&self) -> bool {
        match self.phase {
            GamePhase::Playing | GamePhase::Won | GamePhase::Lost => true,
            GamePhase::Rotating => self
                .fade
                .is_some_and(|f| f.stage == FadeStage::Lifting),
            GamePhase::Ready | GamePhase::Memorize => false,
        }
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_defaults() {
        let state = GameState::new(7, Settings::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_left, MEMORIZE_SECONDS);
        assert_eq!(state.rotation, 0.0);
        assert!(state.show_all_puddles);
        let home = state.home().unwrap();
        assert_eq!(state.fish.pos, home.pos);
        assert_eq!(state.fish.puddle, Some(0));
        assert_eq!(state.landmarks.len(), 2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(99, Settings::default());
        let b = GameState::new(99, Settings::default());
        assert_eq!(a.puddles, b.puddles);
        assert_eq!(a.landmarks, b.landmarks);
        assert_eq!(a.fish, b.fish);
    }

    #[test]
    fn test_next_round_rerolls_and_cancels() {
        let mut state = GameState::new(1, Settings::default());
        state.alarms.schedule_at(crate::sim::AlarmKind::FadeMidpoint, 10.0);
        let epoch = state.alarms.epoch();
        let old = state.puddles.clone();

        state.next_round();
        assert_ne!(state.seed, 1);
        assert_ne!(state.puddles, old);
        assert!(state.alarms.is_empty());
        assert_ne!(state.alarms.epoch(), epoch);
    }

    #[test]
    fn test_home_absent_without_puddles() {
        let mut state = GameState::new(3, Settings::default());
        state.puddles.clear();
        assert!(state.home().is_none());
    }

    #[test]
    fn test_fade_alpha_ramps() {
        let dark = Fade {
            stage: FadeStage::Darkening,
            started_ms: 1000.0,
        };
        assert_eq!(dark.alpha_at(1000.0), 0.0);
        assert!((dark.alpha_at(1250.0) - 0.5).abs() < 1e-6);
        assert_eq!(dark.alpha_at(9000.0), 1.0);

        let lift = Fade {
            stage: FadeStage::Lifting,
            ..dark
        };
        assert_eq!(lift.alpha_at(1000.0), 1.0);
        assert_eq!(lift.alpha_at(1500.0), 0.0);
    }

    #[test]
    fn test_jump_sets_heading() {
        let mut fish = Fish {
            pos: Vec2::new(0.0, 0.0),
            heading: 1.0,
            puddle: Some(0),
        };
        fish.jump_to(Vec2::new(0.0, 10.0), Some(2));
        assert!((fish.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(fish.puddle, Some(2));
    }
}
