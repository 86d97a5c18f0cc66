//! Session reducer
//!
//! Every state change goes through `step`: explicit start and restart
//! actions, clock advances that fire due alarms, and the single jump click.

use glam::Vec2;
use rand::Rng;

use super::alarm::{Alarm, AlarmKind};
use super::state::{Fade, FadeStage, GameEvent, GamePhase, GameState};
use super::transform::screen_to_layout;
use crate::consts::*;

/// One input to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameInput {
    /// Begin memorizing (Ready only)
    Start,
    /// Move the clock to `now_ms` and fire due alarms
    Advance { now_ms: f64 },
    /// Pointer click in logical canvas coordinates
    Click { x: f32, y: f32 },
    /// Throw the round away and generate a new one
    Restart,
}

/// Apply one input to the session in place
pub fn step(state: &mut GameState, input: &GameInput) {
    match *input {
        GameInput::Start => start(state),
        GameInput::Advance { now_ms } => advance(state, now_ms),
        GameInput::Click { x, y } => click(state, Vec2::new(x, y)),
        GameInput::Restart => restart(state),
    }
}

/// Value-returning form of `step`
pub fn reduce(mut state: GameState, input: &GameInput) -> GameState {
    step(&mut state, input);
    state
}

fn start(state: &mut GameState) {
    if state.phase != GamePhase::Ready {
        log::debug!("Start ignored in {:?}", state.phase);
        return;
    }

    state.phase = GamePhase::Memorize;
    state.time_left = MEMORIZE_SECONDS;
    state.rotation = 0.0;
    state.show_all_puddles = true;
    state.alarms.cancel_all();
    state
        .alarms
        .schedule_every(AlarmKind::CountdownTick, COUNTDOWN_INTERVAL_MS);
    state.events.push(GameEvent::RoundStarted);
    log::info!("Memorize phase started ({}s)", MEMORIZE_SECONDS);
}

fn advance(state: &mut GameState, now_ms: f64) {
    state.alarms.set_now(now_ms);

    while let Some(alarm) = state.alarms.pop_due() {
        on_alarm(state, &alarm);
    }

    let now = state.alarms.now_ms();
    state.overlay_alpha = state.fade.map_or(0.0, |f| f.alpha_at(now));
}

/// Follow-up alarms are armed from the firing alarm's due time so a stalled
/// clock replays the same timeline.
fn on_alarm(state: &mut GameState, alarm: &Alarm) {
    let at = alarm.due_ms;

    match (alarm.kind, state.phase) {
        (AlarmKind::CountdownTick, GamePhase::Memorize) => {
            state.time_left = state.time_left.saturating_sub(1);
            state.events.push(GameEvent::CountdownTick {
                remaining: state.time_left,
            });
            if state.time_left > 0 {
                return;
            }

            state.alarms.cancel(AlarmKind::CountdownTick);
            if state.settings.fade_transition {
                state.phase = GamePhase::Rotating;
                state.fade = Some(Fade {
                    stage: FadeStage::Darkening,
                    started_ms: at,
                });
                state
                    .alarms
                    .schedule_at(AlarmKind::FadeMidpoint, at + FADE_DURATION_MS);
                log::info!("Fading out");
            } else {
                disorient(state);
                state.phase = GamePhase::Playing;
                log::info!("Playing (rotation {:.2} rad)", state.rotation);
            }
        }
        (AlarmKind::FadeMidpoint, GamePhase::Rotating) => {
            disorient(state);
            state.fade = Some(Fade {
                stage: FadeStage::Lifting,
                started_ms: at,
            });
            state
                .alarms
                .schedule_at(AlarmKind::FadeComplete, at + FADE_DURATION_MS);
        }
        (AlarmKind::FadeComplete, GamePhase::Rotating) => {
            state.fade = None;
            state.phase = GamePhase::Playing;
            log::info!("Playing (rotation {:.2} rad)", state.rotation);
        }
        (kind, phase) => {
            log::debug!("Alarm {:?} ignored in {:?}", kind, phase);
        }
    }
}

/// Scramble the frame of reference: random rotation, hide other puddles
fn disorient(state: &mut GameState) {
    state.rotation = state.rng.random_range(0.0..std::f32::consts::TAU);
    state.show_all_puddles = false;
    state.events.push(GameEvent::Disoriented {
        rotation: state.rotation,
    });
}

fn click(state: &mut GameState, screen: Vec2) {
    if state.phase != GamePhase::Playing {
        log::debug!("Click ignored in {:?}", state.phase);
        return;
    }
    let Some(home) = state.home() else {
        log::warn!("Click ignored: layout has no home puddle");
        return;
    };

    let target = screen_to_layout(screen, home.pos, state.rotation);

    // First match in generation order; the fish's own puddle never counts
    let hit = state
        .puddles
        .iter()
        .enumerate()
        .find(|(i, p)| state.fish.puddle != Some(*i) && p.contains(target))
        .map(|(i, p)| (i, p.pos));

    state.show_all_puddles = true;

    match hit {
        Some((index, center)) => {
            state.fish.jump_to(center, Some(index));
            state.phase = GamePhase::Won;
            state.events.push(GameEvent::Landed { puddle: index });
            log::info!("Landed in puddle {}", index);
        }
        None if state.settings.miss_moves_fish => {
            state.fish.jump_to(target, None);
            state.phase = GamePhase::Lost;
            state.events.push(GameEvent::Splashed { at: target });
            log::info!("Splashed down at ({:.0}, {:.0})", target.x, target.y);
        }
        None => {
            state.phase = GamePhase::Lost;
            state.events.push(GameEvent::Missed);
            log::info!("Missed");
        }
    }
}

fn restart(state: &mut GameState) {
    if state.phase == GamePhase::Ready {
        log::debug!("Restart ignored in Ready");
        return;
    }

    state.next_round();
    state.events.push(GameEvent::RoundReset);
    log::info!("New round with seed {}", state.seed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Puddle;
    use crate::sim::transform::layout_to_screen;
    use std::f32::consts::PI;

    fn settings(fade: bool, splash: bool) -> Settings {
        Settings {
            fade_transition: fade,
            miss_moves_fish: splash,
            ..Default::default()
        }
    }

    /// Start a round and run the clock until it is playable
    fn playing(seed: u64, s: Settings) -> GameState {
        let mut state = GameState::new(seed, s);
        step(&mut state, &GameInput::Start);
        step(&mut state, &GameInput::Advance { now_ms: 10_000.0 });
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn click_layout(state: &mut GameState, layout: Vec2) {
        let screen = layout_to_screen(layout, state.home().unwrap().pos, state.rotation);
        step(
            state,
            &GameInput::Click {
                x: screen.x,
                y: screen.y,
            },
        );
    }

    /// A layout point that is not inside any puddle
    fn open_water(state: &GameState) -> Vec2 {
        (0..60)
            .flat_map(|x| (0..40).map(move |y| Vec2::new(x as f32 * 10.0, y as f32 * 10.0)))
            .find(|p| state.puddles.iter().all(|pd| !pd.contains(*p)))
            .expect("some open water")
    }

    #[test]
    fn test_ready_to_memorize() {
        let mut state = GameState::new(1, Settings::default());
        step(&mut state, &GameInput::Start);

        assert_eq!(state.phase, GamePhase::Memorize);
        assert_eq!(state.time_left, MEMORIZE_SECONDS);
        assert_eq!(state.rotation, 0.0);
        assert!(state.show_all_puddles);
        assert_eq!(state.drain_events(), vec![GameEvent::RoundStarted]);
    }

    #[test]
    fn test_countdown_ticks_each_second() {
        let mut state = GameState::new(1, Settings::default());
        step(&mut state, &GameInput::Start);

        step(&mut state, &GameInput::Advance { now_ms: 999.0 });
        assert_eq!(state.time_left, 5);
        step(&mut state, &GameInput::Advance { now_ms: 1000.0 });
        assert_eq!(state.time_left, 4);
        step(&mut state, &GameInput::Advance { now_ms: 3000.0 });
        assert_eq!(state.time_left, 2);
        assert_eq!(state.phase, GamePhase::Memorize);
    }

    #[test]
    fn test_memorize_straight_to_playing() {
        let mut state = GameState::new(5, settings(false, false));
        step(&mut state, &GameInput::Start);
        step(&mut state, &GameInput::Advance { now_ms: 5000.0 });

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.show_all_puddles);
        assert!((0.0..std::f32::consts::TAU).contains(&state.rotation));
        assert!(state.fade.is_none());
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::Disoriented { .. }))
        );
    }

    #[test]
    fn test_fade_transition_timeline() {
        let mut state = GameState::new(5, settings(true, true));
        step(&mut state, &GameInput::Start);

        step(&mut state, &GameInput::Advance { now_ms: 5000.0 });
        assert_eq!(state.phase, GamePhase::Rotating);
        assert_eq!(state.overlay_alpha, 0.0);
        assert_eq!(state.rotation, 0.0);
        assert!(state.show_all_puddles);

        step(&mut state, &GameInput::Advance { now_ms: 5250.0 });
        assert!((state.overlay_alpha - 0.5).abs() < 1e-6);
        assert_eq!(state.rotation, 0.0);

        // Darkest point: rotation applied, puddles hidden
        step(&mut state, &GameInput::Advance { now_ms: 5500.0 });
        assert_eq!(state.phase, GamePhase::Rotating);
        assert_eq!(state.overlay_alpha, 1.0);
        assert!(!state.show_all_puddles);

        step(&mut state, &GameInput::Advance { now_ms: 5750.0 });
        assert!((state.overlay_alpha - 0.5).abs() < 1e-6);

        step(&mut state, &GameInput::Advance { now_ms: 6000.0 });
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.overlay_alpha, 0.0);
        assert!(state.fade.is_none());
    }

    #[test]
    fn test_click_before_playing_is_noop() {
        let mut state = GameState::new(2, Settings::default());
        let before = state.fish.clone();
        step(&mut state, &GameInput::Click { x: 100.0, y: 100.0 });
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.fish, before);
    }

    #[test]
    fn test_hit_moves_fish_to_center() {
        let mut state = playing(11, Settings::default());
        let target = state.puddles[2].pos;
        let from = state.fish.pos;

        // Aim slightly off-center; the fish still lands dead center
        click_layout(&mut state, target + Vec2::new(10.0, -5.0));

        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.fish.pos, target);
        assert_eq!(state.fish.puddle, Some(2));
        let d = target - from;
        assert!((state.fish.heading - d.y.atan2(d.x)).abs() < 1e-5);
        assert!(state.show_all_puddles);
    }

    #[test]
    fn test_self_jump_never_counts() {
        let mut state = playing(11, settings(true, false));
        let home = state.home().unwrap().pos;
        click_layout(&mut state, home);

        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.fish.pos, home);
        assert!(state.show_all_puddles);
    }

    #[test]
    fn test_miss_splashes_into_open_water() {
        let mut state = playing(21, settings(false, true));
        let spot = open_water(&state);
        click_layout(&mut state, spot);

        assert_eq!(state.phase, GamePhase::Lost);
        assert!((state.fish.pos - spot).length() < 1e-3);
        assert_eq!(state.fish.puddle, None);
    }

    #[test]
    fn test_miss_base_variant_leaves_fish() {
        let mut state = playing(21, settings(false, false));
        let before = state.fish.clone();
        let spot = open_water(&state);
        click_layout(&mut state, spot);

        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.fish, before);
        assert!(state.drain_events().contains(&GameEvent::Missed));
    }

    #[test]
    fn test_second_click_ignored() {
        let mut state = playing(4, Settings::default());
        let target = state.puddles[1].pos;
        click_layout(&mut state, target);
        assert_eq!(state.phase, GamePhase::Won);

        let other = state.puddles[3].pos;
        click_layout(&mut state, other);
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.fish.pos, target);
    }

    #[test]
    fn test_half_turn_click_example() {
        let mut state = playing(8, settings(false, true));
        state.puddles.truncate(1);
        state.puddles.push(Puddle {
            pos: Vec2::new(100.0, 100.0),
            radius: PUDDLE_RADIUS,
            is_home: false,
            pond_variant: Some(0),
        });
        state.rotation = PI;

        step(&mut state, &GameInput::Click { x: 500.0, y: 300.0 });
        assert_eq!(state.phase, GamePhase::Won);
        assert_eq!(state.fish.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_restart_resets_round() {
        let mut state = playing(30, Settings::default());
        let target = state.puddles[1].pos;
        click_layout(&mut state, target);
        let old_layout = state.puddles.clone();

        step(&mut state, &GameInput::Restart);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.show_all_puddles);
        assert_eq!(state.rotation, 0.0);
        assert_eq!(state.time_left, MEMORIZE_SECONDS);
        assert_eq!(state.overlay_alpha, 0.0);
        assert_ne!(state.puddles, old_layout);
        assert_eq!(state.fish.pos, state.home().unwrap().pos);
    }

    #[test]
    fn test_restart_cancels_pending_countdown() {
        let mut state = GameState::new(3, Settings::default());
        step(&mut state, &GameInput::Start);
        step(&mut state, &GameInput::Advance { now_ms: 2500.0 });
        assert_eq!(state.time_left, 3);

        step(&mut state, &GameInput::Restart);
        step(&mut state, &GameInput::Advance { now_ms: 60_000.0 });
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.time_left, MEMORIZE_SECONDS);

        // A new countdown runs on the current clock
        step(&mut state, &GameInput::Start);
        step(&mut state, &GameInput::Advance { now_ms: 60_999.0 });
        assert_eq!(state.time_left, 5);
        step(&mut state, &GameInput::Advance { now_ms: 61_000.0 });
        assert_eq!(state.time_left, 4);
    }

    #[test]
    fn test_restart_mid_fade() {
        let mut state = GameState::new(3, settings(true, true));
        step(&mut state, &GameInput::Start);
        step(&mut state, &GameInput::Advance { now_ms: 5200.0 });
        assert_eq!(state.phase, GamePhase::Rotating);

        step(&mut state, &GameInput::Restart);
        step(&mut state, &GameInput::Advance { now_ms: 7000.0 });
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.overlay_alpha, 0.0);
        assert_eq!(state.rotation, 0.0);
    }

    #[test]
    fn test_restart_in_ready_is_noop() {
        let mut state = GameState::new(3, Settings::default());
        let layout = state.puddles.clone();
        step(&mut state, &GameInput::Restart);
        assert_eq!(state.puddles, layout);
    }

    #[test]
    fn test_reduce_matches_step() {
        let a = reduce(GameState::new(77, Settings::default()), &GameInput::Start);
        let mut b = GameState::new(77, Settings::default());
        step(&mut b, &GameInput::Start);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.time_left, b.time_left);
    }
}
