//! Puddle and landmark placement
//!
//! Puddles are rejection-sampled: a candidate is kept only if it sits at
//! least `MIN_PUDDLE_SPACING` from every puddle already placed. A puddle that
//! exhausts its attempt budget throws the whole layout away and starts over.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Landmark, LandmarkKind, Puddle};
use crate::consts::*;

/// How layout generation went
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Puddles requested, home included
    pub requested: usize,
    /// Puddles actually placed, home included
    pub placed: usize,
    /// Full layouts thrown away before this one
    pub retries: u32,
}

impl LayoutReport {
    pub fn is_complete(&self) -> bool {
        self.placed == self.requested
    }
}

/// Generate the home puddle plus `PUDDLE_COUNT - 1` others
///
/// The home puddle is always element 0. If no retry produces a full layout,
/// the largest attempt is returned and the shortfall shows in the report.
pub fn generate_puddles<R: Rng + ?Sized>(rng: &mut R, home: Puddle) -> (Vec<Puddle>, LayoutReport) {
    let mut best: Vec<Puddle> = Vec::new();
    let mut retries = 0;

    loop {
        let candidate = try_layout(rng, home.clone());
        if candidate.len() > best.len() {
            best = candidate;
        }
        if best.len() == PUDDLE_COUNT || retries >= MAX_LAYOUT_RETRIES {
            break;
        }
        retries += 1;
    }

    let report = LayoutReport {
        requested: PUDDLE_COUNT,
        placed: best.len(),
        retries,
    };
    if !report.is_complete() {
        log::warn!(
            "Placed only {}/{} puddles after {} layout retries",
            report.placed,
            report.requested,
            report.retries
        );
    }
    (best, report)
}

/// One placement pass; stops at the first puddle that runs out of attempts
fn try_layout<R: Rng + ?Sized>(rng: &mut R, home: Puddle) -> Vec<Puddle> {
    let mut puddles = Vec::with_capacity(PUDDLE_COUNT);
    puddles.push(home);

    for i in 0..PUDDLE_COUNT - 1 {
        match place_one(rng, &puddles) {
            Some(pos) => puddles.push(Puddle {
                pos,
                radius: PUDDLE_RADIUS,
                is_home: false,
                pond_variant: Some((i % POND_VARIANTS as usize) as u8),
            }),
            None => break,
        }
    }
    puddles
}

fn place_one<R: Rng + ?Sized>(rng: &mut R, placed: &[Puddle]) -> Option<Vec2> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let pos = Vec2::new(
            rng.random_range(PUDDLE_RADIUS..CANVAS_WIDTH - PUDDLE_RADIUS),
            rng.random_range(PUDDLE_RADIUS..CANVAS_HEIGHT - PUDDLE_RADIUS),
        );
        if placed
            .iter()
            .all(|p| p.pos.distance(pos) >= MIN_PUDDLE_SPACING)
        {
            return Some(pos);
        }
    }
    None
}

/// A rock and a plant at random spots inside the home puddle
pub fn generate_landmarks<R: Rng + ?Sized>(rng: &mut R, home: &Puddle) -> Vec<Landmark> {
    // Keep the whole landmark inside the rim
    let reach = (home.radius - LANDMARK_SIZE * 2.0).max(0.0);

    [LandmarkKind::Rock, LandmarkKind::Plant]
        .into_iter()
        .map(|kind| {
            let theta = rng.random_range(0.0..std::f32::consts::TAU);
            // sqrt for uniform density over the disc
            let r = reach * rng.random::<f32>().sqrt();
            Landmark {
                pos: home.pos + Vec2::new(r * theta.cos(), r * theta.sin()),
                kind,
            }
        })
        .collect()
}
