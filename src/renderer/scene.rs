//! Scene drawing
//!
//! `render_scene` is a pure function of the session: same state, same draw
//! calls. Layout-space geometry is drawn inside a rotation about the home
//! puddle once the round has left Memorize.

use glam::Vec2;

use crate::assets::{AssetTracker, ImageId};
use crate::consts::*;
use crate::sim::{GameState, LandmarkKind, Puddle};

/// Immediate-mode 2D drawing target
pub trait Surface {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_polygon(&mut self, points: &[Vec2], color: &str);
    /// Blit a loaded image into the given box
    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, w: f32, h: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn set_alpha(&mut self, alpha: f32);
}

/// Scene colors
pub mod palette {
    /// Dry ground while memorizing
    pub const GROUND: &str = "#ba975f";
    /// Dry ground after the disorientation
    pub const GROUND_DISORIENTED: &str = "#a07e4a";
    pub const POOL_WATER: &str = "#3b7fb0";
    pub const POND_WATER: &str = "#5a9fd0";
    pub const ROCK: &str = "#808080";
    pub const PLANT: &str = "#2ecc71";
    pub const FISH: &str = "#f39c12";
    pub const OVERLAY: &str = "#000000";
}

/// Draw one frame. Returns `false` (and draws nothing) while images are
/// still loading.
pub fn render_scene<S: Surface + ?Sized>(
    state: &GameState,
    assets: &AssetTracker,
    surface: &mut S,
) -> bool {
    if !assets.is_settled() {
        return false;
    }

    let ground = if state.is_disoriented() {
        palette::GROUND_DISORIENTED
    } else {
        palette::GROUND
    };
    surface.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, ground);

    surface.save();
    if let Some(home) = state.home().filter(|_| state.phase.is_rotated()) {
        let pivot = home.pos;
        surface.translate(pivot);
        surface.rotate(state.rotation);
        surface.translate(-pivot);
    }

    for puddle in &state.puddles {
        if puddle.is_home {
            draw_home(state, puddle, assets, surface);
        } else if state.show_all_puddles {
            draw_pond(puddle, assets, surface);
        }
    }

    draw_fish(state, surface);
    surface.restore();

    if state.overlay_alpha > 0.0 {
        surface.save();
        surface.set_alpha(state.overlay_alpha);
        surface.fill_rect(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT, palette::OVERLAY);
        surface.restore();
    }

    true
}

fn draw_home<S: Surface + ?Sized>(
    state: &GameState,
    home: &Puddle,
    assets: &AssetTracker,
    surface: &mut S,
) {
    blit_or_circle(ImageId::CentralPool, home, palette::POOL_WATER, assets, surface);

    for landmark in &state.landmarks {
        match landmark.kind {
            LandmarkKind::Rock => surface.fill_circle(landmark.pos, LANDMARK_SIZE, palette::ROCK),
            LandmarkKind::Plant => surface.fill_rect(
                landmark.pos.x - LANDMARK_SIZE / 2.0,
                landmark.pos.y - LANDMARK_SIZE,
                LANDMARK_SIZE,
                LANDMARK_SIZE * 2.0,
                palette::PLANT,
            ),
        }
    }
}

fn draw_pond<S: Surface + ?Sized>(puddle: &Puddle, assets: &AssetTracker, surface: &mut S) {
    let image = ImageId::Pond(puddle.pond_variant.unwrap_or(0));
    blit_or_circle(image, puddle, palette::POND_WATER, assets, surface);
}

fn blit_or_circle<S: Surface + ?Sized>(
    image: ImageId,
    puddle: &Puddle,
    fallback: &str,
    assets: &AssetTracker,
    surface: &mut S,
) {
    if assets.is_loaded(image) {
        let size = puddle.radius * 2.0;
        surface.draw_image(
            image,
            puddle.pos.x - puddle.radius,
            puddle.pos.y - puddle.radius,
            size,
            size,
        );
    } else {
        surface.fill_circle(puddle.pos, puddle.radius, fallback);
    }
}

/// Arrowhead pointing along the heading
fn draw_fish<S: Surface + ?Sized>(state: &GameState, surface: &mut S) {
    surface.save();
    surface.translate(state.fish.pos);
    surface.rotate(state.fish.heading);
    surface.fill_polygon(
        &[
            Vec2::new(FISH_SIZE, 0.0),
            Vec2::new(-FISH_SIZE, FISH_SIZE / 2.0),
            Vec2::new(-FISH_SIZE, -FISH_SIZE / 2.0),
        ],
        palette::FISH,
    );
    surface.restore();
}
