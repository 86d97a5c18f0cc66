//! Scene rotation about the home puddle
//!
//! The renderer rotates the whole layout by `+θ` about the home-puddle center.
//! Pointer input has to go the other way to land back in layout space.

use glam::Vec2;

/// Rotate `point` by `angle` radians about `pivot`
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    let d = point - pivot;
    let (sin, cos) = angle.sin_cos();
    Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y) + pivot
}

/// Map a canvas-space pointer position into the unrotated puddle layout
#[inline]
pub fn screen_to_layout(screen: Vec2, pivot: Vec2, rotation: f32) -> Vec2 {
    rotate_about(screen, pivot, -rotation)
}

/// Where a layout-space point appears on the canvas after rotation
#[inline]
pub fn layout_to_screen(layout: Vec2, pivot: Vec2, rotation: f32) -> Vec2 {
    rotate_about(layout, pivot, rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_half_turn_about_home() {
        let home = Vec2::new(300.0, 200.0);
        let screen = layout_to_screen(Vec2::new(100.0, 100.0), home, PI);
        assert!(close(screen, Vec2::new(500.0, 300.0)), "got {screen:?}");
        let back = screen_to_layout(screen, home, PI);
        assert!(close(back, Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_quarter_turn_direction() {
        // Canvas y points down, so +90° carries +x onto +y
        let p = rotate_about(Vec2::new(10.0, 0.0), Vec2::ZERO, FRAC_PI_2);
        assert!(close(p, Vec2::new(0.0, 10.0)), "got {p:?}");
    }

    #[test]
    fn test_pivot_is_fixed() {
        let pivot = Vec2::new(42.0, -7.0);
        assert!(close(rotate_about(pivot, pivot, 1.234), pivot));
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let home = Vec2::new(300.0, 200.0);
        let p = Vec2::new(17.0, 380.0);
        assert!(close(screen_to_layout(p, home, 0.0), p));
    }
}
