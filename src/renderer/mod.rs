//! Canvas rendering module
//!
//! The scene is drawn through the `Surface` trait so it can run against a
//! browser 2D context or a recording stub in tests.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use scene::{Surface, palette, render_scene};
