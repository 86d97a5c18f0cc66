//! Image catalogue and load readiness
//!
//! Images load asynchronously in the browser. The scene is not drawn until
//! every image has settled; a failed image is replaced by a plain water
//! circle instead of blocking the game forever.

use std::collections::HashMap;

use crate::consts::POND_VARIANTS;

/// Every image the scene can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    CentralPool,
    Pond(u8),
}

impl ImageId {
    /// All images, in load order
    pub fn all() -> Vec<ImageId> {
        std::iter::once(ImageId::CentralPool)
            .chain((0..POND_VARIANTS).map(ImageId::Pond))
            .collect()
    }

    /// Served path relative to the page
    pub fn path(self) -> String {
        match self {
            ImageId::CentralPool => "assets/central-pool.svg".to_string(),
            ImageId::Pond(i) => format!("assets/pond{}.svg", i + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

/// Tracks which images are usable
#[derive(Debug, Clone)]
pub struct AssetTracker {
    states: HashMap<ImageId, LoadState>,
}

impl Default for AssetTracker {
    fn default() -> Self {
        Self::new(&ImageId::all())
    }
}

impl AssetTracker {
    pub fn new(required: &[ImageId]) -> Self {
        Self {
            states: required.iter().map(|&id| (id, LoadState::Pending)).collect(),
        }
    }

    pub fn mark_loaded(&mut self, id: ImageId) {
        self.states.insert(id, LoadState::Loaded);
    }

    pub fn mark_failed(&mut self, id: ImageId) {
        log::warn!("Image failed to load: {}", id.path());
        self.states.insert(id, LoadState::Failed);
    }

    pub fn state(&self, id: ImageId) -> LoadState {
        self.states.get(&id).copied().unwrap_or(LoadState::Failed)
    }

    /// Image can be blitted
    pub fn is_loaded(&self, id: ImageId) -> bool {
        self.state(id) == LoadState::Loaded
    }

    /// Nothing is still in flight
    pub fn is_settled(&self) -> bool {
        self.states.values().all(|s| *s != LoadState::Pending)
    }

    /// (settled, total) for a loading indicator
    pub fn progress(&self) -> (usize, usize) {
        let settled = self
            .states
            .values()
            .filter(|s| **s != LoadState::Pending)
            .count();
        (settled, self.states.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue() {
        let all = ImageId::all();
        assert_eq!(all.len(), 1 + POND_VARIANTS as usize);
        assert_eq!(ImageId::Pond(0).path(), "assets/pond1.svg");
        assert_eq!(ImageId::Pond(5).path(), "assets/pond6.svg");
    }

    #[test]
    fn test_settles_on_load_or_failure() {
        let mut tracker = AssetTracker::new(&[ImageId::CentralPool, ImageId::Pond(0)]);
        assert!(!tracker.is_settled());
        assert_eq!(tracker.progress(), (0, 2));

        tracker.mark_loaded(ImageId::CentralPool);
        assert!(!tracker.is_settled());

        tracker.mark_failed(ImageId::Pond(0));
        assert!(tracker.is_settled());
        assert!(tracker.is_loaded(ImageId::CentralPool));
        assert!(!tracker.is_loaded(ImageId::Pond(0)));
    }

    #[test]
    fn test_unknown_image_counts_as_failed() {
        let tracker = AssetTracker::new(&[]);
        assert_eq!(tracker.state(ImageId::Pond(3)), LoadState::Failed);
        assert!(tracker.is_settled());
    }
}
