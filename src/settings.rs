//! Round variants and sound preferences
//!
//! Read once at boot from the canvas `data-settings` JSON and the page URL
//! query string. Nothing is written back.

use serde::{Deserialize, Serialize};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round variants ===
    /// Fade to black before revealing the rotated scene
    pub fade_transition: bool,
    /// On a miss the fish lands in open water instead of staying home
    pub miss_moves_fish: bool,

    // === Audio ===
    pub sound: bool,
    /// Volume (0.0 - 1.0)
    pub volume: f32,

    /// Fixed first-round seed (otherwise taken from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fade_transition: true,
            miss_moves_fish: true,
            sound: true,
            volume: 0.8,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Settings>(json) {
            Ok(mut settings) => {
                settings.volume = settings.volume.clamp(0.0, 1.0);
                Some(settings)
            }
            Err(e) => {
                log::warn!("Ignoring bad settings JSON: {}", e);
                None
            }
        }
    }

    /// Overlay URL query parameters (`?fade=off&miss=stay&mute&volume=0.5&seed=42`)
    ///
    /// Pairs are form-urlencoded: `%XX` escapes and `+` are decoded first.
    pub fn apply_query(&mut self, query: &str) {
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            self.apply_pair(&key, &value);
        }
    }

    /// Apply one decoded query parameter; unknown keys are ignored
    pub fn apply_pair(&mut self, key: &str, value: &str) {
        let value = value.trim();
        match key.to_lowercase().as_str() {
            "fade" => match parse_switch(value) {
                Some(on) => self.fade_transition = on,
                None => log::warn!("Unknown fade value: {}", value),
            },
            "miss" => match value.to_lowercase().as_str() {
                "splash" | "move" => self.miss_moves_fish = true,
                "stay" | "stop" => self.miss_moves_fish = false,
                _ => log::warn!("Unknown miss value: {}", value),
            },
            "mute" => self.sound = !parse_switch(value).unwrap_or(true),
            "sound" => self.sound = parse_switch(value).unwrap_or(true),
            "volume" => match value.parse::<f32>() {
                Ok(v) => self.volume = v.clamp(0.0, 1.0),
                Err(_) => log::warn!("Bad volume: {}", value),
            },
            "seed" => match value.parse::<u64>() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("Bad seed: {}", value),
            },
            _ => {}
        }
    }

    /// Effective volume (0 when sound is off)
    pub fn effective_volume(&self) -> f32 {
        if self.sound { self.volume } else { 0.0 }
    }

    /// Load from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(canvas: &web_sys::HtmlCanvasElement) -> Self {
        let mut settings = canvas
            .get_attribute("data-settings")
            .and_then(|json| Self::from_json(&json))
            .unwrap_or_default();

        if let Some(query) = web_sys::window().and_then(|w| w.location().search().ok()) {
            settings.apply_query(&query);
        }

        log::info!("Settings: {:?}", settings);
        settings
    }
}

/// Accepts on/off, true/false, 1/0, yes/no; a bare flag counts as on
fn parse_switch(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "" | "on" | "true" | "1" | "yes" => Some(true),
        "off" | "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
