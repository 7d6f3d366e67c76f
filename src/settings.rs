//! Player settings and preferences
//!
//! Persisted separately from tuning in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::levels::Level;
use crate::renderer::{Projection, RenderStyle};
use crate::tuning::Tuning;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Decorative cubes in the rain transitions
    pub fn decor_count(&self) -> usize {
        match self {
            QualityPreset::Low => 60,
            QualityPreset::Medium => 200,
            QualityPreset::High => 400,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Rendering ===
    pub render_style: RenderStyle,
    pub projection: Projection,

    // === Gameplay ===
    /// Level played after the title screen
    pub start_level: Level,
    /// React to device orientation
    pub tilt_controls: bool,

    // === Accessibility ===
    /// Reduced motion (sparse rain, no title spin)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            render_style: RenderStyle::Wireframe,
            projection: Projection::Orthographic,

            start_level: Level::Open,
            tilt_controls: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective decorative cube count (respects reduced_motion)
    pub fn decor_count(&self) -> usize {
        if self.reduced_motion {
            QualityPreset::Low.decor_count() / 2
        } else {
            self.quality.decor_count()
        }
    }

    /// Fold preferences that change simulation behaviour into `tuning`
    pub fn apply_to(&self, tuning: &mut Tuning) {
        tuning.decor_count = self.decor_count();
        if self.reduced_motion {
            tuning.title_spin = 0.0;
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "snow_block_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names_and_decor() {
        assert_eq!(QualityPreset::Low.as_str(), "Low");
        assert_eq!(QualityPreset::High.as_str(), "High");
        assert!(QualityPreset::Low.decor_count() < QualityPreset::High.decor_count());
        assert_eq!(Settings::from_preset(QualityPreset::High).decor_count(), 400);
    }

    #[test]
    fn test_reduced_motion_thins_rain_and_stops_title() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::from_preset(QualityPreset::High)
        };
        let mut tuning = Tuning::default();
        settings.apply_to(&mut tuning);
        assert_eq!(tuning.decor_count, 30);
        assert_eq!(tuning.title_spin, 0.0);
    }

    #[test]
    fn test_default_settings_keep_default_tuning() {
        let mut tuning = Tuning::default();
        Settings::default().apply_to(&mut tuning);
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"render_style":"Solid","start_level":"Tutorial"}"#)
                .expect("valid settings json");
        assert_eq!(settings.render_style, RenderStyle::Solid);
        assert_eq!(settings.start_level, Level::Tutorial);
        assert!(settings.tilt_controls);
        assert_eq!(settings.projection, Projection::Orthographic);
    }
}
