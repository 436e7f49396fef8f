use anyhow::Context;
use arena_input::{CameraConfig, KeyBindings};
use arena_overlay::OverlayConfig;
use arena_world::GeometryConfig;
use serde::Deserialize;
use std::path::Path;

/// Everything the desktop host reads from its YAML settings file. Missing
/// sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub geometry: GeometryConfig,
    pub camera: CameraConfig,
    pub bindings: KeyBindings,
    pub overlay: OverlayConfig,
    /// Fixed placement seed; a fresh layout every launch when absent.
    pub seed: Option<u64>,
}

impl Settings {
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_yaml::from_str(text).context("parsing settings")?;
        settings
            .geometry
            .validate()
            .context("invalid geometry settings")?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}
