use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`GeometryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} range is inverted: min {min} > max {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("at least one material variant is required")]
    NoMaterialVariants,
    #[error("fixed material variant {index} out of range ({count} configured)")]
    VariantOutOfRange { index: usize, count: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Inclusive `[min, max]` range of a continuous dimension.
///
/// Serialized as a two-element sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        positive(name, self.min)?;
        positive(name, self.max)
    }
}

impl From<[f32; 2]> for SizeRange {
    fn from([min, max]: [f32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<SizeRange> for [f32; 2] {
    fn from(r: SizeRange) -> Self {
        [r.min, r.max]
    }
}

/// Inclusive `[min, max]` range of a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                name,
                min: self.min as f64,
                max: self.max as f64,
            });
        }
        if self.min == 0 {
            return Err(ConfigError::NonPositive { name, value: 0.0 });
        }
        Ok(())
    }
}

impl From<[u32; 2]> for CountRange {
    fn from([min, max]: [u32; 2]) -> Self {
        Self { min, max }
    }
}

impl From<CountRange> for [u32; 2] {
    fn from(r: CountRange) -> Self {
        [r.min, r.max]
    }
}

/// A diffuse/bump texture pair applied to buildings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialVariant {
    pub diffuse_texture: String,
    pub bump_texture: String,
}

impl MaterialVariant {
    pub fn new(diffuse_texture: impl Into<String>, bump_texture: impl Into<String>) -> Self {
        Self {
            diffuse_texture: diffuse_texture.into(),
            bump_texture: bump_texture.into(),
        }
    }
}

/// How buildings pick from `material_variants`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MaterialMode {
    /// Every building uses the same variant.
    Fixed { index: usize },
    /// Each building draws a variant uniformly.
    #[default]
    Random,
}

/// Per-deployment shadow participation beyond the defaults
/// (ground and walls receive, buildings cast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowPolicy {
    /// Walls also cast shadows.
    pub walls_cast: bool,
    /// Buildings also receive shadows from each other.
    pub buildings_receive: bool,
}

/// Static parameters driving environment generation.
///
/// Missing fields fall back to [`GeometryConfig::default`], which reproduces
/// the stock 200 x 200 arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryConfig {
    pub ground_width: f32,
    pub ground_depth: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,
    pub building_count: CountRange,
    pub building_width: SizeRange,
    pub building_depth: SizeRange,
    pub building_height: SizeRange,
    pub material_variants: Vec<MaterialVariant>,
    pub material_mode: MaterialMode,
    pub shadows: ShadowPolicy,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            ground_width: 200.0,
            ground_depth: 200.0,
            wall_thickness: 1.0,
            wall_height: 10.0,
            building_count: CountRange::new(10, 25),
            building_width: SizeRange::new(4.0, 12.0),
            building_depth: SizeRange::new(4.0, 12.0),
            building_height: SizeRange::new(6.0, 30.0),
            material_variants: vec![
                MaterialVariant::new(
                    "textures/concrete_diffuse.jpg",
                    "textures/concrete_bump.jpg",
                ),
                MaterialVariant::new("textures/brick_diffuse.jpg", "textures/brick_bump.jpg"),
                MaterialVariant::new("textures/glass_diffuse.jpg", "textures/glass_bump.jpg"),
            ],
            material_mode: MaterialMode::Random,
            shadows: ShadowPolicy::default(),
        }
    }
}

impl GeometryConfig {
    /// Check every invariant. Generation calls this before building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ground_width", self.ground_width)?;
        positive("ground_depth", self.ground_depth)?;
        positive("wall_thickness", self.wall_thickness)?;
        positive("wall_height", self.wall_height)?;
        self.building_count.validate("building_count")?;
        self.building_width.validate("building_width")?;
        self.building_depth.validate("building_depth")?;
        self.building_height.validate("building_height")?;

        if self.material_variants.is_empty() {
            return Err(ConfigError::NoMaterialVariants);
        }
        if let MaterialMode::Fixed { index } = self.material_mode {
            let count = self.material_variants.len();
            if index >= count {
                return Err(ConfigError::VariantOutOfRange { index, count });
            }
        }
        Ok(())
    }

    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "geometry config loaded");
        Ok(config)
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositive {
            name,
            value: value as f64,
        });
    }
    Ok(())
}
