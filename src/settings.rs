//! Animation parameter snapshot
//!
//! The controller mutates a `Settings` between ticks and hands the engine a
//! shared reference; nothing inside the engine writes to it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::curves::Curve;

/// How input units are spread over the grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Distribution {
    /// Units cycle to fill every cell in row-major order
    #[default]
    Repeat,
    /// One unit per cell; cells past the last unit stay empty
    SplitLetter,
    /// One unit per row, first column only
    SplitWord,
}

impl Distribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distribution::Repeat => "repeat",
            Distribution::SplitLetter => "split-letter",
            Distribution::SplitWord => "split-word",
        }
    }
}

/// How the upstream tokenizer split the text into units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tokenization {
    #[default]
    Characters,
    Words,
}

/// Rule mapping grid coordinates to a normalized progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SequencePattern {
    #[default]
    Linear,
    CenterOut,
    Wave,
    Spiral,
    Random,
}

/// Axis used by the linear, wave and center-out patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LinearDirection {
    #[default]
    Horizontal,
    Vertical,
    Diagonal,
}

/// Position amplitude units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PositionMode {
    /// Amplitude in pixels
    #[default]
    Oscillate,
    /// Amplitude in percent of the canvas extent
    Travel,
}

/// Where position amplitude is strongest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[default]
    Off,
    /// Still at the center, full swing at the rim
    Center,
    /// Still at the rim, full swing at the center
    Edges,
    /// Horizontal distance from the center column only
    SideToSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub columns: u32,
    pub rows: u32,
    /// Extra horizontal offset added to every cell center (px)
    pub tracking: f32,
    /// Extra vertical offset added to every cell center (px)
    pub line_spacing: f32,
    pub distribution: Distribution,
    /// Glyph size in px; drives collision radius and containment
    pub font_size: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            tracking: 0.0,
            line_spacing: 0.0,
            distribution: Distribution::Repeat,
            font_size: 32.0,
        }
    }
}

/// Inputs of the spatial phase calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceSettings {
    pub pattern: SequencePattern,
    /// Number of full 2π cycles spread over progress 0..1
    pub wave_cycles: f32,
    pub direction: LinearDirection,
    pub spiral_density: f32,
    pub row_phase_offset: f32,
    pub col_phase_offset: f32,
}

impl Default for SequenceSettings {
    fn default() -> Self {
        Self {
            pattern: SequencePattern::Linear,
            wave_cycles: 1.0,
            direction: LinearDirection::Horizontal,
            spiral_density: 1.0,
            row_phase_offset: 0.0,
            col_phase_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub enabled: bool,
    pub curve: Curve,
    pub min: f32,
    pub max: f32,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            curve: Curve::Sine,
            min: 0.5,
            max: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSettings {
    pub enabled: bool,
    /// Easing applied to both lobes; also selects the collision response shape
    pub curve: Curve,
    pub mode: PositionMode,
    pub amplitude_x: f32,
    pub amplitude_y: f32,
    /// Y lobe frequency multiplier
    pub frequency: f32,
    pub origin: Origin,
    /// Keep each glyph inside its own cell
    pub contain: bool,
}

impl Default for PositionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            curve: Curve::Sine,
            mode: PositionMode::Oscillate,
            amplitude_x: 10.0,
            amplitude_y: 10.0,
            frequency: 1.0,
            origin: Origin::Off,
            contain: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub enabled: bool,
    pub curve: Curve,
    /// Degrees
    pub amplitude: f32,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            curve: Curve::Sine,
            amplitude: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacitySettings {
    pub enabled: bool,
    pub curve: Curve,
    pub min: f32,
    pub max: f32,
}

impl Default for OpacitySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            curve: Curve::Sine,
            min: 0.2,
            max: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSettings {
    pub enabled: bool,
    pub curve: Curve,
    /// Peak |z| in px
    pub amplitude: f32,
    /// Distance from the viewer to the z = 0 plane
    pub perspective: f32,
    pub affect_scale: bool,
    pub affect_opacity: bool,
    /// Opacity lost at the farthest depth (0..1)
    pub fade_strength: f32,
    /// Draw back-to-front
    pub sort: bool,
}

impl Default for DepthSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            curve: Curve::Sine,
            amplitude: 200.0,
            perspective: 800.0,
            affect_scale: true,
            affect_opacity: false,
            fade_strength: 0.6,
            sort: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterSettings {
    pub enabled: bool,
    /// Peak offset in px
    pub amplitude: f32,
    /// Jitter clock rate relative to the animation clock
    pub speed: f32,
    /// Spatial frequency of the noise field over grid coordinates
    pub frequency: f32,
}

impl Default for JitterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            amplitude: 2.0,
            speed: 1.0,
            frequency: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionSettings {
    pub enabled: bool,
    pub wall_bounce: bool,
    pub strength: f32,
    /// Deflection lifetime in seconds
    pub duration: f32,
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            wall_bounce: false,
            strength: 1.0,
            duration: 0.5,
        }
    }
}

/// Complete parameter snapshot for one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Multiplier on the global animation driver
    pub global_speed: f32,
    /// Blend of the noise curve toward 0.5 (0 = flat, 1 = full noise)
    pub noise_intensity: f32,

    pub grid: GridSettings,
    pub sequence: SequenceSettings,

    // === Channels ===
    pub scale: ScaleSettings,
    pub position: PositionSettings,
    pub rotation: RotationSettings,
    pub opacity: OpacitySettings,
    pub depth: DepthSettings,
    pub jitter: JitterSettings,

    pub collision: CollisionSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            global_speed: 1.0,
            noise_intensity: 1.0,
            grid: GridSettings::default(),
            sequence: SequenceSettings::default(),
            scale: ScaleSettings::default(),
            position: PositionSettings::default(),
            rotation: RotationSettings::default(),
            opacity: OpacitySettings::default(),
            depth: DepthSettings::default(),
            jitter: JitterSettings::default(),
            collision: CollisionSettings::default(),
        }
    }
}

impl Settings {
    /// Settings with every motion channel and collision switched off
    pub fn still() -> Self {
        let mut settings = Self::default();
        settings.scale.enabled = false;
        settings.position.enabled = false;
        settings.rotation.enabled = false;
        settings.opacity.enabled = false;
        settings.depth.enabled = false;
        settings.jitter.enabled = false;
        settings.collision.enabled = false;
        settings
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
