//! Tunables for layout, visual encoding and animation.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides:
//!
//! ```json
//! { "sphere_radius": 24.0, "palette": { "highlight": "#FF4081" } }
//! ```

use std::env;
use std::path::Path;

use serde::Deserialize;

use crate::error::CloudError;
use crate::render::style::Palette;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "INTEREST_CLOUD_CONFIG";

/// Configuration for building and animating the label cloud
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Radius of the sphere labels sit on (world units)
    pub sphere_radius: f32,
    /// Font size of the least popular item
    pub min_font_size: f32,
    /// Font size of the most popular item
    pub max_font_size: f32,
    /// Easing exponent applied to normalized popularity (< 1 is sub-linear)
    pub size_exponent: f32,
    /// Per-frame smoothing factor for color
    pub color_smoothing: f32,
    /// Per-frame smoothing factor for scale
    pub scale_smoothing: f32,
    /// Scale target while hovered (rest scale is 1.0)
    pub hover_scale: f32,
    /// Angular speed of the idle bob (rad/s)
    pub bob_speed: f32,
    /// Bob phase offset per rank step
    pub bob_phase_per_rank: f32,
    /// Vertical bob amplitude (world units)
    pub bob_amplitude: f32,
    /// Distance of the hover icon above its label (world units)
    pub icon_offset: f32,
    /// Idle camera rotation around the Y axis (rad/s), 0 disables
    pub auto_rotate_speed: f32,
    pub palette: PaletteConfig,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            sphere_radius: 20.0,
            min_font_size: 1.2,
            max_font_size: 8.0,
            size_exponent: 0.65,
            color_smoothing: 0.1,
            scale_smoothing: 0.12,
            hover_scale: 1.25,
            bob_speed: 0.9,
            bob_phase_per_rank: 0.7,
            bob_amplitude: 0.6,
            icon_offset: 3.0,
            auto_rotate_speed: 0.12,
            palette: PaletteConfig::default(),
        }
    }
}

/// Palette as written in config files: CSS hex strings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub gold: String,
    pub silver: String,
    pub bronze: String,
    pub neutral: String,
    pub highlight: String,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            gold: "#FFD700".into(),
            silver: "#C0C0C0".into(),
            bronze: "#CD7F32".into(),
            neutral: "#FFFFFF".into(),
            highlight: "#00E5FF".into(),
        }
    }
}

impl CloudConfig {
    /// Parse a config from JSON. The palette is validated eagerly so a bad
    /// color is reported at load time, not on first paint.
    pub fn from_json_str(s: &str) -> Result<Self, CloudError> {
        let cfg: CloudConfig = serde_json::from_str(s)?;
        cfg.palette()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self, CloudError> {
        let text = std::fs::read_to_string(path).map_err(|source| CloudError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load from the file named by `INTEREST_CLOUD_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self, CloudError> {
        match env::var(CONFIG_ENV) {
            Ok(path) => {
                log::info!("Loading config from {path}");
                Self::from_path(Path::new(&path))
            }
            Err(_) => {
                log::info!("{CONFIG_ENV} not set, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Resolve the hex palette into render colors.
    pub fn palette(&self) -> Result<Palette, CloudError> {
        Palette::from_config(&self.palette)
    }
}
