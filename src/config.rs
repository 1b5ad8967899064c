//! Rendering and generation settings, loaded from YAML.
//!
//! ```yaml
//! convention: pixel-y
//! theme: dark
//! view_mode: desktop
//! generation_timeout_secs: 60
//! type_colors:
//!   button: { fill: "#2563EB", text: "#FFFFFF", border: "#1D4ED8" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{WireframeError, WireframeResult};
use crate::palette::TypeColors;

/// Units of `x`, `y`, `width` and `height`. Always chosen explicitly, never inferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinateConvention {
    /// `x`/`width` in percent of the page width, `y`/`height` in pixels.
    #[default]
    #[serde(alias = "a")]
    PixelY,
    /// All four values in percent of a square canvas.
    #[serde(alias = "b")]
    PercentGrid,
}

impl CoordinateConvention {
    pub fn default_min_extent(self) -> f64 {
        match self {
            CoordinateConvention::PixelY => 800.0,
            CoordinateConvention::PercentGrid => 100.0,
        }
    }

    pub fn default_extent_padding(self) -> f64 {
        match self {
            CoordinateConvention::PixelY => 100.0,
            CoordinateConvention::PercentGrid => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Desktop,
    Mobile,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Desktop => ViewMode::Mobile,
            ViewMode::Mobile => ViewMode::Desktop,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Desktop => "desktop",
            ViewMode::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireframeConfig {
    pub convention: CoordinateConvention,
    /// Minimum page extent; convention default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_extent: Option<f64>,
    /// Added below the lowest element; convention default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent_padding: Option<f64>,
    /// Side of the square canvas used by the percentage grid.
    pub grid_canvas_px: f64,
    pub theme: Theme,
    pub view_mode: ViewMode,
    pub generation_timeout_secs: u64,
    /// Per-type color overrides keyed by type name.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub type_colors: HashMap<String, TypeColors>,
}

impl Default for WireframeConfig {
    fn default() -> Self {
        Self {
            convention: CoordinateConvention::default(),
            min_extent: None,
            extent_padding: None,
            grid_canvas_px: 900.0,
            theme: Theme::default(),
            view_mode: ViewMode::default(),
            generation_timeout_secs: 120,
            type_colors: HashMap::new(),
        }
    }
}

impl WireframeConfig {
    pub fn with_convention(convention: CoordinateConvention) -> Self {
        Self {
            convention,
            ..Self::default()
        }
    }

    pub fn from_yaml(yaml: &str) -> WireframeResult<Self> {
        let config: WireframeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> WireframeResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            WireframeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&yaml)
    }

    pub fn min_extent(&self) -> f64 {
        self.min_extent
            .unwrap_or_else(|| self.convention.default_min_extent())
    }

    pub fn extent_padding(&self) -> f64 {
        self.extent_padding
            .unwrap_or_else(|| self.convention.default_extent_padding())
    }

    fn validate(&self) -> WireframeResult<()> {
        if let Some(min) = self.min_extent {
            if !(min.is_finite() && min >= 0.0) {
                return Err(WireframeError::Config(format!(
                    "min_extent must be a non-negative number, got {}",
                    min
                )));
            }
        }
        if let Some(padding) = self.extent_padding {
            if !(padding.is_finite() && padding >= 0.0) {
                return Err(WireframeError::Config(format!(
                    "extent_padding must be a non-negative number, got {}",
                    padding
                )));
            }
        }
        if !(self.grid_canvas_px.is_finite() && self.grid_canvas_px > 0.0) {
            return Err(WireframeError::Config(
                "grid_canvas_px must be positive".to_string(),
            ));
        }
        if self.generation_timeout_secs == 0 {
            return Err(WireframeError::Config(
                "generation_timeout_secs must be at least 1".to_string(),
            ));
        }
        for (kind, colors) in &self.type_colors {
            colors
                .validate()
                .map_err(|reason| WireframeError::Config(format!("type_colors.{}: {}", kind, reason)))?;
        }
        Ok(())
    }
}
