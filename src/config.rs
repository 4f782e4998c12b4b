//! Configuration loading for DrishtiNav.
//!
//! All sections deserialize from TOML with per-field defaults, so a partial
//! (or missing) config file always yields a usable configuration.
//! Validation errors are fatal at construction time; nothing here can fail
//! at runtime.

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub vision: VisionConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub exploration: ExplorationConfig,
}

/// Exploration grid geometry and visit policy.
#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells (default: 100).
    #[serde(default = "default_grid_dim")]
    pub width: u32,

    /// Grid height in cells (default: 100).
    #[serde(default = "default_grid_dim")]
    pub height: u32,

    /// Cell edge length in meters (default: 0.1).
    #[serde(default = "default_cell_size")]
    pub cell_size_m: f32,

    /// Visits after which a cell counts as explored (default: 3).
    #[serde(default = "default_max_visits")]
    pub max_visits_per_cell: u32,
}

/// Monocular distance-estimation calibration.
///
/// The distance formula is a known-rough heuristic; no real calibration
/// data exists for these constants, so they are configuration rather than
/// code.
#[derive(Clone, Debug, Deserialize)]
pub struct VisionConfig {
    /// Assumed real-world width of a typical obstacle (cm, default: 20).
    #[serde(default = "default_known_object_width")]
    pub known_object_width_cm: f32,

    /// Assumed focal length in pixels (default: 500).
    #[serde(default = "default_focal_length")]
    pub focal_length_px: f32,

    /// Lower clamp for distance estimates (cm, default: 5).
    #[serde(default = "default_min_range")]
    pub min_range_cm: f32,

    /// Upper clamp for distance estimates (cm, default: 500).
    #[serde(default = "default_max_range")]
    pub max_range_cm: f32,

    /// Distances above this are safe to move through (cm, default: 30).
    #[serde(default = "default_safe_distance")]
    pub safe_distance_cm: f32,

    /// Distances at or below this force an emergency stop (cm, default: 10).
    #[serde(default = "default_min_distance")]
    pub min_distance_cm: f32,

    /// Gradient magnitude above which a pixel counts as an edge
    /// (default: 100).
    #[serde(default = "default_edge_threshold")]
    pub edge_threshold: f32,
}

/// Dead-reckoning motion model.
#[derive(Clone, Debug, Deserialize)]
pub struct MotionConfig {
    /// Linear speed while moving (m/s, default: 0.2).
    #[serde(default = "default_speed")]
    pub speed_mps: f32,

    /// Heading step for a sharp in-place turn (degrees, default: 30).
    #[serde(default = "default_sharp_turn")]
    pub sharp_turn_deg: f32,

    /// Heading step for a smooth heading correction (degrees, default: 15).
    #[serde(default = "default_smooth_turn")]
    pub smooth_turn_deg: f32,

    /// Nominal duration of one executed action (seconds, default: 0.5).
    #[serde(default = "default_step_duration")]
    pub step_duration_s: f32,
}

/// Exploration loop pacing and obstacle bookkeeping.
#[derive(Clone, Debug, Deserialize)]
pub struct ExplorationConfig {
    /// Loop rate in Hz (default: 2.0).
    #[serde(default = "default_loop_rate")]
    pub loop_rate_hz: f32,

    /// Confidence recorded for vision-detected obstacles (default: 0.8).
    #[serde(default = "default_obstacle_confidence")]
    pub obstacle_confidence: f32,

    /// Chebyshev radius for nearby-obstacle queries (cells, default: 2).
    #[serde(default = "default_obstacle_radius")]
    pub obstacle_search_radius: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_dim(),
            height: default_grid_dim(),
            cell_size_m: default_cell_size(),
            max_visits_per_cell: default_max_visits(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            known_object_width_cm: default_known_object_width(),
            focal_length_px: default_focal_length(),
            min_range_cm: default_min_range(),
            max_range_cm: default_max_range(),
            safe_distance_cm: default_safe_distance(),
            min_distance_cm: default_min_distance(),
            edge_threshold: default_edge_threshold(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed_mps: default_speed(),
            sharp_turn_deg: default_sharp_turn(),
            smooth_turn_deg: default_smooth_turn(),
            step_duration_s: default_step_duration(),
        }
    }
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            loop_rate_hz: default_loop_rate(),
            obstacle_confidence: default_obstacle_confidence(),
            obstacle_search_radius: default_obstacle_radius(),
        }
    }
}

// Default value functions
fn default_grid_dim() -> u32 {
    100
}
fn default_cell_size() -> f32 {
    0.1
}
fn default_max_visits() -> u32 {
    3
}
fn default_known_object_width() -> f32 {
    20.0
}
fn default_focal_length() -> f32 {
    500.0
}
fn default_min_range() -> f32 {
    5.0
}
fn default_max_range() -> f32 {
    500.0
}
fn default_safe_distance() -> f32 {
    30.0
}
fn default_min_distance() -> f32 {
    10.0
}
fn default_edge_threshold() -> f32 {
    100.0
}
fn default_speed() -> f32 {
    0.2
}
fn default_sharp_turn() -> f32 {
    30.0
}
fn default_smooth_turn() -> f32 {
    15.0
}
fn default_step_duration() -> f32 {
    0.5
}
fn default_loop_rate() -> f32 {
    2.0
}
fn default_obstacle_confidence() -> f32 {
    0.8
}
fn default_obstacle_radius() -> i32 {
    2
}

impl GridConfig {
    /// Physical map width in meters.
    pub fn width_m(&self) -> f32 {
        self.width as f32 * self.cell_size_m
    }

    /// Physical map height in meters.
    pub fn height_m(&self) -> f32 {
        self.height as f32 * self.cell_size_m
    }
}

impl NavConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(NavError::Config(format!(
                "Grid dimensions must be non-zero (got {}x{})",
                self.grid.width, self.grid.height
            )));
        }
        if self.grid.cell_size_m <= 0.0 {
            return Err(NavError::Config(format!(
                "Cell size must be positive (got {})",
                self.grid.cell_size_m
            )));
        }
        if self.grid.max_visits_per_cell == 0 {
            return Err(NavError::Config(
                "max_visits_per_cell must be at least 1".to_string(),
            ));
        }
        if self.vision.min_range_cm <= 0.0 || self.vision.max_range_cm <= self.vision.min_range_cm {
            return Err(NavError::Config(format!(
                "Invalid distance clamp range [{}, {}]",
                self.vision.min_range_cm, self.vision.max_range_cm
            )));
        }
        if self.vision.min_distance_cm <= 0.0
            || self.vision.safe_distance_cm < self.vision.min_distance_cm
        {
            return Err(NavError::Config(format!(
                "Distance thresholds must satisfy 0 < min ({}) <= safe ({})",
                self.vision.min_distance_cm, self.vision.safe_distance_cm
            )));
        }
        if self.motion.speed_mps <= 0.0 {
            return Err(NavError::Config(format!(
                "Speed must be positive (got {})",
                self.motion.speed_mps
            )));
        }
        if self.motion.sharp_turn_deg <= 0.0 || self.motion.smooth_turn_deg <= 0.0 {
            return Err(NavError::Config(
                "Turn steps must be positive".to_string(),
            ));
        }
        if self.exploration.loop_rate_hz <= 0.0 {
            return Err(NavError::Config(format!(
                "Loop rate must be positive (got {})",
                self.exploration.loop_rate_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid.width, 100);
        assert_eq!(config.grid.max_visits_per_cell, 3);
        assert_eq!(config.vision.min_distance_cm, 10.0);
        assert_eq!(config.motion.sharp_turn_deg, 30.0);
    }

    #[test]
    fn test_zero_cell_size_rejected() {
        let mut config = NavConfig::default();
        config.grid.cell_size_m = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let mut config = NavConfig::default();
        config.grid.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: NavConfig = toml::from_str(
            r#"
            [grid]
            width = 50

            [vision]
            min_distance_cm = 12.0
            "#,
        )
        .unwrap();
        assert_eq!(config.grid.width, 50);
        assert_eq!(config.grid.height, 100);
        assert_eq!(config.vision.min_distance_cm, 12.0);
        assert_eq!(config.vision.safe_distance_cm, 30.0);
    }

    #[test]
    fn test_physical_bounds() {
        let grid = GridConfig::default();
        assert!((grid.width_m() - 10.0).abs() < 1e-6);
        assert!((grid.height_m() - 10.0).abs() < 1e-6);
    }
}
