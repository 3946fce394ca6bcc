//! Map grid constants and their file-backed configuration.
//!
//! A map is a square of `zones_per_axis` x `zones_per_axis` zones, each zone a
//! square of `cells_per_zone` x `cells_per_zone` cells of `cell_size` world
//! units. Config files are YAML (`.yaml`, `.yml`) or JSON (`.json`):
//!
//! ```text
//! zones_per_axis: 64
//! cells_per_zone: 8
//! cell_size: 66.66666
//! origin: centered
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of zones along one map axis in the classic layout.
pub const DEFAULT_ZONES_PER_AXIS: u32 = 64;
/// Number of cells along one zone axis in the classic layout.
pub const DEFAULT_CELLS_PER_ZONE: u32 = 8;
/// Edge length of one zone in world units.
pub const DEFAULT_ZONE_SIZE: f32 = 533.333_3;

/// Errors from loading or validating a grid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid grid config: {0}")]
    Invalid(String),
}

/// Where world coordinate (0, 0) sits on the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridOrigin {
    /// World origin at the middle of the map; negative coordinates are valid.
    #[default]
    Centered,
    /// World origin at the low corner of cell (0, 0).
    Corner,
}

/// Map-wide grid constants consumed by the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub zones_per_axis: u32,
    pub cells_per_zone: u32,
    /// Edge length of one cell in world units.
    pub cell_size: f32,
    pub origin: GridOrigin,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            zones_per_axis: DEFAULT_ZONES_PER_AXIS,
            cells_per_zone: DEFAULT_CELLS_PER_ZONE,
            cell_size: DEFAULT_ZONE_SIZE / DEFAULT_CELLS_PER_ZONE as f32,
            origin: GridOrigin::Centered,
        }
    }
}

impl GridConfig {
    /// Total number of cells along one map axis.
    pub fn total_cells_per_axis(&self) -> u32 {
        self.zones_per_axis.saturating_mul(self.cells_per_zone)
    }

    /// Edge length of one zone in world units.
    pub fn zone_size(&self) -> f32 {
        self.cells_per_zone as f32 * self.cell_size
    }

    /// Upper bound for any query radius. One zone, like the classic server.
    pub fn max_search_radius(&self) -> f32 {
        self.zone_size()
    }

    /// Cell index that contains world coordinate 0 on each axis.
    pub fn origin_cell(&self) -> i32 {
        match self.origin {
            GridOrigin::Centered => (self.total_cells_per_axis() / 2) as i32,
            GridOrigin::Corner => 0,
        }
    }

    /// Zone index that contains world coordinate 0 on each axis.
    pub fn origin_zone(&self) -> i32 {
        match self.origin {
            GridOrigin::Centered => (self.zones_per_axis / 2) as i32,
            GridOrigin::Corner => 0,
        }
    }

    /// Lowest world coordinate inside the map, on either axis.
    pub fn world_min(&self) -> f32 {
        -(self.origin_cell() as f32) * self.cell_size
    }

    /// Highest world coordinate bounding the map (exclusive), on either axis.
    pub fn world_max(&self) -> f32 {
        self.world_min() + self.total_cells_per_axis() as f32 * self.cell_size
    }

    /// Check that the constants describe a usable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones_per_axis == 0 {
            return Err(ConfigError::Invalid("zones_per_axis must be positive".into()));
        }
        if self.cells_per_zone == 0 {
            return Err(ConfigError::Invalid("cells_per_zone must be positive".into()));
        }
        match self.zones_per_axis.checked_mul(self.cells_per_zone) {
            Some(total) if total <= i32::MAX as u32 => {}
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "{} zones of {} cells overflow the cell index range",
                    self.zones_per_axis, self.cells_per_zone
                )));
            }
        }
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be finite and positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::debug!(
            path = %path.display(),
            total_cells = config.total_cells_per_axis(),
            cell_size = config.cell_size,
            "loaded grid config"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_classic_layout() {
        let config = GridConfig::default();
        assert_eq!(config.total_cells_per_axis(), 512);
        assert_eq!(config.origin_cell(), 256);
        assert_eq!(config.origin_zone(), 32);
        assert!((config.max_search_radius() - DEFAULT_ZONE_SIZE).abs() < 1e-3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn centered_map_is_symmetric() {
        let config = GridConfig::default();
        assert!((config.world_min() + config.world_max()).abs() < 1e-2);
    }

    #[test]
    fn corner_map_starts_at_zero() {
        let config = GridConfig {
            origin: GridOrigin::Corner,
            ..GridConfig::default()
        };
        assert_eq!(config.origin_cell(), 0);
        assert_eq!(config.world_min(), 0.0);
    }

    #[test]
    fn rejects_zero_cells_per_zone() {
        let config = GridConfig {
            cells_per_zone: 0,
            ..GridConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_non_finite_cell_size() {
        let config = GridConfig {
            cell_size: f32::NAN,
            ..GridConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_overflowing_grid() {
        let config = GridConfig {
            zones_per_axis: u32::MAX,
            cells_per_zone: 2,
            ..GridConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = GridConfig::from_yaml_str("cells_per_zone: 16\norigin: corner\n").unwrap();
        assert_eq!(config.cells_per_zone, 16);
        assert_eq!(config.zones_per_axis, DEFAULT_ZONES_PER_AXIS);
        assert_eq!(config.origin, GridOrigin::Corner);
    }

    #[test]
    fn json_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.json");
        let original = GridConfig {
            cells_per_zone: 16,
            cell_size: 533.33,
            origin: GridOrigin::Corner,
            ..GridConfig::default()
        };
        std::fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();
        assert_eq!(GridConfig::load(&path).unwrap(), original);
    }

    #[test]
    fn load_rejects_unknown_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "cells_per_zone = 8").unwrap();
        assert!(matches!(
            GridConfig::load(file.path()),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_reports_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.yml");
        std::fs::write(&path, "cell_size: -1.0\n").unwrap();
        assert!(matches!(
            GridConfig::load(&path),
            Err(ConfigError::Invalid(_))
        ));
    }
}
