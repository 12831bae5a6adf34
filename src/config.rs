//! Explorer configuration
//!
//! Every field has a default, so an empty YAML document (or no file at all)
//! yields a working configuration against a local service.

use crate::client::{Depth, Direction};
use crate::geometry::CanvasSize;
use crate::layout::LayoutConfig;
use crate::viewport::ViewportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for a single explorer session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Base URL of the graph service
    pub service_url: String,
    pub request_timeout_secs: u64,

    /// Hops fetched by loads and expansions until the user changes it
    pub default_depth: u8,
    pub direction: Direction,
    /// Cap on neighbor nodes per neighborhood fetch
    pub neighbor_limit: usize,
    /// Cap on type-ahead candidates
    pub search_limit: usize,
    /// Hop bound for shortest-path lookups
    pub path_max_depth: u8,

    pub zoom_factor: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Hit-test radius in screen pixels
    pub hit_radius: f64,

    pub canvas_width: f64,
    pub canvas_height: f64,
    pub layout_radius_factor: f64,
    pub sibling_spacing: f64,
    pub ring_spacing: f64,

    /// Max gap between the two presses of a double click
    pub double_click_ms: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        let viewport = ViewportConfig::default();
        Self {
            service_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            default_depth: 1,
            direction: Direction::Both,
            neighbor_limit: 50,
            search_limit: 20,
            path_max_depth: 5,
            zoom_factor: viewport.zoom_factor,
            min_scale: viewport.min_scale,
            max_scale: viewport.max_scale,
            hit_radius: viewport.hit_radius,
            canvas_width: 800.0,
            canvas_height: 600.0,
            layout_radius_factor: layout.radius_factor,
            sibling_spacing: layout.sibling_spacing,
            ring_spacing: layout.ring_spacing,
            double_click_ms: 400,
        }
    }
}

impl ExplorerConfig {
    /// Parse and validate a YAML (or JSON) document
    pub fn from_yaml_str(source: &str) -> ConfigResult<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        let config: ExplorerConfig = if source.trim().is_empty() {
            ExplorerConfig::default()
        } else {
            serde_yaml::from_str(source)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&source)?;
        info!("Loaded explorer configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings the components cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.service_url.trim().is_empty() {
            return Err(ConfigError::Invalid("service_url must not be empty".to_string()));
        }
        if Depth::new(self.default_depth).is_none() {
            return Err(ConfigError::Invalid(format!(
                "default_depth must be between 1 and 3, got {}",
                self.default_depth
            )));
        }
        if self.neighbor_limit == 0 || self.search_limit == 0 {
            return Err(ConfigError::Invalid("neighbor_limit and search_limit must be positive".to_string()));
        }
        if self.path_max_depth == 0 {
            return Err(ConfigError::Invalid("path_max_depth must be positive".to_string()));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0 && self.max_scale >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "scale bounds must satisfy 0 < min_scale <= 1 <= max_scale, got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.zoom_factor > 1.0 && self.zoom_factor.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "zoom_factor must be greater than 1, got {}",
                self.zoom_factor
            )));
        }
        let positive = [
            ("hit_radius", self.hit_radius),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("layout_radius_factor", self.layout_radius_factor),
            ("sibling_spacing", self.sibling_spacing),
            ("ring_spacing", self.ring_spacing),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0 && v.is_finite())) {
            return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }

    /// `default_depth` as a checked depth, falling back to one hop
    pub fn depth(&self) -> Depth {
        Depth::new(self.default_depth).unwrap_or_default()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            radius_factor: self.layout_radius_factor,
            sibling_spacing: self.sibling_spacing,
            ring_spacing: self.ring_spacing,
        }
    }

    pub fn viewport_config(&self) -> ViewportConfig {
        ViewportConfig {
            zoom_factor: self.zoom_factor,
            min_scale: self.min_scale,
            max_scale: self.max_scale,
            hit_radius: self.hit_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = ExplorerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.service_url, "http://localhost:8000");
        assert_eq!(config.depth(), Depth::MIN);
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.viewport_config(), ViewportConfig::default());
        assert_eq!(config.layout_config(), LayoutConfig::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ExplorerConfig::from_yaml_str(
            "service_url: http://graph.internal:9000\ndefault_depth: 2\ndirection: outgoing\n",
        )
        .unwrap();
        assert_eq!(config.service_url, "http://graph.internal:9000");
        assert_eq!(config.depth().get(), 2);
        assert_eq!(config.direction, Direction::Outgoing);
        assert_eq!(config.neighbor_limit, 50);
        assert_eq!(config.double_click_window(), Duration::from_millis(400));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(ExplorerConfig::from_yaml_str("").unwrap(), ExplorerConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        for yaml in [
            "default_depth: 4",
            "min_scale: 0.0",
            "max_scale: 0.5",
            "zoom_factor: 1.0",
            "search_limit: 0",
            "hit_radius: -3.0",
        ] {
            assert!(
                matches!(ExplorerConfig::from_yaml_str(yaml), Err(ConfigError::Invalid(_))),
                "accepted {}",
                yaml
            );
        }
        assert!(matches!(
            ExplorerConfig::from_yaml_str("zoom_factor: [1, 2]"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "canvas_width: 1024\ncanvas_height: 768\nrequest_timeout_secs: 5").unwrap();

        let config = ExplorerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.canvas_size(), CanvasSize::new(1024.0, 768.0));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        assert!(matches!(
            ExplorerConfig::from_file("/nonexistent/explorer.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
