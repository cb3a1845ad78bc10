//! Indicator configuration (nebula.toml)
//!
//! ```toml
//! [cursor]
//! padding = 6
//! padding_top = 10
//! spring_stiffness = 1500.0
//! spring_damping_ratio = 0.75
//! size_duration_ms = 200
//! size_easing = "accelerate_decelerate"
//!
//! [tracker]
//! auto_track = true
//! clip_enabled = true
//!
//! [anchor]
//! enabled = true
//! keyline_fraction = 0.35
//! keyline_offset = 0
//! max_scroll_duration_ms = 200
//! millis_per_inch = 25.0
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use nebula_animation::spring::{damping_ratio, stiffness};
use nebula_animation::Easing;
use nebula_core::{ElementId, Insets};

use crate::anchor::{AnchorConfig, AnchorScroller};
use crate::cursor::{AnimationConfig, CursorAnimator, DEFAULT_SIZE_DURATION_MS};
use crate::error::{ConfigError, Result};
use crate::tracker::FocusTracker;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FocusConfig {
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub anchor: AnchorConfig,
}

/// Indicator padding and animation
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CursorConfig {
    /// Uniform padding on every edge
    #[serde(default)]
    pub padding: i32,
    /// Per-edge overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<i32>,
    #[serde(default = "default_stiffness")]
    pub spring_stiffness: f32,
    #[serde(default = "default_damping_ratio")]
    pub spring_damping_ratio: f32,
    #[serde(default = "default_size_duration_ms")]
    pub size_duration_ms: u32,
    #[serde(default = "default_size_easing")]
    pub size_easing: Easing,
}

fn default_stiffness() -> f32 {
    stiffness::MEDIUM
}

fn default_damping_ratio() -> f32 {
    damping_ratio::LOW_BOUNCY
}

fn default_size_duration_ms() -> u32 {
    DEFAULT_SIZE_DURATION_MS
}

fn default_size_easing() -> Easing {
    Easing::AccelerateDecelerate
}

fn default_true() -> bool {
    true
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            padding: 0,
            padding_left: None,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            spring_stiffness: default_stiffness(),
            spring_damping_ratio: default_damping_ratio(),
            size_duration_ms: default_size_duration_ms(),
            size_easing: default_size_easing(),
        }
    }
}

impl CursorConfig {
    /// Effective insets: uniform value with per-edge overrides applied
    pub fn insets(&self) -> Insets {
        Insets::new(
            self.padding_left.unwrap_or(self.padding),
            self.padding_top.unwrap_or(self.padding),
            self.padding_right.unwrap_or(self.padding),
            self.padding_bottom.unwrap_or(self.padding),
        )
    }

    pub fn animation(&self) -> AnimationConfig {
        AnimationConfig {
            stiffness: self.spring_stiffness,
            damping_ratio: self.spring_damping_ratio,
            size_duration_ms: self.size_duration_ms,
            size_easing: self.size_easing,
        }
    }
}

/// Tracker switches
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Follow host focus notifications
    #[serde(default = "default_true")]
    pub auto_track: bool,
    #[serde(default = "default_true")]
    pub clip_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            auto_track: true,
            clip_enabled: true,
        }
    }
}

impl FocusConfig {
    /// Parse and validate
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: FocusConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading focus config");
        Self::from_toml_str(&source)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let cursor = &self.cursor;
        if !(cursor.spring_stiffness.is_finite() && cursor.spring_stiffness > 0.0) {
            return Err(invalid("cursor.spring_stiffness", "must be greater than 0", cursor.spring_stiffness));
        }
        if !(cursor.spring_damping_ratio.is_finite() && cursor.spring_damping_ratio >= 0.0) {
            return Err(invalid("cursor.spring_damping_ratio", "must be 0 or greater", cursor.spring_damping_ratio));
        }

        let anchor = &self.anchor;
        if !(0.0..=1.0).contains(&anchor.keyline_fraction) {
            return Err(invalid("anchor.keyline_fraction", "must be within [0, 1]", anchor.keyline_fraction));
        }
        if !(anchor.millis_per_inch.is_finite() && anchor.millis_per_inch > 0.0) {
            return Err(invalid("anchor.millis_per_inch", "must be greater than 0", anchor.millis_per_inch));
        }
        if anchor.max_scroll_duration_ms == 0 {
            return Err(invalid("anchor.max_scroll_duration_ms", "must be greater than 0", 0));
        }
        Ok(())
    }

    /// A cursor configured with this config's padding and animation
    pub fn build_cursor(&self, element_id: ElementId) -> CursorAnimator {
        let mut cursor = CursorAnimator::with_config(element_id, self.cursor.animation());
        cursor.set_padding(self.cursor.insets());
        cursor
    }

    /// A detached tracker with this config's switches
    pub fn build_tracker(&self) -> FocusTracker {
        let tracker = FocusTracker::new();
        tracker.set_auto_track_enabled(self.tracker.auto_track);
        tracker.set_clip_enabled(self.tracker.clip_enabled);
        tracker
    }

    pub fn build_anchor_scroller(&self) -> AnchorScroller {
        AnchorScroller::new(self.anchor)
    }
}

fn invalid(field: &'static str, rule: &str, value: impl std::fmt::Display) -> ConfigError {
    tracing::warn!(field, %value, "rejected config value");
    ConfigError::Invalid {
        field,
        reason: format!("{rule}, got {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = FocusConfig::from_toml_str("").unwrap();
        assert_eq!(config, FocusConfig::default());
        assert_eq!(config.cursor.spring_stiffness, 1500.0);
        assert_eq!(config.cursor.size_duration_ms, 200);
        assert_eq!(config.anchor.keyline_fraction, 0.35);
        assert_eq!(config.anchor.max_scroll_duration_ms, 200);
        assert!(config.tracker.auto_track);
        assert!(config.tracker.clip_enabled);
    }

    #[test]
    fn test_per_edge_padding_overrides_uniform() {
        let config = FocusConfig::from_toml_str(
            r#"
            [cursor]
            padding = 6
            padding_top = 10
            padding_right = -2
            "#,
        )
        .unwrap();
        assert_eq!(config.cursor.insets(), Insets::new(6, 10, -2, 6));
    }

    #[test]
    fn test_partial_sections() {
        let config = FocusConfig::from_toml_str(
            r#"
            [tracker]
            clip_enabled = false

            [anchor]
            keyline_fraction = 0.5
            "#,
        )
        .unwrap();
        assert!(config.tracker.auto_track);
        assert!(!config.tracker.clip_enabled);
        assert_eq!(config.anchor.keyline_fraction, 0.5);
        assert!(config.anchor.enabled);
        assert_eq!(config.anchor.millis_per_inch, 25.0);
    }

    #[test]
    fn test_easing_by_name() {
        let config = FocusConfig::from_toml_str("[cursor]\nsize_easing = \"ease_out_cubic\"\n").unwrap();
        assert_eq!(config.cursor.size_easing, Easing::EaseOutCubic);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let err = FocusConfig::from_toml_str("[anchor]\nkeyline_fraction = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "anchor.keyline_fraction",
                ..
            }
        ));

        let err = FocusConfig::from_toml_str("[cursor]\nspring_stiffness = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cursor.spring_stiffness", .. }));

        let err = FocusConfig::from_toml_str("[anchor]\nmax_scroll_duration_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = FocusConfig::from_toml_str("[cursor\npadding = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FocusConfig::load("/nonexistent/nebula.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_written_config_reads_back() {
        let mut config = FocusConfig::default();
        config.cursor.padding = 4;
        config.cursor.padding_bottom = Some(12);
        config.tracker.auto_track = false;

        let text = config.to_toml().unwrap();
        assert_eq!(FocusConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_builders_apply_config() {
        let mut config = FocusConfig::default();
        config.cursor.padding = 3;
        config.tracker.clip_enabled = false;
        config.anchor.keyline_fraction = 0.5;

        let cursor = config.build_cursor(ElementId(9));
        assert_eq!(cursor.padding(), Insets::uniform(3));
        assert_eq!(cursor.element_id(), ElementId(9));

        let tracker = config.build_tracker();
        assert!(!tracker.clip_enabled());
        assert!(tracker.auto_track_enabled());

        assert_eq!(config.build_anchor_scroller().config().keyline_fraction, 0.5);
    }
}
