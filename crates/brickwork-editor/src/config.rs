use brickwork_core::constants::*;
use brickwork_world::PlacementParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse editor config RON: {0}")]
    ParseError(String),
    #[error("Invalid editor config: {0}")]
    Invalid(String),
}

/// Editor tunables. Every field falls back to the shared constants when
/// omitted from a RON override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub max_stack_attempts: u32,
    pub snap_epsilon: f32,
    pub ghost_throttle_ms: f64,
    pub drag_threshold_px: f32,
    pub default_piece_kind: String,
    pub default_color: String,
    pub default_roughness: f32,
    pub default_metalness: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY,
            max_stack_attempts: MAX_STACK_ATTEMPTS,
            snap_epsilon: SNAP_EPSILON,
            ghost_throttle_ms: GHOST_THROTTLE_MS,
            drag_threshold_px: DRAG_THRESHOLD_PX,
            default_piece_kind: DEFAULT_PIECE_KIND.to_string(),
            default_color: DEFAULT_COLOR.to_string(),
            default_roughness: DEFAULT_ROUGHNESS,
            default_metalness: DEFAULT_METALNESS,
        }
    }
}

impl EditorConfig {
    /// Parse a RON override, e.g. `(history_capacity: 10)`.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: Self = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid("history_capacity must be at least 1".into()));
        }
        if !(self.snap_epsilon >= 0.0 && self.snap_epsilon < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "snap_epsilon {} outside [0, 0.5)",
                self.snap_epsilon
            )));
        }
        if self.ghost_throttle_ms < 0.0 || self.drag_threshold_px < 0.0 {
            return Err(ConfigError::Invalid("intervals must be non-negative".into()));
        }
        Ok(())
    }

    pub fn placement(&self) -> PlacementParams {
        PlacementParams {
            max_stack_attempts: self.max_stack_attempts,
            snap_epsilon: self.snap_epsilon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, 50);
        assert_eq!(config.max_stack_attempts, 50);
        assert_eq!(config.default_piece_kind, "2x2");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_ron_str("(history_capacity: 5, default_color: \"#0055BF\")").expect("parse");
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.default_color, "#0055BF");
        assert_eq!(config.max_stack_attempts, MAX_STACK_ATTEMPTS);
        assert_eq!(config.placement().snap_epsilon, SNAP_EPSILON);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_ron_str("(history_capacity: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_ron_str("(history_capacity: \"lots\")"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
