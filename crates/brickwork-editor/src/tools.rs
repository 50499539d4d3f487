use brickwork_core::constants::QUARTER_TURN;
use brickwork_core::math::normalize_rotation;
use brickwork_core::{HexColor, PieceKind, SymmetryAxis};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;

/// What the next placement will look like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub kind: PieceKind,
    pub color: HexColor,
    pub roughness: f32,
    pub metalness: f32,
    /// Yaw added to every placed part.
    pub rotation: f32,
    pub symmetry: SymmetryAxis,
}

impl ToolSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            kind: PieceKind::new(config.default_piece_kind.clone()),
            color: HexColor::new(config.default_color.clone()),
            roughness: config.default_roughness,
            metalness: config.default_metalness,
            rotation: 0.0,
            symmetry: SymmetryAxis::None,
        }
    }

    /// Turn a quarter turn, wrapping at a full turn.
    pub fn rotate_quarter(&mut self) {
        self.rotation = normalize_rotation(self.rotation + QUARTER_TURN);
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
