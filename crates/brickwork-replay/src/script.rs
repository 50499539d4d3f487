use std::path::Path;

use brickwork_core::{HexColor, PieceKind, SymmetryAxis};
use brickwork_editor::{Modifiers, PieceUpdate, Viewport};
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::runner::ReplayError;

fn up() -> Vec3 {
    Vec3::Y
}

fn default_fov() -> f32 {
    50.0
}

/// Perspective camera the pointer steps are projected through.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSpec {
    pub eye: Vec3,
    pub target: Vec3,
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            eye: Vec3::new(12.0, 14.0, 12.0),
            target: Vec3::ZERO,
            fov_degrees: default_fov(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl CameraSpec {
    pub fn viewport(&self) -> Viewport {
        Viewport::look_at(
            self.eye,
            self.target,
            self.fov_degrees.to_radians(),
            Vec2::new(self.width, self.height),
        )
    }
}

/// One scripted input. Pieces are addressed by their index in the
/// current piece set since ids are generated at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetKind { kind: PieceKind },
    SetColor { color: HexColor },
    SetMaterial { roughness: f32, metalness: f32 },
    SetRotation { radians: f32 },
    Rotate,
    SetSymmetry { axis: SymmetryAxis },
    /// Ghost under a known surface point.
    Hover {
        point: Vec3,
        #[serde(default = "up")]
        normal: Vec3,
    },
    Commit,
    /// Hover and commit in one step.
    Place {
        point: Vec3,
        #[serde(default = "up")]
        normal: Vec3,
    },
    PointerDown { x: f32, y: f32 },
    PointerMove {
        x: f32,
        y: f32,
        #[serde(default)]
        at_ms: f64,
    },
    PointerUp {
        x: f32,
        y: f32,
        #[serde(default)]
        shift: bool,
    },
    Select { indices: Vec<usize> },
    ClickSelect {
        index: usize,
        #[serde(default)]
        shift: bool,
    },
    /// Right-click pick through the camera.
    SelectAt {
        x: f32,
        y: f32,
        #[serde(default)]
        shift: bool,
    },
    Delete,
    Group,
    Ungroup,
    Mirror { axis: SymmetryAxis },
    Update(PieceUpdate),
    Clone,
    Move,
    Prefab { id: String },
    Escape,
    Undo,
    Redo,
    Save,
    Load,
    Clear,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Suggest,
    /// Fail the replay unless the scene holds exactly `count` pieces.
    ExpectPieces { count: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub camera: CameraSpec,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        serde_json::from_str(json).map_err(|e| ReplayError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
