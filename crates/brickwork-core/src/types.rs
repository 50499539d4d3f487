use std::fmt;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Stable identifier of a placed piece. Lives as long as the piece does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub String);

impl PieceId {
    /// Fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Shared tag joining pieces into a selection group. Never affects geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Catalog tag of a piece type, e.g. `"2x4"` or `"1x2P"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceKind(pub String);

impl PieceKind {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PieceKind {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Integer lattice cell: (x, plate index, z).
pub type LatticeCell = IVec3;

/// A piece committed to the scene.
///
/// `position` is the footprint center in x/z and the bottom face in y.
/// Operations never mutate a piece in place; they build a new piece set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickInstance {
    pub id: PieceId,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: HexColor,
    pub position: Vec3,
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
}

/// One member of a pending multi-piece placement, relative to the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPart {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: HexColor,
    pub rotation: f32,
    pub offset: Vec3,
    /// Set while the part stands in for an existing piece being moved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<PieceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
}

impl GhostPart {
    /// Single part sitting on the anchor.
    pub fn at_anchor(kind: PieceKind, color: HexColor, rotation: f32) -> Self {
        Self {
            kind,
            color,
            rotation,
            offset: Vec3::ZERO,
            source_id: None,
            roughness: None,
            metalness: None,
        }
    }
}

/// World plane used for live symmetric placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SymmetryAxis {
    #[default]
    None,
    X,
    Z,
}

impl SymmetryAxis {
    pub fn is_active(self) -> bool {
        self != SymmetryAxis::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_piece() -> BrickInstance {
        BrickInstance {
            id: PieceId::from("abc123"),
            kind: PieceKind::from("2x4"),
            color: HexColor::new("#C91A09"),
            position: Vec3::new(0.5, 1.2, 0.0),
            rotation: 0.0,
            group_id: None,
            roughness: Some(0.2),
            metalness: None,
        }
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = PieceId::generate();
        let b = PieceId::generate();
        assert_ne!(a, b);
        assert_ne!(GroupId::generate(), GroupId::generate());
    }

    #[test]
    fn test_piece_json_field_names() {
        let json = serde_json::to_value(sample_piece()).expect("serialize");
        assert_eq!(json["type"], "2x4");
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["position"][1].as_f64().map(|y| (y - 1.2).abs() < 1e-6), Some(true));
        assert!(json.get("groupId").is_none(), "absent group must be omitted");
        assert!(json.get("metalness").is_none());
    }

    #[test]
    fn test_piece_reads_legacy_record() {
        let raw = r##"{"id":"k3j2","type":"1x1","color":"#F2CD37","position":[1,0,-2],"rotation":1.5707963,"groupId":"g1"}"##;
        let piece: BrickInstance = serde_json::from_str(raw).expect("parse");
        assert_eq!(piece.kind, PieceKind::from("1x1"));
        assert_eq!(piece.group_id, Some(GroupId("g1".into())));
        assert_eq!(piece.position, Vec3::new(1.0, 0.0, -2.0));
        assert!(piece.roughness.is_none());
    }

    #[test]
    fn test_symmetry_axis_default_inactive() {
        assert!(!SymmetryAxis::default().is_active());
        assert!(SymmetryAxis::X.is_active());
    }
}
