use brickwork_core::{GhostPart, HexColor, PieceKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabPart {
    pub kind: PieceKind,
    pub color: HexColor,
    pub offset: Vec3,
    #[serde(default)]
    pub rotation: f32,
}

/// Named multi-part template placed as a single ghost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub id: String,
    pub label: String,
    pub parts: Vec<PrefabPart>,
}

impl Prefab {
    pub fn ghost_parts(&self) -> Vec<GhostPart> {
        self.parts
            .iter()
            .map(|part| GhostPart {
                offset: part.offset,
                ..GhostPart::at_anchor(part.kind.clone(), part.color.clone(), part.rotation)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_parts_keep_offsets() {
        let prefab = Prefab {
            id: "pair".into(),
            label: "Pair".into(),
            parts: vec![
                PrefabPart {
                    kind: "2x2".into(),
                    color: "#583927".into(),
                    offset: Vec3::ZERO,
                    rotation: 0.0,
                },
                PrefabPart {
                    kind: "1x1".into(),
                    color: "#237841".into(),
                    offset: Vec3::new(0.0, 1.2, 0.0),
                    rotation: 1.5,
                },
            ],
        };
        let parts = prefab.ghost_parts();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].offset, Vec3::new(0.0, 1.2, 0.0));
        assert_eq!(parts[1].rotation, 1.5);
        assert!(parts.iter().all(|p| p.source_id.is_none()));
    }
}
