use std::collections::HashSet;

use brickwork_core::PieceKind;
use thiserror::Error;

use crate::palette::PaletteEntry;
use crate::piece::PieceDef;
use crate::prefab::Prefab;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate piece tag '{0}'")]
    DuplicateTag(PieceKind),
    #[error("Piece '{0}' has a zero-sized dimension")]
    ZeroDimension(PieceKind),
    #[error("Piece '{tag}' mirrors to unknown tag '{target}'")]
    UnknownMirror { tag: PieceKind, target: PieceKind },
    #[error("Piece '{tag}' mirrors to '{target}', which does not mirror back")]
    AsymmetricMirror { tag: PieceKind, target: PieceKind },
    #[error("Prefab '{prefab}' references unknown piece '{kind}'")]
    UnknownPrefabPiece { prefab: String, kind: PieceKind },
    #[error("Prefab '{0}' has no parts")]
    EmptyPrefab(String),
    #[error("Palette entry '{name}' has unparsable color '{hex}'")]
    BadPaletteColor { name: String, hex: String },
}

/// Check the piece table on its own. Collects every problem.
pub fn validate_pieces(pieces: &[PieceDef]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for def in pieces {
        if !seen.insert(&def.tag) {
            errors.push(ValidationError::DuplicateTag(def.tag.clone()));
        }
        if def.width == 0 || def.depth == 0 || def.height_plates() == 0 {
            errors.push(ValidationError::ZeroDimension(def.tag.clone()));
        }
    }

    for def in pieces {
        let Some(target) = &def.mirror_of else {
            continue;
        };
        match pieces.iter().find(|other| &other.tag == target) {
            None => errors.push(ValidationError::UnknownMirror {
                tag: def.tag.clone(),
                target: target.clone(),
            }),
            Some(other) if other.mirror_of.as_ref() != Some(&def.tag) => {
                errors.push(ValidationError::AsymmetricMirror {
                    tag: def.tag.clone(),
                    target: target.clone(),
                })
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check prefab templates against the piece table.
pub fn validate_prefabs(prefabs: &[Prefab], pieces: &[PieceDef]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let known: HashSet<&PieceKind> = pieces.iter().map(|d| &d.tag).collect();

    for prefab in prefabs {
        if prefab.parts.is_empty() {
            errors.push(ValidationError::EmptyPrefab(prefab.id.clone()));
        }
        for part in &prefab.parts {
            if !known.contains(&part.kind) {
                errors.push(ValidationError::UnknownPrefabPiece {
                    prefab: prefab.id.clone(),
                    kind: part.kind.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_palette(palette: &[PaletteEntry]) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = palette
        .iter()
        .filter(|entry| !entry.hex.is_valid())
        .map(|entry| ValidationError::BadPaletteColor {
            name: entry.name.clone(),
            hex: entry.hex.as_str().to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
