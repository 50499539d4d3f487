use brickwork_catalog::PieceCatalog;
use brickwork_core::constants::PLATE_HEIGHT;
use brickwork_core::math::{plate_index, rotate_offset};
use brickwork_core::{GhostPart, PieceKind};
use glam::Vec3;

use crate::occupancy::{footprint_cells, OccupancyIndex};

/// Whether a piece of `kind` at `position` would overlap the index or dip
/// below the ground plane.
pub fn collides(
    index: &OccupancyIndex,
    catalog: &PieceCatalog,
    position: Vec3,
    kind: &PieceKind,
    rotation: f32,
) -> bool {
    if plate_index(position.y) < 0 {
        return true;
    }
    let footprint = catalog.footprint(kind, rotation);
    index.intersects(footprint_cells(position, footprint))
}

/// What is being lifted by [`resolve_stacking`].
#[derive(Debug, Clone, Copy)]
pub enum StackSubject<'a> {
    Piece { kind: &'a PieceKind, rotation: f32 },
    /// Offsets are relative to the candidate. `rotation` turns the whole
    /// group: each offset swings about the candidate and each part turns
    /// by its own rotation plus `rotation`.
    Parts { parts: &'a [GhostPart], rotation: f32 },
}

impl StackSubject<'_> {
    pub fn collides_at(&self, index: &OccupancyIndex, catalog: &PieceCatalog, position: Vec3) -> bool {
        match *self {
            StackSubject::Piece { kind, rotation } => collides(index, catalog, position, kind, rotation),
            StackSubject::Parts { parts, rotation } => parts.iter().any(|part| {
                collides(
                    index,
                    catalog,
                    position + rotate_offset(part.offset, rotation),
                    &part.kind,
                    part.rotation + rotation,
                )
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackResolution {
    pub position: Vec3,
    /// Still colliding after the last allowed lift.
    pub invalid: bool,
    /// Plates lifted above the candidate.
    pub attempts: u32,
}

/// Lift `candidate` one plate at a time until `subject` fits.
///
/// Gives up after `max_attempts` lifts and returns the last position tried,
/// flagged invalid. The y of attempt `n` is `candidate.y + n * PLATE_HEIGHT`
/// so that no rounding error accumulates.
pub fn resolve_stacking(
    index: &OccupancyIndex,
    catalog: &PieceCatalog,
    candidate: Vec3,
    subject: &StackSubject<'_>,
    max_attempts: u32,
) -> StackResolution {
    let mut attempts = 0;
    loop {
        let position = candidate + Vec3::Y * (attempts as f32 * PLATE_HEIGHT);
        let blocked = subject.collides_at(index, catalog, position);
        if !blocked || attempts >= max_attempts {
            if blocked {
                log::debug!("Stacking gave up at y={} after {attempts} lifts", position.y);
            }
            return StackResolution {
                position,
                invalid: blocked,
                attempts,
            };
        }
        attempts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_catalog::{PieceDef, ShapeFamily};
    use brickwork_core::constants::MAX_STACK_ATTEMPTS;
    use brickwork_core::{BrickInstance, HexColor, PieceId};
    use glam::IVec3;
    use std::collections::HashSet;

    fn catalog() -> PieceCatalog {
        let def = |tag: &str, width, depth, height| PieceDef {
            tag: tag.into(),
            label: tag.to_string(),
            width,
            depth,
            height,
            shape: ShapeFamily::Box,
            mirror_of: None,
        };
        PieceCatalog::from_pieces(vec![def("2x2", 2, 2, 1.2), def("1x1", 1, 1, 1.2), def("1x1P", 1, 1, 0.4)])
    }

    fn piece(id: &str, kind: &str, position: Vec3) -> BrickInstance {
        BrickInstance {
            id: PieceId::from(id),
            kind: PieceKind::from(kind),
            color: HexColor::new("#FFFFFF"),
            position,
            rotation: 0.0,
            group_id: None,
            roughness: None,
            metalness: None,
        }
    }

    #[test]
    fn test_self_collision_roundtrip() {
        let cat = catalog();
        let pieces = vec![piece("a", "2x2", Vec3::new(0.5, 0.0, 0.5))];
        let kind = PieceKind::from("2x2");
        let index = OccupancyIndex::build(&pieces, &cat, &HashSet::new());
        assert!(collides(&index, &cat, pieces[0].position, &kind, 0.0));

        let excluded: HashSet<PieceId> = [PieceId::from("a")].into_iter().collect();
        let index = OccupancyIndex::build(&pieces, &cat, &excluded);
        assert!(!collides(&index, &cat, pieces[0].position, &kind, 0.0));
    }

    #[test]
    fn test_below_ground_always_collides() {
        let cat = catalog();
        let index = OccupancyIndex::new();
        let kind = PieceKind::from("1x1");
        assert!(collides(&index, &cat, Vec3::new(0.0, -0.4, 0.0), &kind, 0.0));
        assert!(!collides(&index, &cat, Vec3::ZERO, &kind, 0.0));
    }

    #[test]
    fn test_basic_stack() {
        let cat = catalog();
        let pieces = vec![piece("a", "2x2", Vec3::new(0.5, 0.0, 0.5))];
        let index = OccupancyIndex::build(&pieces, &cat, &HashSet::new());
        let kind = PieceKind::from("2x2");
        let subject = StackSubject::Piece { kind: &kind, rotation: 0.0 };
        let res = resolve_stacking(&index, &cat, Vec3::new(0.5, 0.0, 0.5), &subject, MAX_STACK_ATTEMPTS);
        assert!(!res.invalid);
        assert_eq!(res.attempts, 3);
        assert!((res.position.y - 1.2).abs() < 1e-5, "got {}", res.position.y);
    }

    #[test]
    fn test_stacking_is_monotonic() {
        let cat = catalog();
        let pieces = vec![
            piece("a", "1x1P", Vec3::ZERO),
            piece("b", "1x1P", Vec3::new(0.0, 0.4, 0.0)),
            piece("c", "1x1P", Vec3::new(0.0, 1.2, 0.0)),
        ];
        let index = OccupancyIndex::build(&pieces, &cat, &HashSet::new());
        let kind = PieceKind::from("1x1P");
        let subject = StackSubject::Piece { kind: &kind, rotation: 0.0 };
        let res = resolve_stacking(&index, &cat, Vec3::ZERO, &subject, MAX_STACK_ATTEMPTS);
        // the gap at plate 2 fits a single plate
        assert_eq!(res.attempts, 2);
        assert!(res.position.y >= 0.0);
        assert!((res.position.y - 2.0 * PLATE_HEIGHT).abs() < 1e-5);
    }

    #[test]
    fn test_collision_rejection_exhausts_attempts() {
        let cat = catalog();
        let mut index = OccupancyIndex::new();
        for k in 0..=(MAX_STACK_ATTEMPTS as i32 + 3) {
            index.insert(IVec3::new(0, k, 0));
        }
        let kind = PieceKind::from("1x1");
        let subject = StackSubject::Piece { kind: &kind, rotation: 0.0 };
        let res = resolve_stacking(&index, &cat, Vec3::ZERO, &subject, MAX_STACK_ATTEMPTS);
        assert!(res.invalid);
        assert_eq!(res.attempts, MAX_STACK_ATTEMPTS);
        assert!((res.position.y - MAX_STACK_ATTEMPTS as f32 * PLATE_HEIGHT).abs() < 1e-3);
    }

    #[test]
    fn test_parts_collide_through_offsets() {
        let cat = catalog();
        let mut index = OccupancyIndex::new();
        index.insert(IVec3::new(2, 0, 0));
        let parts = vec![
            GhostPart::at_anchor("1x1P".into(), "#FFFFFF".into(), 0.0),
            GhostPart {
                offset: Vec3::new(2.0, 0.0, 0.0),
                ..GhostPart::at_anchor("1x1P".into(), "#FFFFFF".into(), 0.0)
            },
        ];
        let subject = StackSubject::Parts { parts: &parts, rotation: 0.0 };
        assert!(subject.collides_at(&index, &cat, Vec3::ZERO));
        let res = resolve_stacking(&index, &cat, Vec3::ZERO, &subject, MAX_STACK_ATTEMPTS);
        assert_eq!(res.attempts, 1);
        assert!(!res.invalid);
    }

    #[test]
    fn test_group_rotation_swings_offsets() {
        let cat = catalog();
        let parts = vec![
            GhostPart::at_anchor("1x1P".into(), "#FFFFFF".into(), 0.0),
            GhostPart {
                offset: Vec3::new(2.0, 0.0, 0.0),
                ..GhostPart::at_anchor("1x1P".into(), "#FFFFFF".into(), 0.0)
            },
        ];
        let subject = StackSubject::Parts {
            parts: &parts,
            rotation: std::f32::consts::FRAC_PI_2,
        };

        // a quarter turn carries the second part from +x to -z
        let mut index = OccupancyIndex::new();
        index.insert(IVec3::new(2, 0, 0));
        assert!(!subject.collides_at(&index, &cat, Vec3::ZERO));

        index.insert(IVec3::new(0, 0, -2));
        assert!(subject.collides_at(&index, &cat, Vec3::ZERO));
    }
}
