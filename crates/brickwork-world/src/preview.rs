use std::collections::HashSet;

use brickwork_catalog::PieceCatalog;
use brickwork_core::constants::{MAX_STACK_ATTEMPTS, SNAP_EPSILON};
use brickwork_core::math::rotate_offset;
use brickwork_core::{GhostPart, LatticeCell, SymmetryAxis};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{resolve_stacking, StackSubject};
use crate::mirror::mirror_placement;
use crate::occupancy::{footprint_cells, OccupancyIndex};
use crate::snap::{snap_piece, SurfaceHit};

/// Tunables consumed by the placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementParams {
    pub max_stack_attempts: u32,
    pub snap_epsilon: f32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            max_stack_attempts: MAX_STACK_ATTEMPTS,
            snap_epsilon: SNAP_EPSILON,
        }
    }
}

/// A resolved ghost: parts laid out around a world-space anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostGroup {
    pub anchor: Vec3,
    /// Turns the whole group about the anchor: offsets swing by it and it
    /// adds to every part's own rotation.
    pub rotation: f32,
    pub parts: Vec<GhostPart>,
    pub invalid: bool,
}

impl GhostGroup {
    /// World position and effective rotation of every part.
    pub fn placements(&self) -> impl Iterator<Item = (&GhostPart, Vec3, f32)> + '_ {
        self.parts
            .iter()
            .map(move |part| {
                let position = self.anchor + rotate_offset(part.offset, self.rotation);
                (part, position, part.rotation + self.rotation)
            })
    }

    pub fn cells(&self, catalog: &PieceCatalog) -> HashSet<LatticeCell> {
        self.placements()
            .flat_map(|(part, position, rotation)| {
                footprint_cells(position, catalog.footprint(&part.kind, rotation))
            })
            .collect()
    }

    /// Whether two of the group's own parts claim the same cell.
    pub fn overlaps_itself(&self, catalog: &PieceCatalog) -> bool {
        let mut claimed = HashSet::new();
        self.placements()
            .flat_map(|(part, position, rotation)| {
                footprint_cells(position, catalog.footprint(&part.kind, rotation))
            })
            .any(|cell| !claimed.insert(cell))
    }

    fn flag_self_overlap(mut self, catalog: &PieceCatalog) -> Self {
        if !self.invalid && self.overlaps_itself(catalog) {
            log::debug!("Ghost parts overlap each other");
            self.invalid = true;
        }
        self
    }
}

/// Everything a renderer needs to draw the pending placement.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostPreview {
    pub main: GhostGroup,
    pub mirrored: Option<GhostGroup>,
}

impl GhostPreview {
    /// A commit needs every shown group to be valid.
    pub fn is_committable(&self) -> bool {
        !self.main.invalid && self.mirrored.as_ref().map_or(true, |m| !m.invalid)
    }
}

/// Resolve the ghost for `template` under the surface hit.
///
/// The first part is the anchor: it is snapped to the hit, then the whole
/// group is lifted until it fits. With an active `axis` every part is
/// mirrored through the origin plane and re-snapped on its own, and the
/// mirrored group is lifted separately. Returns None for an empty template.
pub fn compute_preview(
    index: &OccupancyIndex,
    catalog: &PieceCatalog,
    hit: &SurfaceHit,
    template: &[GhostPart],
    tool_rotation: f32,
    axis: SymmetryAxis,
    params: &PlacementParams,
) -> Option<GhostPreview> {
    let first = template.first()?;

    let snapped = snap_piece(
        catalog,
        hit,
        &first.kind,
        first.rotation + tool_rotation,
        params.snap_epsilon,
    );
    let candidate = snapped - rotate_offset(first.offset, tool_rotation);
    let subject = StackSubject::Parts {
        parts: template,
        rotation: tool_rotation,
    };
    let resolved = resolve_stacking(index, catalog, candidate, &subject, params.max_stack_attempts);
    let main = GhostGroup {
        anchor: resolved.position,
        rotation: tool_rotation,
        parts: template.to_vec(),
        invalid: resolved.invalid,
    }
    .flag_self_overlap(catalog);

    let mirrored = mirror_group(index, catalog, &main, axis, params).and_then(|group| {
        let main_cells = main.cells(catalog);
        let mirror_cells = group.cells(catalog);
        if mirror_cells == main_cells {
            // sits on the symmetry plane; the main group already covers it
            None
        } else if !mirror_cells.is_disjoint(&main_cells) {
            Some(GhostGroup {
                invalid: true,
                ..group
            })
        } else {
            Some(group)
        }
    });

    Some(GhostPreview { main, mirrored })
}

fn mirror_group(
    index: &OccupancyIndex,
    catalog: &PieceCatalog,
    main: &GhostGroup,
    axis: SymmetryAxis,
    params: &PlacementParams,
) -> Option<GhostGroup> {
    let mut placed = Vec::with_capacity(main.parts.len());
    for (part, position, rotation) in main.placements() {
        let m = mirror_placement(catalog, position, rotation, &part.kind, axis, params.snap_epsilon)?;
        placed.push((part, m));
    }
    let anchor = placed.first()?.1.position;

    let parts: Vec<GhostPart> = placed
        .into_iter()
        .map(|(part, m)| GhostPart {
            kind: m.kind,
            color: part.color.clone(),
            rotation: m.rotation,
            offset: m.position - anchor,
            source_id: None,
            roughness: part.roughness,
            metalness: part.metalness,
        })
        .collect();

    let subject = StackSubject::Parts {
        parts: &parts,
        rotation: 0.0,
    };
    let resolved = resolve_stacking(index, catalog, anchor, &subject, params.max_stack_attempts);
    let group = GhostGroup {
        anchor: resolved.position,
        rotation: 0.0,
        parts,
        invalid: resolved.invalid,
    };
    Some(group.flag_self_overlap(catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use brickwork_catalog::{Hand, PieceDef, ShapeFamily};
    use brickwork_core::constants::PLATE_HEIGHT;
    use brickwork_core::{BrickInstance, HexColor, PieceId, PieceKind};
    use std::f32::consts::FRAC_PI_2;

    fn catalog() -> PieceCatalog {
        let def = |tag: &str, width, depth, height, shape, mirror_of: Option<&str>| PieceDef {
            tag: tag.into(),
            label: tag.to_string(),
            width,
            depth,
            height,
            shape,
            mirror_of: mirror_of.map(PieceKind::from),
        };
        PieceCatalog::from_pieces(vec![
            def("2x2", 2, 2, 1.2, ShapeFamily::Box, None),
            def("1x1", 1, 1, 1.2, ShapeFamily::Box, None),
            def("2x4", 2, 4, 1.2, ShapeFamily::Box, None),
            def("W_L", 2, 2, 0.4, ShapeFamily::Wedge { hand: Hand::Left }, Some("W_R")),
            def("W_R", 2, 2, 0.4, ShapeFamily::Wedge { hand: Hand::Right }, Some("W_L")),
        ])
    }

    fn single(kind: &str) -> Vec<GhostPart> {
        vec![GhostPart::at_anchor(kind.into(), HexColor::new("#C91A09"), 0.0)]
    }

    fn index_of(pieces: &[BrickInstance], cat: &PieceCatalog) -> OccupancyIndex {
        OccupancyIndex::build(pieces, cat, &HashSet::new())
    }

    #[test]
    fn test_empty_template_has_no_preview() {
        let cat = catalog();
        let hit = SurfaceHit::upward(Vec3::ZERO);
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &[], 0.0, SymmetryAxis::None, &PlacementParams::default());
        assert!(preview.is_none());
    }

    #[test]
    fn test_stacks_on_top_face() {
        let cat = catalog();
        let base = BrickInstance {
            id: PieceId::from("a"),
            kind: "2x2".into(),
            color: HexColor::new("#FFFFFF"),
            position: Vec3::new(0.5, 0.0, 0.5),
            rotation: 0.0,
            group_id: None,
            roughness: None,
            metalness: None,
        };
        let index = index_of(&[base], &cat);
        let hit = SurfaceHit::upward(Vec3::new(0.6, 1.2, 0.4));
        let preview = compute_preview(&index, &cat, &hit, &single("2x2"), 0.0, SymmetryAxis::None, &PlacementParams::default())
            .expect("preview");
        assert!(!preview.main.invalid);
        assert!((preview.main.anchor - Vec3::new(0.5, 1.2, 0.5)).length() < 1e-4, "got {:?}", preview.main.anchor);
        assert!(preview.mirrored.is_none());
        assert!(preview.is_committable());
    }

    #[test]
    fn test_tool_rotation_applies_to_anchor_snap() {
        let cat = catalog();
        let hit = SurfaceHit::upward(Vec3::new(0.2, 0.0, 0.2));
        let preview = compute_preview(
            &OccupancyIndex::new(),
            &cat,
            &hit,
            &single("2x4"),
            FRAC_PI_2,
            SymmetryAxis::None,
            &PlacementParams::default(),
        )
        .expect("preview");
        // rotated 2x4 is 4 wide and 2 deep, both even
        assert!((preview.main.anchor - Vec3::new(0.5, 0.0, 0.5)).length() < 1e-4);
        let (_, _, rotation) = preview.main.placements().next().expect("one part");
        assert_eq!(rotation, FRAC_PI_2);
    }

    #[test]
    fn test_tool_rotation_swings_part_offsets() {
        let cat = catalog();
        // two 2x4s side by side along x
        let template = vec![
            GhostPart::at_anchor("2x4".into(), "#FFFFFF".into(), 0.0),
            GhostPart {
                offset: Vec3::new(2.0, 0.0, 0.0),
                ..GhostPart::at_anchor("2x4".into(), "#FFFFFF".into(), 0.0)
            },
        ];
        let hit = SurfaceHit::upward(Vec3::new(10.2, 0.0, 10.2));
        let preview = compute_preview(
            &OccupancyIndex::new(),
            &cat,
            &hit,
            &template,
            FRAC_PI_2,
            SymmetryAxis::None,
            &PlacementParams::default(),
        )
        .expect("preview");
        assert!(!preview.main.invalid);
        let positions: Vec<Vec3> = preview.main.placements().map(|(_, position, _)| position).collect();
        assert!((positions[1] - positions[0] - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        // 8 cells by 3 plates each, none shared
        assert_eq!(preview.main.cells(&cat).len(), 48);
        assert!(!preview.main.overlaps_itself(&cat));
    }

    #[test]
    fn test_self_overlapping_template_is_invalid() {
        let cat = catalog();
        let template = vec![
            GhostPart::at_anchor("2x2".into(), "#FFFFFF".into(), 0.0),
            GhostPart {
                offset: Vec3::new(1.0, 0.0, 0.0),
                ..GhostPart::at_anchor("2x2".into(), "#FFFFFF".into(), 0.0)
            },
        ];
        let hit = SurfaceHit::upward(Vec3::new(0.5, 0.0, 0.5));
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &template, 0.0, SymmetryAxis::None, &PlacementParams::default())
            .expect("preview");
        assert!(preview.main.invalid);
        assert!(!preview.is_committable());
    }

    #[test]
    fn test_builtin_prefabs_fit_at_every_rotation() {
        let cat = brickwork_catalog::defaults::builtin_catalog();
        let hit = SurfaceHit::upward(Vec3::new(0.3, 0.0, 0.3));
        for prefab in cat.prefabs() {
            for turns in 0..4 {
                let rotation = turns as f32 * FRAC_PI_2;
                let preview = compute_preview(
                    &OccupancyIndex::new(),
                    &cat,
                    &hit,
                    &prefab.ghost_parts(),
                    rotation,
                    SymmetryAxis::None,
                    &PlacementParams::default(),
                )
                .expect("preview");
                assert!(!preview.main.invalid, "{} at {turns} quarter turns", prefab.id);
            }
        }
    }

    #[test]
    fn test_mirrored_group_on_other_side() {
        let cat = catalog();
        let hit = SurfaceHit::upward(Vec3::new(3.0, 0.0, 1.0));
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &single("1x1"), 0.0, SymmetryAxis::X, &PlacementParams::default())
            .expect("preview");
        let mirrored = preview.mirrored.as_ref().expect("mirror active");
        assert!((mirrored.anchor - Vec3::new(-3.0, 0.0, 1.0)).length() < 1e-4);
        assert!(!mirrored.invalid);
        assert!(preview.is_committable());
    }

    #[test]
    fn test_mirrored_group_swaps_hand() {
        let cat = catalog();
        let hit = SurfaceHit::upward(Vec3::new(2.5, 0.0, 2.5));
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &single("W_L"), 0.0, SymmetryAxis::Z, &PlacementParams::default())
            .expect("preview");
        let mirrored = preview.mirrored.expect("mirror active");
        assert_eq!(mirrored.parts[0].kind, PieceKind::from("W_R"));
        assert!((mirrored.anchor.z + 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_piece_on_symmetry_plane_drops_mirror() {
        let cat = catalog();
        // a 1x1 at x = 0 maps onto itself
        let hit = SurfaceHit::upward(Vec3::new(0.1, 0.0, 4.0));
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &single("1x1"), 0.0, SymmetryAxis::X, &PlacementParams::default())
            .expect("preview");
        assert!(preview.mirrored.is_none());
    }

    #[test]
    fn test_partial_overlap_invalidates_mirror() {
        let cat = catalog();
        let template = vec![
            GhostPart::at_anchor("1x1".into(), "#FFFFFF".into(), 0.0),
            GhostPart {
                offset: Vec3::new(1.0, 0.0, 0.0),
                ..GhostPart::at_anchor("1x1".into(), "#FFFFFF".into(), 0.0)
            },
        ];
        // cells x = 0 and x = 1; the mirror covers x = 0 and x = -1
        let hit = SurfaceHit::upward(Vec3::new(0.0, 0.0, 0.0));
        let preview = compute_preview(&OccupancyIndex::new(), &cat, &hit, &template, 0.0, SymmetryAxis::X, &PlacementParams::default())
            .expect("preview");
        let mirrored = preview.mirrored.as_ref().expect("kept but flagged");
        assert!(mirrored.invalid);
        assert!(!preview.main.invalid);
        assert!(!preview.is_committable());
    }

    #[test]
    fn test_mirror_blocked_independently() {
        let cat = catalog();
        let wall = BrickInstance {
            id: PieceId::from("w"),
            kind: "1x1".into(),
            color: HexColor::new("#FFFFFF"),
            position: Vec3::new(-3.0, 0.0, 0.0),
            rotation: 0.0,
            group_id: None,
            roughness: None,
            metalness: None,
        };
        let index = index_of(&[wall], &cat);
        let hit = SurfaceHit::upward(Vec3::new(3.0, 0.0, 0.0));
        let preview = compute_preview(&index, &cat, &hit, &single("1x1"), 0.0, SymmetryAxis::X, &PlacementParams::default())
            .expect("preview");
        assert!(preview.main.anchor.y.abs() < 1e-5);
        let mirrored = preview.mirrored.expect("mirror");
        assert!((mirrored.anchor.y - 3.0 * PLATE_HEIGHT).abs() < 1e-4, "mirror stacks on the wall");
    }
}
