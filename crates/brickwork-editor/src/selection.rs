//! Bulk transforms over a selection of placed pieces.
//!
//! Each function takes the full piece set and returns a new one, or None
//! when its precondition fails and nothing should change.

use std::collections::HashSet;

use brickwork_catalog::PieceCatalog;
use brickwork_core::{BrickInstance, GhostPart, GroupId, HexColor, PieceId, SymmetryAxis};
use brickwork_world::collision::collides;
use brickwork_world::mirror::{reflect_about, reflect_rotation};
use brickwork_world::occupancy::{footprint_cells, OccupancyIndex};
use brickwork_world::snap::{snap_piece, SurfaceHit};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Partial update of a piece's mutable fields. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PieceUpdate {
    pub color: Option<HexColor>,
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub position: Option<Vec3>,
    pub rotation: Option<f32>,
}

impl PieceUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(&self, piece: &mut BrickInstance) {
        if let Some(color) = &self.color {
            piece.color = color.clone();
        }
        if let Some(roughness) = self.roughness {
            piece.roughness = Some(roughness);
        }
        if let Some(metalness) = self.metalness {
            piece.metalness = Some(metalness);
        }
        if let Some(position) = self.position {
            piece.position = position;
        }
        if let Some(rotation) = self.rotation {
            piece.rotation = rotation;
        }
    }
}

fn id_set(ids: &[PieceId]) -> HashSet<&PieceId> {
    ids.iter().collect()
}

/// Selected pieces in piece-set order.
fn selected<'a>(pieces: &'a [BrickInstance], ids: &[PieceId]) -> Vec<&'a BrickInstance> {
    let wanted = id_set(ids);
    pieces.iter().filter(|p| wanted.contains(&p.id)).collect()
}

pub fn update_properties(pieces: &[BrickInstance], ids: &[PieceId], update: &PieceUpdate) -> Vec<BrickInstance> {
    let wanted = id_set(ids);
    pieces
        .iter()
        .cloned()
        .map(|mut piece| {
            if wanted.contains(&piece.id) {
                update.apply(&mut piece);
            }
            piece
        })
        .collect()
}

pub fn remove(pieces: &[BrickInstance], ids: &[PieceId]) -> Vec<BrickInstance> {
    let wanted = id_set(ids);
    pieces.iter().filter(|p| !wanted.contains(&p.id)).cloned().collect()
}

/// Tag the selection with a fresh shared group id. Needs two or more pieces.
pub fn group(pieces: &[BrickInstance], ids: &[PieceId]) -> Option<Vec<BrickInstance>> {
    if selected(pieces, ids).len() < 2 {
        return None;
    }
    let group_id = GroupId::generate();
    let wanted = id_set(ids);
    let next: Vec<BrickInstance> = pieces
        .iter()
        .cloned()
        .map(|mut piece| {
                if wanted.contains(&piece.id) {
                    piece.group_id = Some(group_id.clone());
                }
                piece
            })
            .collect();
    Some(next)
}

pub fn ungroup(pieces: &[BrickInstance], ids: &[PieceId]) -> Option<Vec<BrickInstance>> {
    if ids.is_empty() {
        return None;
    }
    let wanted = id_set(ids);
    let next: Vec<BrickInstance> = pieces
        .iter()
        .cloned()
        .map(|mut piece| {
                if wanted.contains(&piece.id) {
                    piece.group_id = None;
                }
                piece
            })
            .collect();
    Some(next)
}

/// Flip the selection about its own centroid.
///
/// Every mirrored piece is re-snapped as if resting on a top face, so
/// selections of mixed footprint parity stay on the lattice. Handed pieces
/// swap to their counterpart. Returns None when a reflected piece would
/// land on an unselected piece or on another reflected piece.
pub fn mirror(
    pieces: &[BrickInstance],
    ids: &[PieceId],
    axis: SymmetryAxis,
    catalog: &PieceCatalog,
    epsilon: f32,
) -> Option<Vec<BrickInstance>> {
    if !axis.is_active() {
        return None;
    }
    let selection = selected(pieces, ids);
    if selection.is_empty() {
        return None;
    }
    let sum: Vec3 = selection.iter().map(|p| p.position).sum();
    let center = sum / selection.len() as f32;

    let wanted = id_set(ids);
    let next: Vec<BrickInstance> = pieces
        .iter()
        .cloned()
        .map(|mut piece| {
            if wanted.contains(&piece.id) {
                let reflected = reflect_about(piece.position, axis, center);
                piece.rotation = reflect_rotation(piece.rotation, axis);
                piece.kind = catalog.mirrored_kind(&piece.kind);
                piece.position = snap_piece(
                    catalog,
                    &SurfaceHit::upward(reflected),
                    &piece.kind,
                    piece.rotation,
                    epsilon,
                );
            }
            piece
        })
        .collect();

    let excluded: HashSet<PieceId> = wanted.iter().map(|&id| id.clone()).collect();
    let others = OccupancyIndex::build(pieces, catalog, &excluded);
    let mut claimed = HashSet::new();
    for piece in next.iter().filter(|p| excluded.contains(&p.id)) {
        if collides(&others, catalog, piece.position, &piece.kind, piece.rotation) {
            log::debug!("Mirror refused: '{}' would land on an unselected piece", piece.id);
            return None;
        }
        let footprint = catalog.footprint(&piece.kind, piece.rotation);
        if !footprint_cells(piece.position, footprint).all(|cell| claimed.insert(cell)) {
            log::debug!("Mirror refused: reflected pieces overlap");
            return None;
        }
    }
    Some(next)
}

/// Grow a selection so that it covers every member of each touched group.
/// Keeps first-seen order without duplicates.
pub fn expand_groups(pieces: &[BrickInstance], ids: &[PieceId]) -> Vec<PieceId> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for id in ids {
        let group = pieces
            .iter()
            .find(|p| &p.id == id)
            .and_then(|p| p.group_id.as_ref());
        match group {
            Some(group) => {
                for member in pieces.iter().filter(|p| p.group_id.as_ref() == Some(group)) {
                    if seen.insert(member.id.clone()) {
                        out.push(member.id.clone());
                    }
                }
            }
            None => {
                if seen.insert(id.clone()) {
                    out.push(id.clone());
                }
            }
        }
    }
    out
}

/// Lowest piece of a selection, ties broken by x, then z, then id.
pub fn anchor_of<'a>(selection: &[&'a BrickInstance]) -> Option<&'a BrickInstance> {
    selection.iter().copied().min_by(|a, b| {
        a.position
            .y
            .total_cmp(&b.position.y)
            .then(a.position.x.total_cmp(&b.position.x))
            .then(a.position.z.total_cmp(&b.position.z))
            .then_with(|| a.id.cmp(&b.id))
    })
}

fn ghost_parts(pieces: &[BrickInstance], ids: &[PieceId], keep_ids: bool) -> Option<Vec<GhostPart>> {
    let selection = selected(pieces, ids);
    let anchor = anchor_of(&selection)?;

    let to_part = |piece: &BrickInstance| GhostPart {
        kind: piece.kind.clone(),
        color: piece.color.clone(),
        rotation: piece.rotation,
        offset: piece.position - anchor.position,
        source_id: keep_ids.then(|| piece.id.clone()),
        roughness: piece.roughness,
        metalness: piece.metalness,
    };

    // the anchor leads: previews snap the first part to the pointer
    let mut parts = vec![to_part(anchor)];
    parts.extend(selection.iter().filter(|p| p.id != anchor.id).map(|p| to_part(p)));
    Some(parts)
}

/// Ghost that places fresh copies of the selection.
pub fn start_clone(pieces: &[BrickInstance], ids: &[PieceId]) -> Option<Vec<GhostPart>> {
    ghost_parts(pieces, ids, false)
}

/// Ghost that repositions the selected pieces themselves.
pub fn start_move(pieces: &[BrickInstance], ids: &[PieceId]) -> Option<Vec<GhostPart>> {
    ghost_parts(pieces, ids, true)
}
