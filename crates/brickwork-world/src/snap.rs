use brickwork_catalog::{Footprint, PieceCatalog};
use brickwork_core::constants::{PLATE_HEIGHT, UP_NORMAL_THRESHOLD};
use brickwork_core::math::{plate_index, plate_to_y, round_half_up};
use brickwork_core::PieceKind;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A point on some surface together with that surface's outward normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
}

impl SurfaceHit {
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        Self { point, normal }
    }

    /// Hit on an upward-facing surface, e.g. the ground plane.
    pub fn upward(point: Vec3) -> Self {
        Self {
            point,
            normal: Vec3::Y,
        }
    }
}

/// Half-cell shift for even extents, whose centers sit between lattice lines.
fn parity_offset(extent: u32) -> f32 {
    if extent % 2 == 0 {
        0.5
    } else {
        0.0
    }
}

/// Snap a surface hit to the lattice position of a footprint's center-bottom.
pub fn snap(hit: &SurfaceHit, footprint: Footprint, epsilon: f32) -> Vec3 {
    let target = hit.point + hit.normal * epsilon;

    let off_x = parity_offset(footprint.width);
    let off_z = parity_offset(footprint.depth);
    let x = round_half_up(target.x - off_x) + off_x;
    let z = round_half_up(target.z - off_z) + off_z;

    let y = if hit.normal.y > UP_NORMAL_THRESHOLD {
        // resting on top: the unnudged point is already on the face
        plate_to_y(plate_index(hit.point.y))
    } else if hit.normal.y.abs() < UP_NORMAL_THRESHOLD {
        (target.y / PLATE_HEIGHT).floor() * PLATE_HEIGHT
    } else {
        (target.y / PLATE_HEIGHT).ceil() * PLATE_HEIGHT
    };

    Vec3::new(x, y.max(0.0), z)
}

/// [`snap`] with the footprint looked up from the catalog.
pub fn snap_piece(
    catalog: &PieceCatalog,
    hit: &SurfaceHit,
    kind: &PieceKind,
    rotation: f32,
    epsilon: f32,
) -> Vec3 {
    snap(hit, catalog.footprint(kind, rotation), epsilon)
}
