use std::f32::consts::PI;

use brickwork_catalog::PieceCatalog;
use brickwork_core::{PieceKind, SymmetryAxis};
use glam::Vec3;

use crate::snap::{snap_piece, SurfaceHit};

/// Reflect a yaw in the plane perpendicular to `axis`.
///
/// Reflection flips handedness, so the yaw is mirrored rather than copied.
pub fn reflect_rotation(rotation: f32, axis: SymmetryAxis) -> f32 {
    match axis {
        SymmetryAxis::None => rotation,
        SymmetryAxis::X => -rotation,
        SymmetryAxis::Z => PI - rotation,
    }
}

/// Reflect `position` through the plane perpendicular to `axis` passing
/// through `center`.
pub fn reflect_about(position: Vec3, axis: SymmetryAxis, center: Vec3) -> Vec3 {
    match axis {
        SymmetryAxis::None => position,
        SymmetryAxis::X => Vec3::new(2.0 * center.x - position.x, position.y, position.z),
        SymmetryAxis::Z => Vec3::new(position.x, position.y, 2.0 * center.z - position.z),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MirroredPlacement {
    pub position: Vec3,
    pub rotation: f32,
    /// Handed pieces turn into their counterpart.
    pub kind: PieceKind,
}

/// Mirror a placement through the world origin plane and re-snap it.
///
/// Reflection can change which footprint dimension lines up with which
/// axis, so the result is snapped again as if resting on a top face.
/// Returns None when `axis` is inactive.
pub fn mirror_placement(
    catalog: &PieceCatalog,
    position: Vec3,
    rotation: f32,
    kind: &PieceKind,
    axis: SymmetryAxis,
    epsilon: f32,
) -> Option<MirroredPlacement> {
    if !axis.is_active() {
        return None;
    }
    let reflected = reflect_about(position, axis, Vec3::ZERO);
    let rotation = reflect_rotation(rotation, axis);
    let kind = catalog.mirrored_kind(kind);
    let position = snap_piece(catalog, &SurfaceHit::upward(reflected), &kind, rotation, epsilon);
    Some(MirroredPlacement {
        position,
        rotation,
        kind,
    })
}
