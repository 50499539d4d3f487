use std::collections::HashSet;

use brickwork_catalog::PieceCatalog;
use brickwork_core::constants::PLATE_HEIGHT;
use brickwork_core::{BrickInstance, PieceId};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::snap::SurfaceHit;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Normalized pointer ray in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Intersection with the ground plane `y = 0`, facing up.
pub fn ground_hit(ray: &Ray) -> Option<SurfaceHit> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    let mut point = ray.at(t);
    point.y = 0.0;
    Some(SurfaceHit::upward(point))
}

/// Axis-aligned box enclosing a placed piece.
pub fn piece_bounds(piece: &BrickInstance, catalog: &PieceCatalog) -> (Vec3, Vec3) {
    let footprint = catalog.footprint(&piece.kind, piece.rotation);
    let height = catalog
        .get(&piece.kind)
        .map(|def| def.height)
        .unwrap_or(PLATE_HEIGHT);
    let half = Vec3::new(footprint.width as f32 / 2.0, 0.0, footprint.depth as f32 / 2.0);
    let min = piece.position - half;
    let max = piece.position + half + Vec3::Y * height;
    (min, max)
}

/// Slab test. Returns entry distance and the normal of the entry face.
fn ray_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = Vec3::ZERO;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];
        if dir.abs() < PARALLEL_EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let (t1, t2) = {
            let a = (min[axis] - origin) / dir;
            let b = (max[axis] - origin) / dir;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        if t1 > t_near {
            t_near = t1;
            let mut n = Vec3::ZERO;
            n[axis] = -dir.signum();
            normal = n;
        }
        t_far = t_far.min(t2);
        if t_near > t_far {
            return None;
        }
    }

    // origin inside the box counts as a miss
    if t_near < 0.0 {
        return None;
    }
    Some((t_near, normal))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieceHit {
    pub id: PieceId,
    pub hit: SurfaceHit,
    pub distance: f32,
}

/// Nearest piece hit by `ray`, skipping `excluded` ids.
pub fn raycast_pieces(
    pieces: &[BrickInstance],
    catalog: &PieceCatalog,
    ray: &Ray,
    excluded: &HashSet<PieceId>,
) -> Option<PieceHit> {
    pieces
        .iter()
        .filter(|piece| !excluded.contains(&piece.id))
        .filter_map(|piece| {
            let (min, max) = piece_bounds(piece, catalog);
            ray_box(ray, min, max).map(|(distance, normal)| PieceHit {
                id: piece.id.clone(),
                hit: SurfaceHit::new(ray.at(distance), normal),
                distance,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Surface under the pointer: the nearest piece, else the ground.
pub fn surface_hit(
    pieces: &[BrickInstance],
    catalog: &PieceCatalog,
    ray: &Ray,
    excluded: &HashSet<PieceId>,
) -> Option<SurfaceHit> {
    raycast_pieces(pieces, catalog, ray, excluded)
        .map(|piece_hit| piece_hit.hit)
        .or_else(|| ground_hit(ray))
}
