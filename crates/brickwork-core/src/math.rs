use crate::constants::{PLATE_HEIGHT, QUARTER_TURN};
use glam::Vec3;
use std::f32::consts::TAU;

/// Round to the nearest integer, sending exact halves toward +infinity.
///
/// `f32::round` sends halves away from zero, which makes `-0.5` and `0.5`
/// land on different sides of the lattice. Snapping relies on the
/// asymmetric rule so that negative coordinates behave like positive ones.
pub fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

/// Number of whole quarter turns closest to `rotation` (may be negative).
pub fn quarter_turns(rotation: f32) -> i32 {
    round_half_up(rotation / QUARTER_TURN) as i32
}

/// Whether a yaw swaps a footprint's width and depth (odd quarter turns).
pub fn is_axis_swapped(rotation: f32) -> bool {
    quarter_turns(rotation).rem_euclid(2) != 0
}

/// Turn a horizontal offset by `rotation`, taken as whole quarter turns
/// about +Y in the same sense as a piece yaw. Exact, so lattice offsets
/// stay on the lattice.
pub fn rotate_offset(offset: Vec3, rotation: f32) -> Vec3 {
    let Vec3 { x, y, z } = offset;
    match quarter_turns(rotation).rem_euclid(4) {
        1 => Vec3::new(z, y, -x),
        2 => Vec3::new(-x, y, -z),
        3 => Vec3::new(-z, y, x),
        _ => offset,
    }
}

/// Wrap a rotation into `[0, 2π)`.
pub fn normalize_rotation(rotation: f32) -> f32 {
    let wrapped = rotation.rem_euclid(TAU);
    // rem_euclid can return TAU itself for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Vertical lattice index of a world-space height.
pub fn plate_index(y: f32) -> i32 {
    round_half_up(y / PLATE_HEIGHT) as i32
}

/// World-space height of a vertical lattice index.
pub fn plate_to_y(index: i32) -> f32 {
    index as f32 * PLATE_HEIGHT
}

/// Whether `y` sits on a plate boundary within `tolerance`.
pub fn is_on_plate(y: f32, tolerance: f32) -> bool {
    (y - plate_to_y(plate_index(y))).abs() <= tolerance
}
