//! Single source of truth for shared constants.
//! Every lattice computation in the workspace reads its units from here,
//! and `EditorConfig` defaults are seeded from the tunables below.

/// Horizontal lattice spacing in world units.
pub const BRICK_UNIT: f32 = 1.0;

/// Vertical quantum. Every piece's `position.y` is a multiple of this.
pub const PLATE_HEIGHT: f32 = 0.4;

/// Height of a full brick (three plates).
pub const BRICK_HEIGHT: f32 = 1.2;

/// Plates stacked in one brick.
pub const PLATES_PER_BRICK: u32 = 3;

/// Maximum snapshots retained by the undo log. Oldest entries are evicted.
pub const HISTORY_CAPACITY: usize = 50;

/// Upper bound on single-plate lifts when resolving a colliding placement.
pub const MAX_STACK_ATTEMPTS: u32 = 50;

/// Distance a surface hit is pushed along its normal before snapping, so a
/// point lying exactly on a face does not resolve into the face's own cell.
pub const SNAP_EPSILON: f32 = 0.02;

/// Minimum interval between ghost recomputations, in milliseconds (~60 Hz).
pub const GHOST_THROTTLE_MS: f64 = 16.0;

/// Pointer travel in pixels after which a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f32 = 5.0;

/// One quarter turn in radians.
pub const QUARTER_TURN: f32 = std::f32::consts::FRAC_PI_2;

/// `normal.y` above this counts as an upward (resting-on-top) hit; its
/// absolute value below it counts as a side hit.
pub const UP_NORMAL_THRESHOLD: f32 = 0.5;

/// Piece kind selected when the editor starts.
pub const DEFAULT_PIECE_KIND: &str = "2x2";

/// Color selected when the editor starts (first palette entry).
pub const DEFAULT_COLOR: &str = "#C91A09";

/// Default surface roughness for newly placed pieces.
pub const DEFAULT_ROUGHNESS: f32 = 0.2;

/// Default metalness for newly placed pieces.
pub const DEFAULT_METALNESS: f32 = 0.1;
