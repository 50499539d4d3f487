//! Placement engine: occupancy, collision and stacking, snapping,
//! symmetry, ray picking and the ghost preview built from them.
//!
//! Nothing here reports errors. Failed placements come back as flags.

pub mod collision;
pub mod mirror;
pub mod occupancy;
pub mod pick;
pub mod preview;
pub mod snap;

pub use collision::{collides, resolve_stacking, StackResolution, StackSubject};
pub use occupancy::{footprint_cells, OccupancyIndex};
pub use pick::{PieceHit, Ray};
pub use preview::{compute_preview, GhostGroup, GhostPreview, PlacementParams};
pub use snap::SurfaceHit;
