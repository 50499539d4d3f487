use std::collections::HashSet;

use brickwork_catalog::{Footprint, PieceCatalog};
use brickwork_core::math::{plate_index, round_half_up};
use brickwork_core::{BrickInstance, LatticeCell, PieceId};
use glam::{IVec3, Vec3};

/// Lowest lattice corner of a footprint centered at `position`.
fn footprint_origin(position: Vec3, footprint: Footprint) -> IVec3 {
    let x = round_half_up(position.x - (footprint.width as f32 - 1.0) / 2.0) as i32;
    let z = round_half_up(position.z - (footprint.depth as f32 - 1.0) / 2.0) as i32;
    IVec3::new(x, plate_index(position.y), z)
}

/// Every lattice cell covered by a footprint whose center-bottom is `position`.
pub fn footprint_cells(position: Vec3, footprint: Footprint) -> impl Iterator<Item = LatticeCell> {
    let origin = footprint_origin(position, footprint);
    let Footprint {
        width,
        depth,
        height_plates,
    } = footprint;
    (0..width as i32).flat_map(move |i| {
        (0..depth as i32).flat_map(move |j| {
            (0..height_plates as i32).map(move |k| origin + IVec3::new(i, k, j))
        })
    })
}

/// Set of occupied lattice cells derived from a piece set.
///
/// Rebuilt from scratch whenever the pieces or the moving selection change.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    cells: HashSet<LatticeCell>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every piece except those in `excluded`.
    pub fn build(pieces: &[BrickInstance], catalog: &PieceCatalog, excluded: &HashSet<PieceId>) -> Self {
        let mut cells = HashSet::new();
        for piece in pieces {
            if excluded.contains(&piece.id) {
                continue;
            }
            let footprint = catalog.footprint(&piece.kind, piece.rotation);
            cells.extend(footprint_cells(piece.position, footprint));
        }
        log::debug!(
            "Occupancy rebuilt: {} cells from {} pieces ({} excluded)",
            cells.len(),
            pieces.len(),
            excluded.len()
        );
        Self { cells }
    }

    pub fn insert(&mut self, cell: LatticeCell) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: LatticeCell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn intersects(&self, mut cells: impl Iterator<Item = LatticeCell>) -> bool {
        cells.any(|c| self.cells.contains(&c))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &LatticeCell> + '_ {
        self.cells.iter()
    }
}
