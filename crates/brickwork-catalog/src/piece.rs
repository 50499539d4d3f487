use brickwork_core::constants::PLATE_HEIGHT;
use brickwork_core::math::{is_axis_swapped, round_half_up};
use brickwork_core::PieceKind;
use serde::{Deserialize, Serialize};

/// Chirality of a handed piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn opposite(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

/// Geometry family of a piece. Renderers match on this to build meshes;
/// the placement engine only ever looks at the bounding footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShapeFamily {
    #[default]
    Box,
    Tile,
    Cylinder,
    Cone,
    Slope,
    CurvedSlope,
    InvertedSlope,
    Wedge { hand: Hand },
    Arch,
    Bracket { inverted: bool },
    Grille,
    Ingot,
    Flower,
    Leaf,
    Minifig,
}

impl ShapeFamily {
    /// Whether mirroring the piece produces a different piece.
    pub fn is_handed(&self) -> bool {
        matches!(self, ShapeFamily::Wedge { .. })
    }
}

/// Static definition of one piece type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceDef {
    pub tag: PieceKind,
    pub label: String,
    /// Lattice cells along x before rotation.
    pub width: u32,
    /// Lattice cells along z before rotation.
    pub depth: u32,
    /// World units; a brick is 1.2, a plate 0.4.
    pub height: f32,
    #[serde(default)]
    pub shape: ShapeFamily,
    /// Counterpart produced when the piece is mirrored.
    #[serde(default)]
    pub mirror_of: Option<PieceKind>,
}

impl PieceDef {
    /// Height in plate cells. Minifig parts round to the nearest plate.
    pub fn height_plates(&self) -> u32 {
        round_half_up(self.height / PLATE_HEIGHT).max(0.0) as u32
    }

    pub fn footprint(&self, rotation: f32) -> Footprint {
        let (width, depth) = if is_axis_swapped(rotation) {
            (self.depth, self.width)
        } else {
            (self.width, self.depth)
        };
        Footprint {
            width,
            depth,
            height_plates: self.height_plates(),
        }
    }
}

/// World-aligned cell extent of a piece after rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Footprint {
    pub width: u32,
    pub depth: u32,
    pub height_plates: u32,
}

impl Footprint {
    /// Stand-in for unknown kinds so lookups never fail.
    pub const UNIT: Footprint = Footprint {
        width: 1,
        depth: 1,
        height_plates: 1,
    };

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.depth as usize * self.height_plates as usize
    }
}
