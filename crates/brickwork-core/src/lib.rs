pub mod color;
pub mod constants;
pub mod math;
pub mod types;

pub use color::HexColor;
pub use types::{BrickInstance, GhostPart, GroupId, LatticeCell, PieceId, PieceKind, SymmetryAxis};
