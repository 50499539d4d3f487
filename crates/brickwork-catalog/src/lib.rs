pub mod catalog;
pub mod defaults;
pub mod loader;
pub mod palette;
pub mod piece;
pub mod prefab;
pub mod validator;

pub use catalog::PieceCatalog;
pub use palette::PaletteEntry;
pub use piece::{Footprint, Hand, PieceDef, ShapeFamily};
pub use prefab::{Prefab, PrefabPart};
