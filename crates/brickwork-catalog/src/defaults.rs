//! Builtin catalog compiled into the binary.

use crate::catalog::PieceCatalog;
use crate::loader::{load_palette_from_str, load_pieces_from_str, load_prefabs_from_str};
use crate::validator::{validate_palette, validate_pieces, validate_prefabs};

pub const PIECES_RON: &str = include_str!("../data/pieces.ron");
pub const PREFABS_RON: &str = include_str!("../data/prefabs.ron");
pub const PALETTE_RON: &str = include_str!("../data/palette.ron");

/// Parse and validate the embedded data.
///
/// Never fails: a broken table is logged and an empty catalog returned,
/// in which every kind resolves to the unit footprint.
pub fn builtin_catalog() -> PieceCatalog {
    let parsed = load_pieces_from_str(PIECES_RON).and_then(|pieces| {
        let prefabs = load_prefabs_from_str(PREFABS_RON)?;
        let palette = load_palette_from_str(PALETTE_RON)?;
        Ok((pieces, prefabs, palette))
    });
    let (pieces, prefabs, palette) = match parsed {
        Ok(tables) => tables,
        Err(e) => {
            log::error!("Builtin catalog failed to load: {e}");
            return PieceCatalog::default();
        }
    };

    let mut problems = Vec::new();
    for result in [
        validate_pieces(&pieces),
        validate_prefabs(&prefabs, &pieces),
        validate_palette(&palette),
    ] {
        if let Err(errors) = result {
            problems.extend(errors);
        }
    }
    if !problems.is_empty() {
        for problem in &problems {
            log::error!("Builtin catalog: {problem}");
        }
        return PieceCatalog::default();
    }

    log::info!(
        "Loaded builtin catalog: {} pieces, {} prefabs, {} colors",
        pieces.len(),
        prefabs.len(),
        palette.len()
    );
    PieceCatalog::new(pieces, prefabs, palette)
}
