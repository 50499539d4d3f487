use std::collections::HashMap;

use brickwork_core::PieceKind;

use crate::palette::PaletteEntry;
use crate::piece::{Footprint, PieceDef};
use crate::prefab::Prefab;

/// Read-only registry of piece definitions, prefabs and palette swatches.
///
/// Lookups never fail: an unknown kind resolves to [`Footprint::UNIT`] so
/// that malformed saves can still be indexed and drawn.
#[derive(Debug, Clone, Default)]
pub struct PieceCatalog {
    pieces: Vec<PieceDef>,
    by_tag: HashMap<PieceKind, usize>,
    prefabs: Vec<Prefab>,
    palette: Vec<PaletteEntry>,
}

impl PieceCatalog {
    pub fn new(pieces: Vec<PieceDef>, prefabs: Vec<Prefab>, palette: Vec<PaletteEntry>) -> Self {
        let mut by_tag = HashMap::with_capacity(pieces.len());
        for (i, def) in pieces.iter().enumerate() {
            // first definition wins; the validator reports duplicates
            by_tag.entry(def.tag.clone()).or_insert(i);
        }
        Self {
            pieces,
            by_tag,
            prefabs,
            palette,
        }
    }

    /// Catalog holding only piece definitions.
    pub fn from_pieces(pieces: Vec<PieceDef>) -> Self {
        Self::new(pieces, Vec::new(), Vec::new())
    }

    pub fn get(&self, kind: &PieceKind) -> Option<&PieceDef> {
        self.by_tag.get(kind).map(|&i| &self.pieces[i])
    }

    pub fn contains(&self, kind: &PieceKind) -> bool {
        self.by_tag.contains_key(kind)
    }

    pub fn footprint(&self, kind: &PieceKind, rotation: f32) -> Footprint {
        match self.get(kind) {
            Some(def) => def.footprint(rotation),
            None => Footprint::UNIT,
        }
    }

    /// Kind produced by reflecting `kind` in a mirror plane.
    pub fn mirrored_kind(&self, kind: &PieceKind) -> PieceKind {
        self.get(kind)
            .and_then(|def| def.mirror_of.clone())
            .unwrap_or_else(|| kind.clone())
    }

    /// Piece tags in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = &PieceKind> + '_ {
        self.pieces.iter().map(|def| &def.tag)
    }

    pub fn pieces(&self) -> &[PieceDef] {
        &self.pieces
    }

    pub fn prefabs(&self) -> &[Prefab] {
        &self.prefabs
    }

    pub fn prefab(&self, id: &str) -> Option<&Prefab> {
        self.prefabs.iter().find(|p| p.id == id)
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}
