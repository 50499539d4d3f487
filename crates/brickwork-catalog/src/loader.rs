use thiserror::Error;

use crate::palette::PaletteEntry;
use crate::piece::PieceDef;
use crate::prefab::Prefab;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse pieces RON: {0}")]
    PieceParseError(String),
    #[error("Failed to parse prefabs RON: {0}")]
    PrefabParseError(String),
    #[error("Failed to parse palette RON: {0}")]
    PaletteParseError(String),
}

/// Parse a piece table from a RON string.
pub fn load_pieces_from_str(ron_str: &str) -> Result<Vec<PieceDef>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::PieceParseError(e.to_string()))
}

/// Parse prefab templates from a RON string.
pub fn load_prefabs_from_str(ron_str: &str) -> Result<Vec<Prefab>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::PrefabParseError(e.to_string()))
}

/// Parse a color palette from a RON string.
pub fn load_palette_from_str(ron_str: &str) -> Result<Vec<PaletteEntry>, LoadError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| LoadError::PaletteParseError(e.to_string()))
}

/// Load and concatenate several piece sources, e.g. builtin plus user packs.
pub fn load_all_pieces(sources: &[&str]) -> Result<Vec<PieceDef>, LoadError> {
    let mut all = Vec::new();
    for source in sources {
        all.extend(load_pieces_from_str(source)?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Hand, ShapeFamily};

    #[test]
    fn test_load_pieces() {
        let src = r#"[
            (tag: "1x1", label: "1x1 Brick", width: 1, depth: 1, height: 1.2),
            (tag: "2x2W_L", label: "Wedge", width: 2, depth: 2, height: 0.4,
             shape: Wedge(hand: Left), mirror_of: Some("2x2W_R")),
        ]"#;
        let pieces = load_pieces_from_str(src).expect("parse");
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[1].shape, ShapeFamily::Wedge { hand: Hand::Left });
        assert_eq!(pieces[1].mirror_of.as_ref().map(|k| k.as_str()), Some("2x2W_R"));
    }

    #[test]
    fn test_load_all_concatenates() {
        let a = r#"[(tag: "a", label: "A", width: 1, depth: 1, height: 0.4)]"#;
        let b = r#"[(tag: "b", label: "B", width: 2, depth: 1, height: 0.4)]"#;
        let pieces = load_all_pieces(&[a, b]).expect("parse");
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn test_parse_errors_name_the_source() {
        let err = load_pieces_from_str("not ron").expect_err("should fail");
        assert!(matches!(err, LoadError::PieceParseError(_)));
        let err = load_prefabs_from_str("[(").expect_err("should fail");
        assert!(err.to_string().contains("prefabs"));
        assert!(matches!(
            load_palette_from_str("{").expect_err("should fail"),
            LoadError::PaletteParseError(_)
        ));
    }

    #[test]
    fn test_load_prefab_vector_offsets() {
        let src = r##"[(id: "p", label: "P", parts: [
            (kind: "2x2", color: "#583927", offset: (0.0, 1.2, 0.0), rotation: 1.5707964),
        ])]"##;
        let prefabs = load_prefabs_from_str(src).expect("parse");
        assert_eq!(prefabs[0].parts[0].offset, glam::Vec3::new(0.0, 1.2, 0.0));
    }
}
