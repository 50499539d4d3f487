use brickwork_core::BrickInstance;

use crate::compat::check_pieces;
use crate::error::PersistError;
use crate::format::{decode_pieces, FLAG_SET, ONBOARDING_KEY, PROJECT_KEY};
use crate::store::KeyValueStore;

/// Result of loading a saved project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub pieces: Vec<BrickInstance>,
    pub warnings: Vec<String>,
}

/// Read the saved project. `Ok(None)` when nothing was saved.
pub fn load_strict<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<LoadedProject>, PersistError> {
    let Some(raw) = store.get(PROJECT_KEY)? else {
        return Ok(None);
    };
    let pieces = decode_pieces(&raw)?;
    let warnings = check_pieces(&pieces);
    Ok(Some(LoadedProject { pieces, warnings }))
}

/// Read the saved project, treating any failure as "nothing saved".
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Option<LoadedProject> {
    match load_strict(store) {
        Ok(Some(project)) => {
            for warning in &project.warnings {
                log::warn!("Save compatibility: {warning}");
            }
            log::info!("Loaded project: {} pieces", project.pieces.len());
            Some(project)
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Ignoring saved project: {e}");
            None
        }
    }
}

/// Whether the onboarding help was already shown. Store failures count as
/// not seen.
pub fn has_seen_onboarding<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    match store.get(ONBOARDING_KEY) {
        Ok(value) => value.as_deref() == Some(FLAG_SET),
        Err(e) => {
            log::warn!("Failed to read onboarding flag: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::{mark_onboarding_seen, save};
    use crate::store::MemoryStore;
    use brickwork_core::{HexColor, PieceId};
    use glam::Vec3;

    fn piece(id: &str, y: f32) -> BrickInstance {
        BrickInstance {
            id: PieceId::from(id),
            kind: "1x1".into(),
            color: HexColor::new("#F2CD37"),
            position: Vec3::new(1.0, y, 0.0),
            rotation: 0.0,
            group_id: None,
            roughness: Some(0.2),
            metalness: Some(0.1),
        }
    }

    #[test]
    fn test_absent_project() {
        let store = MemoryStore::new();
        assert!(load(&store).is_none());
        assert!(matches!(load_strict(&store), Ok(None)));
    }

    #[test]
    fn test_roundtrip() {
        let mut store = MemoryStore::new();
        let pieces = vec![piece("a", 0.0), piece("b", 1.2)];
        save(&mut store, &pieces).expect("save");
        let loaded = load(&store).expect("present");
        assert_eq!(loaded.pieces, pieces);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_malformed_is_treated_as_absent() {
        let mut store = MemoryStore::new();
        store.set(PROJECT_KEY, "[{\"id\": 3").expect("set");
        assert!(load(&store).is_none());
        assert!(matches!(load_strict(&store), Err(PersistError::Decode(_))));
    }

    #[test]
    fn test_warnings_do_not_block_load() {
        let mut store = MemoryStore::new();
        save(&mut store, &[piece("a", 0.0), piece("a", 0.3)]).expect("save");
        let loaded = load(&store).expect("present");
        assert_eq!(loaded.pieces.len(), 2);
        assert_eq!(loaded.warnings.len(), 2);
    }

    #[test]
    fn test_onboarding_flag() {
        let mut store = MemoryStore::new();
        assert!(!has_seen_onboarding(&store));
        mark_onboarding_seen(&mut store);
        assert!(has_seen_onboarding(&store));
    }
}
