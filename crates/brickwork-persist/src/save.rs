use brickwork_core::BrickInstance;

use crate::error::PersistError;
use crate::format::{encode_pieces, FLAG_SET, ONBOARDING_KEY, PROJECT_KEY};
use crate::store::KeyValueStore;

/// Write the full piece set under [`PROJECT_KEY`].
///
/// Encoding happens before the store is touched, so a failure leaves the
/// previous save in place.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, pieces: &[BrickInstance]) -> Result<(), PersistError> {
    let encoded = encode_pieces(pieces)?;
    store.set(PROJECT_KEY, &encoded)?;
    log::info!("Saved project: {} pieces, {} bytes", pieces.len(), encoded.len());
    Ok(())
}

/// Forget the saved project.
pub fn clear<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), PersistError> {
    store.remove(PROJECT_KEY)?;
    log::info!("Cleared saved project");
    Ok(())
}

/// Record that the onboarding help has been shown. Failures are logged.
pub fn mark_onboarding_seen<S: KeyValueStore + ?Sized>(store: &mut S) {
    if let Err(e) = store.set(ONBOARDING_KEY, FLAG_SET) {
        log::warn!("Failed to record onboarding flag: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use brickwork_core::{HexColor, PieceId};
    use glam::Vec3;

    fn piece(id: &str) -> BrickInstance {
        BrickInstance {
            id: PieceId::from(id),
            kind: "2x2".into(),
            color: HexColor::new("#C91A09"),
            position: Vec3::new(0.5, 0.0, 0.5),
            rotation: 0.0,
            group_id: None,
            roughness: None,
            metalness: None,
        }
    }

    #[test]
    fn test_save_writes_json_array() {
        let mut store = MemoryStore::new();
        save(&mut store, &[piece("a"), piece("b")]).expect("save");
        let raw = store.get(PROJECT_KEY).expect("get").expect("present");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["type"], "2x2");
    }

    #[test]
    fn test_full_store_keeps_previous_save() {
        let mut store = MemoryStore::with_capacity(400);
        save(&mut store, &[piece("a")]).expect("first save fits");
        let before = store.get(PROJECT_KEY).expect("get");
        let many: Vec<_> = (0..20).map(|i| piece(&format!("p{i}"))).collect();
        let err = save(&mut store, &many).expect_err("too big");
        assert!(matches!(err, PersistError::Store(_)));
        assert_eq!(store.get(PROJECT_KEY).expect("get"), before);
    }

    #[test]
    fn test_clear_removes_project() {
        let mut store = MemoryStore::new();
        save(&mut store, &[piece("a")]).expect("save");
        clear(&mut store).expect("clear");
        assert_eq!(store.get(PROJECT_KEY).expect("get"), None);
    }
}
