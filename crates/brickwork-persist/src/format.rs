//! Project file format: a JSON array of placed pieces.

use brickwork_core::BrickInstance;

use crate::error::PersistError;

/// Storage key of the saved project.
pub const PROJECT_KEY: &str = "brickwork-project-v1";

/// Storage key of the one-shot "instructions seen" flag.
pub const ONBOARDING_KEY: &str = "brickwork-seen-instructions";

/// Value stored under [`ONBOARDING_KEY`] once the help has been shown.
pub const FLAG_SET: &str = "true";

pub fn encode_pieces(pieces: &[BrickInstance]) -> Result<String, PersistError> {
    serde_json::to_string(pieces).map_err(|e| PersistError::Encode(e.to_string()))
}

pub fn decode_pieces(raw: &str) -> Result<Vec<BrickInstance>, PersistError> {
    serde_json::from_str(raw).map_err(|e| PersistError::Decode(e.to_string()))
}
