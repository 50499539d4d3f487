use std::collections::HashSet;

use brickwork_core::constants::QUARTER_TURN;
use brickwork_core::math::{is_on_plate, round_half_up};
use brickwork_core::BrickInstance;

const GRID_TOLERANCE: f32 = 1e-3;

/// Inspect loaded pieces for data an older or hand-edited save may carry.
///
/// Never fails: problems come back as human-readable warnings and the
/// pieces are loaded as they are.
pub fn check_pieces(pieces: &[BrickInstance]) -> Vec<String> {
    let mut warnings = Vec::new();

    let mut seen = HashSet::new();
    for piece in pieces {
        if !seen.insert(&piece.id) {
            warnings.push(format!("Duplicate piece id '{}'", piece.id));
        }
    }

    for piece in pieces {
        let y = piece.position.y;
        if y < -GRID_TOLERANCE {
            warnings.push(format!("Piece '{}' sits below the ground (y = {y})", piece.id));
        } else if !is_on_plate(y, GRID_TOLERANCE) {
            warnings.push(format!("Piece '{}' is off the plate grid (y = {y})", piece.id));
        }

        let turns = piece.rotation / QUARTER_TURN;
        if (turns - round_half_up(turns)).abs() > GRID_TOLERANCE {
            warnings.push(format!(
                "Piece '{}' has a non-quarter-turn rotation ({} rad)",
                piece.id, piece.rotation
            ));
        }
    }

    warnings
}
