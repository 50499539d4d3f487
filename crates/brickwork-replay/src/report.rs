use std::path::Path;

use brickwork_core::BrickInstance;
use brickwork_editor::Editor;
use serde::{Deserialize, Serialize};

use crate::runner::{StepOutcome, StepRecord};

/// Final state of a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub piece_count: usize,
    pub history_len: usize,
    /// -1 before the first recorded edit.
    pub cursor: i64,
    pub dirty: bool,
    pub steps: Vec<StepRecord>,
    pub pieces: Vec<BrickInstance>,
}

impl Report {
    pub fn from_editor(editor: &Editor, steps: Vec<StepRecord>) -> Self {
        let history = editor.history();
        Self {
            piece_count: editor.pieces().len(),
            history_len: history.len(),
            cursor: history.cursor().map_or(-1, |c| c as i64),
            dirty: history.is_dirty(),
            steps,
            pieces: editor.pieces().to_vec(),
        }
    }
}

pub fn save_report(path: &Path, report: &Report) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Markdown summary of a replay.
pub fn format_markdown(report: &Report) -> String {
    let mut out = String::new();
    out.push_str("| Pieces | History | Cursor | Unsaved |\n");
    out.push_str("|--------|---------|--------|---------|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        report.piece_count,
        report.history_len,
        report.cursor,
        if report.dirty { "yes" } else { "no" },
    ));

    let ignored = report
        .steps
        .iter()
        .filter(|s| s.outcome == StepOutcome::Ignored)
        .count();
    out.push_str(&format!("\n{} steps, {} ignored\n", report.steps.len(), ignored));
    out
}
