use brickwork_catalog::PieceCatalog;
use brickwork_core::PieceId;
use brickwork_editor::{key_action, CommitOutcome, Editor, EditorConfig, OfflineSource, PointerOutcome, Viewport};
use brickwork_persist::{KeyValueStore, PersistError};
use brickwork_world::SurfaceHit;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::script::{Script, Step};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse script: {0}")]
    Parse(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("step {step}: no piece at index {index}")]
    BadIndex { step: usize, index: usize },
    #[error("step {step}: expected {expected} pieces, found {found}")]
    Expectation { step: usize, expected: usize, found: usize },
}

/// What a single step did to the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Applied,
    /// Precondition failed; the scene is unchanged.
    Ignored,
    Committed { commit: CommitOutcome },
    Selected { count: usize },
    Suggestion { text: String },
}

impl From<bool> for StepOutcome {
    fn from(changed: bool) -> Self {
        if changed {
            StepOutcome::Applied
        } else {
            StepOutcome::Ignored
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub outcome: StepOutcome,
}

/// An editor bound to a store and a camera.
pub struct Replay<'s> {
    editor: Editor,
    store: &'s mut dyn KeyValueStore,
    viewport: Viewport,
}

impl<'s> Replay<'s> {
    pub fn new(catalog: PieceCatalog, config: EditorConfig, store: &'s mut dyn KeyValueStore, viewport: Viewport) -> Self {
        Self {
            editor: Editor::new(catalog, config),
            store,
            viewport,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    fn piece_id(&self, step: usize, index: usize) -> Result<PieceId, ReplayError> {
        self.editor
            .pieces()
            .get(index)
            .map(|p| p.id.clone())
            .ok_or(ReplayError::BadIndex { step, index })
    }

    /// Apply one step. `at` is the step's position in the script.
    pub fn apply(&mut self, at: usize, step: &Step) -> Result<StepOutcome, ReplayError> {
        let ed = &mut self.editor;
        let outcome = match step {
            Step::SetKind { kind } => {
                ed.set_piece_kind(kind.clone());
                StepOutcome::Applied
            }
            Step::SetColor { color } => {
                ed.set_color(color.clone());
                StepOutcome::Applied
            }
            Step::SetMaterial { roughness, metalness } => {
                ed.set_material(*roughness, *metalness);
                StepOutcome::Applied
            }
            Step::SetRotation { radians } => {
                ed.set_rotation(*radians);
                StepOutcome::Applied
            }
            Step::Rotate => {
                ed.rotate();
                StepOutcome::Applied
            }
            Step::SetSymmetry { axis } => {
                ed.set_symmetry(*axis);
                StepOutcome::Applied
            }
            Step::Hover { point, normal } => {
                ed.hover_hit(SurfaceHit::new(*point, *normal));
                ed.preview().is_some().into()
            }
            Step::Commit => StepOutcome::Committed { commit: ed.commit() },
            Step::Place { point, normal } => StepOutcome::Committed {
                commit: ed.place(SurfaceHit::new(*point, *normal)),
            },
            Step::PointerDown { x, y } => {
                ed.pointer_down(Vec2::new(*x, *y));
                StepOutcome::Applied
            }
            Step::PointerMove { x, y, at_ms } => {
                ed.pointer_move(Vec2::new(*x, *y), &self.viewport, *at_ms);
                StepOutcome::Applied
            }
            Step::PointerUp { x, y, shift } => match ed.pointer_up(Vec2::new(*x, *y), *shift, &self.viewport) {
                PointerOutcome::None => StepOutcome::Ignored,
                PointerOutcome::Committed(commit) => StepOutcome::Committed { commit },
                PointerOutcome::BoxSelected { count } => StepOutcome::Selected { count },
            },
            Step::Select { indices } => {
                let ids = indices
                    .iter()
                    .map(|&index| self.piece_id(at, index))
                    .collect::<Result<Vec<_>, _>>()?;
                self.editor.set_selection(ids);
                StepOutcome::Selected {
                    count: self.editor.selection().len(),
                }
            }
            Step::ClickSelect { index, shift } => {
                let id = self.piece_id(at, *index)?;
                self.editor.click_select(&id, *shift);
                StepOutcome::Selected {
                    count: self.editor.selection().len(),
                }
            }
            Step::SelectAt { x, y, shift } => {
                let ray = self.viewport.ray_through(Vec2::new(*x, *y));
                ed.select_by_ray(&ray, *shift);
                StepOutcome::Selected {
                    count: ed.selection().len(),
                }
            }
            Step::Delete => ed.delete_selection().into(),
            Step::Group => ed.group_selection().into(),
            Step::Ungroup => ed.ungroup_selection().into(),
            Step::Mirror { axis } => ed.mirror_selection(*axis).into(),
            Step::Update(update) => ed.update_selection(update).into(),
            Step::Clone => ed.start_clone().into(),
            Step::Move => ed.start_move().into(),
            Step::Prefab { id } => ed.select_prefab(id).into(),
            Step::Escape => {
                ed.escape();
                StepOutcome::Applied
            }
            Step::Undo => ed.undo().into(),
            Step::Redo => ed.redo().into(),
            Step::Save => {
                ed.save(&mut *self.store)?;
                StepOutcome::Applied
            }
            Step::Load => ed.load(&*self.store).into(),
            Step::Clear => {
                ed.clear_project(&mut *self.store)?;
                StepOutcome::Applied
            }
            Step::Key { key, modifiers } => match key_action(key, *modifiers) {
                Some(action) => ed.handle_key(action, &mut *self.store).into(),
                None => StepOutcome::Ignored,
            },
            Step::Suggest => StepOutcome::Suggestion {
                text: ed.suggest(&OfflineSource),
            },
            Step::ExpectPieces { count } => {
                let found = ed.pieces().len();
                if found != *count {
                    return Err(ReplayError::Expectation {
                        step: at,
                        expected: *count,
                        found,
                    });
                }
                StepOutcome::Applied
            }
        };
        log::debug!("Step {at}: {step:?} -> {outcome:?}");
        Ok(outcome)
    }

    /// Run every step in order, stopping at the first error.
    pub fn run(&mut self, script: &Script) -> Result<Vec<StepRecord>, ReplayError> {
        let mut records = Vec::with_capacity(script.steps.len());
        for (index, step) in script.steps.iter().enumerate() {
            let outcome = self.apply(index, step)?;
            records.push(StepRecord { index, outcome });
        }
        Ok(records)
    }
}
