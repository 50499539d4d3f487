use std::collections::HashSet;

use brickwork_catalog::PieceCatalog;
use brickwork_core::{BrickInstance, GhostPart, HexColor, PieceId, PieceKind, SymmetryAxis};
use brickwork_persist::{KeyValueStore, PersistError};
use brickwork_world::pick::{raycast_pieces, surface_hit};
use brickwork_world::{compute_preview, GhostPreview, OccupancyIndex, Ray, SurfaceHit};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::history::History;
use crate::input::{GestureOutcome, GhostThrottle, KeyAction, PointerGesture, ScreenRect};
use crate::selection::{self, PieceUpdate};
use crate::suggest::{suggest_or_fallback, SuggestionContext, SuggestionSource};
use crate::tools::ToolSettings;

/// Camera projection used to turn screen points into rays and back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub view_proj: Mat4,
    /// Canvas size in pixels.
    pub size: Vec2,
}

impl Viewport {
    pub fn new(view_proj: Mat4, size: Vec2) -> Self {
        Self { view_proj, size }
    }

    /// Perspective camera at `eye` looking at `target`, y up.
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_radians: f32, size: Vec2) -> Self {
        let aspect = if size.y > 0.0 { size.x / size.y } else { 1.0 };
        let proj = Mat4::perspective_rh(fov_y_radians, aspect, 0.1, 1000.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        Self::new(proj * view, size)
    }

    /// Pixel position of a world point, or None behind the camera.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_proj * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * self.size.x / 2.0,
            (1.0 - ndc.y) * self.size.y / 2.0,
        ))
    }

    /// World ray through a pixel.
    pub fn ray_through(&self, screen: Vec2) -> Ray {
        let ndc = Vec2::new(
            2.0 * screen.x / self.size.x - 1.0,
            1.0 - 2.0 * screen.y / self.size.y,
        );
        let inverse = self.view_proj.inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}

/// Multi-part placement in progress: a clone, a move or a prefab.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostGesture {
    pub parts: Vec<GhostPart>,
    /// Parts stand in for existing pieces that will be repositioned.
    pub moving: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommitOutcome {
    Placed { count: usize },
    Moved { count: usize },
    /// The preview collides or hangs past the stacking limit.
    Refused,
    /// Nothing under the pointer yet.
    NoPreview,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    None,
    Committed(CommitOutcome),
    BoxSelected { count: usize },
}

/// Read-only state handed to renderers each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub pieces: &'a [BrickInstance],
    pub preview: Option<&'a GhostPreview>,
    pub selection: &'a [PieceId],
    pub selection_box: Option<ScreenRect>,
    pub tools: &'a ToolSettings,
    pub moving: bool,
    pub dirty: bool,
}

/// Single owner of the editing state.
///
/// All mutation goes through these methods. Every change to the piece set
/// is pushed to history and rebuilds the occupancy index.
pub struct Editor {
    catalog: PieceCatalog,
    config: EditorConfig,
    pieces: Vec<BrickInstance>,
    history: History,
    selection: Vec<PieceId>,
    tools: ToolSettings,
    ghost: Option<GhostGesture>,
    occupancy: OccupancyIndex,
    preview: Option<GhostPreview>,
    last_hit: Option<SurfaceHit>,
    gesture: PointerGesture,
    selection_box: Option<ScreenRect>,
    throttle: GhostThrottle,
    help_visible: bool,
}

impl Editor {
    pub fn new(catalog: PieceCatalog, config: EditorConfig) -> Self {
        let history = History::new(config.history_capacity);
        let tools = ToolSettings::from_config(&config);
        let throttle = GhostThrottle::new(config.ghost_throttle_ms);
        Self {
            catalog,
            config,
            pieces: Vec::new(),
            history,
            selection: Vec::new(),
            tools,
            ghost: None,
            occupancy: OccupancyIndex::new(),
            preview: None,
            last_hit: None,
            gesture: PointerGesture::Idle,
            selection_box: None,
            throttle,
            help_visible: false,
        }
    }

    pub fn catalog(&self) -> &PieceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pieces(&self) -> &[BrickInstance] {
        &self.pieces
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &[PieceId] {
        &self.selection
    }

    pub fn tools(&self) -> &ToolSettings {
        &self.tools
    }

    pub fn ghost(&self) -> Option<&GhostGesture> {
        self.ghost.as_ref()
    }

    pub fn preview(&self) -> Option<&GhostPreview> {
        self.preview.as_ref()
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn is_moving(&self) -> bool {
        self.ghost.as_ref().is_some_and(|g| g.moving)
    }

    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            pieces: &self.pieces,
            preview: self.preview.as_ref(),
            selection: &self.selection,
            selection_box: self.selection_box,
            tools: &self.tools,
            moving: self.is_moving(),
            dirty: self.history.is_dirty(),
        }
    }

    // ---- tool settings ----

    pub fn set_piece_kind(&mut self, kind: PieceKind) {
        if !self.catalog.contains(&kind) {
            log::warn!("Unknown piece kind '{kind}', using unit footprint");
        }
        self.tools.kind = kind;
        self.refresh_preview();
    }

    pub fn set_color(&mut self, color: HexColor) {
        self.tools.color = color;
        self.refresh_preview();
    }

    pub fn set_material(&mut self, roughness: f32, metalness: f32) {
        self.tools.roughness = roughness;
        self.tools.metalness = metalness;
        self.refresh_preview();
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.tools.rotation = rotation;
        self.refresh_preview();
    }

    pub fn rotate(&mut self) {
        self.tools.rotate_quarter();
        self.refresh_preview();
    }

    pub fn set_symmetry(&mut self, axis: SymmetryAxis) {
        self.tools.symmetry = axis;
        self.refresh_preview();
    }

    // ---- ghost preview ----

    fn moving_ids(&self) -> HashSet<PieceId> {
        match &self.ghost {
            Some(ghost) if ghost.moving => ghost.parts.iter().filter_map(|p| p.source_id.clone()).collect(),
            _ => HashSet::new(),
        }
    }

    fn rebuild_occupancy(&mut self) {
        self.occupancy = OccupancyIndex::build(&self.pieces, &self.catalog, &self.moving_ids());
    }

    fn template(&self) -> Vec<GhostPart> {
        match &self.ghost {
            Some(ghost) => ghost.parts.clone(),
            None => vec![GhostPart {
                roughness: Some(self.tools.roughness),
                metalness: Some(self.tools.metalness),
                ..GhostPart::at_anchor(self.tools.kind.clone(), self.tools.color.clone(), 0.0)
            }],
        }
    }

    fn refresh_preview(&mut self) {
        let Some(hit) = self.last_hit else {
            self.preview = None;
            return;
        };
        // moves reposition existing pieces and never spawn mirrored copies
        let axis = if self.is_moving() {
            SymmetryAxis::None
        } else {
            self.tools.symmetry
        };
        self.preview = compute_preview(
            &self.occupancy,
            &self.catalog,
            &hit,
            &self.template(),
            self.tools.rotation,
            axis,
            &self.config.placement(),
        );
    }

    /// Recompute the ghost for a known surface hit, unthrottled.
    pub fn hover_hit(&mut self, hit: SurfaceHit) {
        self.last_hit = Some(hit);
        self.refresh_preview();
    }

    /// Recompute the ghost under a pointer ray. Skipped (returning false)
    /// when called again within the throttle interval.
    pub fn hover(&mut self, ray: &Ray, now_ms: f64) -> bool {
        if !self.throttle.ready(now_ms) {
            return false;
        }
        match surface_hit(&self.pieces, &self.catalog, ray, &self.moving_ids()) {
            Some(hit) => self.hover_hit(hit),
            None => {
                self.last_hit = None;
                self.preview = None;
            }
        }
        true
    }

    // ---- committing ----

    /// Apply a new piece set. Identical sets are not recorded.
    fn apply_change(&mut self, next: Vec<BrickInstance>) -> bool {
        if next == self.pieces {
            return false;
        }
        self.history.push(next.clone());
        self.pieces = next;
        self.after_pieces_changed();
        true
    }

    fn after_pieces_changed(&mut self) {
        self.rebuild_occupancy();
        self.refresh_preview();
    }

    /// Place or move the current ghost. Refused when the preview is invalid.
    pub fn commit(&mut self) -> CommitOutcome {
        let Some(preview) = &self.preview else {
            return CommitOutcome::NoPreview;
        };
        if !preview.is_committable() {
            log::debug!("Commit refused: placement invalid");
            return CommitOutcome::Refused;
        }

        let (next, outcome) = if self.is_moving() {
            let moved: Vec<(PieceId, Vec3, f32)> = preview
                .main
                .placements()
                .filter_map(|(part, position, rotation)| part.source_id.clone().map(|id| (id, position, rotation)))
                .collect();
            let next = self
                .pieces
                .iter()
                .cloned()
                .map(|mut piece| {
                    if let Some((_, position, rotation)) = moved.iter().find(|(id, _, _)| *id == piece.id) {
                        piece.position = *position;
                        piece.rotation = *rotation;
                    }
                    piece
                })
                .collect();
            (next, CommitOutcome::Moved { count: moved.len() })
        } else {
            let mut next = self.pieces.clone();
            let groups = std::iter::once(&preview.main).chain(preview.mirrored.as_ref());
            let before = next.len();
            for group in groups {
                next.extend(group.placements().map(|(part, position, rotation)| BrickInstance {
                    id: PieceId::generate(),
                    kind: part.kind.clone(),
                    color: part.color.clone(),
                    position,
                    rotation,
                    group_id: None,
                    roughness: Some(part.roughness.unwrap_or(self.tools.roughness)),
                    metalness: Some(part.metalness.unwrap_or(self.tools.metalness)),
                }));
            }
            let count = next.len() - before;
            (next, CommitOutcome::Placed { count })
        };

        log::info!("Commit: {outcome:?}");
        self.selection.clear();
        self.ghost = None;
        if !self.apply_change(next) {
            // a move back onto the same spot changes nothing but still ends the gesture
            self.after_pieces_changed();
        }
        outcome
    }

    /// Hover `hit` and commit in one step.
    pub fn place(&mut self, hit: SurfaceHit) -> CommitOutcome {
        self.hover_hit(hit);
        self.commit()
    }

    // ---- pointer ----

    pub fn pointer_down(&mut self, at: Vec2) {
        self.gesture.press(at);
    }

    /// Track the pointer. Returns the selection box while dragging.
    pub fn pointer_move(&mut self, at: Vec2, viewport: &Viewport, now_ms: f64) -> Option<ScreenRect> {
        self.selection_box = self.gesture.motion(at, self.config.drag_threshold_px);
        if self.selection_box.is_none() {
            self.hover(&viewport.ray_through(at), now_ms);
        }
        self.selection_box
    }

    /// A click commits the ghost; a drag box-selects.
    pub fn pointer_up(&mut self, at: Vec2, additive: bool, viewport: &Viewport) -> PointerOutcome {
        self.selection_box = None;
        match self.gesture.release(at) {
            GestureOutcome::None => PointerOutcome::None,
            GestureOutcome::Click { .. } => PointerOutcome::Committed(self.commit()),
            GestureOutcome::BoxSelect { rect } => PointerOutcome::BoxSelected {
                count: self.box_select(viewport, rect, additive),
            },
        }
    }

    // ---- selection ----

    /// Select a piece together with its group. `additive` toggles instead.
    pub fn click_select(&mut self, id: &PieceId, additive: bool) {
        let members = selection::expand_groups(&self.pieces, std::slice::from_ref(id));
        if members.is_empty() || !self.pieces.iter().any(|p| &p.id == id) {
            if !additive {
                self.selection.clear();
            }
            return;
        }
        if !additive {
            self.selection = members;
        } else if self.selection.contains(id) {
            self.selection.retain(|s| !members.contains(s));
        } else {
            for member in members {
                if !self.selection.contains(&member) {
                    self.selection.push(member);
                }
            }
        }
    }

    /// Select the piece under `ray`; a miss clears a non-additive selection.
    pub fn select_by_ray(&mut self, ray: &Ray, additive: bool) -> Option<PieceId> {
        let hit = raycast_pieces(&self.pieces, &self.catalog, ray, &HashSet::new());
        match &hit {
            Some(piece_hit) => self.click_select(&piece_hit.id, additive),
            None if !additive => self.selection.clear(),
            None => {}
        }
        hit.map(|h| h.id)
    }

    /// Select pieces whose position projects inside `rect`.
    pub fn box_select(&mut self, viewport: &Viewport, rect: ScreenRect, additive: bool) -> usize {
        let inside: Vec<PieceId> = self
            .pieces
            .iter()
            .filter(|p| viewport.project(p.position).is_some_and(|s| rect.contains(s)))
            .map(|p| p.id.clone())
            .collect();
        let count = inside.len();
        if additive {
            for id in inside {
                if !self.selection.contains(&id) {
                    self.selection.push(id);
                }
            }
        } else {
            self.selection = inside;
        }
        log::debug!("Box select: {count} pieces");
        count
    }

    /// Replace the selection, dropping ids that are not placed.
    pub fn set_selection(&mut self, ids: Vec<PieceId>) {
        let placed: HashSet<&PieceId> = self.pieces.iter().map(|p| &p.id).collect();
        let mut seen = HashSet::new();
        self.selection = ids
            .into_iter()
            .filter(|id| placed.contains(id) && seen.insert(id.clone()))
            .collect();
    }

    pub fn delete_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let next = selection::remove(&self.pieces, &self.selection);
        self.selection.clear();
        self.apply_change(next)
    }

    pub fn group_selection(&mut self) -> bool {
        match selection::group(&self.pieces, &self.selection) {
            Some(next) => self.apply_change(next),
            None => false,
        }
    }

    pub fn ungroup_selection(&mut self) -> bool {
        match selection::ungroup(&self.pieces, &self.selection) {
            Some(next) => self.apply_change(next),
            None => false,
        }
    }

    pub fn mirror_selection(&mut self, axis: SymmetryAxis) -> bool {
        let next = selection::mirror(
            &self.pieces,
            &self.selection,
            axis,
            &self.catalog,
            self.config.snap_epsilon,
        );
        match next {
            Some(next) => self.apply_change(next),
            None => false,
        }
    }

    pub fn update_selection(&mut self, update: &PieceUpdate) -> bool {
        let next = selection::update_properties(&self.pieces, &self.selection, update);
        self.apply_change(next)
    }

    // ---- ghost gestures ----

    fn begin_ghost(&mut self, ghost: Option<GhostGesture>) {
        self.ghost = ghost;
        self.rebuild_occupancy();
        self.refresh_preview();
    }

    /// Pick up copies of the selection. Clears the selection.
    pub fn start_clone(&mut self) -> bool {
        let Some(parts) = selection::start_clone(&self.pieces, &self.selection) else {
            return false;
        };
        self.selection.clear();
        self.begin_ghost(Some(GhostGesture { parts, moving: false }));
        true
    }

    /// Pick up the selection itself. The moving pieces leave the
    /// occupancy index until the move ends.
    pub fn start_move(&mut self) -> bool {
        let Some(parts) = selection::start_move(&self.pieces, &self.selection) else {
            return false;
        };
        self.begin_ghost(Some(GhostGesture { parts, moving: true }));
        true
    }

    pub fn select_prefab(&mut self, id: &str) -> bool {
        let Some(prefab) = self.catalog.prefab(id) else {
            log::warn!("Unknown prefab '{id}'");
            return false;
        };
        let parts = prefab.ghost_parts();
        self.selection.clear();
        self.begin_ghost(Some(GhostGesture { parts, moving: false }));
        true
    }

    /// Drop the selection, any ghost gesture and any drag in progress.
    pub fn escape(&mut self) {
        self.selection.clear();
        self.gesture.cancel();
        self.selection_box = None;
        self.begin_ghost(None);
    }

    // ---- history ----

    fn restore(&mut self, snapshot: Vec<BrickInstance>) {
        self.pieces = snapshot;
        let placed: HashSet<&PieceId> = self.pieces.iter().map(|p| &p.id).collect();
        self.selection.retain(|id| placed.contains(id));
        // the moved pieces may no longer exist in this snapshot
        if self.is_moving() {
            self.ghost = None;
        }
        self.after_pieces_changed();
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // ---- persistence ----

    pub fn save<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<(), PersistError> {
        brickwork_persist::save(store, &self.pieces)?;
        self.history.mark_saved();
        Ok(())
    }

    /// Replace the scene with the saved project. A missing or malformed
    /// save leaves the editor untouched and returns false.
    pub fn load<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> bool {
        let Some(project) = brickwork_persist::load(store) else {
            return false;
        };
        self.pieces = project.pieces;
        self.history.reset_to(self.pieces.clone());
        self.selection.clear();
        self.ghost = None;
        self.after_pieces_changed();
        true
    }

    /// Empty the scene and history and forget the saved project.
    pub fn clear_project<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<(), PersistError> {
        self.pieces.clear();
        self.history.clear();
        self.selection.clear();
        self.ghost = None;
        self.after_pieces_changed();
        brickwork_persist::clear(store)
    }

    // ---- onboarding / keys / suggestions ----

    /// Show the help on first run and remember that it was shown.
    pub fn init_onboarding<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        self.help_visible = !brickwork_persist::has_seen_onboarding(store);
        if self.help_visible {
            brickwork_persist::mark_onboarding_seen(store);
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Run a key binding. Save failures are logged.
    pub fn handle_key<S: KeyValueStore + ?Sized>(&mut self, action: KeyAction, store: &mut S) -> bool {
        match action {
            KeyAction::Undo => self.undo(),
            KeyAction::Redo => self.redo(),
            KeyAction::Save => match self.save(store) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Could not save project: {e}");
                    false
                }
            },
            KeyAction::Group => self.group_selection(),
            KeyAction::Clone => self.start_clone(),
            KeyAction::Rotate => {
                self.rotate();
                true
            }
            KeyAction::Move => !self.selection.is_empty() && self.start_move(),
            KeyAction::Delete => self.delete_selection(),
            KeyAction::Escape => {
                self.escape();
                true
            }
            KeyAction::ToggleHelp => {
                self.toggle_help();
                true
            }
        }
    }

    pub fn suggestion_context(&self) -> SuggestionContext {
        SuggestionContext {
            piece_count: self.pieces.len(),
            current_kind: self.tools.kind.clone(),
        }
    }

    pub fn suggest(&self, source: &dyn SuggestionSource) -> String {
        suggest_or_fallback(source, &self.suggestion_context())
    }
}
