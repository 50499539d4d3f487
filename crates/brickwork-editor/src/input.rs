//! Device-independent pointer and keyboard handling.

use brickwork_core::constants::GHOST_THROTTLE_MS;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Press/drag state of the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerGesture {
    #[default]
    Idle,
    Pressed { start: Vec2 },
    Dragging { start: Vec2, current: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    None,
    Click { at: Vec2 },
    BoxSelect { rect: ScreenRect },
}

impl PointerGesture {
    pub fn press(&mut self, at: Vec2) {
        *self = PointerGesture::Pressed { start: at };
    }

    /// Track motion. Returns the selection box once travel exceeds
    /// `threshold` pixels.
    pub fn motion(&mut self, at: Vec2, threshold: f32) -> Option<ScreenRect> {
        match *self {
            PointerGesture::Idle => None,
            PointerGesture::Pressed { start } => {
                if start.distance(at) > threshold {
                    *self = PointerGesture::Dragging { start, current: at };
                    Some(ScreenRect::from_corners(start, at))
                } else {
                    None
                }
            }
            PointerGesture::Dragging { start, .. } => {
                *self = PointerGesture::Dragging { start, current: at };
                Some(ScreenRect::from_corners(start, at))
            }
        }
    }

    pub fn release(&mut self, at: Vec2) -> GestureOutcome {
        let outcome = match *self {
            PointerGesture::Idle => GestureOutcome::None,
            PointerGesture::Pressed { .. } => GestureOutcome::Click { at },
            PointerGesture::Dragging { start, .. } => GestureOutcome::BoxSelect {
                rect: ScreenRect::from_corners(start, at),
            },
        };
        *self = PointerGesture::Idle;
        outcome
    }

    pub fn cancel(&mut self) {
        *self = PointerGesture::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerGesture::Dragging { .. })
    }
}

/// Rate limit for ghost recomputation. Timestamps come from the caller.
#[derive(Debug, Clone, Copy)]
pub struct GhostThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl GhostThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Whether enough time has passed; records `now_ms` when it has.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for GhostThrottle {
    fn default() -> Self {
        Self::new(GHOST_THROTTLE_MS)
    }
}

/// Editor action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    Undo,
    Redo,
    Save,
    Group,
    Clone,
    Rotate,
    Move,
    Delete,
    Escape,
    ToggleHelp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Ctrl, or Cmd on macOS.
    pub command: bool,
    pub shift: bool,
}

/// Map a key name (DOM `KeyboardEvent.key` style) to an action.
pub fn key_action(key: &str, modifiers: Modifiers) -> Option<KeyAction> {
    if modifiers.command {
        return match key.to_ascii_lowercase().as_str() {
            "z" if modifiers.shift => Some(KeyAction::Redo),
            "z" => Some(KeyAction::Undo),
            "s" => Some(KeyAction::Save),
            "g" => Some(KeyAction::Group),
            "d" => Some(KeyAction::Clone),
            _ => None,
        };
    }
    match key {
        "r" | "R" => Some(KeyAction::Rotate),
        "m" | "M" => Some(KeyAction::Move),
        "Delete" | "Backspace" => Some(KeyAction::Delete),
        "Escape" => Some(KeyAction::Escape),
        "?" | "F1" => Some(KeyAction::ToggleHelp),
        _ => None,
    }
}
