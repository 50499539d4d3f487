pub mod config;
pub mod editor;
pub mod history;
pub mod input;
pub mod selection;
pub mod suggest;
pub mod tools;

pub use config::{ConfigError, EditorConfig};
pub use editor::{CommitOutcome, Editor, FrameView, GhostGesture, PointerOutcome, Viewport};
pub use history::History;
pub use input::{key_action, GestureOutcome, GhostThrottle, KeyAction, Modifiers, PointerGesture, ScreenRect};
pub use selection::PieceUpdate;
pub use suggest::{
    suggest_or_fallback, OfflineSource, SuggestionContext, SuggestionError, SuggestionSource, EMPTY_SUGGESTION,
    FALLBACK_SUGGESTION,
};
pub use tools::ToolSettings;
