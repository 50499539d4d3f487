use brickwork_core::PieceKind;
use thiserror::Error;

/// Shown when the suggestion service fails.
pub const FALLBACK_SUGGESTION: &str = "How about building a miniature lighthouse?";

/// Shown when the service answers with nothing.
pub const EMPTY_SUGGESTION: &str = "Build a tiny micro-bot using only primary colors!";

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),
    #[error("suggestion request failed: {0}")]
    Request(String),
}

/// What the service is told about the current build.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionContext {
    pub piece_count: usize,
    pub current_kind: PieceKind,
}

impl SuggestionContext {
    pub fn prompt(&self) -> String {
        format!(
            "You are a master brick builder. The user is in a 3D editor. \
             They currently have {} pieces placed. \
             Their current selected part is a {}. \
             Suggest a creative building project or a \"Mini-Challenge\" for them. \
             Keep the suggestion under 40 words. Make it inspiring and playful.",
            self.piece_count, self.current_kind
        )
    }
}

/// External text generator. Implementations may block; the editor never
/// calls one while handling an input event.
pub trait SuggestionSource {
    fn suggest(&self, context: &SuggestionContext) -> Result<String, SuggestionError>;
}

/// Ask `source` for an idea, substituting fixed text on failure.
pub fn suggest_or_fallback(source: &dyn SuggestionSource, context: &SuggestionContext) -> String {
    match source.suggest(context) {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_SUGGESTION.to_string(),
        Err(e) => {
            log::warn!("Suggestion failed: {e}");
            FALLBACK_SUGGESTION.to_string()
        }
    }
}

/// Source that never reaches a service; always yields the fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl SuggestionSource for OfflineSource {
    fn suggest(&self, _context: &SuggestionContext) -> Result<String, SuggestionError> {
        Err(SuggestionError::Unavailable("offline".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl SuggestionSource for Fixed {
        fn suggest(&self, _context: &SuggestionContext) -> Result<String, SuggestionError> {
            Ok(self.0.to_string())
        }
    }

    fn context() -> SuggestionContext {
        SuggestionContext {
            piece_count: 12,
            current_kind: PieceKind::from("2x4"),
        }
    }

    #[test]
    fn test_prompt_mentions_build_state() {
        let prompt = context().prompt();
        assert!(prompt.contains("12 pieces"));
        assert!(prompt.contains("2x4"));
    }

    #[test]
    fn test_success_passes_through() {
        assert_eq!(suggest_or_fallback(&Fixed("  Build a bridge. "), &context()), "Build a bridge.");
    }

    #[test]
    fn test_failures_fall_back() {
        assert_eq!(suggest_or_fallback(&OfflineSource, &context()), FALLBACK_SUGGESTION);
        assert_eq!(suggest_or_fallback(&Fixed("   "), &context()), EMPTY_SUGGESTION);
    }
}
