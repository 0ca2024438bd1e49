use serde::{Deserialize, Serialize};

/// Outcome of a lyrics lookup.
///
/// `NotFound` covers both a song without lyrics and a lookup that failed
/// upstream; the two are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum LyricsResult {
    Found(String),
    NotFound,
}

impl LyricsResult {
    /// Wrap extracted text, treating blank text as `NotFound`.
    #[must_use]
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self::Found(text.trim().to_string()),
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Found(text) => Some(text),
            Self::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_trims() {
        let result = LyricsResult::from_text(Some("  Hello\nWorld \n".to_string()));
        assert_eq!(result, LyricsResult::Found("Hello\nWorld".to_string()));
    }

    #[test]
    fn test_from_text_blank_is_not_found() {
        assert_eq!(LyricsResult::from_text(Some(" \n\t".to_string())), LyricsResult::NotFound);
        assert_eq!(LyricsResult::from_text(None), LyricsResult::NotFound);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(LyricsResult::Found("la".to_string()).as_text(), Some("la"));
        assert!(LyricsResult::NotFound.as_text().is_none());
        assert!(!LyricsResult::NotFound.is_found());
    }
}
