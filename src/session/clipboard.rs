//! Clipboard collaborator

/// Clipboard error
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Access to the host clipboard
pub trait Clipboard {
    /// Whether the clipboard currently holds text
    fn has_text(&mut self) -> bool {
        self.text().is_some_and(|text| !text.is_empty())
    }

    /// Current clipboard text, if any
    fn text(&mut self) -> Option<String>;

    /// Replace the clipboard contents
    fn set_text(&mut self, text: &str);
}

/// In-process clipboard, used headless and in tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: Some(text.into()),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&mut self) -> Option<String> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.contents = Some(text.to_string());
    }
}

/// System clipboard backed by copypasta
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    context: copypasta::ClipboardContext,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        copypasta::ClipboardContext::new()
            .map(|context| Self { context })
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

#[cfg(feature = "system-clipboard")]
impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard").finish_non_exhaustive()
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn text(&mut self) -> Option<String> {
        use copypasta::ClipboardProvider;
        match self.context.get_contents() {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("clipboard read failed: {}", e);
                None
            },
        }
    }

    fn set_text(&mut self, text: &str) {
        use copypasta::ClipboardProvider;
        if let Err(e) = self.context.set_contents(text.to_string()) {
            tracing::warn!("clipboard write failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert!(!clipboard.has_text());
        assert_eq!(clipboard.text(), None);

        clipboard.set_text("copied");
        assert!(clipboard.has_text());
        assert_eq!(clipboard.text().as_deref(), Some("copied"));
    }

    #[test]
    fn test_empty_text_is_not_text() {
        let mut clipboard = MemoryClipboard::with_text("");
        assert!(!clipboard.has_text());
    }
}
