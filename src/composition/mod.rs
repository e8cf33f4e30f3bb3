//! Text composition tracking
//!
//! Owns the transient input buffer that backs the host's text-input
//! protocol: text typed but not yet known to be final, the IME marked
//! (composition) range, and the caret/selection range.
//!
//! All offsets are character indices. Ranges handed in by an input method
//! are clamped to the buffer rather than rejected, since input methods
//! routinely submit ranges that went stale a keystroke ago.

use serde::Serialize;
use tracing::debug;
use unicode_width::UnicodeWidthChar;

use crate::core::{OutboundUnit, TextRange};
use crate::input::{apply_control, ControlLatch};

/// Byte sent by backward deletion from the text-input path.
///
/// Unlike the hardware Backspace key this ignores the configured
/// backspace code.
pub const DELETE_BACKWARD: u8 = 0x7f;

/// What the host's IME candidate UI needs to position itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionSnapshot {
    pub marked: Option<TextRange>,
    pub selection: TextRange,
    pub text: String,
    /// Display width in cells of the text before the caret
    pub caret_cells: usize,
}

/// Input buffer with marked and selection ranges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionTracker {
    buffer: Vec<char>,
    marked: Option<TextRange>,
    selection: TextRange,
}

impl CompositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current buffer contents
    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Buffer length in characters
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The marked range, `None` when no composition is in progress
    pub fn marked_range(&self) -> Option<TextRange> {
        self.marked
    }

    pub fn has_marked_text(&self) -> bool {
        self.marked.is_some()
    }

    pub fn selected_range(&self) -> TextRange {
        self.selection
    }

    /// Move the caret/selection. Out-of-bounds ranges are clamped.
    pub fn set_selected_range(&mut self, range: TextRange) {
        self.selection = self.clamp(range);
    }

    /// Text covered by `range`, clamped to the buffer
    pub fn text_in_range(&self, range: TextRange) -> String {
        let range = self.clamp(range);
        self.buffer[range.start()..range.end()].iter().collect()
    }

    /// Replace `range` with `text` without sending anything. The caret
    /// lands after the inserted text.
    pub fn replace_range(&mut self, range: TextRange, text: &str) {
        let inserted = self.splice(range, text);
        self.selection = TextRange::caret(inserted.end());
        self.marked = self.marked.filter(|marked| marked.fits(self.buffer.len()));
    }

    /// Commit `text` typed by the user or an input method.
    ///
    /// Returns the unit to send: the committed text, or its control
    /// mapping when the control latch was armed. An open composition is
    /// committed, which clears the buffer; so does a committed newline,
    /// since the line now belongs to the terminal.
    pub fn insert_text(&mut self, text: &str, latch: &mut ControlLatch) -> OutboundUnit {
        let committing = self.marked.is_some();
        let target = self.marked.unwrap_or(self.selection);
        let inserted = self.splice(target, text);
        self.marked = None;
        self.selection = TextRange::caret(inserted.end());

        if committing || text.contains(['\n', '\r']) {
            debug!(committing, "composition committed");
            self.reset();
        }

        encode_committed(text, latch)
    }

    /// Delete backwards from the caret.
    ///
    /// Always yields `0x7F` for the session. In the buffer this removes the
    /// marked text if any, else the selection, else the character before
    /// the caret; at the buffer start it does nothing. The marked range is
    /// always cleared.
    pub fn delete_backward(&mut self) -> OutboundUnit {
        let marked = self.marked.take().map(|range| self.clamp(range));

        if let Some(marked) = marked.filter(|range| !range.is_empty()) {
            self.splice(marked, "");
            self.selection = TextRange::caret(marked.start());
        } else if !self.selection.is_empty() {
            let selection = self.selection;
            self.splice(selection, "");
            self.selection = TextRange::caret(selection.start());
        } else if self.selection.start() > 0 {
            let caret = self.selection.start();
            self.splice(TextRange::new(caret - 1, caret), "");
            self.selection = TextRange::caret(caret - 1);
        }

        OutboundUnit::Bytes(vec![DELETE_BACKWARD])
    }

    /// Set provisional composition text.
    ///
    /// Replaces the current marked text (or the selection when nothing is
    /// marked) with `text` and marks exactly the inserted span.
    /// `selected` is relative to `text` and places the caret inside it.
    /// Nothing is sent. Empty `text` cancels the composition.
    pub fn set_marked_text(&mut self, text: &str, selected: TextRange) {
        if text.is_empty() {
            if self.marked.take().is_some() {
                debug!("composition cancelled");
                self.reset();
            }
            return;
        }

        let target = self.marked.unwrap_or(self.selection);
        let inserted = self.splice(target, text);
        let sub = selected.clamp_to(inserted.len());
        self.marked = Some(inserted);
        self.selection = TextRange::new(inserted.start() + sub.start(), inserted.start() + sub.end());
    }

    /// Commit the marked text as if typed. Returns `None` when nothing is
    /// marked, so calling it twice is the same as calling it once.
    pub fn unmark_text(&mut self, latch: &mut ControlLatch) -> Option<OutboundUnit> {
        let marked = self.marked.take()?;
        let marked = self.clamp(marked);
        let text = self.text_in_range(marked);
        debug!(chars = marked.len(), "marked text committed");
        self.reset();
        Some(encode_committed(&text, latch))
    }

    /// Drop the buffer and both ranges
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.marked = None;
        self.selection = TextRange::caret(0);
    }

    pub fn snapshot(&self) -> CompositionSnapshot {
        let caret_cells = self.buffer[..self.selection.start()]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum();
        CompositionSnapshot {
            marked: self.marked,
            selection: self.selection,
            text: self.text(),
            caret_cells,
        }
    }

    fn clamp(&self, range: TextRange) -> TextRange {
        let clamped = range.clamp_to(self.buffer.len());
        if clamped != range {
            debug!(?range, len = self.buffer.len(), "clamped stale range");
        }
        clamped
    }

    /// Replace `range` with `text`, returning the inserted span
    fn splice(&mut self, range: TextRange, text: &str) -> TextRange {
        let range = self.clamp(range);
        let before = self.buffer.len();
        self.buffer.splice(range.start()..range.end(), text.chars());
        let inserted = self.buffer.len() + range.len() - before;
        TextRange::with_len(range.start(), inserted)
    }
}

fn encode_committed(text: &str, latch: &mut ControlLatch) -> OutboundUnit {
    if latch.take() {
        OutboundUnit::Bytes(apply_control(text))
    } else {
        OutboundUnit::Text(text.to_string())
    }
}
