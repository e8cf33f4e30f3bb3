//! Local grid selection driven by pointer gestures
//!
//! Rows are absolute: the visible row plus the scrollback display offset at
//! the time of the gesture, so a selection stays attached to its text while
//! the view scrolls.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Selection type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionType {
    /// Character-level selection (drag)
    #[default]
    Normal,
    /// Word or bracketed expression (double tap)
    Word,
}

/// A mutation of the local selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOp {
    /// Start a new selection anchored at the position
    Start(Position),
    /// Move the selection end to the position
    Extend(Position),
    /// Drop the selection
    Clear,
}

/// Represents a text selection in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridSelection {
    /// Where the selection was started
    anchor: Position,
    /// Current end of the selection
    extent: Position,
    /// Type of selection
    selection_type: SelectionType,
    /// Whether there is a selection at all
    active: bool,
}

impl GridSelection {
    /// Create an inactive selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a selection mutation. Returns true if the selection changed.
    pub fn apply(&mut self, op: SelectionOp) -> bool {
        let before = self.clone();
        match op {
            SelectionOp::Start(pos) => self.start(pos, SelectionType::Normal),
            SelectionOp::Extend(pos) => self.extend(pos),
            SelectionOp::Clear => self.clear(),
        }
        *self != before
    }

    /// Start a new selection at the given position
    pub fn start(&mut self, pos: Position, selection_type: SelectionType) {
        self.anchor = pos;
        self.extent = pos;
        self.selection_type = selection_type;
        self.active = true;
    }

    /// Select an explicit span, e.g. a resolved word
    pub fn select_span(&mut self, start: Position, end: Position, selection_type: SelectionType) {
        self.anchor = start;
        self.extent = end;
        self.selection_type = selection_type;
        self.active = true;
    }

    /// Update the selection end point. Ignored when nothing is selected.
    pub fn extend(&mut self, pos: Position) {
        if self.active {
            self.extent = pos;
        }
    }

    /// Clear the selection
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if there is an active selection
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection_type(&self) -> SelectionType {
        self.selection_type
    }

    /// Get the normalized start and end points (start is always before end)
    pub fn normalized(&self) -> Option<(Position, Position)> {
        if !self.active {
            return None;
        }
        if self.extent.is_before(&self.anchor) {
            Some((self.extent, self.anchor))
        } else {
            Some((self.anchor, self.extent))
        }
    }

    /// Check if a cell is within the selection
    pub fn contains(&self, pos: Position) -> bool {
        let Some((start, end)) = self.normalized() else {
            return false;
        };

        if pos.row < start.row || pos.row > end.row {
            return false;
        }

        if pos.row == start.row && pos.row == end.row {
            // Single line selection
            pos.col >= start.col && pos.col <= end.col
        } else if pos.row == start.row {
            // First line of multi-line selection
            pos.col >= start.col
        } else if pos.row == end.row {
            // Last line of multi-line selection
            pos.col <= end.col
        } else {
            true
        }
    }

    /// Pull both ends inside a grid `cols` wide after a resize. Returns
    /// true if either end moved.
    pub fn clamp_cols(&mut self, cols: usize) -> bool {
        if !self.active {
            return false;
        }
        let last = cols.saturating_sub(1);
        let before = (self.anchor, self.extent);
        self.anchor.col = self.anchor.col.min(last);
        self.extent.col = self.extent.col.min(last);
        before != (self.anchor, self.extent)
    }

    /// Extract the selected text, reading row contents through `row_text`
    pub fn selected_text<F>(&self, mut row_text: F) -> Option<String>
    where
        F: FnMut(usize) -> Option<String>,
    {
        let (start, end) = self.normalized()?;
        let mut text = String::new();

        for row in start.row..=end.row {
            let line: Vec<char> = row_text(row).unwrap_or_default().chars().collect();
            let col_start = if row == start.row { start.col } else { 0 };
            let col_end = if row == end.row {
                (end.col + 1).min(line.len())
            } else {
                line.len()
            };

            if col_start < col_end {
                let segment: String = line[col_start..col_end].iter().collect();
                if row == end.row {
                    text.push_str(&segment);
                } else {
                    text.push_str(segment.trim_end());
                }
            }

            if row != end.row {
                text.push('\n');
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '~')
}

fn matching_close(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '<' => Some('>'),
        _ => None,
    }
}

fn matching_open(c: char) -> Option<char> {
    match c {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        '>' => Some('<'),
        _ => None,
    }
}

/// Resolve the inclusive column span of the word or bracketed expression at
/// `col` in `line`.
///
/// A bracket selects through its matching bracket on the same line (or just
/// itself when unmatched), a word character selects the surrounding run of
/// word characters, whitespace selects the surrounding whitespace, and
/// anything else selects the single cell. Columns past the line's end
/// select that one empty cell.
pub fn word_or_expression_span(line: &[char], col: usize) -> (usize, usize) {
    let Some(&c) = line.get(col) else {
        return (col, col);
    };

    if let Some(close) = matching_close(c) {
        let mut depth = 0usize;
        for (i, &other) in line.iter().enumerate().skip(col) {
            if other == c {
                depth += 1;
            } else if other == close {
                depth -= 1;
                if depth == 0 {
                    return (col, i);
                }
            }
        }
        return (col, col);
    }

    if let Some(open) = matching_open(c) {
        let mut depth = 0usize;
        for i in (0..=col).rev() {
            let other = line[i];
            if other == c {
                depth += 1;
            } else if other == open {
                depth -= 1;
                if depth == 0 {
                    return (i, col);
                }
            }
        }
        return (col, col);
    }

    let same_class: fn(char) -> bool = if is_word_char(c) {
        is_word_char
    } else if c.is_whitespace() {
        char::is_whitespace
    } else {
        return (col, col);
    };

    let mut start = col;
    while start > 0 && same_class(line[start - 1]) {
        start -= 1;
    }
    let mut end = col;
    while end + 1 < line.len() && same_class(line[end + 1]) {
        end += 1;
    }
    (start, end)
}
