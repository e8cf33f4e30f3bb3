//! Host-facing input bridge
//!
//! [`InputBridge`] is what a host surface talks to. It owns the key
//! encoder, gesture translator, composition tracker, local selection and
//! refresh coordinator, polls the session's modes for every event, and
//! forwards the resulting bytes to the session.

use std::time::Instant;

use tracing::{debug, trace};

use crate::app::InputConfig;
use crate::composition::{CompositionSnapshot, CompositionTracker};
use crate::core::{
    word_or_expression_span, GridSelection, OutboundUnit, Position, SelectionOp, SelectionType, TextRange,
};
use crate::gesture::{GestureAction, GestureContext, GestureEvent, GesturePhase, GestureTranslator, MenuItem};
use crate::input::{encode_bracketed_paste, ControlLatch, Key, KeyAction, KeyEncoder, Modifiers};
use crate::refresh::{Invalidation, RefreshCoordinator, RefreshNotifier, RefreshState};
use crate::session::{BridgeDelegate, Clipboard, TerminalSession};

/// Input bridge between a host surface and a terminal session
pub struct InputBridge<S: TerminalSession> {
    session: S,
    config: InputConfig,
    encoder: KeyEncoder,
    gestures: GestureTranslator,
    composition: CompositionTracker,
    selection: GridSelection,
    refresh: RefreshCoordinator,
    latch: ControlLatch,
    focused: bool,
    size: (usize, usize),
    clipboard: Option<Box<dyn Clipboard>>,
    delegate: Option<Box<dyn BridgeDelegate>>,
}

impl<S: TerminalSession> InputBridge<S> {
    pub fn new(session: S, config: InputConfig) -> Self {
        let modes = session.modes();
        Self {
            encoder: config.encoder(),
            gestures: GestureTranslator::new(config.cell_metrics()),
            refresh: RefreshCoordinator::new(config.tick_interval()),
            composition: CompositionTracker::new(),
            selection: GridSelection::new(),
            latch: ControlLatch::new(),
            focused: false,
            size: (modes.cols, modes.rows),
            clipboard: None,
            delegate: None,
            session,
            config,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_delegate(mut self, delegate: Box<dyn BridgeDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Focus was taken or lost by other means than a tap
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn selection(&self) -> &GridSelection {
        &self.selection
    }

    pub fn composition(&self) -> &CompositionTracker {
        &self.composition
    }

    /// Marked range, selection range and buffer for IME candidate placement
    pub fn composition_snapshot(&self) -> CompositionSnapshot {
        self.composition.snapshot()
    }

    /// Arm the one-shot control latch (on-screen ctrl key)
    pub fn arm_control(&mut self) {
        self.latch.arm();
    }

    pub fn toggle_control(&mut self) {
        self.latch.toggle();
    }

    pub fn control_armed(&self) -> bool {
        self.latch.is_armed()
    }

    // Keys

    /// Handle a hardware key press. Returns false for keys the host should
    /// fall through to its default handling.
    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let modes = self.session.modes();
        match self.encoder.encode(key, modifiers, &modes, &mut self.latch) {
            Some(KeyAction::Send(unit)) => {
                self.session.send(unit.as_bytes());
                // The terminal owns the line once an editing or navigation key goes out
                if !matches!(key, Key::Char(_)) && !self.composition.is_empty() {
                    trace!(?key, "composition buffer dropped");
                    self.composition.reset();
                    self.refresh.invalidate(Invalidation::CompositionChanged);
                }
                true
            },
            Some(KeyAction::ScrollPage(direction)) => {
                self.session.scroll_page(direction);
                self.refresh.invalidate(Invalidation::BufferScrolled);
                true
            },
            None => false,
        }
    }

    // Gestures

    /// Handle a pointer gesture and carry out the resulting action
    pub fn gesture(&mut self, event: GestureEvent) -> GestureAction {
        let modes = self.session.modes();
        // The clipboard is only consulted for the context menu
        let clipboard_has_text = event.phase == GesturePhase::LongPress
            && self.clipboard.as_mut().is_some_and(|clipboard| clipboard.has_text());
        let ctx = GestureContext {
            focused: self.focused,
            selection_active: self.selection.is_active(),
            clipboard_has_text,
        };
        let action = self.gestures.on_gesture(event, &modes, ctx);

        match &action {
            GestureAction::Report(units) => {
                for unit in units {
                    self.session.send(unit.as_bytes());
                }
            },
            GestureAction::MutateSelection(op) => {
                if self.selection.apply(*op) {
                    self.on_selection_changed();
                }
            },
            GestureAction::SelectWordAt(pos) => self.select_word_at(*pos),
            GestureAction::Focus => {
                self.focused = true;
                if let Some(delegate) = self.delegate.as_mut() {
                    delegate.focus_requested();
                }
            },
            GestureAction::ContextMenu { items, at } => {
                if let Some(delegate) = self.delegate.as_mut() {
                    delegate.present_menu(items, *at);
                }
            },
            GestureAction::None => {},
        }

        action
    }

    fn select_word_at(&mut self, pos: Position) {
        let (start, end) = match self.session.row_text(pos.row) {
            Some(text) => {
                let line: Vec<char> = text.chars().collect();
                word_or_expression_span(&line, pos.col)
            },
            None => (pos.col, pos.col),
        };
        let before = self.selection.clone();
        self.selection.select_span(
            Position::new(start, pos.row),
            Position::new(end, pos.row),
            SelectionType::Word,
        );
        if self.selection != before {
            self.on_selection_changed();
        }
    }

    /// Carry out an entry picked from the contextual action list
    pub fn menu_action(&mut self, item: MenuItem) {
        match item {
            MenuItem::Copy => self.copy_selection(),
            MenuItem::Paste => self.paste(),
            MenuItem::Reset => {
                debug!("terminal reset requested");
                self.session.reset();
                self.composition.reset();
                if self.selection.apply(SelectionOp::Clear) {
                    self.on_selection_changed();
                }
            },
        }
    }

    fn copy_selection(&mut self) {
        let session = &self.session;
        let Some(text) = self.selection.selected_text(|row| session.row_text(row)) else {
            return;
        };
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set_text(&text);
        }
    }

    fn paste(&mut self) {
        let Some(text) = self.clipboard.as_mut().and_then(|clipboard| clipboard.text()) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let bracketed = self.config.bracketed_paste && self.session.modes().bracketed_paste;
        trace!(bracketed, len = text.len(), "paste");

        let mut bytes = Vec::with_capacity(text.len() + 12);
        if bracketed {
            bytes.extend_from_slice(&encode_bracketed_paste(true));
        }
        bytes.extend_from_slice(text.as_bytes());
        if bracketed {
            bytes.extend_from_slice(&encode_bracketed_paste(false));
        }
        self.session.send(&bytes);
    }

    // Text input

    /// Committed text from the host's text-input protocol
    pub fn insert_text(&mut self, text: &str) {
        let unit = self.composition.insert_text(text, &mut self.latch);
        self.send(unit);
        self.refresh.invalidate(Invalidation::TextCommitted);
    }

    /// Backward deletion from the host's text-input protocol
    pub fn delete_backward(&mut self) {
        let unit = self.composition.delete_backward();
        self.send(unit);
        self.refresh.invalidate(Invalidation::CompositionChanged);
    }

    /// Provisional composition text; nothing is sent
    pub fn set_marked_text(&mut self, text: &str, selected: TextRange) {
        self.composition.set_marked_text(text, selected);
        self.refresh.invalidate(Invalidation::CompositionChanged);
    }

    /// Commit the marked text as typed
    pub fn unmark_text(&mut self) {
        if let Some(unit) = self.composition.unmark_text(&mut self.latch) {
            self.send(unit);
            self.refresh.invalidate(Invalidation::TextCommitted);
        }
    }

    pub fn set_selected_range(&mut self, range: TextRange) {
        self.composition.set_selected_range(range);
    }

    pub fn marked_range(&self) -> Option<TextRange> {
        self.composition.marked_range()
    }

    pub fn selected_range(&self) -> TextRange {
        self.composition.selected_range()
    }

    pub fn text_in_range(&self, range: TextRange) -> String {
        self.composition.text_in_range(range)
    }

    fn send(&mut self, unit: OutboundUnit) {
        self.session.send(unit.as_bytes());
    }

    // Engine notifications

    /// Local or engine selection changed
    pub fn on_selection_changed(&mut self) -> bool {
        self.refresh.invalidate(Invalidation::SelectionChanged)
    }

    /// Re-read the session's geometry. A shrunk grid pulls the local
    /// selection inside the new bounds.
    pub fn on_size_changed(&mut self) -> bool {
        let modes = self.session.modes();
        let size = (modes.cols, modes.rows);
        if size == self.size {
            return false;
        }
        debug!(cols = modes.cols, rows = modes.rows, "size changed");
        self.size = size;
        self.selection.clamp_cols(modes.cols);
        self.refresh.invalidate(Invalidation::SizeChanged)
    }

    /// Scrollback display offset moved
    pub fn on_buffer_scrolled(&mut self) -> bool {
        self.refresh.invalidate(Invalidation::BufferScrolled)
    }

    /// New terminal output arrived
    pub fn on_content_changed(&mut self) -> bool {
        self.refresh.content_changed()
    }

    // Refresh

    /// Handle for engine threads
    pub fn notifier(&self) -> RefreshNotifier {
        self.refresh.notifier()
    }

    pub fn refresh(&self) -> &RefreshCoordinator {
        &self.refresh
    }

    pub fn needs_redraw(&self) -> bool {
        self.refresh.needs_redraw()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Pick up invalidations posted from other threads
    pub fn pump(&mut self) -> bool {
        self.refresh.pump()
    }

    /// Run the scheduled refresh callback on the owner thread
    pub fn run_refresh(&mut self) -> bool {
        let delegate = &mut self.delegate;
        self.refresh.run_scheduled(|reasons| {
            if let Some(delegate) = delegate.as_mut() {
                delegate.redraw(reasons);
            }
        })
    }

    /// Periodic tick from the host's refresh loop
    pub fn tick(&mut self, now: Instant) -> bool {
        let delegate = &mut self.delegate;
        self.refresh.tick(now, |reasons| {
            if let Some(delegate) = delegate.as_mut() {
                delegate.redraw(reasons);
            }
        })
    }

    /// When the host should call [`InputBridge::tick`] next
    pub fn next_tick(&self, now: Instant) -> Option<Instant> {
        self.refresh.ticker().next_deadline(now)
    }
}

impl<S: TerminalSession + std::fmt::Debug> std::fmt::Debug for InputBridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBridge")
            .field("session", &self.session)
            .field("focused", &self.focused)
            .field("selection", &self.selection)
            .field("composition", &self.composition)
            .field("refresh", &self.refresh.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ModeFlags;
    use crate::session::MemoryClipboard;

    #[derive(Debug, Default)]
    struct Recorder {
        sent: Vec<Vec<u8>>,
        modes: ModeFlags,
    }

    impl TerminalSession for Recorder {
        fn send(&mut self, bytes: &[u8]) {
            self.sent.push(bytes.to_vec());
        }

        fn modes(&self) -> ModeFlags {
            self.modes
        }
    }

    fn bridge() -> InputBridge<Recorder> {
        InputBridge::new(Recorder::default(), InputConfig::default())
    }

    #[test]
    fn test_key_down_sends_unit() {
        let mut bridge = bridge();
        assert!(bridge.key_down(Key::Up, Modifiers::default()));
        assert!(!bridge.key_down(Key::Shift, Modifiers::default()));
        assert_eq!(bridge.session().sent, vec![b"\x1b[A".to_vec()]);
    }

    #[test]
    fn test_page_up_scrolls_locally() {
        let mut bridge = bridge();
        assert!(bridge.key_down(Key::PageUp, Modifiers::default()));
        assert!(bridge.session().sent.is_empty());
        assert!(bridge.refresh().pending().contains(Invalidation::BufferScrolled));
    }

    #[test]
    fn test_latch_applies_to_committed_text() {
        let mut bridge = bridge();
        bridge.arm_control();
        bridge.insert_text("c");
        bridge.insert_text("c");
        assert_eq!(bridge.session().sent, vec![vec![0x03], b"c".to_vec()]);
        assert!(!bridge.control_armed());
    }

    #[test]
    fn test_size_change_clamps_selection() {
        let mut bridge = bridge();
        bridge.selection.select_span(Position::new(70, 0), Position::new(79, 0), SelectionType::Normal);
        assert!(!bridge.on_size_changed());

        bridge.session_mut().modes.cols = 40;
        assert!(bridge.on_size_changed());
        assert_eq!(
            bridge.selection().normalized(),
            Some((Position::new(39, 0), Position::new(39, 0)))
        );
    }

    #[test]
    fn test_paste_without_bracketed_mode() {
        let mut bridge = bridge().with_clipboard(Box::new(MemoryClipboard::with_text("ls")));
        bridge.menu_action(MenuItem::Paste);
        assert_eq!(bridge.session().sent, vec![b"ls".to_vec()]);
    }
}
