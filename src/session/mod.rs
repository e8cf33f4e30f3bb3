//! Collaborator interfaces
//!
//! The bridge owns no terminal state of its own. It talks to:
//! - the terminal session, which receives bytes and exposes mode flags
//! - a clipboard
//! - an optional delegate that is told about focus, menus and redraws

mod clipboard;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;

use crate::core::{ModeFlags, Position};
use crate::gesture::MenuItem;
use crate::input::PageDirection;
use crate::refresh::InvalidationSet;

/// The terminal session on the other side of the bridge
pub trait TerminalSession {
    /// Deliver bytes to the session. Delivery failures are the transport's
    /// concern; nothing is buffered or retried here.
    fn send(&mut self, bytes: &[u8]);

    /// Current mode flags and geometry. Polled for every event.
    fn modes(&self) -> ModeFlags;

    /// Text of an absolute row (visible row plus display offset), one char
    /// per cell. Sessions that cannot provide text return `None`.
    fn row_text(&self, _row: usize) -> Option<String> {
        None
    }

    /// Scroll the local view by one page
    fn scroll_page(&mut self, _direction: PageDirection) {}

    /// Full terminal reset requested from the context menu
    fn reset(&mut self) {}
}

/// Host surface notifications. Every method has a no-op default so a
/// delegate only implements what it cares about.
pub trait BridgeDelegate {
    /// The surface should take keyboard focus
    fn focus_requested(&mut self) {}

    /// Show the contextual action list near `at`
    fn present_menu(&mut self, _items: &[MenuItem], _at: Position) {}

    /// Perform one redraw pass for the accumulated reasons
    fn redraw(&mut self, _reasons: InvalidationSet) {}
}
