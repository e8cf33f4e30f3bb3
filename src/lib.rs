//! Mochi Input Bridge Library
//!
//! Translates host input (hardware keys, pointer gestures, IME text
//! composition) into the byte stream a terminal session consumes, and
//! coalesces the resulting redraw requests.
//!
//! - `core`: positions, text ranges, outbound units, session mode flags, local selection
//! - `input`: key, control-character and mouse-report encoding
//! - `gesture`: pointer gesture translation
//! - `composition`: IME composition buffer with marked and selection ranges
//! - `refresh`: invalidation coalescing and the periodic refresh tick
//! - `session`: collaborator traits (terminal session, clipboard, host delegate)
//! - `bridge`: the host-facing facade tying them together

pub mod app;
pub mod bridge;
pub mod composition;
pub mod core;
pub mod gesture;
pub mod input;
pub mod refresh;
pub mod session;

pub use app::{ConfigError, InputConfig};
pub use bridge::InputBridge;
pub use composition::{CompositionSnapshot, CompositionTracker};
pub use crate::core::{ModeFlags, MouseEncoding, MouseMode, OutboundUnit, Position, TextRange};
pub use gesture::{GestureAction, GestureEvent, GesturePhase, GestureTranslator, MenuItem};
pub use input::{Key, KeyAction, KeyEncoder, Modifiers};
pub use refresh::{Invalidation, InvalidationSet, RefreshCoordinator, RefreshNotifier, RefreshState};
pub use session::{BridgeDelegate, Clipboard, MemoryClipboard, TerminalSession};
