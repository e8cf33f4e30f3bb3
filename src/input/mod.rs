//! Input Encoding Module
//!
//! Handles encoding of keyboard and mouse input into terminal byte sequences.
//! This module translates host key events into the bytes expected by
//! terminal applications.
//!
//! # Keyboard Encoding
//!
//! Different keys produce different sequences depending on:
//! - Application cursor mode (DECCKM)
//! - The configured backspace code
//! - The alt/option modifier and the one-shot control latch
//!
//! Page Up/Down are the exception: outside application cursor mode they
//! scroll the local view instead of producing bytes.

mod control;
mod mouse;

pub use control::{apply_control, control_code, ControlLatch};
pub use mouse::{accepts, button_flags, encode_mouse, MouseButton, MouseEventType};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ModeFlags, OutboundUnit};

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
}

/// Media keys. Never encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKey {
    PlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    Mute,
}

/// A physical or virtual key as reported by the host surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    /// Forward delete
    Delete,

    /// Function key by number (F1 = 1)
    Function(u8),

    // Editing
    Backspace,
    Tab,
    Enter,
    Escape,

    /// A printable character key
    Char(char),

    // Pure modifiers
    Shift,
    Control,
    Alt,
    CapsLock,
    NumLock,
    ScrollLock,

    Media(MediaKey),
}

impl Key {
    /// Keys that only change modifier state
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::Shift | Key::Control | Key::Alt | Key::CapsLock | Key::NumLock | Key::ScrollLock
        )
    }
}

/// Direction of a local page scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageDirection {
    Up,
    Down,
}

/// What an encoded key asks the bridge to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Send one unit to the terminal session
    Send(OutboundUnit),
    /// Scroll the local view by a page; nothing is sent
    ScrollPage(PageDirection),
}

/// Function key sequences for F1..=F11
const FUNCTION_KEYS: [&[u8]; 11] = [
    b"\x1bOP",
    b"\x1bOQ",
    b"\x1bOR",
    b"\x1bOS",
    b"\x1b[15~",
    b"\x1b[17~",
    b"\x1b[18~",
    b"\x1b[19~",
    b"\x1b[20~",
    b"\x1b[21~",
    b"\x1b[23~",
];

/// Forward delete
const DELETE_FORWARD: &[u8] = b"\x1b[3~";

/// Maps key events to outbound units for the session's current modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEncoder {
    /// Send ^H (0x08) for backspace instead of DEL (0x7F)
    pub backspace_sends_control_h: bool,
    /// Alt/option prefixes characters with ESC
    pub option_as_meta: bool,
}

impl Default for KeyEncoder {
    fn default() -> Self {
        Self {
            backspace_sends_control_h: false,
            option_as_meta: true,
        }
    }
}

impl KeyEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte sent by the hardware Backspace key
    pub fn backspace_code(&self) -> u8 {
        if self.backspace_sends_control_h {
            0x08
        } else {
            0x7f
        }
    }

    /// Encode a key press.
    ///
    /// Returns `None` for pure modifiers and unhandled keys (Insert, F12 and
    /// above, media keys); those leave the control latch untouched. Every
    /// handled key consumes the latch.
    pub fn encode(
        &self,
        key: Key,
        modifiers: Modifiers,
        modes: &ModeFlags,
        latch: &mut ControlLatch,
    ) -> Option<KeyAction> {
        let app_cursor = modes.application_cursor;

        let action = match key {
            // Cursor keys
            Key::Up => send(cursor_sequence(b'A', app_cursor)),
            Key::Down => send(cursor_sequence(b'B', app_cursor)),
            Key::Right => send(cursor_sequence(b'C', app_cursor)),
            Key::Left => send(cursor_sequence(b'D', app_cursor)),
            Key::Home => send(cursor_sequence(b'H', app_cursor)),
            Key::End => send(cursor_sequence(b'F', app_cursor)),

            Key::PageUp if app_cursor => send(b"\x1b[5~".to_vec()),
            Key::PageDown if app_cursor => send(b"\x1b[6~".to_vec()),
            Key::PageUp => KeyAction::ScrollPage(PageDirection::Up),
            Key::PageDown => KeyAction::ScrollPage(PageDirection::Down),

            Key::Delete => send(DELETE_FORWARD.to_vec()),

            Key::Function(n @ 1..=11) => send(FUNCTION_KEYS[usize::from(n) - 1].to_vec()),

            // Editing keys
            Key::Backspace => send(vec![self.backspace_code()]),
            Key::Escape => send(vec![0x1b]),
            Key::Enter => send(vec![0x0a]),
            Key::Tab => send(vec![0x09]),

            Key::Char(c) => {
                if modifiers.alt && self.option_as_meta {
                    let mut bytes = vec![0x1b];
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    KeyAction::Send(OutboundUnit::Bytes(bytes))
                } else {
                    KeyAction::Send(OutboundUnit::Text(c.to_string()))
                }
            },

            Key::Insert
            | Key::Function(_)
            | Key::Media(_)
            | Key::Shift
            | Key::Control
            | Key::Alt
            | Key::CapsLock
            | Key::NumLock
            | Key::ScrollLock => {
                trace!(?key, "key not encoded");
                return None;
            },
        };

        let control = latch.take() || (modifiers.ctrl && matches!(key, Key::Char(_)));
        Some(match action {
            KeyAction::Send(OutboundUnit::Text(text)) if control => {
                KeyAction::Send(OutboundUnit::Bytes(apply_control(&text)))
            },
            other => other,
        })
    }
}

fn send(bytes: Vec<u8>) -> KeyAction {
    KeyAction::Send(OutboundUnit::Bytes(bytes))
}

/// Cursor and Home/End keys: SS3 in application mode, CSI otherwise
fn cursor_sequence(code: u8, application_mode: bool) -> Vec<u8> {
    if application_mode {
        vec![0x1b, b'O', code]
    } else {
        vec![0x1b, b'[', code]
    }
}

/// Encode bracketed paste start/end
pub fn encode_bracketed_paste(start: bool) -> Vec<u8> {
    if start {
        vec![0x1b, b'[', b'2', b'0', b'0', b'~'] // CSI 200 ~
    } else {
        vec![0x1b, b'[', b'2', b'0', b'1', b'~'] // CSI 201 ~
    }
}
