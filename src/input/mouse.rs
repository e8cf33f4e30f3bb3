//! Mouse report encoding
//!
//! Mouse events are encoded according to the active mouse mode:
//! - X10: Button press only
//! - Normal (VT200): Button press and release
//! - Button motion: press, release and motion while a button is held
//! - Any motion: everything, including hover motion
//!
//! and serialized in the session's mouse encoding (X10, UTF-8, SGR, URXVT).

use crate::core::{ModeFlags, MouseEncoding, MouseMode, Position};

use super::Modifiers;

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

/// Mouse event type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventType {
    Press,
    Release,
    /// Motion with the button held
    Drag,
    /// Motion with no button held
    Move,
}

/// Whether the mode wants this kind of event reported at all
pub fn accepts(mode: MouseMode, button: MouseButton, event_type: MouseEventType) -> bool {
    let accepted = match event_type {
        MouseEventType::Press => mode.sends_button_press(),
        MouseEventType::Release => mode.sends_button_release(),
        MouseEventType::Drag => mode.sends_button_tracking(),
        MouseEventType::Move => mode.sends_motion(),
    };
    // X10 doesn't report wheel events
    accepted
        && !(mode == MouseMode::X10
            && matches!(button, MouseButton::WheelUp | MouseButton::WheelDown))
}

/// Button flags for a report: button code plus modifier and motion bits
pub fn button_flags(button: MouseButton, event_type: MouseEventType, modifiers: Modifiers) -> u8 {
    let mut code: u8 = match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::WheelUp => 64,
        MouseButton::WheelDown => 65,
    };

    // Hover motion reports "no button"
    if event_type == MouseEventType::Move {
        code = 3;
    }

    if modifiers.shift {
        code |= 4;
    }
    if modifiers.alt {
        code |= 8;
    }
    if modifiers.ctrl {
        code |= 16;
    }
    if matches!(event_type, MouseEventType::Drag | MouseEventType::Move) {
        code |= 32;
    }
    code
}

/// Encode a mouse event.
///
/// Returns `None` when the session's mouse mode does not report this event.
pub fn encode_mouse(
    button: MouseButton,
    event_type: MouseEventType,
    pos: Position,
    modifiers: Modifiers,
    modes: &ModeFlags,
) -> Option<Vec<u8>> {
    if !accepts(modes.mouse_mode, button, event_type) {
        return None;
    }

    let code = button_flags(button, event_type, modifiers);
    let release = event_type == MouseEventType::Release;
    // Release is button 3 in every encoding except SGR
    let legacy_code = if release { 3 | (code & 0b1_1100) } else { code };
    let col = pos.col;
    let row = pos.row;

    let bytes = match modes.mouse_encoding {
        MouseEncoding::X10 => {
            // X10 encoding: CSI M Cb Cx Cy
            // Coordinates are 1-based and offset by 32
            let cb = legacy_code + 32;
            let cx = (col + 1).min(223) as u8 + 32;
            let cy = (row + 1).min(223) as u8 + 32;
            vec![0x1b, b'[', b'M', cb, cx, cy]
        },
        MouseEncoding::Utf8 => {
            // UTF-8 encoding: like X10 but coordinates can be > 223
            let mut result = vec![0x1b, b'[', b'M'];
            encode_utf8_coord(&mut result, legacy_code as usize + 32);
            encode_utf8_coord(&mut result, col + 1 + 32);
            encode_utf8_coord(&mut result, row + 1 + 32);
            result
        },
        MouseEncoding::Sgr => {
            // SGR encoding: CSI < Pb ; Px ; Py M/m
            let final_char = if release { 'm' } else { 'M' };
            format!("\x1b[<{};{};{}{}", code, col + 1, row + 1, final_char).into_bytes()
        },
        MouseEncoding::Urxvt => {
            // URXVT encoding: CSI Pb ; Px ; Py M
            format!("\x1b[{};{};{}M", legacy_code as usize + 32, col + 1, row + 1).into_bytes()
        },
    };

    tracing::trace!(?button, ?event_type, col, row, "mouse report");
    Some(bytes)
}

/// Encode a coordinate as UTF-8 for mouse reporting
fn encode_utf8_coord(result: &mut Vec<u8>, coord: usize) {
    let coord = coord.min(0x7ff);
    if coord < 128 {
        result.push(coord as u8);
    } else {
        result.push(0xC0 | ((coord >> 6) as u8));
        result.push(0x80 | ((coord & 0x3F) as u8));
    }
}
