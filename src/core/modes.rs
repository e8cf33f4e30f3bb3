//! Terminal mode flags
//!
//! A read-only view of the session modes that change how input is encoded.
//! The bridge polls a fresh [`ModeFlags`] from the session for every event
//! and never caches it across calls.

use serde::{Deserialize, Serialize};

/// Mouse reporting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    /// No mouse reporting, pointer gestures drive local selection
    #[default]
    Off,
    /// X10 compatibility mode - report button press only
    X10,
    /// Normal tracking mode - report button press and release
    Normal,
    /// Button-event tracking - report press, release, and motion while button pressed
    ButtonMotion,
    /// Any-event tracking - report all motion events
    AnyMotion,
}

impl MouseMode {
    /// Whether button presses are reported to the application
    pub fn sends_button_press(self) -> bool {
        self != MouseMode::Off
    }

    /// Whether button releases are reported
    pub fn sends_button_release(self) -> bool {
        matches!(
            self,
            MouseMode::Normal | MouseMode::ButtonMotion | MouseMode::AnyMotion
        )
    }

    /// Whether motion with a button held is reported
    pub fn sends_button_tracking(self) -> bool {
        matches!(self, MouseMode::ButtonMotion | MouseMode::AnyMotion)
    }

    /// Whether motion without any button held is reported
    pub fn sends_motion(self) -> bool {
        self == MouseMode::AnyMotion
    }
}

/// Mouse encoding format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseEncoding {
    /// Default X10 encoding (limited to 223 columns/rows)
    #[default]
    X10,
    /// UTF-8 encoding (extends range)
    Utf8,
    /// SGR encoding (CSI < ... M/m) - recommended
    Sgr,
    /// URXVT encoding
    Urxvt,
}

/// Mode flags and geometry polled from the terminal session at encode time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    /// DECCKM - Cursor key mode
    /// When enabled, cursor keys send application sequences (ESC O ...) instead of (ESC [ ...)
    pub application_cursor: bool,

    /// Mouse reporting mode
    pub mouse_mode: MouseMode,

    /// Mouse encoding format
    pub mouse_encoding: MouseEncoding,

    /// Bracketed paste mode (DECSET 2004)
    pub bracketed_paste: bool,

    /// Terminal width in cells
    pub cols: usize,

    /// Terminal height in cells
    pub rows: usize,

    /// Scrollback display offset: the absolute row shown at the top of the view
    pub y_disp: usize,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self {
            application_cursor: false,
            mouse_mode: MouseMode::Off,
            mouse_encoding: MouseEncoding::X10,
            bracketed_paste: false,
            cols: 80,
            rows: 24,
            y_disp: 0,
        }
    }
}

impl ModeFlags {
    /// Create default modes for a grid of the given size
    pub fn with_size(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            ..Self::default()
        }
    }

    /// Whether pointer gestures are reported to the application instead of
    /// driving local selection
    pub fn reports_mouse(&self) -> bool {
        self.mouse_mode.sends_button_press()
    }
}
