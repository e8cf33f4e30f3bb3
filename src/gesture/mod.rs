//! Pointer gesture translation
//!
//! Maps touch/pointer gestures to either mouse reports for the application
//! or local selection changes, depending on the session's mouse mode. The
//! mode is read per event, so a report is never produced while reporting
//! is off.
//!
//! Reporting takes priority: while the mode reports button presses every
//! tap, double tap and drag becomes protocol bytes and local selection is
//! left alone. Long press always opens the contextual action list.

use serde::{Deserialize, Serialize};

use crate::core::{calculate_tap_hit, CellMetrics, ModeFlags, OutboundUnit, Position, SelectionOp};
use crate::input::{encode_mouse, Modifiers, MouseButton, MouseEventType};

/// Phase of a recognised gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Tap,
    DoubleTap,
    DragBegan,
    DragChanged,
    DragEnded,
    DragCancelled,
    LongPress,
}

/// A gesture event at a raw surface coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl GestureEvent {
    pub fn new(phase: GesturePhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }
}

/// Entries of the contextual action list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    Copy,
    Paste,
    Reset,
}

/// Compute the contextual action list: Copy needs a selection, Paste needs
/// clipboard text, Reset is always offered.
pub fn context_menu_items(selection_active: bool, clipboard_has_text: bool) -> Vec<MenuItem> {
    let mut items = Vec::with_capacity(3);
    if selection_active {
        items.push(MenuItem::Copy);
    }
    if clipboard_has_text {
        items.push(MenuItem::Paste);
    }
    items.push(MenuItem::Reset);
    items
}

/// Host state a gesture decision depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureContext {
    /// The surface already has input focus
    pub focused: bool,
    /// A local selection is active
    pub selection_active: bool,
    /// The clipboard holds text
    pub clipboard_has_text: bool,
}

/// What a gesture asks the bridge to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureAction {
    /// Send mouse reports, in order
    Report(Vec<OutboundUnit>),
    /// Change the local selection
    MutateSelection(SelectionOp),
    /// Select the word or expression at an absolute position
    SelectWordAt(Position),
    /// Take input focus
    Focus,
    /// Offer the contextual action list at a visible position
    ContextMenu { items: Vec<MenuItem>, at: Position },
    None,
}

/// Converts gesture events into [`GestureAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureTranslator {
    metrics: CellMetrics,
}

impl GestureTranslator {
    pub fn new(metrics: CellMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: CellMetrics) {
        self.metrics = metrics;
    }

    /// Visible grid position under a raw coordinate
    pub fn hit(&self, x: f32, y: f32, modes: &ModeFlags) -> Position {
        calculate_tap_hit(x, y, self.metrics, modes.cols, modes.rows)
    }

    pub fn on_gesture(&self, event: GestureEvent, modes: &ModeFlags, ctx: GestureContext) -> GestureAction {
        let hit = self.hit(event.x, event.y, modes);

        if event.phase == GesturePhase::LongPress {
            return GestureAction::ContextMenu {
                items: context_menu_items(ctx.selection_active, ctx.clipboard_has_text),
                at: hit,
            };
        }

        if modes.reports_mouse() {
            return report(event, hit, modes);
        }

        let absolute = Position::new(hit.col, hit.row + modes.y_disp);
        match event.phase {
            GesturePhase::Tap if ctx.focused => GestureAction::None,
            GesturePhase::Tap => GestureAction::Focus,
            GesturePhase::DoubleTap => GestureAction::SelectWordAt(absolute),
            GesturePhase::DragBegan => GestureAction::MutateSelection(SelectionOp::Start(absolute)),
            GesturePhase::DragChanged => GestureAction::MutateSelection(SelectionOp::Extend(absolute)),
            GesturePhase::DragCancelled => GestureAction::MutateSelection(SelectionOp::Clear),
            GesturePhase::DragEnded | GesturePhase::LongPress => GestureAction::None,
        }
    }
}

/// Mouse reports for a gesture while reporting is on
fn report(event: GestureEvent, hit: Position, modes: &ModeFlags) -> GestureAction {
    let kinds: &[MouseEventType] = match event.phase {
        GesturePhase::Tap | GesturePhase::DoubleTap => &[MouseEventType::Press, MouseEventType::Release],
        GesturePhase::DragBegan => &[MouseEventType::Press],
        GesturePhase::DragChanged => &[MouseEventType::Drag],
        GesturePhase::DragEnded | GesturePhase::DragCancelled => &[MouseEventType::Release],
        GesturePhase::LongPress => &[],
    };

    let units: Vec<OutboundUnit> = kinds
        .iter()
        .filter_map(|&kind| encode_mouse(MouseButton::Left, kind, hit, event.modifiers, modes))
        .map(OutboundUnit::Bytes)
        .collect();

    if units.is_empty() {
        GestureAction::None
    } else {
        GestureAction::Report(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MouseEncoding, MouseMode};

    fn translator() -> GestureTranslator {
        GestureTranslator::new(CellMetrics::new(10.0, 20.0))
    }

    fn modes(mouse_mode: MouseMode) -> ModeFlags {
        ModeFlags {
            mouse_mode,
            mouse_encoding: MouseEncoding::Sgr,
            ..ModeFlags::default()
        }
    }

    fn at(phase: GesturePhase, col: usize, row: usize) -> GestureEvent {
        GestureEvent::new(phase, col as f32 * 10.0 + 1.0, row as f32 * 20.0 + 1.0)
    }

    #[test]
    fn test_tap_focuses_once() {
        let t = translator();
        let off = modes(MouseMode::Off);
        let unfocused = GestureContext::default();
        let focused = GestureContext {
            focused: true,
            ..GestureContext::default()
        };
        assert_eq!(t.on_gesture(at(GesturePhase::Tap, 1, 1), &off, unfocused), GestureAction::Focus);
        assert_eq!(t.on_gesture(at(GesturePhase::Tap, 1, 1), &off, focused), GestureAction::None);
    }

    #[test]
    fn test_local_drag() {
        let t = translator();
        let off = modes(MouseMode::Off);
        let ctx = GestureContext::default();

        assert_eq!(
            t.on_gesture(at(GesturePhase::DragBegan, 10, 5), &off, ctx),
            GestureAction::MutateSelection(SelectionOp::Start(Position::new(10, 5)))
        );
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragChanged, 12, 5), &off, ctx),
            GestureAction::MutateSelection(SelectionOp::Extend(Position::new(12, 5)))
        );
        assert_eq!(t.on_gesture(at(GesturePhase::DragEnded, 12, 5), &off, ctx), GestureAction::None);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragCancelled, 12, 5), &off, ctx),
            GestureAction::MutateSelection(SelectionOp::Clear)
        );
    }

    #[test]
    fn test_double_tap_uses_display_offset() {
        let t = translator();
        let scrolled = ModeFlags {
            y_disp: 100,
            ..modes(MouseMode::Off)
        };
        assert_eq!(
            t.on_gesture(at(GesturePhase::DoubleTap, 4, 2), &scrolled, GestureContext::default()),
            GestureAction::SelectWordAt(Position::new(4, 102))
        );
    }

    #[test]
    fn test_double_tap_reports_press_and_release() {
        let t = translator();
        let normal = modes(MouseMode::Normal);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DoubleTap, 10, 5), &normal, GestureContext::default()),
            GestureAction::Report(vec![
                OutboundUnit::bytes(b"\x1b[<0;11;6M".to_vec()),
                OutboundUnit::bytes(b"\x1b[<0;11;6m".to_vec()),
            ])
        );
    }

    #[test]
    fn test_x10_tap_reports_press_only() {
        let t = translator();
        let x10 = modes(MouseMode::X10);
        assert_eq!(
            t.on_gesture(at(GesturePhase::Tap, 0, 0), &x10, GestureContext::default()),
            GestureAction::Report(vec![OutboundUnit::bytes(b"\x1b[<0;1;1M".to_vec())])
        );
    }

    #[test]
    fn test_reporting_drag() {
        let t = translator();
        let ctx = GestureContext::default();

        let normal = modes(MouseMode::Normal);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragBegan, 2, 3), &normal, ctx),
            GestureAction::Report(vec![OutboundUnit::bytes(b"\x1b[<0;3;4M".to_vec())])
        );
        // Normal mode has no motion tracking, and the drag stays out of local selection
        assert_eq!(t.on_gesture(at(GesturePhase::DragChanged, 4, 3), &normal, ctx), GestureAction::None);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragEnded, 4, 3), &normal, ctx),
            GestureAction::Report(vec![OutboundUnit::bytes(b"\x1b[<0;5;4m".to_vec())])
        );

        let motion = modes(MouseMode::ButtonMotion);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragChanged, 4, 3), &motion, ctx),
            GestureAction::Report(vec![OutboundUnit::bytes(b"\x1b[<32;5;4M".to_vec())])
        );

        let x10 = modes(MouseMode::X10);
        assert_eq!(t.on_gesture(at(GesturePhase::DragCancelled, 4, 3), &x10, ctx), GestureAction::None);
    }

    #[test]
    fn test_cancelled_drag_reports_release() {
        let t = translator();
        let ctx = GestureContext {
            selection_active: true,
            ..GestureContext::default()
        };

        // A cancel releases the button like a normal end of drag, and leaves the selection alone
        let normal = modes(MouseMode::Normal);
        t.on_gesture(at(GesturePhase::DragBegan, 2, 3), &normal, ctx);
        assert_eq!(
            t.on_gesture(at(GesturePhase::DragCancelled, 4, 3), &normal, ctx),
            GestureAction::Report(vec![OutboundUnit::bytes(b"\x1b[<0;5;4m".to_vec())])
        );
    }

    #[test]
    fn test_long_press_menu_membership() {
        let t = translator();
        let off = modes(MouseMode::Off);

        let action = t.on_gesture(at(GesturePhase::LongPress, 3, 1), &off, GestureContext::default());
        assert_eq!(
            action,
            GestureAction::ContextMenu {
                items: vec![MenuItem::Reset],
                at: Position::new(3, 1),
            }
        );

        let ctx = GestureContext {
            focused: true,
            selection_active: true,
            clipboard_has_text: true,
        };
        let action = t.on_gesture(at(GesturePhase::LongPress, 3, 1), &modes(MouseMode::Normal), ctx);
        assert_eq!(
            action,
            GestureAction::ContextMenu {
                items: vec![MenuItem::Copy, MenuItem::Paste, MenuItem::Reset],
                at: Position::new(3, 1),
            }
        );
    }

    #[test]
    fn test_menu_items() {
        assert_eq!(context_menu_items(false, true), vec![MenuItem::Paste, MenuItem::Reset]);
        assert_eq!(context_menu_items(true, false), vec![MenuItem::Copy, MenuItem::Reset]);
    }
}
