//! Input Core Module
//!
//! Platform-independent data shared by the encoders and trackers:
//! - Mode flags polled from the terminal session
//! - Grid positions and pointer hit testing
//! - Character ranges over the input buffer
//! - Outbound protocol units
//! - Local grid selection
//!
//! Everything here is deterministic: the same inputs always produce the
//! same state, so behaviour can be reproduced from an event log.

mod modes;
mod outbound;
mod position;
mod range;
mod selection;

pub use modes::{ModeFlags, MouseEncoding, MouseMode};
pub use outbound::{escape_bytes, OutboundUnit};
pub use position::{calculate_tap_hit, CellMetrics, Position};
pub use range::TextRange;
pub use selection::{word_or_expression_span, GridSelection, SelectionOp, SelectionType};
