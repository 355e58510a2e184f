//! Cutter state and mode state machine
//!
//! The mode decides how power commands are applied: immediately after the
//! motion queue drains, or inline with queued motion. Mode changes only on
//! explicit commands.

pub mod cutter;
pub mod events;
pub mod mode;

pub use cutter::CutterState;
pub use events::ModeEvent;
pub use mode::CutterMode;
