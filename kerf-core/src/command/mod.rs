//! Cutter power commands
//!
//! Power-on (M3 clockwise / M4 counter-clockwise) and power-off (M5) as
//! typed requests, and the handlers that apply them.

pub mod handlers;
pub mod request;

pub use handlers::{CommandOutcome, Cutter, PowerOffOutcome, PowerOnOutcome};
pub use request::{CutterCommand, PowerOff, PowerOn};
