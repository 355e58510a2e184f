//! Hardware abstraction traits
//!
//! These traits define the interface between the cutter logic
//! and hardware-specific implementations.

pub mod output;

pub use output::{CutterOutput, Direction, OutputError};
