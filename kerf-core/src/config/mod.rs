//! Cutter configuration
//!
//! Board-agnostic configuration structures and the TOML-subset parser used
//! to load them from the firmware's embedded `cutter.toml`.

pub mod parse;
pub mod types;

pub use parse::parse_config;
pub use types::*;
