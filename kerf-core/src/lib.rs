//! Board-agnostic cutter power control for the Kerf firmware
//!
//! This crate contains all spindle/laser logic that does not depend on
//! specific hardware implementations:
//!
//! - Cutter configuration and its TOML-subset parser
//! - Power conversion (unit power to duty cycle and back)
//! - Cutter state and the STANDARD/CONTINUOUS/DYNAMIC mode machine
//! - The motion queue contract and the real-time block executor
//! - The synchronization bridge that orders power changes against motion
//! - Power-on/power-off command handlers
//! - Hardware abstraction traits for the cutter output

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod motion;
pub mod power;
pub mod state;
pub mod sync;
pub mod traits;
