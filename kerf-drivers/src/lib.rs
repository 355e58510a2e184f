//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the cutter output trait
//! defined in kerf-core, on top of the `embedded-hal` PWM and GPIO traits:
//!
//! - PWM duty output with optional enable and direction pins
//! - On/off gate (relay, enable-only laser drivers)
//! - Hobby servo (pulse width from angle)

#![no_std]
#![deny(unsafe_code)]

pub mod output;
