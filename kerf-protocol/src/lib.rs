//! Kerf host link protocol
//!
//! Framed binary protocol between a host (G-code sender, motion planner or
//! test rig) and the cutter controller, carried over UART.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬───────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CRC-8 │
//! │ 1B    │ 1B     │ 1B   │ 0–64B       │ 1B    │
//! └───────┴────────┴──────┴─────────────┴───────┘
//! ```
//!
//! The host sends power commands (M3/M4/M5 equivalents) and move blocks; the
//! controller answers every frame with an ACK or NAK and reports cutter
//! status on request.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod messages;

pub use frame::{crc8, Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
pub use messages::{ControllerMessage, HostMessage, StatusReport};
