//! Power conversion
//!
//! Maps host power parameters to the duty values latched by the output
//! hardware.

pub mod converter;

pub use converter::{pct_to_ocr, pct_to_servo, HardwareMapping, PowerConverter, OCR_MAX};
