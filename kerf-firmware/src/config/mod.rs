//! Configuration loading
//!
//! The cutter configuration is compiled in from `cutter.toml` (validated by
//! the build script) and parsed at startup by the kerf-core parser.

use defmt::*;

use kerf_core::config::{parse_config, CutterConfig};

/// Embedded configuration (compiled into firmware)
/// Edit cutter.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../cutter.toml");

/// Parse the embedded configuration
///
/// Falls back to the laser defaults if the text does not parse.
pub fn load_config() -> CutterConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Cutter config: {:?} unit={:?} output={:?} range={}..{} power_sync={}",
                config.kind,
                config.unit,
                config.output,
                config.speed_power_min,
                config.speed_power_max,
                config.power_sync
            );
            config
        }
        Err(e) => {
            // Only reachable if the build-time check and the parser disagree
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using laser defaults");
            CutterConfig::default()
        }
    }
}
