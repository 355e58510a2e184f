//! Cutter state record

use super::events::ModeEvent;
use super::mode::CutterMode;

/// Mutable state of the one physical tool
///
/// Owned by the command context. The latched hardware power lives in
/// [`crate::sync::PowerLatch`] since the motion executor writes it too.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CutterState {
    /// Current application mode
    pub mode: CutterMode,
    /// Tool is enabled
    pub enabled: bool,
    /// Last commanded power in host units, already clamped
    pub unit_power: f32,
    /// Display copy of `unit_power`
    pub menu_power: f32,
    /// Counter-clockwise rotation requested
    pub reverse: bool,
    /// Power stamped on moves queued from now on (inline without power-sync)
    pub inline_power: Option<u8>,
}

impl CutterState {
    /// Start-up state: STANDARD, disabled, all powers zero
    pub const fn new() -> Self {
        Self {
            mode: CutterMode::Standard,
            enabled: false,
            unit_power: 0.0,
            menu_power: 0.0,
            reverse: false,
            inline_power: None,
        }
    }

    /// Apply a mode event; entering an inline mode forces the tool enabled
    pub fn handle_event(&mut self, event: ModeEvent) {
        self.mode = self.mode.transition(event);

        match event {
            ModeEvent::InlinePowerOn { .. } => self.enabled = true,
            ModeEvent::InlineClear => self.enabled = false,
        }
    }

    /// Store a new (clamped) unit power, mirrored to the display copy
    pub fn set_unit_power(&mut self, power: f32) {
        self.unit_power = power;
        self.menu_power = power;
    }
}
