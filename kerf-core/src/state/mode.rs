//! Cutter mode state machine

use super::events::ModeEvent;

/// How power commands are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CutterMode {
    /// Power applies immediately once queued motion has drained
    #[default]
    Standard,
    /// Inline: every queued move runs at the commanded power
    Continuous,
    /// Inline: power scales with the feedrate of each move
    Dynamic,
}

impl CutterMode {
    /// Check if power changes travel with queued motion
    pub fn is_inline(&self) -> bool {
        matches!(self, CutterMode::Continuous | CutterMode::Dynamic)
    }

    /// Wire/display code
    pub fn as_u8(&self) -> u8 {
        match self {
            CutterMode::Standard => 0,
            CutterMode::Continuous => 1,
            CutterMode::Dynamic => 2,
        }
    }

    /// Decode a wire/display code
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(CutterMode::Standard),
            1 => Some(CutterMode::Continuous),
            2 => Some(CutterMode::Dynamic),
            _ => None,
        }
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: ModeEvent) -> Self {
        use CutterMode::*;
        use ModeEvent::*;

        match (self, event) {
            // Inline power-on picks the mode from the variant, from any mode
            (_, InlinePowerOn { reverse: false }) => Continuous,
            (_, InlinePowerOn { reverse: true }) => Dynamic,

            (Continuous | Dynamic, InlineClear) => Standard,

            // Default: stay in current mode
            _ => self,
        }
    }
}
