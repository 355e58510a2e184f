//! Power command requests

use crate::state::ModeEvent;

/// Power-on request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerOn {
    /// Counter-clockwise variant (M4)
    pub reverse: bool,
    /// Requested power in host units
    pub power: Option<f32>,
    /// Inline qualifier: power travels with queued motion
    pub inline: bool,
}

impl PowerOn {
    /// Clockwise power-on
    pub const fn forward(power: Option<f32>) -> Self {
        Self {
            reverse: false,
            power,
            inline: false,
        }
    }

    /// Counter-clockwise power-on
    pub const fn reverse(power: Option<f32>) -> Self {
        Self {
            reverse: true,
            power,
            inline: false,
        }
    }

    /// Same request with the inline qualifier
    pub const fn inline(self) -> Self {
        Self {
            inline: true,
            ..self
        }
    }

    /// Mode event raised by this request
    pub fn mode_event(&self) -> Option<ModeEvent> {
        self.inline.then_some(ModeEvent::InlinePowerOn {
            reverse: self.reverse,
        })
    }
}

/// Power-off request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerOff {
    /// Leave inline mode and disable the tool
    pub inline_clear: bool,
}

impl PowerOff {
    /// Mode event raised by this request
    pub fn mode_event(&self) -> Option<ModeEvent> {
        self.inline_clear.then_some(ModeEvent::InlineClear)
    }
}

/// Any cutter command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CutterCommand {
    PowerOn(PowerOn),
    PowerOff(PowerOff),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_events() {
        assert_eq!(PowerOn::forward(Some(10.0)).mode_event(), None);
        assert_eq!(
            PowerOn::forward(None).inline().mode_event(),
            Some(ModeEvent::InlinePowerOn { reverse: false })
        );
        assert_eq!(
            PowerOn::reverse(None).inline().mode_event(),
            Some(ModeEvent::InlinePowerOn { reverse: true })
        );
        assert_eq!(PowerOff::default().mode_event(), None);
        assert_eq!(
            PowerOff { inline_clear: true }.mode_event(),
            Some(ModeEvent::InlineClear)
        );
    }
}
