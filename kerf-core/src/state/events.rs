//! Events that trigger mode transitions

/// Mode-changing command qualifiers
///
/// Only power commands carrying the inline qualifier (power-on) or the
/// inline-clear qualifier (power-off) produce an event. Plain power changes
/// never reach the mode machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    /// Inline power-on; `reverse` is the counter-clockwise variant
    InlinePowerOn { reverse: bool },
    /// Power-off with the inline-clear qualifier
    InlineClear,
}
