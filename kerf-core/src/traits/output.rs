//! Cutter output trait
//!
//! Implemented by the concrete output drivers (PWM, on/off gate, servo).
//! The motion executor and the command context only ever hand a latched
//! hardware value to an output; timer and pin programming stay in the driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Spindle rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Clockwise rotation (M3)
    #[default]
    Clockwise,
    /// Counter-clockwise rotation (M4)
    CounterClockwise,
}

impl Direction {
    /// Direction for a reverse flag
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }

    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Errors reported by an output driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// PWM channel rejected the compare value
    Pwm,
    /// GPIO write failed
    Pin,
}

/// Hardware output of the cutter
pub trait CutterOutput {
    /// Apply a hardware power value
    ///
    /// The value is a duty (0-255) for PWM and on/off outputs, or an angle
    /// in degrees (0-180) for servo outputs. Zero always means off.
    fn apply(&mut self, hw_power: u8) -> Result<(), OutputError>;

    /// Set the rotation direction
    ///
    /// Outputs without a direction pin ignore this.
    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError>;

    /// Get the current direction
    fn direction(&self) -> Direction;

    /// Get the hardware value currently applied
    fn power(&self) -> u8;

    /// Check if the tool is being driven
    fn is_on(&self) -> bool {
        self.power() > 0
    }
}
