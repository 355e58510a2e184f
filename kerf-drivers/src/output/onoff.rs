//! On/off gate output
//!
//! For tools without duty control: a relay, an SSR, or a laser module
//! driven through its enable input. Any nonzero power is fully on.

use embedded_hal::digital::OutputPin;
use kerf_core::power::OCR_MAX;
use kerf_core::traits::{CutterOutput, Direction, OutputError};

use super::{drive_direction, drive_pin};

/// On/off cutter output
pub struct OnOffOutput<D> {
    gate: D,
    direction_pin: Option<D>,
    active_low: bool,
    on: bool,
    direction: Direction,
}

impl<D: OutputPin> OnOffOutput<D> {
    pub fn new(gate: D, active_low: bool) -> Self {
        Self {
            gate,
            direction_pin: None,
            active_low,
            on: false,
            direction: Direction::Clockwise,
        }
    }

    /// Add a direction pin
    pub fn with_direction(mut self, pin: D) -> Self {
        self.direction_pin = Some(pin);
        self
    }

    /// Release the pins
    pub fn release(self) -> (D, Option<D>) {
        (self.gate, self.direction_pin)
    }
}

impl<D: OutputPin> CutterOutput for OnOffOutput<D> {
    fn apply(&mut self, hw_power: u8) -> Result<(), OutputError> {
        let on = hw_power > 0;
        drive_pin(&mut self.gate, on, self.active_low)?;
        self.on = on;
        Ok(())
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError> {
        drive_direction(&mut self.direction_pin, dir)?;
        self.direction = dir;
        Ok(())
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn power(&self) -> u8 {
        if self.on {
            OCR_MAX
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::mock::MockPin;

    #[test]
    fn test_any_power_is_full_on() {
        let mut out = OnOffOutput::new(MockPin::default(), false);

        out.apply(1).unwrap();
        assert_eq!(out.power(), 255);
        assert!(out.is_on());

        out.apply(0).unwrap();
        assert_eq!(out.power(), 0);
        let (gate, _) = out.release();
        assert!(!gate.high);
    }

    #[test]
    fn test_active_low_gate() {
        let mut out = OnOffOutput::new(MockPin::default(), true);

        out.apply(0).unwrap();
        out.apply(128).unwrap();
        let (gate, _) = out.release();
        assert!(!gate.high);
    }

    #[test]
    fn test_direction() {
        let mut out = OnOffOutput::new(MockPin::default(), false).with_direction(MockPin::default());

        out.set_direction(Direction::CounterClockwise).unwrap();
        out.set_direction(Direction::CounterClockwise.opposite()).unwrap();
        assert_eq!(out.direction(), Direction::Clockwise);
        let (_, dir) = out.release();
        assert!(!dir.unwrap().high);
    }
}
