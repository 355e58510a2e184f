//! PWM duty-cycle output
//!
//! This driver provides:
//! - Duty mapping from the 8-bit hardware power to the channel's compare range
//! - Inverted PWM for active-low drivers
//! - Optional enable pin (on while power > 0) and direction pin

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use kerf_core::config::PwmSettings;
use kerf_core::power::OCR_MAX;
use kerf_core::traits::{CutterOutput, Direction, OutputError};

use super::{drive_direction, drive_pin};

/// PWM output configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmOutputConfig {
    /// PWM is active-low: full power is a zero compare value
    pub inverted: bool,
    /// Enable pin is active-low
    pub enable_inverted: bool,
}

impl From<&PwmSettings> for PwmOutputConfig {
    fn from(settings: &PwmSettings) -> Self {
        Self {
            inverted: settings.inverted,
            enable_inverted: settings.enable_inverted,
        }
    }
}

/// Map an 8-bit duty onto `0..=top`, rounded
pub fn scale_compare(hw_power: u8, top: u16) -> u16 {
    let top = top as u32;
    ((hw_power as u32 * top + OCR_MAX as u32 / 2) / OCR_MAX as u32) as u16
}

/// PWM cutter output
pub struct PwmOutput<P, D> {
    pwm: P,
    enable: Option<D>,
    direction_pin: Option<D>,
    config: PwmOutputConfig,
    power: u8,
    direction: Direction,
}

impl<P: SetDutyCycle, D: OutputPin> PwmOutput<P, D> {
    pub fn new(pwm: P, config: PwmOutputConfig) -> Self {
        Self {
            pwm,
            enable: None,
            direction_pin: None,
            config,
            power: 0,
            direction: Direction::Clockwise,
        }
    }

    /// Add an enable pin
    pub fn with_enable(mut self, pin: D) -> Self {
        self.enable = Some(pin);
        self
    }

    /// Add a direction pin
    pub fn with_direction(mut self, pin: D) -> Self {
        self.direction_pin = Some(pin);
        self
    }

    /// Compare value for a hardware power
    pub fn compare(&self, hw_power: u8) -> u16 {
        let top = self.pwm.max_duty_cycle();
        let duty = scale_compare(hw_power, top);
        if self.config.inverted {
            top - duty
        } else {
            duty
        }
    }

    pub fn has_direction_control(&self) -> bool {
        self.direction_pin.is_some()
    }

    /// Release the channel and pins
    pub fn release(self) -> (P, Option<D>, Option<D>) {
        (self.pwm, self.enable, self.direction_pin)
    }
}

impl<P: SetDutyCycle, D: OutputPin> CutterOutput for PwmOutput<P, D> {
    fn apply(&mut self, hw_power: u8) -> Result<(), OutputError> {
        let compare = self.compare(hw_power);
        self.pwm
            .set_duty_cycle(compare)
            .map_err(|_| OutputError::Pwm)?;

        if let Some(pin) = self.enable.as_mut() {
            drive_pin(pin, hw_power > 0, self.config.enable_inverted)?;
        }

        self.power = hw_power;
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
        self.power
    }
}
