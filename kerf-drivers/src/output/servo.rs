//! Servo output
//!
//! The hardware value is an angle (0-180 degrees), turned into a pulse
//! width inside a 50 Hz frame.

use embedded_hal::pwm::SetDutyCycle;
use kerf_core::config::SERVO_FREQUENCY_HZ;
use kerf_core::traits::{CutterOutput, Direction, OutputError};

/// Largest commanded angle
pub const SERVO_MAX_DEGREES: u8 = 180;

/// Servo pulse timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoConfig {
    /// Pulse width at 0 degrees (µs)
    pub min_pulse_us: u32,
    /// Pulse width at 180 degrees (µs)
    pub max_pulse_us: u32,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
        }
    }
}

impl ServoConfig {
    /// Frame period (µs)
    pub const fn period_us() -> u32 {
        1_000_000 / SERVO_FREQUENCY_HZ
    }

    /// Pulse width for an angle, clamped to 180 degrees
    pub fn pulse_width_us(&self, angle: u8) -> u32 {
        let angle = angle.min(SERVO_MAX_DEGREES) as u32;
        let span = self.max_pulse_us.saturating_sub(self.min_pulse_us);
        self.min_pulse_us + (span * angle + SERVO_MAX_DEGREES as u32 / 2) / SERVO_MAX_DEGREES as u32
    }
}

/// Servo cutter output
///
/// The PWM channel must run at the servo frame rate.
pub struct ServoOutput<P> {
    pwm: P,
    config: ServoConfig,
    angle: u8,
}

impl<P: SetDutyCycle> ServoOutput<P> {
    pub fn new(pwm: P, config: ServoConfig) -> Self {
        Self {
            pwm,
            config,
            angle: 0,
        }
    }

    /// Compare value for an angle
    pub fn compare(&self, angle: u8) -> u16 {
        let top = self.pwm.max_duty_cycle() as u32;
        let pulse = self.config.pulse_width_us(angle);
        (pulse * top / ServoConfig::period_us()).min(top) as u16
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> CutterOutput for ServoOutput<P> {
    fn apply(&mut self, hw_power: u8) -> Result<(), OutputError> {
        let angle = hw_power.min(SERVO_MAX_DEGREES);
        let compare = self.compare(angle);
        self.pwm
            .set_duty_cycle(compare)
            .map_err(|_| OutputError::Pwm)?;
        self.angle = angle;
        Ok(())
    }

    // Servos have no rotation direction
    fn set_direction(&mut self, _dir: Direction) -> Result<(), OutputError> {
        Ok(())
    }

    fn direction(&self) -> Direction {
        Direction::Clockwise
    }

    fn power(&self) -> u8 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::mock::MockPwm;

    #[test]
    fn test_pulse_width() {
        let config = ServoConfig::default();

        assert_eq!(ServoConfig::period_us(), 20_000);
        assert_eq!(config.pulse_width_us(0), 544);
        assert_eq!(config.pulse_width_us(90), 1472);
        assert_eq!(config.pulse_width_us(180), 2400);
        assert_eq!(config.pulse_width_us(255), 2400);
    }

    #[test]
    fn test_apply_angle() {
        // 20000 counts per frame: one count per microsecond
        let mut out = ServoOutput::new(MockPwm::new(20_000), ServoConfig::default());

        out.apply(90).unwrap();
        assert_eq!(out.power(), 90);
        assert_eq!(out.release().duty, 1472);
    }

    #[test]
    fn test_angle_clamped() {
        let mut out = ServoOutput::new(MockPwm::new(20_000), ServoConfig::default());

        out.apply(250).unwrap();
        assert_eq!(out.power(), 180);
        assert_eq!(out.release().duty, 2400);
    }
}
