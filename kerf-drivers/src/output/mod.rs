//! Cutter output drivers
//!
//! Every driver takes the latched hardware value and turns it into PWM
//! compare counts and pin levels. Which driver is built follows the
//! configured output kind.

pub mod onoff;
pub mod pwm;
pub mod servo;

pub use onoff::OnOffOutput;
pub use pwm::{PwmOutput, PwmOutputConfig};
pub use servo::{ServoConfig, ServoOutput};

use embedded_hal::digital::OutputPin;
use kerf_core::traits::{Direction, OutputError};

/// Drive a pin to its active or inactive level
pub(crate) fn drive_pin<P: OutputPin>(
    pin: &mut P,
    active: bool,
    active_low: bool,
) -> Result<(), OutputError> {
    let result = if active != active_low {
        pin.set_high()
    } else {
        pin.set_low()
    };
    result.map_err(|_| OutputError::Pin)
}

/// Direction pin: high for counter-clockwise
pub(crate) fn drive_direction<P: OutputPin>(
    pin: &mut Option<P>,
    dir: Direction,
) -> Result<(), OutputError> {
    match pin {
        Some(pin) => drive_pin(pin, dir == Direction::CounterClockwise, false),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;

    use embedded_hal::digital::{self, OutputPin};
    use embedded_hal::pwm::{self, SetDutyCycle};

    /// PWM channel that records the last compare value
    pub struct MockPwm {
        pub max: u16,
        pub duty: u16,
    }

    impl MockPwm {
        pub fn new(max: u16) -> Self {
            Self { max, duty: 0 }
        }
    }

    impl pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    /// GPIO that records its level
    #[derive(Default)]
    pub struct MockPin {
        pub high: bool,
    }

    impl digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }
}
