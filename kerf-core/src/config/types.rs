//! Cutter configuration type definitions
//!
//! These types represent the cutter hardware and behavior configuration.
//! Output variants (PWM, on/off, servo) and the power-sync policy are plain
//! runtime fields, resolved once at startup into the converter and bridge
//! strategies.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default spindle power range (RPM)
pub const SPINDLE_POWER_MIN: f32 = 5000.0;
pub const SPINDLE_POWER_MAX: f32 = 30000.0;
pub const SPINDLE_POWER_STARTUP: f32 = 25000.0;

/// Default laser power range (percent)
pub const LASER_POWER_MIN: f32 = 0.0;
pub const LASER_POWER_MAX: f32 = 100.0;
pub const LASER_POWER_STARTUP: f32 = 80.0;

/// Default feedrate (mm/min) at which dynamic mode reaches full commanded power
pub const DEFAULT_DYNAMIC_FEEDRATE: f32 = 6000.0;

/// Default PWM carrier frequency
pub const DEFAULT_PWM_FREQUENCY_HZ: u32 = 5000;

/// Servo PWM frame frequency
pub const SERVO_FREQUENCY_HZ: u32 = 50;

/// Kind of tool on the head
///
/// Decides which unit the configured `speed_power_*` constants are written in:
/// RPM for a spindle, percent for a laser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CutterKind {
    /// Rotating spindle (router, mill)
    Spindle,
    /// Diode or CO2 laser
    #[default]
    Laser,
}

/// Unit in which the host expresses power parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PowerUnit {
    /// Raw duty cycle, 0-255
    #[default]
    Pwm255,
    /// Percent of full power, 0-100
    Percent,
    /// Spindle speed in RPM
    Rpm,
    /// Servo angle in degrees, 0-180
    Servo,
}

/// Output capability of the cutter hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputKind {
    /// Duty-cycle PWM output
    #[default]
    Pwm,
    /// Enable pin only - power collapses to fully on or off
    OnOff,
    /// Positional servo (pen up/down style tools)
    Servo,
}

/// PWM output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PwmSettings {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    /// PWM is active-low (0 duty = full power)
    pub inverted: bool,
    /// Enable pin is active-low
    pub enable_inverted: bool,
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
            inverted: false,
            enable_inverted: false,
        }
    }
}

/// Complete cutter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutterConfig {
    /// Tool kind
    pub kind: CutterKind,
    /// Host power unit
    pub unit: PowerUnit,
    /// Output capability
    pub output: OutputKind,
    /// Lowest nonzero power (RPM for spindles, percent for lasers)
    pub speed_power_min: f32,
    /// Highest power (RPM for spindles, percent for lasers)
    pub speed_power_max: f32,
    /// Power used when a STANDARD power-on carries no parameter
    pub speed_power_startup: f32,
    /// Power is relative to `speed_power_min` instead of zero
    pub relative: bool,
    /// Inline power changes travel through the motion queue as markers
    pub power_sync: bool,
    /// Spindle has a direction output
    pub direction_control: bool,
    /// Feedrate (mm/min) at which dynamic mode reaches full commanded power
    pub dynamic_full_power_feedrate: f32,
    /// PWM output settings
    pub pwm: PwmSettings,
}

impl CutterConfig {
    /// Default laser setup: 8-bit PWM units, percent range, power-sync on
    pub const fn laser() -> Self {
        Self {
            kind: CutterKind::Laser,
            unit: PowerUnit::Pwm255,
            output: OutputKind::Pwm,
            speed_power_min: LASER_POWER_MIN,
            speed_power_max: LASER_POWER_MAX,
            speed_power_startup: LASER_POWER_STARTUP,
            relative: false,
            power_sync: true,
            direction_control: false,
            dynamic_full_power_feedrate: DEFAULT_DYNAMIC_FEEDRATE,
            pwm: PwmSettings {
                frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
                inverted: false,
                enable_inverted: false,
            },
        }
    }

    /// Default spindle setup: RPM units with direction control
    pub const fn spindle() -> Self {
        Self {
            kind: CutterKind::Spindle,
            unit: PowerUnit::Rpm,
            output: OutputKind::Pwm,
            speed_power_min: SPINDLE_POWER_MIN,
            speed_power_max: SPINDLE_POWER_MAX,
            speed_power_startup: SPINDLE_POWER_STARTUP,
            relative: false,
            power_sync: false,
            direction_control: true,
            dynamic_full_power_feedrate: DEFAULT_DYNAMIC_FEEDRATE,
            pwm: PwmSettings {
                frequency_hz: DEFAULT_PWM_FREQUENCY_HZ,
                inverted: false,
                enable_inverted: false,
            },
        }
    }

    /// Defaults for the given tool kind
    pub const fn for_kind(kind: CutterKind) -> Self {
        match kind {
            CutterKind::Spindle => Self::spindle(),
            CutterKind::Laser => Self::laser(),
        }
    }

    /// Check the configuration for contradictions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.speed_power_min >= 0.0) || !(self.speed_power_max > self.speed_power_min) {
            return Err(ConfigError::InvalidPowerRange);
        }

        if !(self.speed_power_startup >= 0.0) || self.speed_power_startup > self.speed_power_max {
            return Err(ConfigError::StartupOutOfRange);
        }

        if self.kind == CutterKind::Laser {
            if self.direction_control {
                return Err(ConfigError::DirectionOnLaser);
            }
            if self.unit == PowerUnit::Rpm {
                return Err(ConfigError::UnitNotSupported);
            }
            if self.speed_power_max > 100.0 {
                return Err(ConfigError::InvalidPowerRange);
            }
        }

        let servo_unit = self.unit == PowerUnit::Servo;
        let servo_output = self.output == OutputKind::Servo;
        if servo_unit != servo_output {
            return Err(ConfigError::UnitOutputMismatch);
        }

        if !(self.dynamic_full_power_feedrate > 0.0) {
            return Err(ConfigError::InvalidFeedrate);
        }

        if self.output == OutputKind::Pwm && self.pwm.frequency_hz == 0 {
            return Err(ConfigError::InvalidFrequency);
        }

        Ok(())
    }

    /// Check if reverse requests reach a direction output
    pub fn supports_direction(&self) -> bool {
        self.kind == CutterKind::Spindle && self.direction_control
    }
}

impl Default for CutterConfig {
    fn default() -> Self {
        Self::laser()
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minimum/maximum power are negative or out of order
    InvalidPowerRange,
    /// Startup power lies outside the power range
    StartupOutOfRange,
    /// Lasers have no rotation direction
    DirectionOnLaser,
    /// Power unit cannot be used with this tool kind
    UnitNotSupported,
    /// Servo units require a servo output and vice versa
    UnitOutputMismatch,
    /// Dynamic mode feedrate must be positive
    InvalidFeedrate,
    /// PWM frequency must be nonzero
    InvalidFrequency,
    /// Malformed line in the configuration text
    Syntax { line: u16 },
    /// Unknown section header
    UnknownSection { line: u16 },
    /// Unknown key in a known section
    UnknownKey { line: u16 },
    /// Value has the wrong type or an unknown enum name
    InvalidValue { line: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(CutterConfig::laser().validate(), Ok(()));
        assert_eq!(CutterConfig::spindle().validate(), Ok(()));
        assert_eq!(CutterConfig::default(), CutterConfig::laser());
    }

    #[test]
    fn test_power_range_order() {
        let mut config = CutterConfig::spindle();
        config.speed_power_max = config.speed_power_min;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPowerRange));

        let mut config = CutterConfig::laser();
        config.speed_power_min = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPowerRange));

        // Laser constants are percentages
        let mut config = CutterConfig::laser();
        config.speed_power_max = 120.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPowerRange));
    }

    #[test]
    fn test_startup_power_range() {
        let mut config = CutterConfig::spindle();
        config.speed_power_startup = 40000.0;
        assert_eq!(config.validate(), Err(ConfigError::StartupOutOfRange));
    }

    #[test]
    fn test_laser_restrictions() {
        let mut config = CutterConfig::laser();
        config.direction_control = true;
        assert_eq!(config.validate(), Err(ConfigError::DirectionOnLaser));

        let mut config = CutterConfig::laser();
        config.unit = PowerUnit::Rpm;
        assert_eq!(config.validate(), Err(ConfigError::UnitNotSupported));
    }

    #[test]
    fn test_servo_unit_requires_servo_output() {
        let mut config = CutterConfig::spindle();
        config.unit = PowerUnit::Servo;
        assert_eq!(config.validate(), Err(ConfigError::UnitOutputMismatch));

        config.output = OutputKind::Servo;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_supports_direction() {
        assert!(CutterConfig::spindle().supports_direction());
        assert!(!CutterConfig::laser().supports_direction());

        let mut config = CutterConfig::spindle();
        config.direction_control = false;
        assert!(!config.supports_direction());
    }
}
