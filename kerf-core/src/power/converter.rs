//! Unit power to duty-cycle conversion
//!
//! Host power parameters arrive in the configured unit (duty, percent, RPM
//! or servo degrees). This module clamps them into the legal range and maps
//! them to the 8-bit duty value ("OCR") that the output hardware latches.
//!
//! All functions are pure and total: NaN and out-of-range inputs collapse
//! into the documented codomain instead of failing.

use crate::config::{CutterConfig, CutterKind, OutputKind, PowerUnit};

/// Full-scale duty value
pub const OCR_MAX: u8 = 255;

/// Full-scale servo angle in degrees
pub const SERVO_MAX_ANGLE: f32 = 180.0;

/// How a unit power reaches the hardware, resolved once from [`OutputKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareMapping {
    /// Linear duty cycle
    Duty,
    /// No duty control: anything above zero is fully on
    Binary,
    /// Hardware value is a servo angle
    Servo,
}

impl From<OutputKind> for HardwareMapping {
    fn from(output: OutputKind) -> Self {
        match output {
            OutputKind::Pwm => HardwareMapping::Duty,
            OutputKind::OnOff => HardwareMapping::Binary,
            OutputKind::Servo => HardwareMapping::Servo,
        }
    }
}

/// Round half away from zero (no libm on the target)
fn round(x: f32) -> f32 {
    if x >= 0.0 {
        (x + 0.5) as i32 as f32
    } else {
        (x - 0.5) as i32 as f32
    }
}

/// Percent (0-100) to duty value
pub fn pct_to_ocr(pct: f32) -> u8 {
    (pct.max(0.0).min(100.0) * OCR_MAX as f32 / 100.0 + 0.5) as u8
}

/// Percent (0-100) to servo angle
pub fn pct_to_servo(pct: f32) -> f32 {
    round(pct.max(0.0).min(100.0) * SERVO_MAX_ANGLE / 100.0)
}

/// Power converter for one configured cutter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConverter {
    kind: CutterKind,
    unit: PowerUnit,
    mapping: HardwareMapping,
    power_min: f32,
    power_max: f32,
    relative: bool,
    full_power_feedrate: f32,
}

impl PowerConverter {
    /// Create a converter from the cutter configuration
    pub fn new(config: &CutterConfig) -> Self {
        Self {
            kind: config.kind,
            unit: config.unit,
            mapping: config.output.into(),
            power_min: config.speed_power_min,
            power_max: config.speed_power_max,
            relative: config.relative,
            full_power_feedrate: config.dynamic_full_power_feedrate,
        }
    }

    /// The hardware mapping strategy in use
    pub fn mapping(&self) -> HardwareMapping {
        self.mapping
    }

    /// Power that maps to 0% when power is relative
    fn floor(&self) -> f32 {
        if self.relative {
            self.power_min
        } else {
            0.0
        }
    }

    /// Lowest legal power as a percentage
    fn min_pct(&self) -> f32 {
        if self.relative {
            return 0.0;
        }
        match self.kind {
            CutterKind::Spindle => round(100.0 * self.power_min / self.power_max),
            CutterKind::Laser => self.power_min,
        }
    }

    /// Highest legal power as a percentage
    fn max_pct(&self) -> f32 {
        match self.kind {
            CutterKind::Spindle => 100.0,
            CutterKind::Laser => self.power_max,
        }
    }

    /// Configured power (spindle RPM or laser percent) to a percentage
    pub fn cpwr_to_pct(&self, cpwr: f32) -> f32 {
        if !(cpwr > 0.0) {
            return 0.0;
        }
        let span = self.power_max - self.floor();
        if !(span > 0.0) {
            return 100.0;
        }
        round(100.0 * (cpwr - self.floor()) / span).max(0.0).min(100.0)
    }

    /// Clamp a requested power into the legal interval of the host unit
    ///
    /// Anything at or below zero (and NaN) is "off" and returns 0. Positive
    /// requests are clamped into `[min, max]` of the unit.
    pub fn power_to_range(&self, requested: f32) -> f32 {
        if !(requested > 0.0) {
            return 0.0;
        }

        let (lo, hi) = match self.unit {
            PowerUnit::Pwm255 => (
                pct_to_ocr(self.min_pct()) as f32,
                pct_to_ocr(self.max_pct()) as f32,
            ),
            PowerUnit::Percent => (self.min_pct(), self.max_pct()),
            PowerUnit::Rpm => (self.power_min, self.power_max),
            PowerUnit::Servo => (0.0, SERVO_MAX_ANGLE),
        };

        requested.max(lo).min(hi)
    }

    /// Map a unit power to the hardware value (duty 0-255 or servo angle)
    pub fn unit_to_hardware(&self, unit_power: f32) -> u8 {
        match self.mapping {
            HardwareMapping::Binary => {
                if unit_power > 0.0 {
                    OCR_MAX
                } else {
                    0
                }
            }
            HardwareMapping::Servo => {
                round(unit_power.max(0.0).min(SERVO_MAX_ANGLE)) as u8
            }
            HardwareMapping::Duty => match self.unit {
                PowerUnit::Pwm255 => round(unit_power.max(0.0).min(OCR_MAX as f32)) as u8,
                PowerUnit::Percent => pct_to_ocr(unit_power),
                PowerUnit::Rpm => pct_to_ocr(self.cpwr_to_pct(unit_power)),
                PowerUnit::Servo => pct_to_ocr(unit_power * 100.0 / SERVO_MAX_ANGLE),
            },
        }
    }

    /// Convert a configured constant (e.g. the startup power) to the host unit
    pub fn cpwr_to_upwr(&self, cpwr: f32) -> f32 {
        match self.kind {
            // Spindle constants are in RPM
            CutterKind::Spindle => match self.unit {
                PowerUnit::Rpm => cpwr,
                PowerUnit::Percent => self.cpwr_to_pct(cpwr),
                PowerUnit::Servo => pct_to_servo(self.cpwr_to_pct(cpwr)),
                PowerUnit::Pwm255 => pct_to_ocr(self.cpwr_to_pct(cpwr)) as f32,
            },
            // Laser constants are in percent
            CutterKind::Laser => match self.unit {
                PowerUnit::Pwm255 => pct_to_ocr(cpwr) as f32,
                _ => cpwr,
            },
        }
    }

    /// Full scale of the host unit
    fn unit_full_scale(&self) -> f32 {
        match self.unit {
            PowerUnit::Pwm255 => OCR_MAX as f32,
            PowerUnit::Percent => self.max_pct(),
            PowerUnit::Rpm => self.power_max,
            PowerUnit::Servo => SERVO_MAX_ANGLE,
        }
    }

    /// Map a hardware value back to the host unit (for read-back/display)
    pub fn hardware_to_unit(&self, hw: u8) -> f32 {
        if hw == 0 {
            return 0.0;
        }

        match self.mapping {
            HardwareMapping::Binary => self.unit_full_scale(),
            HardwareMapping::Servo => hw as f32,
            HardwareMapping::Duty => {
                let pct = hw as f32 * 100.0 / OCR_MAX as f32;
                match self.unit {
                    PowerUnit::Pwm255 => hw as f32,
                    PowerUnit::Percent => round(pct),
                    PowerUnit::Rpm => {
                        round(self.floor() + pct * (self.power_max - self.floor()) / 100.0)
                    }
                    PowerUnit::Servo => pct_to_servo(pct),
                }
            }
        }
    }

    /// Duty for a DYNAMIC mode move: the base duty scaled by how close the
    /// move's feedrate (mm/min) comes to the full-power feedrate
    pub fn dynamic_power(&self, base: u8, feedrate: f32) -> u8 {
        let ratio = (feedrate / self.full_power_feedrate).max(0.0).min(1.0);
        (base as f32 * ratio + 0.5) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laser() -> PowerConverter {
        PowerConverter::new(&CutterConfig::laser())
    }

    fn spindle() -> PowerConverter {
        PowerConverter::new(&CutterConfig::spindle())
    }

    #[test]
    fn test_pct_to_ocr() {
        assert_eq!(pct_to_ocr(0.0), 0);
        assert_eq!(pct_to_ocr(50.0), 128);
        assert_eq!(pct_to_ocr(80.0), 204);
        assert_eq!(pct_to_ocr(100.0), 255);
        assert_eq!(pct_to_ocr(150.0), 255);
        assert_eq!(pct_to_ocr(-10.0), 0);
        assert_eq!(pct_to_ocr(f32::NAN), 0);
    }

    #[test]
    fn test_laser_range_clamp() {
        let conv = laser();

        assert_eq!(conv.power_to_range(-5.0), 0.0);
        assert_eq!(conv.power_to_range(0.0), 0.0);
        assert_eq!(conv.power_to_range(f32::NAN), 0.0);
        assert_eq!(conv.power_to_range(50.0), 50.0);
        assert_eq!(conv.power_to_range(300.0), 255.0);
    }

    #[test]
    fn test_laser_unit_to_hardware() {
        let conv = laser();

        // PWM255 units map straight through
        assert_eq!(conv.unit_to_hardware(0.0), 0);
        assert_eq!(conv.unit_to_hardware(50.0), 50);
        assert_eq!(conv.unit_to_hardware(255.0), 255);
        assert_eq!(conv.unit_to_hardware(1000.0), 255);
    }

    #[test]
    fn test_laser_startup_power() {
        // 80% startup in PWM255 units
        assert_eq!(laser().cpwr_to_upwr(80.0), 204.0);

        let mut config = CutterConfig::laser();
        config.unit = PowerUnit::Percent;
        assert_eq!(PowerConverter::new(&config).cpwr_to_upwr(80.0), 80.0);
    }

    #[test]
    fn test_spindle_rpm_range() {
        let conv = spindle();

        assert_eq!(conv.power_to_range(1000.0), 5000.0);
        assert_eq!(conv.power_to_range(12000.0), 12000.0);
        assert_eq!(conv.power_to_range(40000.0), 30000.0);
        assert_eq!(conv.power_to_range(0.0), 0.0);
    }

    #[test]
    fn test_spindle_rpm_to_hardware() {
        let conv = spindle();

        assert_eq!(conv.unit_to_hardware(0.0), 0);
        assert_eq!(conv.unit_to_hardware(15000.0), 128);
        assert_eq!(conv.unit_to_hardware(30000.0), 255);
        assert_eq!(conv.cpwr_to_upwr(25000.0), 25000.0);
    }

    #[test]
    fn test_spindle_percent_unit() {
        let mut config = CutterConfig::spindle();
        config.unit = PowerUnit::Percent;
        let conv = PowerConverter::new(&config);

        // 5000 of 30000 RPM rounds to a 17% floor
        assert_eq!(conv.power_to_range(10.0), 17.0);
        assert_eq!(conv.power_to_range(60.0), 60.0);
        assert_eq!(conv.power_to_range(120.0), 100.0);
        assert_eq!(conv.unit_to_hardware(17.0), 43);
        assert_eq!(conv.cpwr_to_upwr(25000.0), 83.0);
    }

    #[test]
    fn test_relative_power() {
        let mut config = CutterConfig::spindle();
        config.relative = true;
        let conv = PowerConverter::new(&config);

        // Range floor maps to 0%, midpoint of 5000..30000 to 50%
        assert_eq!(conv.cpwr_to_pct(5000.0), 0.0);
        assert_eq!(conv.cpwr_to_pct(17500.0), 50.0);
        assert_eq!(conv.unit_to_hardware(17500.0), 128);
    }

    #[test]
    fn test_binary_mapping() {
        let mut config = CutterConfig::laser();
        config.output = OutputKind::OnOff;
        let conv = PowerConverter::new(&config);

        assert_eq!(conv.mapping(), HardwareMapping::Binary);
        assert_eq!(conv.unit_to_hardware(0.0), 0);
        assert_eq!(conv.unit_to_hardware(-3.0), 0);
        assert_eq!(conv.unit_to_hardware(1.0), 255);
        assert_eq!(conv.unit_to_hardware(50.0), 255);
        assert_eq!(conv.hardware_to_unit(255), 255.0);
        assert_eq!(conv.hardware_to_unit(0), 0.0);
    }

    #[test]
    fn test_servo_mapping() {
        let mut config = CutterConfig::spindle();
        config.unit = PowerUnit::Servo;
        config.output = OutputKind::Servo;
        let conv = PowerConverter::new(&config);

        assert_eq!(conv.power_to_range(90.0), 90.0);
        assert_eq!(conv.power_to_range(200.0), 180.0);
        assert_eq!(conv.unit_to_hardware(90.0), 90);
        assert_eq!(conv.unit_to_hardware(180.0), 180);
        assert_eq!(conv.hardware_to_unit(45), 45.0);
    }

    #[test]
    fn test_hardware_to_unit() {
        assert_eq!(laser().hardware_to_unit(128), 128.0);
        assert_eq!(spindle().hardware_to_unit(255), 30000.0);
        assert_eq!(spindle().hardware_to_unit(0), 0.0);

        let mut config = CutterConfig::laser();
        config.unit = PowerUnit::Percent;
        let conv = PowerConverter::new(&config);
        assert_eq!(conv.hardware_to_unit(255), 100.0);
        assert_eq!(conv.hardware_to_unit(128), 50.0);
    }

    #[test]
    fn test_dynamic_power() {
        let conv = laser();

        // Full power feedrate defaults to 6000 mm/min
        assert_eq!(conv.dynamic_power(200, 6000.0), 200);
        assert_eq!(conv.dynamic_power(200, 9000.0), 200);
        assert_eq!(conv.dynamic_power(200, 3000.0), 100);
        assert_eq!(conv.dynamic_power(200, 0.0), 0);
        assert_eq!(conv.dynamic_power(0, 6000.0), 0);
    }
}
