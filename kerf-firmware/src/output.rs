//! Cutter output construction for the board
//!
//! Pin assignments are board-specific (SKR Pico fan header: PWM=GPIO20,
//! enable=GPIO21, direction=GPIO22).

use defmt::*;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIN_20, PIN_21, PIN_22, PWM_SLICE2};
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput as PwmChannel};
use embassy_rp::Peri;

use kerf_core::config::{CutterConfig, OutputKind, SERVO_FREQUENCY_HZ};
use kerf_core::traits::{CutterOutput, Direction, OutputError};
use kerf_drivers::output::{OnOffOutput, PwmOutput, PwmOutputConfig, ServoConfig, ServoOutput};

type Pin = Output<'static>;
type Channel = PwmChannel<'static>;

/// Whichever output the configuration selected
pub enum BoardOutput {
    Pwm(PwmOutput<Channel, Pin>),
    OnOff(OnOffOutput<Pin>),
    Servo(ServoOutput<Channel>),
}

/// Pins and PWM slice the output is built from
pub struct OutputPins {
    pub slice: Peri<'static, PWM_SLICE2>,
    pub pwm: Peri<'static, PIN_20>,
    pub enable: Peri<'static, PIN_21>,
    pub direction: Peri<'static, PIN_22>,
}

/// Clock divider and TOP for a carrier frequency
///
/// Picks the smallest integer divider that keeps TOP within 16 bits, which
/// gives the finest duty resolution.
pub fn pwm_timing(clk_hz: u32, frequency_hz: u32) -> (u8, u16) {
    let frequency_hz = frequency_hz.max(1);
    let counts = clk_hz / frequency_hz;
    let divider = counts.div_ceil(u16::MAX as u32 + 1).clamp(1, u8::MAX as u32);
    let top = (counts / divider).saturating_sub(1).min(u16::MAX as u32);
    (divider as u8, top as u16)
}

fn slice_config(frequency_hz: u32) -> PwmConfig {
    let (divider, top) = pwm_timing(embassy_rp::clocks::clk_sys_freq(), frequency_hz);
    debug!("PWM {} Hz: divider={} top={}", frequency_hz, divider, top);

    let mut config = PwmConfig::default();
    config.divider = divider.into();
    config.top = top;
    config.compare_a = 0;
    config
}

impl BoardOutput {
    /// Build the output selected by the configuration, switched off
    pub fn new(config: &CutterConfig, pins: OutputPins) -> Self {
        let direction = config
            .supports_direction()
            .then(|| Output::new(pins.direction, Level::Low));

        match config.output {
            OutputKind::Pwm => {
                let pwm = Pwm::new_output_a(pins.slice, pins.pwm, slice_config(config.pwm.frequency_hz));
                let (channel, _) = pwm.split();
                let enable_idle = if config.pwm.enable_inverted {
                    Level::High
                } else {
                    Level::Low
                };

                let mut output = PwmOutput::new(unwrap!(channel), PwmOutputConfig::from(&config.pwm))
                    .with_enable(Output::new(pins.enable, enable_idle));
                if let Some(pin) = direction {
                    output = output.with_direction(pin);
                }
                info!("PWM output at {} Hz", config.pwm.frequency_hz);
                BoardOutput::Pwm(output)
            }
            OutputKind::OnOff => {
                let idle = if config.pwm.enable_inverted {
                    Level::High
                } else {
                    Level::Low
                };
                let mut output = OnOffOutput::new(Output::new(pins.pwm, idle), config.pwm.enable_inverted);
                if let Some(pin) = direction {
                    output = output.with_direction(pin);
                }
                info!("On/off output");
                BoardOutput::OnOff(output)
            }
            OutputKind::Servo => {
                let pwm = Pwm::new_output_a(pins.slice, pins.pwm, slice_config(SERVO_FREQUENCY_HZ));
                let (channel, _) = pwm.split();
                info!("Servo output");
                BoardOutput::Servo(ServoOutput::new(unwrap!(channel), ServoConfig::default()))
            }
        }
    }
}

impl CutterOutput for BoardOutput {
    fn apply(&mut self, hw_power: u8) -> Result<(), OutputError> {
        match self {
            BoardOutput::Pwm(o) => o.apply(hw_power),
            BoardOutput::OnOff(o) => o.apply(hw_power),
            BoardOutput::Servo(o) => o.apply(hw_power),
        }
    }

    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError> {
        match self {
            BoardOutput::Pwm(o) => o.set_direction(dir),
            BoardOutput::OnOff(o) => o.set_direction(dir),
            BoardOutput::Servo(o) => o.set_direction(dir),
        }
    }

    fn direction(&self) -> Direction {
        match self {
            BoardOutput::Pwm(o) => o.direction(),
            BoardOutput::OnOff(o) => o.direction(),
            BoardOutput::Servo(o) => o.direction(),
        }
    }

    fn power(&self) -> u8 {
        match self {
            BoardOutput::Pwm(o) => o.power(),
            BoardOutput::OnOff(o) => o.power(),
            BoardOutput::Servo(o) => o.power(),
        }
    }
}
