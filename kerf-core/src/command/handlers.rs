//! Power-on and power-off handlers
//!
//! [`Cutter`] owns the cutter state and routes every power change through
//! the synchronization bridge. Handlers never fail: out-of-range power is
//! clamped, and the returned outcome says what happened.

use super::request::{CutterCommand, PowerOff, PowerOn};
use crate::config::CutterConfig;
use crate::motion::{Block, LaserStamp, MotionQueue, MoveBlock};
use crate::power::PowerConverter;
use crate::state::{CutterMode, CutterState};
use crate::sync::{PowerLatch, PowerRoute, SyncBridge, SyncPolicy};

/// Result of a power-on
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerOnOutcome {
    /// Queued motion was drained first
    pub drained: bool,
    /// Mode after the command
    pub mode: CutterMode,
    /// Unit power in effect
    pub unit_power: f32,
    /// How the hardware power was applied
    pub route: PowerRoute,
}

/// Result of a power-off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerOffOutcome {
    /// Mode after the command
    pub mode: CutterMode,
    /// Inline mode was cleared
    pub cleared: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    PowerOn(PowerOnOutcome),
    PowerOff(PowerOffOutcome),
}

/// The cutter: state, converter and synchronization bridge
pub struct Cutter<'a, Q: MotionQueue> {
    state: CutterState,
    converter: PowerConverter,
    bridge: SyncBridge<'a, Q>,
    startup_power: f32,
    direction_control: bool,
}

impl<'a, Q: MotionQueue> Cutter<'a, Q> {
    /// Create a cutter in its start-up state
    pub fn new(config: &CutterConfig, queue: Q, latch: &'a PowerLatch) -> Self {
        Self {
            state: CutterState::new(),
            converter: PowerConverter::new(config),
            bridge: SyncBridge::new(queue, latch, SyncPolicy::from_power_sync(config.power_sync)),
            startup_power: config.speed_power_startup,
            direction_control: config.supports_direction(),
        }
    }

    /// Dispatch a command
    pub fn handle(&mut self, command: CutterCommand) -> CommandOutcome {
        match command {
            CutterCommand::PowerOn(cmd) => CommandOutcome::PowerOn(self.power_on(cmd)),
            CutterCommand::PowerOff(cmd) => CommandOutcome::PowerOff(self.power_off(cmd)),
        }
    }

    /// Power on (M3/M4)
    pub fn power_on(&mut self, cmd: PowerOn) -> PowerOnOutcome {
        let drained = !self.state.mode.is_inline();
        if drained {
            self.bridge.drain();
        }

        if let Some(event) = cmd.mode_event() {
            self.state.handle_event(event);
        }

        let unit_power = match cmd.power {
            Some(requested) => {
                let clamped = self.converter.power_to_range(requested);
                self.state.set_unit_power(clamped);
                clamped
            }
            None if !self.state.mode.is_inline() => {
                let startup = self.converter.cpwr_to_upwr(self.startup_power);
                self.state.set_unit_power(startup);
                startup
            }
            // Inline modes keep the last commanded power
            None => self.state.unit_power,
        };

        let hw_power = self.converter.unit_to_hardware(unit_power);
        let route = self.bridge.route(&mut self.state, hw_power);

        if !self.state.mode.is_inline() {
            self.state.enabled = hw_power > 0;
            if self.direction_control {
                self.state.reverse = cmd.reverse;
                self.bridge.write_reverse(cmd.reverse);
            }
        }

        PowerOnOutcome {
            drained,
            mode: self.state.mode,
            unit_power,
            route,
        }
    }

    /// Power off (M5)
    ///
    /// Always waits for queued motion, so the tool is off when this returns.
    pub fn power_off(&mut self, cmd: PowerOff) -> PowerOffOutcome {
        self.bridge.drain();

        match cmd.mode_event() {
            Some(event) => {
                self.state.handle_event(event);
                self.state.inline_power = None;
            }
            None => {
                if let Some(inline) = self.state.inline_power.as_mut() {
                    *inline = 0;
                }
            }
        }

        self.bridge.write_immediate(0);
        if !self.state.mode.is_inline() {
            self.state.enabled = false;
        }

        PowerOffOutcome {
            mode: self.state.mode,
            cleared: cmd.inline_clear,
        }
    }

    /// Queue a move stamped with the current cutter state
    pub fn queue_move(&mut self, feedrate: f32, duration_us: u32) {
        let block = Block::Move(MoveBlock {
            feedrate,
            duration_us,
            laser: self.stamp(),
        });
        self.bridge.queue_mut().enqueue(block);
    }

    /// Cutter stamp for a move queued now
    pub fn stamp(&self) -> LaserStamp {
        LaserStamp {
            mode: self.state.mode,
            enabled: self.state.enabled,
            power: self.state.inline_power,
        }
    }

    pub fn state(&self) -> &CutterState {
        &self.state
    }

    pub fn mode(&self) -> CutterMode {
        self.state.mode
    }

    /// Power shown to the user, in host units
    pub fn menu_power(&self) -> f32 {
        self.state.menu_power
    }

    /// Latched hardware power
    pub fn hw_power(&self) -> u8 {
        self.bridge.latch().power()
    }

    /// Latched hardware power converted back to host units
    pub fn hw_power_readback(&self) -> f32 {
        self.converter.hardware_to_unit(self.hw_power())
    }

    pub fn converter(&self) -> &PowerConverter {
        &self.converter
    }

    pub fn queue(&self) -> &Q {
        self.bridge.queue()
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        self.bridge.queue_mut()
    }
}
