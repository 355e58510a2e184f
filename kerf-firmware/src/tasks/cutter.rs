//! Cutter command task
//!
//! Owns the cutter and the producer end of the motion queue. Host messages
//! are turned into power-on/power-off commands and queued moves; every
//! message is answered with an ACK, NAK, status report or PONG.

use defmt::*;
use embassy_time::Timer;

use kerf_core::command::{CommandOutcome, Cutter, CutterCommand, PowerOff, PowerOn};
use kerf_core::motion::{BlockProducer, MotionQueue};
use kerf_protocol::messages::{MSG_MOVE, MSG_POWER_OFF, MSG_POWER_ON};
use kerf_protocol::{ControllerMessage, HostMessage, StatusReport};

use crate::channels::{HOST_COMMANDS, MOTION_QUEUE_SIZE, OUTPUT_DIRTY, REPLIES};

/// Producer end as seen by the cutter
pub type CutterQueue = BlockProducer<'static, MOTION_QUEUE_SIZE>;

/// Poll interval while waiting on the motion task
const QUEUE_POLL_US: u64 = 100;

/// Cutter task - applies host commands to the cutter
#[embassy_executor::task]
pub async fn cutter_task(mut cutter: Cutter<'static, CutterQueue>) {
    info!("Cutter task started");

    loop {
        let msg = HOST_COMMANDS.receive().await;

        let reply = match msg {
            HostMessage::PowerOn {
                reverse,
                inline,
                power,
            } => {
                let mut cmd = if reverse {
                    PowerOn::reverse(power)
                } else {
                    PowerOn::forward(power)
                };
                if inline {
                    cmd = cmd.inline();
                }

                // Inline power changes never wait for motion
                if !cutter.mode().is_inline() {
                    wait_drained(&cutter).await;
                }
                run(&mut cutter, CutterCommand::PowerOn(cmd));
                ControllerMessage::Ack {
                    msg_type: MSG_POWER_ON,
                }
            }
            HostMessage::PowerOff { inline_clear } => {
                wait_drained(&cutter).await;
                run(&mut cutter, CutterCommand::PowerOff(PowerOff { inline_clear }));
                ControllerMessage::Ack {
                    msg_type: MSG_POWER_OFF,
                }
            }
            HostMessage::Move {
                feedrate,
                duration_us,
            } => {
                if duration_us == 0 || !(feedrate > 0.0) {
                    warn!("Rejecting move: feedrate={} duration={}us", feedrate, duration_us);
                    ControllerMessage::Nak { msg_type: MSG_MOVE }
                } else {
                    while !cutter.queue().ready() {
                        Timer::after_micros(QUEUE_POLL_US).await;
                    }
                    cutter.queue_move(feedrate, duration_us);
                    trace!("Queued move, {} pending", cutter.queue().pending());
                    ControllerMessage::Ack { msg_type: MSG_MOVE }
                }
            }
            HostMessage::StatusRequest => ControllerMessage::Status(status(&cutter)),
            HostMessage::Ping => ControllerMessage::Pong,
        };

        REPLIES.send(reply).await;
    }
}

fn run(cutter: &mut Cutter<'static, CutterQueue>, command: CutterCommand) {
    match cutter.handle(command) {
        CommandOutcome::PowerOn(outcome) => {
            info!(
                "Power on: mode={:?} power={} route={:?}",
                outcome.mode, outcome.unit_power, outcome.route
            );
        }
        CommandOutcome::PowerOff(outcome) => {
            info!("Power off: mode={:?} cleared={}", outcome.mode, outcome.cleared);
        }
    }

    OUTPUT_DIRTY.signal(());
}

/// Wait for queued motion without blocking the executor
///
/// The handlers drain too, but by then nothing is left and they return at
/// once.
async fn wait_drained(cutter: &Cutter<'static, CutterQueue>) {
    if !cutter.queue().is_drained() {
        debug!("Waiting for {} blocks", cutter.queue().pending());
    }
    while !cutter.queue().is_drained() {
        Timer::after_micros(QUEUE_POLL_US).await;
    }
}

fn status(cutter: &Cutter<'static, CutterQueue>) -> StatusReport {
    let state = cutter.state();
    StatusReport {
        mode: state.mode.as_u8(),
        enabled: state.enabled,
        reverse: state.reverse,
        menu_power: cutter.menu_power(),
        hw_power: cutter.hw_power(),
    }
}
