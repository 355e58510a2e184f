//! Motion execution task
//!
//! Runs on the high-priority executor. Takes blocks off the queue, applies
//! each block's cutter effect to the output for the block's duration, and
//! while idle keeps the output in step with immediate latch writes.

use defmt::*;
use embassy_futures::select::select;
use embassy_time::Timer;

use kerf_core::motion::BlockConsumer;
use kerf_core::traits::{CutterOutput, Direction};

use crate::channels::{MOTION_QUEUE_SIZE, OUTPUT_DIRTY};
use crate::output::BoardOutput;

/// Consumer end owned by the motion task
pub type MotionConsumer = BlockConsumer<'static, MOTION_QUEUE_SIZE>;

/// Idle latch poll interval (10 kHz)
const IDLE_POLL_US: u64 = 100;

/// Motion task - executes queued blocks and drives the cutter output
#[embassy_executor::task]
pub async fn motion_task(mut consumer: MotionConsumer, mut output: BoardOutput) {
    info!("Motion task started");

    let latch = consumer.executor().latch();
    let mut blocks: u32 = 0;

    loop {
        match consumer.begin() {
            Some((block, hw_power)) => {
                drive(&mut output, hw_power, latch.reverse());

                if block.is_move() {
                    Timer::after_micros(block.duration_us() as u64).await;
                }
                consumer.finish();

                blocks = blocks.wrapping_add(1);
                trace!("Block {} done, output={}", blocks, hw_power);
            }
            None => {
                drive(&mut output, latch.output(), latch.reverse());
                select(OUTPUT_DIRTY.wait(), Timer::after_micros(IDLE_POLL_US)).await;
            }
        }
    }
}

/// Push power and direction to the hardware when they changed
fn drive(output: &mut BoardOutput, hw_power: u8, reverse: bool) {
    let direction = Direction::from_reverse(reverse);
    if output.direction() != direction {
        // Direction before power
        if let Err(e) = output.set_direction(direction) {
            warn!("Failed to set direction: {:?}", e);
        }
    }

    if output.power() != hw_power {
        if let Err(e) = output.apply(hw_power) {
            warn!("Failed to apply power {}: {:?}", hw_power, e);
        } else {
            debug!("Output power {}", hw_power);
        }
    }
}
