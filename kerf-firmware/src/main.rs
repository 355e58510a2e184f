//! Kerf - Cutter Power Control Firmware
//!
//! Firmware binary for RP2040-based motion controllers driving a spindle
//! or laser. The host sends power-on/power-off commands and moves over
//! UART; power changes are ordered against motion by the kerf-core
//! synchronization bridge.
//!
//! Two executors share the work:
//! - Thread mode: host link and the cutter command task
//! - SWI_IRQ_1: the motion task, which owns the cutter output

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use heapless::spsc::Queue;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kerf_core::command::Cutter;
use kerf_core::motion::{split, Block, BlockExecutor, BlockProgress};
use kerf_core::power::PowerConverter;
use kerf_core::sync::PowerLatch;

use crate::channels::MOTION_QUEUE_SIZE;
use crate::output::{BoardOutput, OutputPins};

mod channels;
mod config;
mod output;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// High-priority executor for block execution
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Shared between the cutter task and the motion task
static LATCH: PowerLatch = PowerLatch::new();
static PROGRESS: BlockProgress = BlockProgress::new();

// Static cells for buffers (must live forever)
static MOTION_QUEUE: StaticCell<Queue<Block, MOTION_QUEUE_SIZE>> = StaticCell::new();
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Kerf firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_config();

    // Output starts off; the motion task owns it from here on
    let output = BoardOutput::new(
        &config,
        OutputPins {
            slice: p.PWM_SLICE2,
            pwm: p.PIN_20,
            enable: p.PIN_21,
            direction: p.PIN_22,
        },
    );

    // Motion queue: producer for the cutter, consumer for the motion task
    let queue = MOTION_QUEUE.init(Queue::new());
    let executor = BlockExecutor::new(&LATCH, PowerConverter::new(&config));
    let (producer, consumer) = split(queue, &PROGRESS, executor);
    let cutter = Cutter::new(&config, producer, &LATCH);
    info!("Motion queue ready ({} blocks)", MOTION_QUEUE_SIZE - 1);

    // Setup UART for host communication
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host communication");

    // Motion runs above the thread executor so command handling (which may
    // wait for the queue) never delays a block
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner.spawn(tasks::motion_task(consumer, output)).unwrap();

    spawner.spawn(tasks::host_rx_task(rx)).unwrap();
    spawner.spawn(tasks::host_tx_task(tx)).unwrap();
    spawner.spawn(tasks::cutter_task(cutter)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
