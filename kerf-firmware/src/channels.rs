//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use kerf_protocol::{ControllerMessage, HostMessage};

/// Channel capacity for host messages
const HOST_CHANNEL_SIZE: usize = 8;

/// Channel capacity for replies
const REPLY_CHANNEL_SIZE: usize = 8;

/// Messages decoded from the host link
pub static HOST_COMMANDS: Channel<CriticalSectionRawMutex, HostMessage, HOST_CHANNEL_SIZE> =
    Channel::new();

/// Replies waiting to be sent to the host
pub static REPLIES: Channel<CriticalSectionRawMutex, ControllerMessage, REPLY_CHANNEL_SIZE> =
    Channel::new();

/// Signal that the latched power or direction changed outside the queue
///
/// Raised by the cutter task after an immediate write so the motion task
/// refreshes the output without waiting for its idle tick.
pub static OUTPUT_DIRTY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Motion ring size (holds one block less)
pub const MOTION_QUEUE_SIZE: usize = 32;
