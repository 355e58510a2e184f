//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.
//! The motion task runs on the high-priority interrupt executor, the rest
//! on the thread executor.

pub mod cutter;
pub mod host_rx;
pub mod host_tx;
pub mod motion;

pub use cutter::cutter_task;
pub use host_rx::host_rx_task;
pub use host_tx::host_tx_task;
pub use motion::motion_task;
