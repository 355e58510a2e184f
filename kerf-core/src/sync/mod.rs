//! Power/motion synchronization
//!
//! Orders power changes against queued motion. A change is either written
//! to the latch once the queue has drained, stamped onto future moves, or
//! queued as a marker between moves.

pub mod bridge;
pub mod latch;

pub use bridge::{PowerRoute, SyncBridge, SyncPolicy};
pub use latch::PowerLatch;
