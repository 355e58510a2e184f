//! Motion queue contract and block execution
//!
//! The planner itself lives outside this crate. What the cutter needs from
//! it is a FIFO of blocks, a way to wait for it to drain, and the rule the
//! real-time consumer applies to each block it dequeues.

pub mod block;
pub mod executor;
pub mod queue;
pub mod spsc;

pub use block::{Block, LaserStamp, MoveBlock, SyncFlag};
pub use executor::BlockExecutor;
pub use queue::{BlockQueue, MotionQueue};
pub use spsc::{split, BlockConsumer, BlockProducer, BlockProgress};
