//! Lock-free motion queue split between the command context (producer) and
//! the real-time motion executor (consumer)
//!
//! The queue itself is a `heapless` SPSC ring. Draining additionally needs
//! to know when the block the consumer took last has finished, so both ends
//! share a [`BlockProgress`]: the producer counts what it queued, the
//! consumer counts what it completed, and the queue is drained when the two
//! agree.

use heapless::spsc::{Consumer, Producer, Queue};
use portable_atomic::{AtomicU32, Ordering};

use super::block::Block;
use super::executor::BlockExecutor;
use super::queue::MotionQueue;

/// Completed-block counter shared by both ends
#[derive(Debug)]
pub struct BlockProgress {
    completed: AtomicU32,
}

impl BlockProgress {
    pub const fn new() -> Self {
        Self {
            completed: AtomicU32::new(0),
        }
    }

    fn completed(&self) -> u32 {
        self.completed.load(Ordering::Acquire)
    }

    // Single writer (the consumer), so load + store is enough
    fn complete_one(&self) {
        let next = self.completed.load(Ordering::Relaxed).wrapping_add(1);
        self.completed.store(next, Ordering::Release);
    }
}

impl Default for BlockProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a queue into the producer and consumer ends
///
/// The ring holds `N - 1` blocks.
pub fn split<'a, const N: usize>(
    queue: &'a mut Queue<Block, N>,
    progress: &'a BlockProgress,
    executor: BlockExecutor<'a>,
) -> (BlockProducer<'a, N>, BlockConsumer<'a, N>) {
    let (producer, consumer) = queue.split();
    let queued = progress.completed();

    (
        BlockProducer {
            inner: producer,
            progress,
            queued,
        },
        BlockConsumer {
            inner: consumer,
            progress,
            executor,
            in_flight: false,
        },
    )
}

/// Command-context end of the queue
pub struct BlockProducer<'a, const N: usize> {
    inner: Producer<'a, Block, N>,
    progress: &'a BlockProgress,
    queued: u32,
}

impl<const N: usize> BlockProducer<'_, N> {
    /// Try to append without waiting
    pub fn try_enqueue(&mut self, block: Block) -> Result<(), Block> {
        self.inner.enqueue(block)?;
        self.queued = self.queued.wrapping_add(1);
        Ok(())
    }

    /// Check if the ring has space
    pub fn ready(&self) -> bool {
        self.inner.ready()
    }

    /// Blocks queued or executing
    pub fn pending(&self) -> u32 {
        self.queued.wrapping_sub(self.progress.completed())
    }
}

impl<const N: usize> MotionQueue for BlockProducer<'_, N> {
    fn enqueue(&mut self, block: Block) {
        let mut block = block;
        while let Err(rejected) = self.try_enqueue(block) {
            block = rejected;
            core::hint::spin_loop();
        }
    }

    fn synchronize(&mut self) {
        while !self.is_drained() {
            core::hint::spin_loop();
        }
    }

    fn is_drained(&self) -> bool {
        self.progress.completed() == self.queued
    }
}

/// Executor-context end of the queue
pub struct BlockConsumer<'a, const N: usize> {
    inner: Consumer<'a, Block, N>,
    progress: &'a BlockProgress,
    executor: BlockExecutor<'a>,
    in_flight: bool,
}

impl<'a, const N: usize> BlockConsumer<'a, N> {
    /// Take the next block and apply its cutter effect
    ///
    /// The block counts as executing until [`finish`](Self::finish) or the
    /// next `begin`. Returns the block with the hardware value to drive.
    pub fn begin(&mut self) -> Option<(Block, u8)> {
        self.finish();

        let block = self.inner.dequeue()?;
        self.in_flight = true;
        let output = self.executor.execute(&block);
        Some((block, output))
    }

    /// Mark the current block complete
    pub fn finish(&mut self) {
        if self.in_flight {
            self.in_flight = false;
            self.progress.complete_one();
        }
    }

    /// Execute one block to completion
    pub fn poll(&mut self) -> Option<Block> {
        let (block, _) = self.begin()?;
        self.finish();
        Some(block)
    }

    /// Check if a block is executing
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn executor(&self) -> &BlockExecutor<'a> {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CutterConfig;
    use crate::motion::SyncFlag;
    use crate::power::PowerConverter;
    use crate::sync::PowerLatch;

    fn executor(latch: &PowerLatch) -> BlockExecutor<'_> {
        BlockExecutor::new(latch, PowerConverter::new(&CutterConfig::laser()))
    }

    #[test]
    fn test_drain_waits_for_in_flight_block() {
        let latch = PowerLatch::new();
        let progress = BlockProgress::new();
        let mut ring: Queue<Block, 4> = Queue::new();
        let (mut producer, mut consumer) = split(&mut ring, &progress, executor(&latch));

        assert!(producer.is_drained());
        producer.enqueue_flagged(SyncFlag::CutterPower(40));
        assert!(!producer.is_drained());
        assert_eq!(producer.pending(), 1);

        // Dequeued but still executing
        let (block, output) = consumer.begin().unwrap();
        assert_eq!(block, Block::Sync(SyncFlag::CutterPower(40)));
        assert_eq!(output, 40);
        assert!(consumer.is_busy());
        assert!(!producer.is_drained());

        consumer.finish();
        assert!(producer.is_drained());
        assert_eq!(producer.pending(), 0);
    }

    #[test]
    fn test_begin_finishes_previous_block() {
        let latch = PowerLatch::new();
        let progress = BlockProgress::new();
        let mut ring: Queue<Block, 4> = Queue::new();
        let (mut producer, mut consumer) = split(&mut ring, &progress, executor(&latch));

        producer.enqueue_flagged(SyncFlag::CutterPower(1));
        producer.enqueue_flagged(SyncFlag::CutterPower(2));

        assert!(consumer.begin().is_some());
        assert!(consumer.begin().is_some());
        assert_eq!(producer.pending(), 1);

        // Nothing left: the last block is finished on the way out
        assert!(consumer.begin().is_none());
        assert!(!consumer.is_busy());
        assert!(producer.is_drained());
        assert_eq!(latch.power(), 2);
    }

    #[test]
    fn test_try_enqueue_full() {
        let latch = PowerLatch::new();
        let progress = BlockProgress::new();
        let mut ring: Queue<Block, 3> = Queue::new();
        let (mut producer, mut consumer) = split(&mut ring, &progress, executor(&latch));

        let marker = Block::Sync(SyncFlag::CutterPower(9));
        assert!(producer.try_enqueue(marker).is_ok());
        assert!(producer.try_enqueue(marker).is_ok());
        assert!(!producer.ready());
        assert_eq!(producer.try_enqueue(marker), Err(marker));
        assert_eq!(producer.pending(), 2);

        assert!(consumer.poll().is_some());
        assert!(producer.ready());
    }
}
