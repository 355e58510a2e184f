//! Motion queue contract and a cooperative implementation

use heapless::Deque;

use super::block::{Block, SyncFlag};
use super::executor::BlockExecutor;

/// What the cutter needs from the motion queue
pub trait MotionQueue {
    /// Append a block, waiting for space if the queue is full
    fn enqueue(&mut self, block: Block);

    /// Append a flagged marker, in FIFO order with moves
    fn enqueue_flagged(&mut self, flag: SyncFlag) {
        self.enqueue(Block::Sync(flag));
    }

    /// Block until every queued block has finished executing
    fn synchronize(&mut self);

    /// Check if nothing is queued or executing
    fn is_drained(&self) -> bool;
}

impl<Q: MotionQueue + ?Sized> MotionQueue for &mut Q {
    fn enqueue(&mut self, block: Block) {
        (**self).enqueue(block)
    }

    fn enqueue_flagged(&mut self, flag: SyncFlag) {
        (**self).enqueue_flagged(flag)
    }

    fn synchronize(&mut self) {
        (**self).synchronize()
    }

    fn is_drained(&self) -> bool {
        (**self).is_drained()
    }
}

/// Single-context motion queue
///
/// Producer and executor share one context: waiting for space or for a
/// drain runs the executor in place. Used on the host and in tests.
pub struct BlockQueue<'a, const N: usize> {
    blocks: Deque<Block, N>,
    executor: BlockExecutor<'a>,
}

impl<'a, const N: usize> BlockQueue<'a, N> {
    pub fn new(executor: BlockExecutor<'a>) -> Self {
        Self {
            blocks: Deque::new(),
            executor,
        }
    }

    /// Execute the oldest block
    pub fn step(&mut self) -> Option<Block> {
        let block = self.blocks.pop_front()?;
        self.executor.execute(&block);
        Some(block)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn executor(&self) -> &BlockExecutor<'a> {
        &self.executor
    }
}

impl<const N: usize> MotionQueue for BlockQueue<'_, N> {
    fn enqueue(&mut self, block: Block) {
        let mut block = block;
        loop {
            match self.blocks.push_back(block) {
                Ok(()) => return,
                Err(rejected) => {
                    block = rejected;
                    if self.step().is_none() {
                        // Zero capacity: nothing can ever be buffered
                        self.executor.execute(&block);
                        return;
                    }
                }
            }
        }
    }

    fn synchronize(&mut self) {
        while self.step().is_some() {}
    }

    fn is_drained(&self) -> bool {
        self.blocks.is_empty()
    }
}
