//! Motion synchronization bridge

use super::latch::PowerLatch;
use crate::motion::{MotionQueue, SyncFlag};
use crate::state::{CutterMode, CutterState};

/// How inline power changes reach the motion executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncPolicy {
    /// Update the running inline power stamped onto future moves
    Direct,
    /// Queue a power marker between moves
    Markers,
}

impl SyncPolicy {
    /// Policy for the configured power-sync flag
    pub fn from_power_sync(power_sync: bool) -> Self {
        if power_sync {
            SyncPolicy::Markers
        } else {
            SyncPolicy::Direct
        }
    }
}

/// Path a power change took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerRoute {
    /// Written to the latch after the queue drained
    Immediate(u8),
    /// Stamped onto moves queued from now on
    Inline(u8),
    /// Queued as a marker after the already queued moves
    SyncMarker(u8),
}

/// Routes hardware power to the latch or the motion queue
pub struct SyncBridge<'a, Q: MotionQueue> {
    queue: Q,
    latch: &'a PowerLatch,
    policy: SyncPolicy,
}

impl<'a, Q: MotionQueue> SyncBridge<'a, Q> {
    pub fn new(queue: Q, latch: &'a PowerLatch, policy: SyncPolicy) -> Self {
        Self {
            queue,
            latch,
            policy,
        }
    }

    pub fn latch(&self) -> &'a PowerLatch {
        self.latch
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// Block until all queued motion has executed
    pub fn drain(&mut self) {
        self.queue.synchronize();
    }

    /// Write the latch directly. The queue must be drained.
    pub fn write_immediate(&mut self, hw_power: u8) {
        debug_assert!(
            self.queue.is_drained(),
            "immediate power write with motion queued"
        );
        self.latch.store(hw_power);
    }

    /// Set the direction output. The queue must be drained.
    pub fn write_reverse(&mut self, reverse: bool) {
        debug_assert!(self.queue.is_drained(), "direction change with motion queued");
        self.latch.set_reverse(reverse);
    }

    /// Route a hardware power according to the current mode
    pub fn route(&mut self, state: &mut CutterState, hw_power: u8) -> PowerRoute {
        if !state.mode.is_inline() {
            self.write_immediate(hw_power);
            return PowerRoute::Immediate(hw_power);
        }

        match self.policy {
            SyncPolicy::Direct => {
                state.inline_power = Some(hw_power);
                PowerRoute::Inline(hw_power)
            }
            SyncPolicy::Markers => {
                let flag = match state.mode {
                    CutterMode::Dynamic => SyncFlag::DynamicPower(hw_power),
                    _ => SyncFlag::CutterPower(hw_power),
                };
                self.queue.enqueue_flagged(flag);
                PowerRoute::SyncMarker(hw_power)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Block, BlockExecutor, BlockQueue};
    use crate::config::CutterConfig;
    use crate::power::PowerConverter;

    fn executor(latch: &PowerLatch) -> BlockExecutor<'_> {
        BlockExecutor::new(latch, PowerConverter::new(&CutterConfig::laser()))
    }

    #[test]
    fn test_standard_writes_latch() {
        let latch = PowerLatch::new();
        let queue: BlockQueue<'_, 8> = BlockQueue::new(executor(&latch));
        let mut bridge = SyncBridge::new(queue, &latch, SyncPolicy::Markers);
        let mut state = CutterState::new();

        let route = bridge.route(&mut state, 120);
        assert_eq!(route, PowerRoute::Immediate(120));
        assert_eq!(latch.power(), 120);
        assert!(bridge.queue().is_empty());
    }

    #[test]
    fn test_inline_direct_updates_state() {
        let latch = PowerLatch::new();
        let queue: BlockQueue<'_, 8> = BlockQueue::new(executor(&latch));
        let mut bridge = SyncBridge::new(queue, &latch, SyncPolicy::Direct);
        let mut state = CutterState::new();
        state.mode = CutterMode::Continuous;

        let route = bridge.route(&mut state, 77);
        assert_eq!(route, PowerRoute::Inline(77));
        assert_eq!(state.inline_power, Some(77));
        assert_eq!(latch.power(), 0);
        assert!(bridge.queue().is_empty());
    }

    #[test]
    fn test_inline_markers_enqueue() {
        let latch = PowerLatch::new();
        let queue: BlockQueue<'_, 8> = BlockQueue::new(executor(&latch));
        let mut bridge = SyncBridge::new(queue, &latch, SyncPolicy::Markers);
        let mut state = CutterState::new();
        state.mode = CutterMode::Dynamic;

        let route = bridge.route(&mut state, 33);
        assert_eq!(route, PowerRoute::SyncMarker(33));
        assert_eq!(state.inline_power, None);
        assert_eq!(latch.power(), 0);
        assert_eq!(
            bridge.queue_mut().step(),
            Some(Block::Sync(SyncFlag::DynamicPower(33)))
        );
        assert_eq!(latch.power(), 33);
        // Nothing moves yet, so nothing is driven
        assert_eq!(latch.output(), 0);

        state.mode = CutterMode::Continuous;
        bridge.route(&mut state, 44);
        assert_eq!(
            bridge.queue_mut().step(),
            Some(Block::Sync(SyncFlag::CutterPower(44)))
        );
        assert_eq!(latch.output(), 44);
    }

    #[test]
    fn test_policy_from_flag() {
        assert_eq!(SyncPolicy::from_power_sync(true), SyncPolicy::Markers);
        assert_eq!(SyncPolicy::from_power_sync(false), SyncPolicy::Direct);
    }
}
