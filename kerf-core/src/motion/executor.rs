//! Consumer-side block rule
//!
//! Runs once for every dequeued block, before the block's motion starts:
//!
//! | Entry                  | Latch effect                                 |
//! |------------------------|----------------------------------------------|
//! | power marker           | latch the marker power                       |
//! | DYNAMIC power marker   | latch the base power, output untouched       |
//! | STANDARD move          | none                                         |
//! | inline move, disabled  | latch zero                                   |
//! | CONTINUOUS move        | latch the stamped power, if any              |
//! | DYNAMIC move           | output = power scaled by the move's feedrate |

use super::block::{Block, MoveBlock, SyncFlag};
use crate::power::PowerConverter;
use crate::state::CutterMode;
use crate::sync::PowerLatch;

/// Applies block stamps and markers to the power latch
#[derive(Debug, Clone, Copy)]
pub struct BlockExecutor<'a> {
    latch: &'a PowerLatch,
    converter: PowerConverter,
}

impl<'a> BlockExecutor<'a> {
    pub fn new(latch: &'a PowerLatch, converter: PowerConverter) -> Self {
        Self { latch, converter }
    }

    pub fn latch(&self) -> &'a PowerLatch {
        self.latch
    }

    /// Apply a block; returns the hardware value to drive during it
    pub fn execute(&self, block: &Block) -> u8 {
        match block {
            Block::Sync(SyncFlag::CutterPower(hw)) => self.latch.store(*hw),
            Block::Sync(SyncFlag::DynamicPower(hw)) => self.latch.store_power(*hw),
            Block::Move(block) => self.execute_move(block),
        }
        self.latch.output()
    }

    fn execute_move(&self, block: &MoveBlock) {
        let stamp = block.laser;

        if !stamp.mode.is_inline() {
            return;
        }

        if !stamp.enabled {
            self.latch.store(0);
            return;
        }

        if let Some(hw) = stamp.power {
            self.latch.store(hw);
        }

        let base = self.latch.power();
        let output = match stamp.mode {
            CutterMode::Dynamic => self.converter.dynamic_power(base, block.feedrate),
            _ => base,
        };
        self.latch.store_output(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CutterConfig;
    use crate::motion::LaserStamp;

    fn move_block(mode: CutterMode, enabled: bool, power: Option<u8>, feedrate: f32) -> Block {
        Block::Move(MoveBlock {
            feedrate,
            duration_us: 1000,
            laser: LaserStamp {
                mode,
                enabled,
                power,
            },
        })
    }

    fn executor(latch: &PowerLatch) -> BlockExecutor<'_> {
        BlockExecutor::new(latch, PowerConverter::new(&CutterConfig::laser()))
    }

    #[test]
    fn test_marker_latches_power() {
        let latch = PowerLatch::new();
        let exec = executor(&latch);

        assert_eq!(exec.execute(&Block::Sync(SyncFlag::CutterPower(90))), 90);
        assert_eq!(latch.power(), 90);
    }

    #[test]
    fn test_dynamic_marker_waits_for_motion() {
        let latch = PowerLatch::new();
        let exec = executor(&latch);

        exec.execute(&move_block(CutterMode::Dynamic, true, Some(200), 3000.0));
        assert_eq!(latch.output(), 100);

        // Stationary after the marker: the scaled output stays
        assert_eq!(exec.execute(&Block::Sync(SyncFlag::DynamicPower(250))), 100);
        assert_eq!(latch.power(), 250);

        // A near-stationary move scales the new base to zero
        assert_eq!(
            exec.execute(&move_block(CutterMode::Dynamic, true, None, 1.0)),
            0
        );
        assert_eq!(exec.execute(&Block::Sync(SyncFlag::DynamicPower(200))), 0);

        assert_eq!(
            exec.execute(&move_block(CutterMode::Dynamic, true, None, 6000.0)),
            200
        );
    }

    #[test]
    fn test_standard_move_leaves_latch() {
        let latch = PowerLatch::new();
        latch.store(150);
        let exec = executor(&latch);

        let out = exec.execute(&move_block(CutterMode::Standard, true, Some(10), 1000.0));
        assert_eq!(out, 150);
        assert_eq!(latch.power(), 150);
    }

    #[test]
    fn test_continuous_move_uses_stamp() {
        let latch = PowerLatch::new();
        let exec = executor(&latch);

        assert_eq!(
            exec.execute(&move_block(CutterMode::Continuous, true, Some(64), 100.0)),
            64
        );

        // No stamped power keeps the marker-latched value
        latch.store(128);
        assert_eq!(
            exec.execute(&move_block(CutterMode::Continuous, true, None, 100.0)),
            128
        );
    }

    #[test]
    fn test_disabled_inline_move_forces_zero() {
        let latch = PowerLatch::new();
        latch.store(200);
        let exec = executor(&latch);

        assert_eq!(
            exec.execute(&move_block(CutterMode::Continuous, false, Some(200), 100.0)),
            0
        );
        assert_eq!(latch.power(), 0);
    }

    #[test]
    fn test_dynamic_move_scales_by_feedrate() {
        let latch = PowerLatch::new();
        let exec = executor(&latch);

        // Half of the 6000 mm/min full-power feedrate
        let out = exec.execute(&move_block(CutterMode::Dynamic, true, Some(200), 3000.0));
        assert_eq!(out, 100);
        assert_eq!(latch.power(), 200);

        // The base survives scaling for the next move
        let out = exec.execute(&move_block(CutterMode::Dynamic, true, None, 6000.0));
        assert_eq!(out, 200);

        // A continuous move drops the scaling again
        exec.execute(&move_block(CutterMode::Dynamic, true, None, 1500.0));
        let out = exec.execute(&move_block(CutterMode::Continuous, true, None, 1500.0));
        assert_eq!(out, 200);
    }
}
