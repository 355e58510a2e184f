//! Motion queue entries

use crate::state::CutterMode;

/// Cutter state captured when a move is queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaserStamp {
    /// Mode at queue time
    pub mode: CutterMode,
    /// Tool enabled at queue time
    pub enabled: bool,
    /// Inline power; `None` keeps the latched power (power-sync markers)
    pub power: Option<u8>,
}

/// A queued linear move
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveBlock {
    /// Nominal feedrate in mm/min
    pub feedrate: f32,
    /// Execution time in microseconds
    pub duration_us: u32,
    /// Cutter stamp
    pub laser: LaserStamp,
}

/// Flagged non-motion entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncFlag {
    /// Set the latched cutter power
    CutterPower(u8),
    /// Set the DYNAMIC base power; the next move scales it
    DynamicPower(u8),
}

/// Motion queue entry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Block {
    Move(MoveBlock),
    Sync(SyncFlag),
}

impl Block {
    /// Check if this entry moves the machine
    pub fn is_move(&self) -> bool {
        matches!(self, Block::Move(_))
    }

    /// Time the executor spends on this entry
    pub fn duration_us(&self) -> u32 {
        match self {
            Block::Move(block) => block.duration_us,
            Block::Sync(_) => 0,
        }
    }
}
