//! Latched hardware power shared by the command context and the motion
//! executor

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// Latched cutter power
///
/// `power` is the commanded hardware value. `output` is what the output
/// driver should apply right now; it only differs from `power` while a
/// DYNAMIC move scales it by feedrate.
///
/// Writers never overlap: the command context writes only while the motion
/// queue is drained, the executor writes only inside its dequeue step.
#[derive(Debug)]
pub struct PowerLatch {
    power: AtomicU8,
    output: AtomicU8,
    reverse: AtomicBool,
}

impl PowerLatch {
    /// Create a latch with the tool off
    pub const fn new() -> Self {
        Self {
            power: AtomicU8::new(0),
            output: AtomicU8::new(0),
            reverse: AtomicBool::new(false),
        }
    }

    /// Commanded hardware power
    pub fn power(&self) -> u8 {
        self.power.load(Ordering::Acquire)
    }

    /// Hardware value for the output driver
    pub fn output(&self) -> u8 {
        self.output.load(Ordering::Acquire)
    }

    /// Latch a new hardware power, applied unscaled
    pub fn store(&self, hw_power: u8) {
        self.power.store(hw_power, Ordering::Release);
        self.output.store(hw_power, Ordering::Release);
    }

    /// Set the commanded power, leaving the output as it is
    pub fn store_power(&self, hw_power: u8) {
        self.power.store(hw_power, Ordering::Release);
    }

    /// Set the output without changing the commanded power
    pub fn store_output(&self, hw_value: u8) {
        self.output.store(hw_value, Ordering::Release);
    }

    /// Counter-clockwise rotation requested
    pub fn reverse(&self) -> bool {
        self.reverse.load(Ordering::Acquire)
    }

    pub fn set_reverse(&self, reverse: bool) {
        self.reverse.store(reverse, Ordering::Release);
    }
}

impl Default for PowerLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_sets_output() {
        let latch = PowerLatch::new();
        assert_eq!(latch.power(), 0);
        assert_eq!(latch.output(), 0);

        latch.store(200);
        assert_eq!(latch.power(), 200);
        assert_eq!(latch.output(), 200);
    }

    #[test]
    fn test_scaled_output_keeps_power() {
        let latch = PowerLatch::new();
        latch.store(200);
        latch.store_output(50);
        assert_eq!(latch.power(), 200);
        assert_eq!(latch.output(), 50);
    }

    #[test]
    fn test_store_power_keeps_output() {
        let latch = PowerLatch::new();
        latch.store(40);
        latch.store_power(180);
        assert_eq!(latch.power(), 180);
        assert_eq!(latch.output(), 40);
    }

    #[test]
    fn test_reverse_flag() {
        let latch = PowerLatch::default();
        assert!(!latch.reverse());
        latch.set_reverse(true);
        assert!(latch.reverse());
    }
}
