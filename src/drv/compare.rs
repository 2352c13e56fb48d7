use crate::{
    source::{counter_add, counter_distance},
    Arm, Tick, TickSource,
};

/// Register access of a general-purpose timer channel in output compare mode.
pub trait CompareRegs: Send {
    /// The counter tick rate.
    type Tick: Tick;

    /// The maximum counter value.
    const MAX: u32;

    /// The timer period.
    const PERIOD: u64 = Self::MAX as u64 + 1;

    /// CPU cycles to wait after writing the compare register before the
    /// counter is sampled again.
    const SETTLE_CYCLES: u32 = 0;

    /// Get the current counter value.
    fn counter(&self) -> u32;

    /// Set the compare register.
    fn set_compare(&mut self, compare: u32);

    /// Enable the compare interrupt.
    fn enable_interrupt(&mut self);

    /// Disable the compare interrupt.
    fn disable_interrupt(&mut self);

    /// Clear the compare interrupt flag.
    fn clear_pending(&mut self);

    /// Busy-wait for approximately `cycles` CPU cycles.
    fn burn_cycles(&self, _cycles: u32) {}
}

/// Output compare tick source.
pub struct CompareDrv<R: CompareRegs> {
    regs: R,
}

impl<R: CompareRegs> CompareDrv<R> {
    pub const fn new(regs: R) -> Self {
        Self { regs }
    }

    pub fn regs(&self) -> &R {
        &self.regs
    }
}

impl<R: CompareRegs> TickSource for CompareDrv<R> {
    type Tick = R::Tick;

    fn period(&self) -> u64 {
        R::PERIOD
    }

    fn counter(&self) -> u32 {
        self.regs.counter()
    }

    fn arm(&mut self, base: u32, delay: u64) -> Arm {
        let compare = counter_add(R::PERIOD, base, delay);
        self.regs.clear_pending();
        self.regs.set_compare(compare);

        // The counter may pass the compare value while the write is in
        // flight, in which case the match never happens.
        self.regs.burn_cycles(R::SETTLE_CYCLES);
        let passed = counter_distance(R::PERIOD, base, self.regs.counter());
        if passed >= 0 && passed as u64 >= delay {
            return Arm::Missed;
        }

        self.regs.enable_interrupt();
        Arm::Armed(delay)
    }

    fn disarm(&mut self) {
        self.regs.disable_interrupt();
        self.regs.clear_pending();
    }
}

#[cfg(test)]
pub mod tests {
    use crate::fakes::{self, FakeHw};

    use super::*;

    #[test]
    fn arm_writes_compare_and_enables() {
        let hw = FakeHw::new();
        let mut drv = fakes::compare(&hw);
        hw.set_time(100);

        assert_eq!(Arm::Armed(50), drv.arm(100, 50));
        assert_eq!(Some(150), hw.armed());
    }

    #[test]
    fn arm_wraps_compare() {
        let hw = FakeHw::new();
        let mut drv = fakes::compare16(&hw);
        hw.set_time(0xFFF0);

        assert_eq!(Arm::Armed(0x20), drv.arm(0xFFF0, 0x20));
        assert_eq!(0x0010, drv.regs().compare());
        assert_eq!(Some(0x1_0010), hw.armed());
    }

    #[test]
    fn arm_missed_while_writing() {
        let hw = FakeHw::new();
        let mut drv = fakes::compare(&hw);
        hw.set_time(100);
        hw.set_write_latency(3);

        assert_eq!(Arm::Missed, drv.arm(100, 2));
        assert_eq!(None, hw.armed());
    }

    #[test]
    fn disarm_is_idempotent() {
        let hw = FakeHw::new();
        let mut drv = fakes::compare(&hw);
        drv.arm(0, 10);

        drv.disarm();
        drv.disarm();

        assert_eq!(None, hw.armed());
    }
}
