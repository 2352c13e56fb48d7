use crate::{radio::PeriodSource, source::counter_distance, Arm, Tick, TickSource};

/// Register access of a symbol counter with beacon timestamp capture, as
/// found on IEEE 802.15.4 SoCs.
pub trait SymbolCounterRegs: Send {
    /// The counter tick rate.
    type Tick: Tick;

    /// Get the raw, free-running counter value.
    fn counter(&self) -> u32;

    /// Get the counter value latched on the last overflow compare match.
    fn beacon_timestamp(&self) -> u32;

    /// Set the compare register used for scheduling.
    fn set_compare(&mut self, raw: u32);

    /// Enable the scheduling compare interrupt.
    fn enable_compare_interrupt(&mut self);

    /// Disable the scheduling compare interrupt.
    fn disable_compare_interrupt(&mut self);

    /// Set the compare register marking the end of the current period.
    fn set_overflow_compare(&mut self, raw: u32);

    /// Enable the period overflow interrupt.
    fn enable_overflow_interrupt(&mut self);

    /// Disable the period overflow interrupt.
    fn disable_overflow_interrupt(&mut self);
}

/// Symbol counter tick source.
///
/// The raw counter never stops. A second compare register marks the end of
/// each period, and the hardware latches the counter into the beacon
/// timestamp register when it matches. The visible counter is the raw
/// counter minus that timestamp, so it appears to restart every period
/// without software ever stopping, reading and restarting the counter.
pub struct SymbolCounterDrv<R: SymbolCounterRegs> {
    regs: R,
    period: u32,
    captured: u32,
}

impl<R: SymbolCounterRegs> SymbolCounterDrv<R> {
    pub const fn new(regs: R, period: u32) -> Self {
        assert!(period > 0);
        Self {
            regs,
            period,
            captured: 0,
        }
    }

    /// Start the period bookkeeping from the current raw counter value.
    pub fn start(&mut self) {
        self.captured = self.regs.counter();
        self.regs
            .set_overflow_compare(self.captured.wrapping_add(self.period));
        self.regs.enable_overflow_interrupt();
    }

    /// Stop the period bookkeeping. The raw counter keeps running.
    pub fn stop(&mut self) {
        self.regs.disable_overflow_interrupt();
        self.regs.disable_compare_interrupt();
    }

    /// Handle the period overflow interrupt.
    pub fn overflow(&mut self) {
        self.captured = self.regs.beacon_timestamp();
        self.regs
            .set_overflow_compare(self.captured.wrapping_add(self.period));
    }

    /// Ticks elapsed since the last period overflow.
    pub fn value(&self) -> u32 {
        self.regs.counter().wrapping_sub(self.captured) % self.period
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Change the period. The current period ends at `captured + period`.
    pub fn set_period(&mut self, period: u32) {
        assert!(period > 0);
        self.period = period;
        self.regs
            .set_overflow_compare(self.captured.wrapping_add(period));
    }

    /// The raw counter value latched on the last overflow.
    pub fn captured(&self) -> u32 {
        self.captured
    }

    fn arm_raw(&mut self, base: u32, delay: u64) -> Arm {
        let raw_now = self.regs.counter();
        let now = raw_now.wrapping_sub(self.captured) % self.period;
        let ahead = counter_distance(self.period as u64, now, base) + delay as i64;
        if ahead <= 0 {
            return Arm::Missed;
        }

        self.regs.set_compare(raw_now.wrapping_add(ahead as u32));
        self.regs.enable_compare_interrupt();
        if self.regs.counter().wrapping_sub(raw_now) as i64 >= ahead {
            self.regs.disable_compare_interrupt();
            return Arm::Missed;
        }
        Arm::Armed(delay)
    }
}

impl<R: SymbolCounterRegs> TickSource for SymbolCounterDrv<R> {
    type Tick = R::Tick;

    fn period(&self) -> u64 {
        self.period as u64
    }

    fn counter(&self) -> u32 {
        self.value()
    }

    fn arm(&mut self, base: u32, delay: u64) -> Arm {
        self.arm_raw(base, delay)
    }

    fn disarm(&mut self) {
        self.regs.disable_compare_interrupt();
    }
}

impl<R: SymbolCounterRegs> PeriodSource for SymbolCounterDrv<R> {
    fn start(&mut self, period: u32) {
        assert!(period > 0);
        self.period = period;
        SymbolCounterDrv::start(self);
    }

    fn value(&self) -> u32 {
        SymbolCounterDrv::value(self)
    }

    fn set_period(&mut self, period: u32) {
        SymbolCounterDrv::set_period(self, period);
    }

    fn period(&self) -> u32 {
        self.period
    }

    fn set_compare(&mut self, offset: u32) {
        self.regs.set_compare(self.captured.wrapping_add(offset));
        self.regs.enable_compare_interrupt();
    }

    fn cancel_compare(&mut self) {
        self.regs.disable_compare_interrupt();
    }

    fn overflow(&mut self) {
        SymbolCounterDrv::overflow(self);
    }
}
