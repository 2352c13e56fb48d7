use crate::Tick;

/// Outcome of arming a [`TickSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arm {
    /// The interrupt will be raised after this many native ticks from the
    /// arm base. Interval-granular sources may cover less than requested.
    Armed(u64),
    /// The deadline passed before the hardware event was enabled.
    Missed,
}

/// A free-running hardware counter with a single one-shot event.
///
/// Only the scheduler arms and disarms the source, and it never arms a
/// source that is already armed without disarming it first.
pub trait TickSource: Send {
    /// The native tick rate of the counter.
    type Tick: Tick;

    /// The counter period. `counter()` is always below this value.
    fn period(&self) -> u64;

    /// Get the current counter value.
    fn counter(&self) -> u32;

    /// The smallest delay, in native ticks, that the source can arm.
    /// Shorter delays fire right away.
    fn min_delay(&self) -> u64 {
        1
    }

    /// Raise the interrupt `delay` native ticks after the counter value
    /// `base`. `delay` is never above half the period.
    fn arm(&mut self, base: u32, delay: u64) -> Arm;

    /// Disable the pending event, if any. Must be idempotent.
    fn disarm(&mut self);

    /// Account for an event that fired, called from the interrupt before the
    /// source is disarmed.
    fn acknowledge(&mut self) {}
}

/// Add `delta` to the counter value `base` modulo `period`.
#[inline]
pub fn counter_add(period: u64, base: u32, delta: u64) -> u32 {
    ((base as u64 + delta % period) % period) as u32
}

/// Distance from counter value `from` to `to`, interpreted in the half-open
/// window (-period/2, period/2].
#[inline]
pub fn counter_distance(period: u64, from: u32, to: u32) -> i64 {
    let forward = (to as u64 + period - from as u64 % period) % period;
    if forward > period / 2 {
        forward as i64 - period as i64
    } else {
        forward as i64
    }
}
