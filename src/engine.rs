use core::cmp::min;

use crate::{
    source::{counter_add, counter_distance},
    Arm, RefTick, Scale, TickSource,
};

/// Dispatch state of a slot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Nothing is armed.
    Idle,
    /// A hardware event is pending.
    Armed,
    /// The callback is running.
    Firing,
}

/// The schedule engine.
///
/// Delays are relative to the previous scheduled instant (`last_reference`),
/// not to the moment `schedule_in()` is called. A slot boundary that was
/// reached late is fired right away, but the following slot is still
/// computed from the intended instant, so the lateness is not carried over.
pub struct Scheduler<S: TickSource> {
    source: S,
    scale: Scale<S::Tick, RefTick>,
    /// The intended instant of the latest schedule, as a native counter value.
    last_reference: u32,
    state: State,
    /// The counter value at which the armed event is raised.
    expiry: u32,
    /// Native ticks still owed after the armed event, for delays that could
    /// not be armed in one go.
    remainder: u64,
    /// A deadline passed before it could be armed and the callback is due.
    overdue: bool,
}

impl<S: TickSource> Scheduler<S> {
    pub const fn new(source: S) -> Self {
        Self {
            source,
            scale: Scale::new(),
            last_reference: 0,
            state: State::Idle,
            expiry: 0,
            remainder: 0,
            overdue: false,
        }
    }

    /// Zero all state. Nothing is armed afterwards.
    pub fn init(&mut self) {
        self.source.disarm();
        self.scale.reset();
        self.last_reference = 0;
        self.state = State::Idle;
        self.expiry = 0;
        self.remainder = 0;
        self.overdue = false;
    }

    /// Schedule the callback `delay` reference ticks after the previous
    /// scheduled instant.
    ///
    /// If that instant has already passed the callback is due immediately and
    /// runs before the outer `schedule_in()` (or interrupt) returns.
    pub fn schedule_in(&mut self, delay: u32) {
        if self.state == State::Armed {
            log_debug!("slot timer re-armed while armed");
            self.source.disarm();
            self.state = State::Idle;
        }
        self.remainder = 0;
        self.overdue = false;

        let delay = self.scale.delay_to_native(delay);
        let period = self.source.period();
        let now = self.source.counter();
        let elapsed = counter_distance(period, self.last_reference, now);

        self.last_reference = counter_add(period, self.last_reference, delay);

        if delay == 0 || (elapsed >= 0 && elapsed as u64 >= delay) {
            log_debug!(
                "slot deadline missed by {} ticks, firing now",
                elapsed - delay as i64
            );
            self.overdue = true;
            return;
        }

        let remaining = (delay as i64 - elapsed) as u64;
        self.arm_from(now, remaining);
    }

    /// Disarm any pending event. The callback is not invoked for it.
    pub fn cancel_schedule(&mut self) {
        if self.state == State::Armed {
            log_trace!("slot timer cancelled");
        }
        self.source.disarm();
        if self.state == State::Armed {
            self.state = State::Idle;
        }
        self.remainder = 0;
        self.overdue = false;
    }

    /// Get the current counter value in reference ticks.
    pub fn current_value(&self) -> u32 {
        Scale::<S::Tick, RefTick>::to_reference(self.source.counter() as u64) as u32
    }

    /// Zero the reference and disarm any pending event. The counter keeps
    /// running.
    pub fn reset(&mut self) {
        log_debug!("slot timer reset");
        self.cancel_schedule();
        self.scale.reset();
        self.last_reference = 0;
    }

    /// The intended instant of the latest schedule, in reference ticks.
    pub fn last_reference(&self) -> u32 {
        Scale::<S::Tick, RefTick>::to_reference(self.last_reference as u64) as u32
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Native ticks still owed after the armed event.
    pub fn remainder(&self) -> u64 {
        self.remainder
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Handle the hardware event. Returns whether the callback must run.
    pub(crate) fn expire(&mut self) -> bool {
        self.source.acknowledge();
        self.source.disarm();

        if self.state != State::Armed {
            log_trace!("spurious slot timer interrupt");
            return false;
        }
        self.state = State::Idle;

        let remainder = core::mem::take(&mut self.remainder);
        if remainder == 0 {
            return true;
        }

        // Re-arm against the original target, not against the time the
        // interrupt was served.
        let period = self.source.period();
        let now = self.source.counter();
        let late = counter_distance(period, self.expiry, now);
        let remaining = remainder as i64 - late;
        if remaining <= 0 {
            return true;
        }

        log_trace!("slot timer re-armed, {} ticks remaining", remaining);
        self.arm_from(now, remaining as u64);
        self.take_overdue()
    }

    pub(crate) fn take_overdue(&mut self) -> bool {
        core::mem::take(&mut self.overdue)
    }

    pub(crate) fn begin_firing(&mut self) {
        self.state = State::Firing;
    }

    pub(crate) fn end_firing(&mut self) {
        if self.state == State::Firing {
            self.state = State::Idle;
        }
    }

    fn arm_from(&mut self, base: u32, remaining: u64) {
        if remaining < self.source.min_delay() {
            log_debug!("{} ticks is below the timer resolution, firing now", remaining);
            self.overdue = true;
            return;
        }

        let period = self.source.period();
        match self.source.arm(base, min(remaining, period / 2)) {
            Arm::Armed(covered) => {
                self.expiry = counter_add(period, base, covered);
                self.remainder = remaining - covered;
                self.state = State::Armed;
                log_trace!("slot timer armed at {}", self.expiry);
            }
            Arm::Missed => {
                log_debug!("slot timer compare missed, firing now");
                self.source.disarm();
                self.overdue = true;
            }
        }
    }
}
