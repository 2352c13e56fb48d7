use alloc::boxed::Box;

use crate::{KickScheduler, Scheduler, TickSource};

/// The handler invoked when a scheduled slot instant is reached.
///
/// It runs with the interrupt logically in progress, either from the timer
/// interrupt or synchronously from within `schedule_in()` when the deadline
/// had already passed. It must not block. The scheduler handed to it is the
/// one that fired, so the next slot is chained with `schedule_in()` on it.
pub type Callback<S> = Box<dyn FnMut(&mut Scheduler<S>) + Send>;

/// Error returned from [`SlotTimer::schedule_in`] when no callback is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotSetError;

/// A relative single-shot timer: the schedule engine and its callback.
pub struct SlotTimer<S: TickSource> {
    scheduler: Scheduler<S>,
    callback: Option<Callback<S>>,
}

impl<S: TickSource> SlotTimer<S> {
    pub const fn new(source: S) -> Self {
        Self {
            scheduler: Scheduler::new(source),
            callback: None,
        }
    }

    /// Zero all state, including the registered callback. Nothing is armed
    /// afterwards, and the underlying counter keeps running.
    pub fn init(&mut self) {
        self.scheduler.init();
        self.callback = None;
    }

    /// Register the handler invoked when the timer fires.
    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Scheduler<S>) + Send + 'static,
    {
        if self.callback.is_some() {
            log_warn!("slot timer callback replaced");
        }
        self.callback = Some(Box::new(callback));
    }

    /// Schedule the callback `delay` reference ticks after the previously
    /// scheduled instant. See [`Scheduler::schedule_in`].
    pub fn schedule_in(&mut self, delay: u32) -> Result<(), NotSetError> {
        let callback = self.callback.as_mut().ok_or(NotSetError)?;
        self.scheduler.schedule_in(delay);
        if self.scheduler.take_overdue() {
            fire(&mut self.scheduler, callback);
        }
        Ok(())
    }

    /// Disarm any pending event without invoking the callback.
    pub fn cancel_schedule(&mut self) {
        self.scheduler.cancel_schedule();
    }

    /// Get the current counter value in reference ticks.
    pub fn current_value(&self) -> u32 {
        self.scheduler.current_value()
    }

    /// Zero the reference and disarm any pending event.
    pub fn reset(&mut self) {
        self.scheduler.reset();
    }

    /// The timer interrupt handler.
    ///
    /// Disarms the source and invokes the callback if the slot instant was
    /// reached. Intermediate events of a delay that had to be armed in
    /// several steps re-arm the source and do not kick the scheduler.
    pub fn isr(&mut self) -> KickScheduler {
        if !self.scheduler.expire() {
            return KickScheduler::DoNotKick;
        }
        match self.callback.as_mut() {
            Some(callback) => {
                fire(&mut self.scheduler, callback);
                KickScheduler::Kick
            }
            None => KickScheduler::DoNotKick,
        }
    }

    pub fn source(&self) -> &S {
        self.scheduler.source()
    }

    /// Access the tick source for interrupts the timer does not serve itself,
    /// e.g. the symbol counter period overflow. Arming or disarming it behind
    /// the timer's back is not supported.
    pub fn source_mut(&mut self) -> &mut S {
        self.scheduler.source_mut()
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    pub(crate) fn scheduler_mut(&mut self) -> &mut Scheduler<S> {
        &mut self.scheduler
    }
}

/// Run the callback, and run it again for every deadline it scheduled that
/// was already due.
fn fire<S: TickSource>(scheduler: &mut Scheduler<S>, callback: &mut Callback<S>) {
    loop {
        scheduler.begin_firing();
        callback(scheduler);
        scheduler.end_firing();

        if !scheduler.take_overdue() {
            break;
        }
    }
}
