use core::cell::RefCell;

use critical_section::Mutex;

use crate::{KickScheduler, NotSetError, Scheduler, SlotTimer, TickSource};

/// A [`SlotTimer`] shared between the foreground and the timer interrupt.
///
/// Every operation runs inside a critical section, so a `static` instance can
/// be driven from both contexts. The callback runs inside the critical
/// section as well and must not touch the shared timer itself; it chains the
/// next slot on the scheduler it is handed.
pub struct SharedSlotTimer<S: TickSource> {
    inner: Mutex<RefCell<SlotTimer<S>>>,
}

impl<S: TickSource> SharedSlotTimer<S> {
    pub const fn new(timer: SlotTimer<S>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(timer)),
        }
    }

    /// Run `f` with exclusive access to the timer.
    pub fn with<R>(&self, f: impl FnOnce(&mut SlotTimer<S>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    pub fn init(&self) {
        self.with(|timer| timer.init())
    }

    pub fn set_callback<F>(&self, callback: F)
    where
        F: FnMut(&mut Scheduler<S>) + Send + 'static,
    {
        self.with(|timer| timer.set_callback(callback))
    }

    pub fn schedule_in(&self, delay: u32) -> Result<(), NotSetError> {
        self.with(|timer| timer.schedule_in(delay))
    }

    pub fn cancel_schedule(&self) {
        self.with(|timer| timer.cancel_schedule())
    }

    pub fn current_value(&self) -> u32 {
        self.with(|timer| timer.current_value())
    }

    pub fn reset(&self) {
        self.with(|timer| timer.reset())
    }

    /// The timer interrupt handler.
    pub fn isr(&self) -> KickScheduler {
        self.with(|timer| timer.isr())
    }
}
