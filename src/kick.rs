use core::{
    future::Future,
    sync::atomic::{AtomicBool, Ordering},
    task::Poll,
};
use futures::{future::poll_fn, task::AtomicWaker};

/// Whether an interrupt handler wants the cooperative scheduler to re-run
/// its dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KickScheduler {
    DoNotKick,
    Kick,
}

impl KickScheduler {
    #[inline]
    pub fn is_kick(self) -> bool {
        self == KickScheduler::Kick
    }

    /// Combine the outcome of two handlers served by the same interrupt.
    #[inline]
    pub fn or(self, other: KickScheduler) -> KickScheduler {
        if self.is_kick() || other.is_kick() {
            KickScheduler::Kick
        } else {
            KickScheduler::DoNotKick
        }
    }
}

impl From<bool> for KickScheduler {
    fn from(kick: bool) -> Self {
        if kick {
            KickScheduler::Kick
        } else {
            KickScheduler::DoNotKick
        }
    }
}

/// Event signal from interrupt handlers to the cooperative scheduler.
///
/// Interrupt handlers raise the signal; the scheduler run loop either polls
/// it with [`KickSignal::take`] or awaits [`KickSignal::wait`].
pub struct KickSignal {
    raised: AtomicBool,
    waker: AtomicWaker,
}

impl KickSignal {
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
            waker: AtomicWaker::new(),
        }
    }

    /// Raise the signal if `kick` asks for it.
    pub fn signal(&self, kick: KickScheduler) {
        if kick.is_kick() {
            self.raise();
        }
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
        self.waker.wake();
    }

    /// Consume the signal, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }

    /// Returns a future that resolves once the signal is raised, consuming it.
    pub fn wait(&self) -> impl Future<Output = ()> + '_ {
        poll_fn(move |cx| {
            if self.take() {
                return Poll::Ready(());
            }
            self.waker.register(cx.waker());
            // Raised between the first check and the registration.
            if self.take() {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        })
    }
}

impl Default for KickSignal {
    fn default() -> Self {
        Self::new()
    }
}
