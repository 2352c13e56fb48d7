use alloc::boxed::Box;

use crate::KickScheduler;

/// A counter that restarts from zero every period, with one compare event
/// per period.
pub trait PeriodSource: Send {
    /// Start counting periods of `period` ticks from now.
    fn start(&mut self, period: u32);

    /// Ticks elapsed in the current period.
    fn value(&self) -> u32;

    /// Change the length of the current and following periods.
    fn set_period(&mut self, period: u32);

    fn period(&self) -> u32;

    /// Raise the compare event `offset` ticks after the start of the current
    /// period.
    fn set_compare(&mut self, offset: u32);

    /// Disable the compare event.
    fn cancel_compare(&mut self);

    /// Account for the end of a period, called from the overflow interrupt.
    fn overflow(&mut self);
}

/// Interrupt causes served by [`RadioTimer::isr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioTimerEvent {
    /// The period ended.
    Overflow,
    /// The scheduled compare matched.
    Compare,
    /// A frame start delimiter was captured at the given counter value.
    StartFrame(u32),
    /// A frame end was captured at the given counter value.
    EndFrame(u32),
}

pub type CompareCallback = Box<dyn FnMut() + Send>;
pub type CaptureCallback = Box<dyn FnMut(u32) + Send>;

/// Period-based timer that paces the radio slots and timestamps frames.
pub struct RadioTimer<P: PeriodSource> {
    source: P,
    overflow_cb: Option<CompareCallback>,
    compare_cb: Option<CompareCallback>,
    start_frame_cb: Option<CaptureCallback>,
    end_frame_cb: Option<CaptureCallback>,
    captured: Option<u32>,
}

impl<P: PeriodSource> RadioTimer<P> {
    pub const fn new(source: P) -> Self {
        Self {
            source,
            overflow_cb: None,
            compare_cb: None,
            start_frame_cb: None,
            end_frame_cb: None,
            captured: None,
        }
    }

    /// Forget all callbacks and the captured timestamp.
    pub fn init(&mut self) {
        self.overflow_cb = None;
        self.compare_cb = None;
        self.start_frame_cb = None;
        self.end_frame_cb = None;
        self.captured = None;
    }

    pub fn set_overflow_cb<F>(&mut self, cb: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.overflow_cb = Some(Box::new(cb));
    }

    pub fn set_compare_cb<F>(&mut self, cb: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.compare_cb = Some(Box::new(cb));
    }

    pub fn set_start_frame_cb<F>(&mut self, cb: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.start_frame_cb = Some(Box::new(cb));
    }

    pub fn set_end_frame_cb<F>(&mut self, cb: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.end_frame_cb = Some(Box::new(cb));
    }

    pub fn start(&mut self, period: u32) {
        log_debug!("radio timer start, period {}", period);
        self.source.start(period);
    }

    pub fn value(&self) -> u32 {
        self.source.value()
    }

    pub fn set_period(&mut self, period: u32) {
        self.source.set_period(period);
    }

    pub fn period(&self) -> u32 {
        self.source.period()
    }

    /// Raise the compare callback `offset` ticks into the current period.
    pub fn schedule(&mut self, offset: u32) {
        log_trace!("radio compare at {}", offset);
        self.source.set_compare(offset);
    }

    pub fn cancel(&mut self) {
        self.source.cancel_compare();
    }

    /// The counter value of the last captured frame start or end.
    pub fn captured_time(&self) -> Option<u32> {
        self.captured
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Serve a radio timer interrupt. Kicks the scheduler only when a
    /// callback ran.
    pub fn isr(&mut self, event: RadioTimerEvent) -> KickScheduler {
        match event {
            RadioTimerEvent::Overflow => {
                self.source.overflow();
                Self::notify(&mut self.overflow_cb)
            }
            RadioTimerEvent::Compare => {
                self.source.cancel_compare();
                Self::notify(&mut self.compare_cb)
            }
            RadioTimerEvent::StartFrame(time) => {
                self.captured = Some(time);
                Self::notify_capture(&mut self.start_frame_cb, time)
            }
            RadioTimerEvent::EndFrame(time) => {
                self.captured = Some(time);
                Self::notify_capture(&mut self.end_frame_cb, time)
            }
        }
    }

    fn notify(cb: &mut Option<CompareCallback>) -> KickScheduler {
        match cb {
            Some(cb) => {
                cb();
                KickScheduler::Kick
            }
            None => KickScheduler::DoNotKick,
        }
    }

    fn notify_capture(cb: &mut Option<CaptureCallback>, time: u32) -> KickScheduler {
        match cb {
            Some(cb) => {
                cb(time);
                KickScheduler::Kick
            }
            None => KickScheduler::DoNotKick,
        }
    }
}
