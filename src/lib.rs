//! Relative single-shot slot timer for time-slotted MAC layers.
//!
//! Delays are handed to the timer in ticks of a 32768 Hz reference clock and
//! are relative to the previously scheduled instant, so a chain of slots never
//! drifts however late each callback is served. The hardware counter backing
//! the timer may run at a different rate, wrap at any period, or only support
//! power-of-two intervals; see the backends in [`drv`].
#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

#[macro_use]
mod log;

mod engine;
mod interval;
mod kick;
mod radio;
mod scale;
mod shared;
mod source;
mod tick;
mod timer;

pub mod drv;

#[cfg(test)]
mod fakes;

pub use self::{
    engine::{Scheduler, State},
    kick::{KickScheduler, KickSignal},
    radio::{CaptureCallback, CompareCallback, PeriodSource, RadioTimer, RadioTimerEvent},
    scale::Scale,
    shared::SharedSlotTimer,
    source::{counter_add, counter_distance, Arm, TickSource},
    tick::{RefTick, Tick},
    timer::{Callback, NotSetError, SlotTimer},
};
