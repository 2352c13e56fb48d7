use core::marker::PhantomData;

use drone_cortexm::{fib, reg::prelude::*, thr::prelude::*};
use drone_stm32_map::periph::tim::general::{
    traits::*, GeneralTimMap, GeneralTimPeriph, TimCr1Cms, TimCr1Dir,
};

use super::ch::TimCh;
use crate::{
    drv::compare::{CompareDrv, CompareRegs},
    KickScheduler, KickSignal, SharedSlotTimer, Tick,
};

/// One output compare channel of a free running, 16 bit STM32 general
/// purpose timer.
pub struct Stm32CompareRegs<Tim: GeneralTimMap, Ch: TimCh<Tim>, T: Tick> {
    tim: GeneralTimPeriph<Tim>,
    ch: PhantomData<Ch>,
    tick: PhantomData<T>,
}

pub type Stm32Compare<Tim, Ch, T> = CompareDrv<Stm32CompareRegs<Tim, Ch, T>>;

unsafe impl<Tim: GeneralTimMap, Ch: TimCh<Tim>, T: Tick> Send for Stm32CompareRegs<Tim, Ch, T> {}

impl<Tim: GeneralTimMap + TimCr1Dir + TimCr1Cms, Ch: TimCh<Tim>, T: Tick>
    Stm32CompareRegs<Tim, Ch, T>
{
    /// Take the timer and start it counting up over the full 16 bit range.
    /// The prescaler must already be set up to produce ticks of `T`.
    pub fn new(tim: GeneralTimPeriph<Tim>, _tick: T) -> Self {
        tim.rcc_busenr_timen.set_bit();

        tim.tim_cr1.modify_reg(|r, v| {
            r.udis().clear(v); // Enable counter overflow event generation
            r.urs().set(v); // Only counter overflow generates an update interrupt
            r.opm().clear(v); // Counter is not stopped at update event
            r.dir().clear(v); // Count up
            r.cms().write(v, 0b00); // Edge-aligned mode
            r.arpe().set(v) // Use buffered auto reload value
        });

        // A full period defines the timer to be a 16 bit timer.
        tim.tim_arr.arr().write_bits(0xFFFF);

        // Re-initialize the counter and generate an update of the registers.
        tim.tim_egr.ug().set_bit();

        tim.tim_cr1.cen().set_bit();

        Self {
            tim,
            ch: PhantomData,
            tick: PhantomData,
        }
    }
}

impl<Tim: GeneralTimMap, Ch: TimCh<Tim>, T: Tick> Stm32CompareRegs<Tim, Ch, T> {
    /// Get the compare interrupt flag of the channel.
    pub fn is_pending(&self) -> bool {
        Ch::is_pending(&self.tim)
    }
}

impl<Tim: GeneralTimMap, Ch: TimCh<Tim>, T: Tick> CompareRegs for Stm32CompareRegs<Tim, Ch, T> {
    type Tick = T;
    const MAX: u32 = 0xFFFF;

    // The compare write goes through the APB bridge.
    const SETTLE_CYCLES: u32 = 16;

    fn counter(&self) -> u32 {
        self.tim.tim_cnt.cnt().read_bits() as u32
    }

    fn set_compare(&mut self, compare: u32) {
        Ch::set_compare(&self.tim, compare as u16);
    }

    fn enable_interrupt(&mut self) {
        Ch::enable_interrupt(&self.tim);
    }

    fn disable_interrupt(&mut self) {
        Ch::disable_interrupt(&self.tim);
    }

    fn clear_pending(&mut self) {
        Ch::clear_pending(&self.tim);
    }

    fn burn_cycles(&self, cycles: u32) {
        for _ in 0..cycles {
            core::hint::spin_loop();
        }
    }
}

/// Serve the timer interrupt with `timer` and raise `kick` whenever a slot
/// callback ran.
pub fn attach<Tim, Ch, T, Int>(
    timer: &'static SharedSlotTimer<Stm32Compare<Tim, Ch, T>>,
    tim_int: Int,
    kick: &'static KickSignal,
) where
    Tim: GeneralTimMap,
    Ch: TimCh<Tim>,
    T: Tick + 'static,
    Int: IntToken,
{
    tim_int.add_fn(move || {
        let outcome = timer.with(|timer| {
            // The interrupt line is shared with the other channels.
            if timer.scheduler().source().regs().is_pending() {
                timer.isr()
            } else {
                KickScheduler::DoNotKick
            }
        });
        kick.signal(outcome);
        fib::Yielded::<(), ()>(())
    });
}
