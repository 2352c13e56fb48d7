use drone_cortexm::reg::prelude::*;
use drone_stm32_map::periph::tim::general::{
    traits::*, GeneralTimMap, GeneralTimPeriph, TimCcr2, TimCcr3, TimCcr4, TimDierCc2Ie,
    TimDierCc3Ie, TimDierCc4Ie, TimSrCc2If, TimSrCc3If, TimSrCc4If,
};

/// A capture/compare channel of a general purpose timer.
pub trait TimCh<Tim: GeneralTimMap>: Send + 'static {
    /// Set compare register for the channel.
    fn set_compare(tim: &GeneralTimPeriph<Tim>, ccr: u16);
    /// Enable the channel interrupt.
    fn enable_interrupt(tim: &GeneralTimPeriph<Tim>);
    /// Disable the channel interrupt.
    fn disable_interrupt(tim: &GeneralTimPeriph<Tim>);
    /// Get the compare interrupt flag.
    fn is_pending(tim: &GeneralTimPeriph<Tim>) -> bool;
    /// Clear the compare interrupt flag.
    fn clear_pending(tim: &GeneralTimPeriph<Tim>);
}

pub struct TimCh1;
pub struct TimCh2;
pub struct TimCh3;
pub struct TimCh4;

macro_rules! tim_ch {
    ($ch:ident, [$($bound:ident),*], $tim_ccr:ident, $ccie:ident, $ccif:ident) => {
        impl<Tim: GeneralTimMap $(+ $bound)*> TimCh<Tim> for $ch {
            fn set_compare(tim: &GeneralTimPeriph<Tim>, ccr: u16) {
                tim.$tim_ccr.store_bits(ccr as u32);
            }

            fn enable_interrupt(tim: &GeneralTimPeriph<Tim>) {
                tim.tim_dier.modify_reg(|r, v| r.$ccie().set(v));
            }

            fn disable_interrupt(tim: &GeneralTimPeriph<Tim>) {
                tim.tim_dier.modify_reg(|r, v| r.$ccie().clear(v));
            }

            fn is_pending(tim: &GeneralTimPeriph<Tim>) -> bool {
                tim.tim_sr.$ccif().read_bit()
            }

            fn clear_pending(tim: &GeneralTimPeriph<Tim>) {
                // rc_w0: Clear flag by writing a 0, 1 has no effect.
                let mut val = unsafe { Tim::STimSr::val_from(u32::MAX) };
                tim.tim_sr.$ccif().clear(&mut val);
                tim.tim_sr.store_val(val);
            }
        }
    };
}

tim_ch!(TimCh1, [], tim_ccr1, cc1ie, cc1if);
tim_ch!(TimCh2, [TimCcr2, TimDierCc2Ie, TimSrCc2If], tim_ccr2, cc2ie, cc2if);
tim_ch!(TimCh3, [TimCcr3, TimDierCc3Ie, TimSrCc3If], tim_ccr3, cc3ie, cc3if);
tim_ch!(TimCh4, [TimCcr4, TimDierCc4Ie, TimSrCc4If], tim_ccr4, cc4ie, cc4if);
