//! STM32 general purpose timer backend.

mod ch;
mod compare;

pub use self::{
    ch::{TimCh, TimCh1, TimCh2, TimCh3, TimCh4},
    compare::{attach, Stm32Compare, Stm32CompareRegs},
};
