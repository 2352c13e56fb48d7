pub mod compare;
pub mod symbol;
pub mod watchdog;

#[cfg(feature = "stm32f4")]
pub mod stm32;
