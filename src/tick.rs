pub trait Tick: Send {
    /// The tick frequency, i.e. the number of ticks per second.
    const FREQ: u32;
}

/// The protocol-visible tick unit.
///
/// Slot durations, guard times and every delay handed to the slot timer are
/// counted in ticks of a 32768 Hz crystal, whatever the counter backing the
/// timer actually runs at.
pub struct RefTick;

impl Tick for RefTick {
    const FREQ: u32 = 32768;
}
