use core::marker::PhantomData;

use crate::Tick;

/// Rational conversion between a counter's native tick rate `N` and the
/// protocol tick rate `R`.
///
/// Both directions use the reduced ratio `N::FREQ / R::FREQ`, so the common
/// case of a 32768 Hz counter backing a 32768 Hz protocol degenerates to an
/// identity. Delays are converted with a carried remainder: converting
/// `n` consecutive delays yields the same total as converting their sum,
/// so rounding never drifts a slot schedule.
pub struct Scale<N: Tick, R: Tick> {
    carry: u64,
    ticks: PhantomData<(N, R)>,
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

impl<N: Tick, R: Tick> Scale<N, R> {
    const GCD: u64 = gcd(N::FREQ as u64, R::FREQ as u64);

    /// Native ticks per `DEN` reference ticks.
    pub const NUM: u64 = N::FREQ as u64 / Self::GCD;

    /// Reference ticks per `NUM` native ticks.
    pub const DEN: u64 = R::FREQ as u64 / Self::GCD;

    pub const fn new() -> Self {
        Self {
            carry: 0,
            ticks: PhantomData,
        }
    }

    /// Whether the native and reference rates are identical.
    pub const fn is_identity() -> bool {
        Self::NUM == Self::DEN
    }

    /// Convert a native counter reading into reference ticks, rounding down.
    pub fn to_reference(native: u64) -> u64 {
        if Self::is_identity() {
            native
        } else {
            native * Self::DEN / Self::NUM
        }
    }

    /// Convert a relative delay into native ticks, carrying the fractional
    /// part into the next conversion.
    pub fn delay_to_native(&mut self, reference: u32) -> u64 {
        if Self::is_identity() {
            return reference as u64;
        }
        let scaled = reference as u64 * Self::NUM + self.carry;
        self.carry = scaled % Self::DEN;
        scaled / Self::DEN
    }

    /// Drop any carried fraction.
    pub fn reset(&mut self) {
        self.carry = 0;
    }
}

impl<N: Tick, R: Tick> Default for Scale<N, R> {
    fn default() -> Self {
        Self::new()
    }
}
