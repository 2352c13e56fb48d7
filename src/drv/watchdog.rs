use crate::{interval::largest_interval, Arm, Tick, TickSource};

/// The power-of-two intervals a watchdog-style timer can be started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WatchdogConfig {
    /// The smallest interval is `2^min_shift` native ticks.
    pub min_shift: u8,
    /// The largest interval is `2^max_shift` native ticks.
    pub max_shift: u8,
}

impl WatchdogConfig {
    /// The ATmega watchdog: 2K to 1024K cycles of its 128 kHz oscillator.
    pub const ATMEGA: WatchdogConfig = WatchdogConfig::new(11, 20);

    pub const fn new(min_shift: u8, max_shift: u8) -> Self {
        assert!(min_shift <= max_shift);
        assert!(max_shift < 32);
        Self {
            min_shift,
            max_shift,
        }
    }

    pub const fn min_interval(&self) -> u64 {
        1 << self.min_shift
    }
}

/// The 128 kHz watchdog oscillator.
pub struct WatchdogTick;

impl Tick for WatchdogTick {
    const FREQ: u32 = 128_000;
}

/// Register access of an interval-granular timer.
pub trait WatchdogRegs: Send {
    /// The timer tick rate.
    type Tick: Tick;

    /// Start a single interval of `2^shift` ticks that raises the interrupt
    /// when it ends.
    fn start(&mut self, shift: u8);

    /// Stop the running interval, if any.
    fn stop(&mut self);
}

/// Interval-granular tick source for when no continuous counter is running,
/// e.g. in deep sleep.
///
/// The timer cannot be read, so the counter is kept in software and only
/// advances by whole intervals when they expire. A delay is served as a
/// series of the largest intervals that fit, and whatever is left below the
/// smallest interval is dropped: the callback fires up to one smallest
/// interval early. The next delay is measured from the intended instant, so
/// that early firing is not carried over.
pub struct WatchdogDrv<R: WatchdogRegs> {
    regs: R,
    config: WatchdogConfig,
    elapsed: u32,
    running: Option<u64>,
}

impl<R: WatchdogRegs> WatchdogDrv<R> {
    pub const fn new(regs: R, config: WatchdogConfig) -> Self {
        Self {
            regs,
            config,
            elapsed: 0,
            running: None,
        }
    }

    pub fn config(&self) -> WatchdogConfig {
        self.config
    }
}

impl<R: WatchdogRegs> TickSource for WatchdogDrv<R> {
    type Tick = R::Tick;

    fn period(&self) -> u64 {
        1 << 32
    }

    fn counter(&self) -> u32 {
        self.elapsed
    }

    fn min_delay(&self) -> u64 {
        self.config.min_interval()
    }

    fn arm(&mut self, _base: u32, delay: u64) -> Arm {
        match largest_interval(delay, self.config.min_shift, self.config.max_shift) {
            Some(shift) => {
                self.regs.start(shift);
                self.running = Some(1 << shift);
                Arm::Armed(1 << shift)
            }
            None => Arm::Missed,
        }
    }

    fn disarm(&mut self) {
        self.regs.stop();
        self.running = None;
    }

    fn acknowledge(&mut self) {
        if let Some(interval) = self.running.take() {
            self.elapsed = self.elapsed.wrapping_add(interval as u32);
        }
    }
}
