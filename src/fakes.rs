//! Simulated timer hardware for unit tests.
//!
//! [`FakeHw`] keeps an absolute tick time and at most one armed event.
//! The register fakes translate their register writes into absolute expiry
//! times on it, and [`FakeHw::run_until`] advances time, serving every event
//! that expires on the way.

use core::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    drv::{
        compare::{CompareDrv, CompareRegs},
        symbol::{SymbolCounterDrv, SymbolCounterRegs},
        watchdog::{WatchdogConfig, WatchdogDrv, WatchdogRegs},
    },
    RefTick, SlotTimer, Tick, TickSource,
};

/// The 62.5 kHz symbol rate of an IEEE 802.15.4 2.4 GHz radio.
pub struct SymbolTick;

impl Tick for SymbolTick {
    const FREQ: u32 = 62500;
}

#[derive(Default)]
struct Inner {
    time: u64,
    armed: Option<u64>,
    pending: Option<(u64, u64)>,
    write_latency: u64,
    arms: Vec<u64>,
    fires: Vec<u64>,
    disarms_while_armed: usize,
    beacon: u32,
    overflow_compare: u32,
    overflow_int: bool,
}

pub struct FakeHw {
    inner: Mutex<Inner>,
}

impl FakeHw {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub fn time(&self) -> u64 {
        self.lock().time
    }

    pub fn set_time(&self, time: u64) {
        self.lock().time = time;
    }

    pub fn advance(&self, ticks: u64) {
        self.lock().time += ticks;
    }

    /// Ticks that pass while a compare register is written.
    pub fn set_write_latency(&self, ticks: u64) {
        self.lock().write_latency = ticks;
    }

    /// The absolute time of the armed event.
    pub fn armed(&self) -> Option<u64> {
        self.lock().armed
    }

    /// The delay of every event armed so far.
    pub fn arms(&self) -> Vec<u64> {
        self.lock().arms.clone()
    }

    pub fn fires(&self) -> Vec<u64> {
        self.lock().fires.clone()
    }

    /// Record that the callback ran at the current time.
    pub fn record_fire(&self) {
        let mut inner = self.lock();
        let time = inner.time;
        inner.fires.push(time);
    }

    pub fn disarms_while_armed(&self) -> usize {
        self.lock().disarms_while_armed
    }

    pub fn overflow_compare(&self) -> u32 {
        self.lock().overflow_compare
    }

    pub fn overflow_int_enabled(&self) -> bool {
        self.lock().overflow_int
    }

    /// Latch the overflow compare value into the beacon timestamp register,
    /// as the symbol counter does on an overflow match.
    pub fn latch_beacon(&self) {
        let mut inner = self.lock();
        inner.beacon = inner.overflow_compare;
    }

    fn set_pending(&self, delay: u64) {
        let mut inner = self.lock();
        let expiry = inner.time + delay;
        inner.pending = Some((expiry, delay));
    }

    fn enable_pending(&self) {
        let mut inner = self.lock();
        if let Some((expiry, delay)) = inner.pending {
            inner.armed = Some(expiry);
            inner.arms.push(delay);
        }
    }

    fn arm_in(&self, delay: u64) {
        self.set_pending(delay);
        self.enable_pending();
    }

    fn disarm(&self) {
        let mut inner = self.lock();
        if inner.armed.take().is_some() {
            inner.disarms_while_armed += 1;
        }
    }

    fn settle(&self) {
        let mut inner = self.lock();
        inner.time += inner.write_latency;
    }

    /// Advance time to `until`, serving the timer interrupt for every event
    /// that expires before.
    pub fn run_until<S: TickSource>(&self, timer: &mut SlotTimer<S>, until: u64) {
        loop {
            let expired = {
                let mut inner = self.lock();
                match inner.armed {
                    Some(expiry) if expiry <= until => {
                        inner.time = inner.time.max(expiry);
                        inner.armed = None;
                        true
                    }
                    _ => false,
                }
            };
            if !expired {
                break;
            }
            timer.isr();
        }

        let mut inner = self.lock();
        inner.time = inner.time.max(until);
    }
}

pub struct FakeCompareRegs<T: Tick = RefTick, const M: u32 = 0xFFFF_FFFF> {
    hw: Arc<FakeHw>,
    compare: u32,
    tick: PhantomData<T>,
}

impl<T: Tick, const M: u32> FakeCompareRegs<T, M> {
    fn new(hw: &Arc<FakeHw>) -> Self {
        Self {
            hw: hw.clone(),
            compare: 0,
            tick: PhantomData,
        }
    }

    pub fn compare(&self) -> u32 {
        self.compare
    }
}

impl<T: Tick, const M: u32> CompareRegs for FakeCompareRegs<T, M> {
    type Tick = T;
    const MAX: u32 = M;

    fn counter(&self) -> u32 {
        (self.hw.time() % Self::PERIOD) as u32
    }

    fn set_compare(&mut self, compare: u32) {
        self.compare = compare;
        let delay = (compare as u64 + Self::PERIOD - self.counter() as u64) % Self::PERIOD;
        self.hw.set_pending(delay);
    }

    fn enable_interrupt(&mut self) {
        self.hw.enable_pending();
    }

    fn disable_interrupt(&mut self) {
        self.hw.disarm();
    }

    fn clear_pending(&mut self) {}

    fn burn_cycles(&self, _cycles: u32) {
        self.hw.settle();
    }
}

pub type FakeCompare = CompareDrv<FakeCompareRegs>;
pub type FakeCompare16 = CompareDrv<FakeCompareRegs<RefTick, 0xFFFF>>;
pub type FakeSymbolCompare16 = CompareDrv<FakeCompareRegs<SymbolTick, 0xFFFF>>;

pub fn compare(hw: &Arc<FakeHw>) -> FakeCompare {
    CompareDrv::new(FakeCompareRegs::new(hw))
}

pub fn compare16(hw: &Arc<FakeHw>) -> FakeCompare16 {
    CompareDrv::new(FakeCompareRegs::new(hw))
}

/// A 16 bit compare timer counting symbols rather than reference ticks.
pub fn symbol_compare16(hw: &Arc<FakeHw>) -> FakeSymbolCompare16 {
    CompareDrv::new(FakeCompareRegs::new(hw))
}

pub struct FakeWatchdogRegs {
    hw: Arc<FakeHw>,
}

impl WatchdogRegs for FakeWatchdogRegs {
    type Tick = RefTick;

    fn start(&mut self, shift: u8) {
        self.hw.arm_in(1 << shift);
    }

    fn stop(&mut self) {
        self.hw.disarm();
    }
}

pub type FakeWatchdog = WatchdogDrv<FakeWatchdogRegs>;

pub fn watchdog(hw: &Arc<FakeHw>, config: WatchdogConfig) -> FakeWatchdog {
    WatchdogDrv::new(FakeWatchdogRegs { hw: hw.clone() }, config)
}

/// A symbol counter whose raw value is `bias` ahead of the simulated time.
pub struct FakeSymbolRegs {
    hw: Arc<FakeHw>,
    bias: u32,
}

impl SymbolCounterRegs for FakeSymbolRegs {
    type Tick = RefTick;

    fn counter(&self) -> u32 {
        (self.hw.time() as u32).wrapping_add(self.bias)
    }

    fn beacon_timestamp(&self) -> u32 {
        self.hw.lock().beacon
    }

    fn set_compare(&mut self, raw: u32) {
        let delay = raw.wrapping_sub(self.counter()) as u64;
        self.hw.set_pending(delay);
    }

    fn enable_compare_interrupt(&mut self) {
        self.hw.enable_pending();
    }

    fn disable_compare_interrupt(&mut self) {
        self.hw.disarm();
    }

    fn set_overflow_compare(&mut self, raw: u32) {
        self.hw.lock().overflow_compare = raw;
    }

    fn enable_overflow_interrupt(&mut self) {
        self.hw.lock().overflow_int = true;
    }

    fn disable_overflow_interrupt(&mut self) {
        self.hw.lock().overflow_int = false;
    }
}

pub type FakeSymbol = SymbolCounterDrv<FakeSymbolRegs>;

pub fn symbol(hw: &Arc<FakeHw>, bias: u32, period: u32) -> FakeSymbol {
    SymbolCounterDrv::new(FakeSymbolRegs { hw: hw.clone(), bias }, period)
}
