//! Crate-internal logging.
//!
//! Forwards to `defmt` when the `defmt` feature is enabled, prints to stdout
//! in unit tests, and compiles to nothing otherwise.

macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($arg)*);

        #[cfg(all(test, not(feature = "defmt")))]
        ::std::println!("[TRACE] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(test, not(feature = "defmt")))]
        ::std::println!("[DEBUG] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! log_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(test, not(feature = "defmt")))]
        ::std::println!("[WARN] {}", format_args!($($arg)*));

        #[cfg(not(any(test, feature = "defmt")))]
        let _ = format_args!($($arg)*);
    }};
}
