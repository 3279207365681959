//! Internal logging macros.
//!
//! With the `defmt` feature enabled, log lines go through [`defmt`]. Host
//! test builds print to stdout so failing tests show the protocol trace.
//! Without either, arguments are evaluated and discarded so format
//! expressions stay type-checked in every configuration.

macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::info!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!(concat!("INFO  ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!(concat!("WARN  ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        defmt::error!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        std::println!(concat!("ERROR ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

pub(crate) use log_error;
pub(crate) use log_info;
pub(crate) use log_warn;
