/// Errors reported by the framework's fallible operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A bus transfer (slave write or read) failed.
    Bus,
    /// A flash erase, program, or read primitive failed.
    Flash,
    /// Dispatch table registration exceeded the reserved capacity.
    TableFull,
    /// Dispatch table registration declared a response longer than a
    /// register field.
    ResponseTooLong,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus => write!(f, "bus transfer failed"),
            Error::Flash => write!(f, "flash operation failed"),
            Error::TableFull => write!(f, "dispatch table capacity exceeded"),
            Error::ResponseTooLong => write!(f, "declared response exceeds the field width"),
        }
    }
}
