//! Platform capability traits.
//!
//! The engine never touches hardware directly; everything it needs from the
//! platform comes in through these narrow traits. Bus addresses cross this
//! boundary in the transceiver's 8-bit framing (7-bit address shifted left
//! one, read/write bit clear), matching what the allocator publishes.

use crate::error::Error;

/// Classification of the next slave transaction on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlaveEvent {
    /// No master addressed us; nothing to do.
    Idle,
    /// A master wants to read from us.
    ReadAddressed,
    /// A master wrote to us specifically.
    WriteAddressed,
    /// A master wrote to the general-call address.
    WriteGeneral,
}

/// The I2C slave transceiver.
pub trait SlaveBus {
    /// Classifies the next transaction. Returns promptly with
    /// [`SlaveEvent::Idle`] when the bus is quiet.
    fn listen(&mut self) -> SlaveEvent;

    /// Transmits a response to a read-addressed master.
    fn write(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Receives up to `buf.len()` bytes from a write-addressed master.
    /// Returns the number of bytes actually received.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Publishes the address this device answers to, in 8-bit framing.
    /// Address 0 disables the responder.
    fn set_address(&mut self, address: u8);

    /// Sets the bus clock frequency in hertz.
    fn set_frequency(&mut self, hz: u32);
}

/// Transient-master capability used only during address allocation.
pub trait BusProbe {
    /// Issues a zero-length read probe at the given 8-bit framed address.
    /// Returns true if some device acknowledged, i.e. the address is taken.
    fn probe(&mut self, address: u8) -> bool;

    /// Sets the probe master's bus clock frequency in hertz.
    fn set_frequency(&mut self, hz: u32);
}

/// Non-volatile storage primitives over absolute addresses.
pub trait Flash {
    /// Erases `len` bytes starting at the sector containing `address`.
    fn erase(&mut self, address: u32, len: usize) -> Result<(), Error>;

    /// Programs `data` at `address`. The range must have been erased.
    fn program(&mut self, data: &[u8], address: u32) -> Result<(), Error>;

    /// Reads `out.len()` bytes starting at `address`.
    fn read(&mut self, address: u32, out: &mut [u8]) -> Result<(), Error>;
}

/// Independent hardware countdown timer.
pub trait Watchdog {
    /// Arms the countdown. Once started it cannot be stopped, only kicked.
    fn start(&mut self, timeout_ms: u32);

    /// Restarts the countdown.
    fn kick(&mut self);
}

/// A digital input sampled for its instantaneous logic level.
pub trait InputLine {
    /// Returns true if the line currently reads high.
    fn is_high(&self) -> bool;
}

/// Forces a full hardware reset.
///
/// On hardware this call does not return; the device restarts and control
/// passes to the bootloader. It is modeled as a returning call so test
/// doubles can record the request, and the engine treats it as terminal by
/// returning immediately after invoking it.
pub trait SystemReset {
    /// Requests an immediate hardware reset.
    fn system_reset(&mut self);
}

/// Blocking millisecond delay, used once for the allocator's boot jitter.
pub trait DelayMs {
    fn delay_ms(&mut self, ms: u32);
}
