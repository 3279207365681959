//! Register dispatch table.
//!
//! Lets the owning application extend the built-in register set with custom
//! registers without modifying the protocol engine. Entries are registered
//! once during setup, in order, and are immutable afterwards; lookup is a
//! linear scan where the first match wins. Keeping addresses unique is the
//! caller's responsibility.

use crate::{
    config::{FIELD_LEN, REG_NONE},
    error::Error,
};

/// A custom register implementation.
///
/// One handler backs one register: the engine calls [`Self::read`] to
/// produce the response for a read transaction and [`Self::write`] to
/// consume a write transaction.
pub trait RegisterHandler {
    /// Produces the response bytes for a read of this register. `out` has
    /// exactly the response length declared at registration, at most
    /// [`FIELD_LEN`] bytes.
    fn read(&mut self, out: &mut [u8]);

    /// Consumes a write transaction. `frame` is the full received frame
    /// (register byte first, then the payload). Returns the register to arm
    /// for the next read, or [`REG_NONE`] to arm nothing.
    fn write(&mut self, frame: &[u8]) -> u8 {
        let _ = frame;
        REG_NONE
    }
}

/// One dispatch table entry.
pub struct RegisterEntry<'a> {
    pub(crate) address: u8,
    pub(crate) response_len: usize,
    pub(crate) handler: &'a mut dyn RegisterHandler,
}

/// Ordered, fixed-capacity collection of custom registers.
///
/// The const parameter `N` reserves the capacity; registration past it is
/// rejected rather than growing the table.
pub struct DispatchTable<'a, const N: usize> {
    entries: heapless::Vec<RegisterEntry<'a>, N>,
}

impl<'a, const N: usize> DispatchTable<'a, N> {
    /// Returns an empty table with capacity for `N` entries.
    pub fn new() -> Self {
        Self {
            entries: heapless::Vec::new(),
        }
    }

    /// Appends a custom register.
    ///
    /// `response_len` is the number of bytes a read of this register
    /// answers with; at most [`FIELD_LEN`], the width of the widest
    /// built-in register. [`REG_NONE`] is reserved as the neutral pending
    /// value and must not be used as an address.
    pub fn register(
        &mut self,
        address: u8,
        response_len: usize,
        handler: &'a mut dyn RegisterHandler,
    ) -> Result<(), Error> {
        debug_assert!(address != REG_NONE, "register address 0 is reserved");

        if response_len > FIELD_LEN {
            return Err(Error::ResponseTooLong);
        }
        self.entries
            .push(RegisterEntry {
                address,
                response_len,
                handler,
            })
            .map_err(|_| Error::TableFull)
    }

    /// Returns the number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Linear scan by register address, first match wins.
    pub(crate) fn find_mut(&mut self, address: u8) -> Option<&mut RegisterEntry<'a>> {
        self.entries.iter_mut().find(|e| e.address == address)
    }
}

impl<'a, const N: usize> Default for DispatchTable<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}
