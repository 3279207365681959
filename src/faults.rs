//! Fault indicator.
//!
//! Failures are absorbed where they happen (there is no outer caller in a
//! perpetual polling loop), but they must stay visible: every failed step
//! raises a [`Fault`] into a shared [`FaultCell`] the application can watch,
//! typically to drive a status LED.

use core::cell::Cell;

/// One observable failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Metadata sector erase failed during a save.
    Erase,
    /// Metadata programming failed during a save.
    Program,
    /// Read-back after a save failed or did not match what was programmed;
    /// the RAM and flash copies may have diverged.
    Verify,
    /// Initial metadata load from flash failed.
    MetadataLoad,
    /// Firmware header could not be read at init.
    HeaderLoad,
    /// The hardware unique id could not be read at init.
    DeviceId,
    /// A slave bus transfer failed.
    Bus,
}

impl Fault {
    fn index(self) -> usize {
        match self {
            Fault::Erase => 0,
            Fault::Program => 1,
            Fault::Verify => 2,
            Fault::MetadataLoad => 3,
            Fault::HeaderLoad => 4,
            Fault::DeviceId => 5,
            Fault::Bus => 6,
        }
    }
}

/// A set of raised faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faults(bitmaps::Bitmap<8>);

impl Faults {
    /// Returns an empty fault set.
    pub fn new() -> Self {
        Self(bitmaps::Bitmap::new())
    }

    /// Adds `fault` to the set.
    pub fn raise(&mut self, fault: Fault) {
        self.0.set(fault.index(), true);
    }

    /// Returns true if `fault` is in the set.
    pub fn is_raised(&self, fault: Fault) -> bool {
        self.0.get(fault.index())
    }

    /// Returns true if any fault is raised.
    pub fn any(&self) -> bool {
        !self.0.is_empty()
    }

    /// Adds every fault raised in `other`.
    pub fn merge(&mut self, other: Faults) {
        let mut idx = other.0.first_index();
        while let Some(index) = idx {
            self.0.set(index, true);
            idx = other.0.next_index(index);
        }
    }
}

impl Default for Faults {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared fault indicator.
///
/// Raises happen from the polling loop; reads may happen anywhere, including
/// an ISR blinking an LED, so access is serialized through a critical
/// section. The cell only ever accumulates until explicitly cleared.
pub struct FaultCell {
    inner: critical_section::Mutex<Cell<Faults>>,
}

impl FaultCell {
    /// Returns a cell with no faults raised.
    pub fn new() -> Self {
        Self {
            inner: critical_section::Mutex::new(Cell::new(Faults::new())),
        }
    }

    /// Raises a single fault.
    pub fn raise(&self, fault: Fault) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut faults = cell.get();
            faults.raise(fault);
            cell.set(faults);
        });
    }

    /// Raises every fault in `faults`.
    pub fn merge(&self, faults: Faults) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut current = cell.get();
            current.merge(faults);
            cell.set(current);
        });
    }

    /// Returns a copy of the currently raised faults.
    pub fn snapshot(&self) -> Faults {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }

    /// Returns true if any fault is raised.
    pub fn any(&self) -> bool {
        self.snapshot().any()
    }

    /// Clears all raised faults.
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).set(Faults::new()));
    }
}

impl Default for FaultCell {
    fn default() -> Self {
        Self::new()
    }
}
