//! Flash metadata store.
//!
//! Owns the flash capability and the RAM working copy of the application
//! metadata. The persistence sequence is strict: erase the whole sector,
//! program the record, then read the region back into the RAM copy. The
//! read-back is the authoritative confirmation step; whatever flash actually
//! holds afterwards is what the protocol serves.

use crate::{
    config::{
        APPLICATION_HEADER_ADDRESS, APPLICATION_METADATA_ADDRESS, DEVICE_ID_ADDRESS,
        METADATA_SECTOR_LEN,
    },
    error::Error,
    faults::{Fault, Faults},
    hal::Flash,
    record::{FirmwareHeader, MetadataRecord},
};

/// Flash-backed metadata storage with a RAM working copy.
pub struct FlashStore<F: Flash> {
    flash: F,
    ram: MetadataRecord,
}

impl<F: Flash> FlashStore<F> {
    /// Wraps a flash capability. The RAM copy starts zeroed; call
    /// [`Self::load`] before serving registers.
    pub fn new(flash: F) -> Self {
        Self {
            flash,
            ram: MetadataRecord::zeroed(),
        }
    }

    /// Reads the metadata region from flash into the RAM copy.
    pub fn load(&mut self) -> Result<(), Error> {
        let mut record = MetadataRecord::zeroed();
        self.flash
            .read(APPLICATION_METADATA_ADDRESS, record.as_bytes_mut())?;
        self.ram = record;
        Ok(())
    }

    /// Persists the RAM copy: erase, program, read back.
    ///
    /// Every step is attempted even when an earlier one failed; each failure
    /// raises the matching [`Fault`] in the returned set. On success the RAM
    /// copy has been replaced by what flash durably holds, and a mismatch
    /// between that and what was programmed raises [`Fault::Verify`]. There
    /// is no retry and no rollback.
    ///
    /// Flash erase dominates the latency here (tens of milliseconds); saves
    /// stall register service for that long.
    pub fn save(&mut self) -> Faults {
        let mut faults = Faults::new();
        let intended = self.ram;

        if self
            .flash
            .erase(APPLICATION_METADATA_ADDRESS, METADATA_SECTOR_LEN)
            .is_err()
        {
            faults.raise(Fault::Erase);
        }

        if self
            .flash
            .program(intended.as_bytes(), APPLICATION_METADATA_ADDRESS)
            .is_err()
        {
            faults.raise(Fault::Program);
        }

        let mut readback = MetadataRecord::zeroed();
        match self
            .flash
            .read(APPLICATION_METADATA_ADDRESS, readback.as_bytes_mut())
        {
            Ok(()) => {
                self.ram = readback;
                if readback != intended {
                    faults.raise(Fault::Verify);
                }
            }
            Err(_) => faults.raise(Fault::Verify),
        }

        faults
    }

    /// Reads and decodes the application header region.
    pub fn read_header(&mut self) -> Result<FirmwareHeader, Error> {
        let mut header = FirmwareHeader::zeroed();
        self.flash
            .read(APPLICATION_HEADER_ADDRESS, header.as_bytes_mut())?;
        Ok(header)
    }

    /// Reads the factory-programmed 32-bit unique id.
    pub fn read_device_id(&mut self) -> Result<u32, Error> {
        let mut word = [0u8; 4];
        self.flash.read(DEVICE_ID_ADDRESS, &mut word)?;
        Ok(u32::from_le_bytes(word))
    }

    /// Borrows the RAM working copy.
    pub fn metadata(&self) -> &MetadataRecord {
        &self.ram
    }

    /// Mutably borrows the RAM working copy. Mutations are not durable
    /// until [`Self::save`] runs.
    pub fn metadata_mut(&mut self) -> &mut MetadataRecord {
        &mut self.ram
    }

    #[cfg(test)]
    pub(crate) fn flash_ref(&self) -> &F {
        &self.flash
    }

    #[cfg(test)]
    pub(crate) fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    #[cfg(test)]
    pub(crate) fn into_flash(self) -> F {
        self.flash
    }
}
