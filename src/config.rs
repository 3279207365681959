//! Register map, flash layout, and protocol constants.
//!
//! The flash addresses describe the platform's fixed layout: the bootloader
//! owns the firmware status word and writes the application header; this
//! crate only ever rewrites the metadata region.

/// Writing this register requests a firmware update and reboots the device
/// into the bootloader. The payload is ignored.
pub const REG_FIRMWARE_UPDATE: u8 = 0xA0;
/// Reads back the 32-bit hardware unique id, little-endian.
pub const REG_DEVICE_ID: u8 = 0xA1;
/// Reads back the 32-byte firmware version hash from the application header.
pub const REG_VERSION: u8 = 0xA2;
/// Group id, one byte. Writable; a zero value byte is ignored.
pub const REG_GROUP: u8 = 0xA5;
/// Sensor type string, 32 bytes. Writable; a zero leading byte is ignored.
pub const REG_SENSOR_TYPE: u8 = 0xA6;
/// Sensor name string, 32 bytes. Writable; a zero leading byte is ignored.
pub const REG_NAME: u8 = 0xA7;

/// Neutral pending-register value: no register armed for the next read.
/// Custom handlers must not register this address.
pub const REG_NONE: u8 = 0x00;

/// Single-byte answer for a read of a register nothing has armed or mapped.
pub const READ_DEFAULT_VALUE: u8 = 0x42;

/// Metadata magic flag meaning "firmware update requested", checked by the
/// bootloader after reset.
pub const UPDATE_REQUESTED_MAGIC: u32 = 0xDEAD_BEEF;

/// Bus clock frequency for both the slave responder and the probe master.
pub const BUS_FREQUENCY_HZ: u32 = 100_000;

/// Watchdog timeout for the bus health monitor. SCL held low continuously
/// for this long forces a hardware reset.
pub const WATCHDOG_TIMEOUT_MS: u32 = 2_000;

/// Lowest 7-bit slave address the allocator will claim.
pub const ADDR_POOL_FLOOR: u8 = 0x10;
/// Highest 7-bit slave address the allocator will claim; the next candidate
/// after this wraps back to [`ADDR_POOL_FLOOR`].
pub const ADDR_POOL_CEILING: u8 = 0x6F;
/// Modulus for deriving the initial candidate from the device id.
pub const ADDR_POOL_SPAN: u32 = 95;
/// Modulus for the boot jitter delay, in milliseconds.
pub const JITTER_SPAN_MS: u32 = 1_000;

/// Firmware status word, owned by the bootloader.
pub const FIRMWARE_STATUS_ADDRESS: u32 = 0x0801_FF00;
/// Application header region, written by the flashing process.
pub const APPLICATION_HEADER_ADDRESS: u32 = 0x0800_9800;
/// Application metadata region, the only region this crate rewrites.
pub const APPLICATION_METADATA_ADDRESS: u32 = 0x0800_9000;
/// Metadata sector length; the whole sector is erased on every save.
pub const METADATA_SECTOR_LEN: usize = 2048;
/// Location of the factory-programmed 32-bit unique id.
pub const DEVICE_ID_ADDRESS: u32 = 0x1FFF_7590;

/// Length of the string-valued register fields (sensor type, name).
pub const FIELD_LEN: usize = 32;
/// Write transaction frame: one register byte plus a 32-byte payload.
pub const WRITE_FRAME_LEN: usize = FIELD_LEN + 1;
