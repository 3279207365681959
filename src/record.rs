//! Fixed-layout flash record schemas.
//!
//! The firmware header and the application metadata live at absolute flash
//! addresses (see [`crate::config`]). Rather than aliasing that memory, both
//! are modeled as byte-array wrappers with generated little-endian field
//! accessors, so the on-flash layout is an explicit serialization schema.

/// Generates typed accessors for one little-endian record field.
macro_rules! impl_record_field {
    ($name:ident, u8, $off:expr) => {
        paste::paste! {
            #[doc = "Reads the `" $name "` field."]
            #[inline]
            pub fn $name(&self) -> u8 {
                self.0[$off]
            }

            #[doc = "Writes the `" $name "` field."]
            #[inline]
            pub fn [<set_ $name>](&mut self, value: u8) {
                self.0[$off] = value;
            }
        }
    };
    ($name:ident, $type:ty, $size:literal, $off:expr) => {
        paste::paste! {
            #[doc = "Reads the little-endian `" $name "` field."]
            #[inline]
            pub fn $name(&self) -> $type {
                <$type>::from_le_bytes(self.0[$off..$off + $size].try_into().unwrap())
            }

            #[doc = "Writes the little-endian `" $name "` field."]
            #[inline]
            pub fn [<set_ $name>](&mut self, value: $type) {
                self.0[$off..$off + $size].copy_from_slice(&value.to_le_bytes());
            }
        }
    };
    ($name:ident, [u8; $len:expr], $off:expr) => {
        paste::paste! {
            #[doc = "Borrows the `" $name "` field bytes."]
            #[inline]
            pub fn $name(&self) -> &[u8] {
                &self.0[$off..$off + $len]
            }

            #[doc = "Writes the `" $name "` field from a prefix of `value`."]
            ///
            /// # Panics
            /// Panics if `value` is shorter than the field.
            #[inline]
            pub fn [<set_ $name>](&mut self, value: &[u8]) {
                self.0[$off..$off + $len].copy_from_slice(&value[..$len]);
            }
        }
    };
}

/// Generates the shared record plumbing (construction, raw byte access).
macro_rules! impl_record_common {
    ($len:expr) => {
        /// Serialized record length in bytes.
        pub const LEN: usize = $len;

        /// Returns an all-zero record.
        #[inline]
        pub fn zeroed() -> Self {
            Self([0; $len])
        }

        /// Wraps raw record bytes.
        #[inline]
        pub fn from_bytes(bytes: [u8; $len]) -> Self {
            Self(bytes)
        }

        /// Borrows the serialized record.
        #[inline]
        pub fn as_bytes(&self) -> &[u8] {
            &self.0
        }

        #[inline]
        pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
            &mut self.0
        }
    };
}

/// Mutable application metadata, persisted as a whole record.
///
/// Layout: `update_magic: u32` at 0, `group: u8` at 4, `sensor_type` at
/// 5..37, `name` at 37..69.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataRecord([u8; 69]);

impl MetadataRecord {
    impl_record_common!(69);

    impl_record_field!(update_magic, u32, 4, 0);
    impl_record_field!(group, u8, 4);
    impl_record_field!(sensor_type, [u8; crate::config::FIELD_LEN], 5);
    impl_record_field!(name, [u8; crate::config::FIELD_LEN], 37);
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Application header written by the flashing process. Read-only here.
///
/// Layout: `magic: u32` at 0, `firmware_size: u64` at 4, `firmware_crc: u32`
/// at 12, `version_hash` at 16..48.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareHeader([u8; 48]);

impl FirmwareHeader {
    impl_record_common!(48);

    impl_record_field!(magic, u32, 4, 0);
    impl_record_field!(firmware_size, u64, 8, 4);
    impl_record_field!(firmware_crc, u32, 4, 12);
    impl_record_field!(version_hash, [u8; crate::config::FIELD_LEN], 16);
}

impl Default for FirmwareHeader {
    fn default() -> Self {
        Self::zeroed()
    }
}
