//! Register protocol engine.
//!
//! [`RegisterNode`] owns every component and drives one transaction per
//! [`RegisterNode::poll`] call: health check first, then classify the next
//! slave event and resolve the register read or write against the dispatch
//! table and the built-in register set.
//!
//! Protocol state carried across iterations is exactly one scalar: the
//! pending register, armed by the last write transaction and consumed (then
//! reset to neutral) by the next read. Everything runs on the caller's
//! single polling thread; nothing here is safe for concurrent access.

use crate::{
    addr,
    config::{
        FIELD_LEN, READ_DEFAULT_VALUE, REG_DEVICE_ID, REG_FIRMWARE_UPDATE, REG_GROUP, REG_NAME,
        REG_NONE, REG_SENSOR_TYPE, REG_VERSION, UPDATE_REQUESTED_MAGIC, WATCHDOG_TIMEOUT_MS,
        WRITE_FRAME_LEN,
    },
    dispatch::DispatchTable,
    faults::{Fault, FaultCell},
    hal::{BusProbe, DelayMs, Flash, InputLine, SlaveBus, SlaveEvent, SystemReset, Watchdog},
    health::BusHealthMonitor,
    logging::{log_error, log_info, log_warn},
    record::{FirmwareHeader, MetadataRecord},
    store::FlashStore,
};

/// The I2C slave register node.
///
/// # Type Parameters
/// - `S`: slave transceiver
/// - `P`: transient-master probe used during address allocation
/// - `F`: flash capability backing the metadata store
/// - `W`: watchdog backing the health monitor
/// - `L`: clock-line input sampled by the health monitor
/// - `R`: hardware reset capability
/// - `D`: delay capability for the allocator's boot jitter
/// - `N`: dispatch table capacity
pub struct RegisterNode<'a, S, P, F, W, L, R, D, const N: usize>
where
    S: SlaveBus,
    P: BusProbe,
    F: Flash,
    W: Watchdog,
    L: InputLine,
    R: SystemReset,
    D: DelayMs,
{
    slave: S,
    probe: P,
    store: FlashStore<F>,
    health: BusHealthMonitor<W, L>,
    reset: R,
    delay: D,
    table: DispatchTable<'a, N>,
    faults: &'a FaultCell,
    device_id: u32,
    header: FirmwareHeader,
    slave_address: u8,
    pending: u8,
    buffer: [u8; WRITE_FRAME_LEN],
}

impl<'a, S, P, F, W, L, R, D, const N: usize> RegisterNode<'a, S, P, F, W, L, R, D, N>
where
    S: SlaveBus,
    P: BusProbe,
    F: Flash,
    W: Watchdog,
    L: InputLine,
    R: SystemReset,
    D: DelayMs,
{
    /// Assembles a node from its capabilities, a dispatch table built during
    /// setup, and the shared fault indicator. Call [`Self::init`] before
    /// polling.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        slave: S,
        probe: P,
        flash: F,
        watchdog: W,
        scl: L,
        reset: R,
        delay: D,
        table: DispatchTable<'a, N>,
        faults: &'a FaultCell,
    ) -> Self {
        Self {
            slave,
            probe,
            store: FlashStore::new(flash),
            health: BusHealthMonitor::new(watchdog, scl),
            reset,
            delay,
            table,
            faults,
            device_id: 0,
            header: FirmwareHeader::zeroed(),
            slave_address: 0,
            pending: REG_NONE,
            buffer: [0; WRITE_FRAME_LEN],
        }
    }

    /// One-time setup: reads the device identity, loads the metadata RAM
    /// copy, decodes the firmware header, claims a bus address, and arms the
    /// watchdog. Failures raise faults and setup continues with defaults.
    pub fn init(&mut self) {
        match self.store.read_device_id() {
            Ok(id) => self.device_id = id,
            Err(_) => {
                self.faults.raise(Fault::DeviceId);
                log_error!("device id read failed, continuing with id 0");
            }
        }
        log_info!("device id: {:#x}", self.device_id);

        if self.store.load().is_err() {
            self.faults.raise(Fault::MetadataLoad);
            log_error!("metadata load from flash failed");
        }

        match self.store.read_header() {
            Ok(header) => self.header = header,
            Err(_) => {
                self.faults.raise(Fault::HeaderLoad);
                log_error!("firmware header read failed");
            }
        }

        self.slave_address = addr::allocate(
            self.device_id,
            &mut self.slave,
            &mut self.probe,
            &mut self.delay,
        );
        self.health.arm(WATCHDOG_TIMEOUT_MS);

        log_info!("register node ready at address {:#x}", self.slave_address);
    }

    /// Drives one polling iteration.
    ///
    /// The health check runs before anything that could block, so a wedged
    /// bus eventually starves the watchdog instead of hanging forever.
    pub fn poll(&mut self) {
        self.health.check();

        match self.slave.listen() {
            SlaveEvent::Idle => {}
            SlaveEvent::ReadAddressed => self.serve_read(),
            // General-call writes are accepted by the transceiver but carry
            // no register semantics here.
            SlaveEvent::WriteGeneral => {}
            SlaveEvent::WriteAddressed => self.accept_write(),
        }
    }

    /// Serves the register armed by the last write transaction. Custom
    /// registers shadow built-ins; the pending register is always consumed.
    fn serve_read(&mut self) {
        let register = core::mem::replace(&mut self.pending, REG_NONE);
        log_info!("read of register {:#x}", register);

        // Registration caps response_len at FIELD_LEN, so the declared
        // length always fits the scratch buffer.
        let mut response = [0u8; FIELD_LEN];
        let custom_len = match self.table.find_mut(register) {
            Some(entry) => {
                entry.handler.read(&mut response[..entry.response_len]);
                Some(entry.response_len)
            }
            None => None,
        };
        if let Some(len) = custom_len {
            self.transmit(&response[..len]);
            return;
        }

        match register {
            REG_DEVICE_ID => {
                let id = self.device_id.to_le_bytes();
                self.transmit(&id);
            }
            REG_VERSION => {
                response.copy_from_slice(self.header.version_hash());
                self.transmit(&response);
            }
            REG_GROUP => {
                let group = self.store.metadata().group();
                self.transmit(&[group]);
            }
            REG_SENSOR_TYPE => {
                response.copy_from_slice(self.store.metadata().sensor_type());
                self.transmit(&response);
            }
            REG_NAME => {
                response.copy_from_slice(self.store.metadata().name());
                self.transmit(&response);
            }
            _ => {
                log_warn!("read of unmapped register {:#x}, answering default", register);
                self.transmit(&[READ_DEFAULT_VALUE]);
            }
        }
    }

    /// Consumes a write transaction: byte 0 arms the pending register, the
    /// rest is the register-specific payload.
    fn accept_write(&mut self) {
        let received = match self.slave.read(&mut self.buffer) {
            Ok(n) => n,
            Err(_) => {
                self.faults.raise(Fault::Bus);
                log_warn!("bus receive failed");
                return;
            }
        };

        let register = self.buffer[0];
        self.pending = register;
        log_info!("write to register {:#x} ({} bytes)", register, received);

        match register {
            REG_GROUP => {
                // A zero value byte means "no update requested".
                if self.buffer[1] != 0 {
                    let group = self.buffer[1];
                    self.store.metadata_mut().set_group(group);
                    self.persist();
                }
            }
            REG_SENSOR_TYPE => {
                if self.buffer[1] != 0 {
                    self.store.metadata_mut().set_sensor_type(&self.buffer[1..]);
                    self.persist();
                }
            }
            REG_NAME => {
                if self.buffer[1] != 0 {
                    self.store.metadata_mut().set_name(&self.buffer[1..]);
                    self.persist();
                }
            }
            REG_FIRMWARE_UPDATE => {
                self.store
                    .metadata_mut()
                    .set_update_magic(UPDATE_REQUESTED_MAGIC);
                self.persist();
                log_info!("firmware update requested, resetting into bootloader");
                // Cleared here because the reset call below skips the
                // shared clearing at the end of this function.
                self.buffer.fill(0);
                // On hardware this never returns.
                self.reset.system_reset();
                return;
            }
            _ => {
                let armed = self
                    .table
                    .find_mut(register)
                    .map(|entry| entry.handler.write(&self.buffer));
                if let Some(next) = armed {
                    self.pending = next;
                }
            }
        }

        self.buffer.fill(0);
    }

    /// Persists the metadata RAM copy, merging any step failures into the
    /// fault indicator. Service continues either way.
    fn persist(&mut self) {
        let failed = self.store.save();
        if failed.any() {
            self.faults.merge(failed);
            log_error!("metadata persist failed");
        }
    }

    fn transmit(&mut self, data: &[u8]) {
        if self.slave.write(data).is_err() {
            self.faults.raise(Fault::Bus);
            log_warn!("bus transmit failed");
        }
    }

    /// The 32-bit hardware unique id read at init.
    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    /// The 7-bit bus address claimed during init.
    pub fn slave_address(&self) -> u8 {
        self.slave_address
    }

    /// The register armed for the next read, [`REG_NONE`] if none.
    pub fn pending_register(&self) -> u8 {
        self.pending
    }

    /// The metadata RAM working copy.
    pub fn metadata(&self) -> &MetadataRecord {
        self.store.metadata()
    }

    /// The firmware header decoded at init.
    pub fn firmware_header(&self) -> &FirmwareHeader {
        &self.header
    }

    #[cfg(test)]
    pub(crate) fn into_flash(self) -> F {
        self.store.into_flash()
    }
}
