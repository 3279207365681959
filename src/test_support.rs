//! Test support utilities - only compiled in test builds.

use core::cell::Cell;

use crate::{
    config::{
        APPLICATION_HEADER_ADDRESS, APPLICATION_METADATA_ADDRESS, DEVICE_ID_ADDRESS,
        METADATA_SECTOR_LEN, REG_NONE, WRITE_FRAME_LEN,
    },
    dispatch::RegisterHandler,
    error::Error,
    hal::{BusProbe, DelayMs, Flash, InputLine, SlaveBus, SlaveEvent, SystemReset, Watchdog},
    record::{FirmwareHeader, MetadataRecord},
};

/// In-memory flash with the platform's fixed region map and failure
/// injection per primitive.
pub struct FakeFlash {
    meta: [u8; METADATA_SECTOR_LEN],
    header: [u8; FirmwareHeader::LEN],
    device_id: [u8; 4],
    pub fail_erase: bool,
    pub fail_program: bool,
    pub fail_read: bool,
    pub erases: usize,
    pub programs: usize,
}

impl FakeFlash {
    pub fn new() -> Self {
        Self {
            meta: [0; METADATA_SECTOR_LEN],
            header: [0; FirmwareHeader::LEN],
            device_id: [0; 4],
            fail_erase: false,
            fail_program: false,
            fail_read: false,
            erases: 0,
            programs: 0,
        }
    }

    pub fn seed_metadata(&mut self, record: &MetadataRecord) {
        self.meta[..MetadataRecord::LEN].copy_from_slice(record.as_bytes());
    }

    pub fn seed_header(&mut self, header: &FirmwareHeader) {
        self.header.copy_from_slice(header.as_bytes());
    }

    pub fn seed_device_id(&mut self, id: u32) {
        self.device_id = id.to_le_bytes();
    }

    /// The raw metadata record bytes as flash currently holds them.
    pub fn metadata_bytes(&self) -> &[u8] {
        &self.meta[..MetadataRecord::LEN]
    }

    fn region_mut(&mut self, address: u32, len: usize) -> Option<&mut [u8]> {
        let span = |base: u32, size: usize| -> Option<usize> {
            let offset = address.checked_sub(base)? as usize;
            (offset + len <= size).then_some(offset)
        };
        if let Some(offset) = span(APPLICATION_METADATA_ADDRESS, METADATA_SECTOR_LEN) {
            return Some(&mut self.meta[offset..offset + len]);
        }
        if let Some(offset) = span(APPLICATION_HEADER_ADDRESS, FirmwareHeader::LEN) {
            return Some(&mut self.header[offset..offset + len]);
        }
        if let Some(offset) = span(DEVICE_ID_ADDRESS, 4) {
            return Some(&mut self.device_id[offset..offset + len]);
        }
        None
    }
}

impl Default for FakeFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl Flash for FakeFlash {
    fn erase(&mut self, address: u32, len: usize) -> Result<(), Error> {
        if self.fail_erase {
            return Err(Error::Flash);
        }
        let region = self.region_mut(address, len).ok_or(Error::Flash)?;
        region.fill(0xFF);
        self.erases += 1;
        Ok(())
    }

    fn program(&mut self, data: &[u8], address: u32) -> Result<(), Error> {
        if self.fail_program {
            return Err(Error::Flash);
        }
        let region = self.region_mut(address, data.len()).ok_or(Error::Flash)?;
        region.copy_from_slice(data);
        self.programs += 1;
        Ok(())
    }

    fn read(&mut self, address: u32, out: &mut [u8]) -> Result<(), Error> {
        if self.fail_read {
            return Err(Error::Flash);
        }
        let region = self.region_mut(address, out.len()).ok_or(Error::Flash)?;
        out.copy_from_slice(region);
        Ok(())
    }
}

/// Scripted slave transceiver: tests queue events and incoming frames,
/// then inspect the transmitted responses.
pub struct FakeSlave {
    events: heapless::Deque<SlaveEvent, 16>,
    frames: heapless::Deque<heapless::Vec<u8, WRITE_FRAME_LEN>, 8>,
    pub responses: heapless::Vec<heapless::Vec<u8, 64>, 16>,
    pub addresses_set: heapless::Vec<u8, 8>,
    pub frequency: Option<u32>,
    pub fail_write: bool,
    pub fail_read: bool,
}

impl FakeSlave {
    pub fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
            frames: heapless::Deque::new(),
            responses: heapless::Vec::new(),
            addresses_set: heapless::Vec::new(),
            frequency: None,
            fail_write: false,
            fail_read: false,
        }
    }

    pub fn queue_event(&mut self, event: SlaveEvent) {
        self.events.push_back(event).unwrap();
    }

    /// Queues a write-addressed transaction carrying `frame`.
    pub fn queue_write(&mut self, frame: &[u8]) {
        self.queue_event(SlaveEvent::WriteAddressed);
        self.frames
            .push_back(heapless::Vec::from_slice(frame).unwrap())
            .unwrap();
    }

    /// Queues a read-addressed transaction.
    pub fn queue_read(&mut self) {
        self.queue_event(SlaveEvent::ReadAddressed);
    }

    pub fn last_response(&self) -> &[u8] {
        self.responses.last().unwrap()
    }
}

impl Default for FakeSlave {
    fn default() -> Self {
        Self::new()
    }
}

impl SlaveBus for FakeSlave {
    fn listen(&mut self) -> SlaveEvent {
        self.events.pop_front().unwrap_or(SlaveEvent::Idle)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.fail_write {
            return Err(Error::Bus);
        }
        self.responses
            .push(heapless::Vec::from_slice(data).unwrap())
            .unwrap();
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if self.fail_read {
            return Err(Error::Bus);
        }
        match self.frames.pop_front() {
            Some(frame) => {
                let n = frame.len().min(buf.len());
                buf[..n].copy_from_slice(&frame[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }

    fn set_address(&mut self, address: u8) {
        self.addresses_set.push(address).unwrap();
    }

    fn set_frequency(&mut self, hz: u32) {
        self.frequency = Some(hz);
    }
}

/// Probe master over a configurable occupancy set.
pub struct FakeProbe {
    occupied: bitmaps::Bitmap<128>,
    pub probes: usize,
    pub frequency: Option<u32>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self {
            occupied: bitmaps::Bitmap::new(),
            probes: 0,
            frequency: None,
        }
    }

    /// Marks a 7-bit address as answered-for on the simulated bus.
    pub fn occupy(&mut self, address: u8) {
        self.occupied.set(address as usize, true);
    }
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl BusProbe for FakeProbe {
    fn probe(&mut self, address: u8) -> bool {
        self.probes += 1;
        self.occupied.get((address >> 1) as usize)
    }

    fn set_frequency(&mut self, hz: u32) {
        self.frequency = Some(hz);
    }
}

/// Watchdog recording arming and kicks.
pub struct FakeWatchdog {
    pub armed_ms: Option<u32>,
    pub kicks: usize,
}

impl FakeWatchdog {
    pub fn new() -> Self {
        Self {
            armed_ms: None,
            kicks: 0,
        }
    }
}

impl Default for FakeWatchdog {
    fn default() -> Self {
        Self::new()
    }
}

impl Watchdog for FakeWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        self.armed_ms = Some(timeout_ms);
    }

    fn kick(&mut self) {
        self.kicks += 1;
    }
}

/// Clock line whose level tests can flip mid-scenario.
pub struct FakeClockLine {
    level: Cell<bool>,
}

impl FakeClockLine {
    pub fn high() -> Self {
        Self {
            level: Cell::new(true),
        }
    }

    pub fn set_level(&self, high: bool) {
        self.level.set(high);
    }
}

impl InputLine for FakeClockLine {
    fn is_high(&self) -> bool {
        self.level.get()
    }
}

/// Reset capability that counts requests instead of restarting anything.
pub struct RecordingReset {
    pub resets: usize,
}

impl RecordingReset {
    pub fn new() -> Self {
        Self { resets: 0 }
    }
}

impl Default for RecordingReset {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemReset for RecordingReset {
    fn system_reset(&mut self) {
        self.resets += 1;
    }
}

/// Delay capability accumulating the requested milliseconds.
pub struct FakeDelay {
    pub total_ms: u32,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self { total_ms: 0 }
    }
}

impl Default for FakeDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs for FakeDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms;
    }
}

/// Configurable custom register: serves a canned response and records the
/// frames written to it.
pub struct ScratchRegister {
    response: heapless::Vec<u8, 32>,
    arm_next: u8,
    pub writes: usize,
    pub last_frame: heapless::Vec<u8, WRITE_FRAME_LEN>,
}

impl ScratchRegister {
    pub fn new(response: &[u8]) -> Self {
        Self::arming(response, REG_NONE)
    }

    /// A register whose write handler arms `arm_next` for the next read.
    pub fn arming(response: &[u8], arm_next: u8) -> Self {
        Self {
            response: heapless::Vec::from_slice(response).unwrap(),
            arm_next,
            writes: 0,
            last_frame: heapless::Vec::new(),
        }
    }
}

impl RegisterHandler for ScratchRegister {
    fn read(&mut self, out: &mut [u8]) {
        let n = out.len().min(self.response.len());
        out[..n].copy_from_slice(&self.response[..n]);
    }

    fn write(&mut self, frame: &[u8]) -> u8 {
        self.writes += 1;
        self.last_frame = heapless::Vec::from_slice(frame).unwrap();
        self.arm_next
    }
}
