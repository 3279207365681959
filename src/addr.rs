//! Bus address allocator.
//!
//! Runs once during setup. The candidate address is derived from the device
//! id, so the same physical device tends to re-acquire the same address
//! across restarts, and colliding devices resolve deterministically by
//! linear probing upward through the pool.
//!
//! The probe loop has no retry cap: with every pool address occupied it
//! never terminates. Callers must guarantee address-space headroom; a
//! warning is logged on each full wraparound.

use crate::{
    config::{ADDR_POOL_CEILING, ADDR_POOL_FLOOR, ADDR_POOL_SPAN, BUS_FREQUENCY_HZ, JITTER_SPAN_MS},
    hal::{BusProbe, DelayMs, SlaveBus},
    logging::log_warn,
};

/// Derives the initial 7-bit candidate address from the device id.
pub fn derive_candidate(device_id: u32) -> u8 {
    (device_id % ADDR_POOL_SPAN) as u8 + ADDR_POOL_FLOOR
}

/// Derives the boot jitter delay from the device id, desynchronizing
/// devices that power up simultaneously.
pub fn derive_jitter_ms(device_id: u32) -> u32 {
    device_id % JITTER_SPAN_MS
}

/// Advances a candidate by one, wrapping from the pool ceiling back to the
/// floor.
pub fn next_candidate(candidate: u8) -> u8 {
    if candidate == ADDR_POOL_CEILING {
        ADDR_POOL_FLOOR
    } else {
        candidate + 1
    }
}

/// Claims a free slave address and publishes it on the responder.
///
/// The responder is disabled (address 0) for the whole probe phase so this
/// device cannot answer its own probes. Returns the claimed 7-bit address.
pub fn allocate<S, P, D>(device_id: u32, slave: &mut S, probe: &mut P, delay: &mut D) -> u8
where
    S: SlaveBus,
    P: BusProbe,
    D: DelayMs,
{
    slave.set_address(0);
    slave.set_frequency(BUS_FREQUENCY_HZ);

    delay.delay_ms(derive_jitter_ms(device_id));

    probe.set_frequency(BUS_FREQUENCY_HZ);

    let first = derive_candidate(device_id);
    let mut candidate = first;
    loop {
        if !probe.probe(candidate << 1) {
            slave.set_address(candidate << 1);
            return candidate;
        }

        candidate = next_candidate(candidate);
        if candidate == first {
            log_warn!("address pool exhausted, probing from {:#x} again", first);
        }
    }
}
