//! A `no_std`, no-alloc I2C slave register framework for embedded systems.
//!
//! This crate turns a microcontroller into an addressable I2C peripheral that
//! exposes device identity, firmware version, and persisted metadata (group,
//! sensor type, name) as registers, and that can reboot itself into the
//! bootloader when a master requests a firmware update.
//!
//! # Features
//!
//! - **Zero heap allocation** - All storage statically sized
//! - **Dynamic address allocation** - Probes the bus for a free slave address
//!   derived from the hardware unique id
//! - **Flash-backed metadata** - Erase/program/verify persistence with a
//!   visible fault indicator
//! - **Pluggable registers** - Custom handlers extend the built-in register
//!   set without touching the engine
//! - **Watchdog bus recovery** - A wedged bus ends in a hardware reset, not a
//!   silent hang
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐  listen/write/read  ┌────────────────────────┐
//! │  I2C master     │◀───────────────────▶│  RegisterNode          │
//! │  (external)     │                     │   ├─ DispatchTable     │
//! └─────────────────┘                     │   ├─ FlashStore        │
//!                                         │   ├─ BusHealthMonitor  │
//! ┌─────────────────┐   erase/program/    │   └─ FaultCell         │
//! │  Flash          │◀───read─────────────┤                        │
//! └─────────────────┘                     └────────────────────────┘
//! ```
//!
//! The caller owns the polling loop and invokes [`engine::RegisterNode::poll`]
//! once per iteration. There is exactly one logical task; every capability the
//! engine needs (bus, flash, watchdog, reset) is injected through the traits
//! in [`hal`], so the core is host-testable with fakes.
//!
//! A write transaction arms a register; the next read transaction serves it.
//! Writes to the metadata registers persist synchronously through the full
//! erase/program/read-back sequence before the next event is polled.

#![deny(unsafe_code)]
#![no_std]

#[cfg(test)]
extern crate std;

mod logging;

pub mod addr;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod faults;
pub mod hal;
pub mod health;
pub mod record;
pub mod store;

#[cfg(test)]
mod test_support;

pub use dispatch::{DispatchTable, RegisterHandler};
pub use engine::RegisterNode;
pub use error::Error;
pub use faults::{Fault, FaultCell, Faults};
pub use hal::{BusProbe, DelayMs, Flash, InputLine, SlaveBus, SlaveEvent, SystemReset, Watchdog};
pub use health::BusHealthMonitor;
pub use record::{FirmwareHeader, MetadataRecord};
pub use store::FlashStore;

pub mod prelude {
    pub use crate::{
        BusHealthMonitor, BusProbe, DelayMs, DispatchTable, Error, Fault, FaultCell, Faults,
        FirmwareHeader, Flash, FlashStore, InputLine, MetadataRecord, RegisterHandler,
        RegisterNode, SlaveBus, SlaveEvent, SystemReset, Watchdog,
    };
}
