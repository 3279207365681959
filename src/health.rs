//! Bus health monitor.
//!
//! A deliberately crude liveness heuristic: the clock line of a healthy bus
//! is released (high) between transactions, so sampling it high is taken as
//! proof of life and kicks the watchdog. A line held low past the watchdog
//! timeout means the peripheral is wedged, and the watchdog forces a full
//! hardware reset. Anything not yet persisted is lost; the flash copy of
//! the metadata survives.
//!
//! [`BusHealthMonitor::check`] must run every polling iteration, before any
//! potentially slow operation.

use crate::hal::{InputLine, Watchdog};

/// Watchdog-backed liveness check tied to the clock line.
pub struct BusHealthMonitor<W: Watchdog, L: InputLine> {
    pub(crate) watchdog: W,
    pub(crate) scl: L,
}

impl<W: Watchdog, L: InputLine> BusHealthMonitor<W, L> {
    pub fn new(watchdog: W, scl: L) -> Self {
        Self { watchdog, scl }
    }

    /// Arms the watchdog countdown. Call once during setup; after this the
    /// only way to hold off the reset is periodic [`Self::check`] calls
    /// observing a released clock line.
    pub fn arm(&mut self, timeout_ms: u32) {
        self.watchdog.start(timeout_ms);
    }

    /// Samples the clock line and kicks the watchdog if it reads high.
    pub fn check(&mut self) {
        if self.scl.is_high() {
            self.watchdog.kick();
        }
    }
}
