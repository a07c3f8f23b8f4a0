//! Serial numbers for configure events
//!
//! Each configure event carries a serial from a process-wide counter, and the
//! client echoes it back in `ack_configure`. Serials wrap around on overflow,
//! so they are compared by their distance rather than their raw value.

use std::cell::Cell;

/// A serial number carried by a configure event
///
/// The ordering implementation accounts for wrap-around: a serial is
/// considered larger when the forward distance to it is less than half the
/// `u32` range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Serial(u32);

impl PartialOrd for Serial {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let distance = if self.0 > other.0 { self.0 - other.0 } else { other.0 - self.0 };
        if distance < u32::MAX / 2 {
            self.0.partial_cmp(&other.0)
        } else {
            // wrap-around occurred, invert comparison
            other.0.partial_cmp(&self.0)
        }
    }
}

impl From<u32> for Serial {
    fn from(n: u32) -> Self {
        Serial(n)
    }
}

impl From<Serial> for u32 {
    fn from(serial: Serial) -> u32 {
        serial.0
    }
}

/// A counter for generating configure serials
///
/// The counter yields 1, 2, 3, … and wraps around on overflow. It never
/// yields 0: that value is reserved as the "no configure sent yet" sentinel,
/// so an `ack_configure(0)` can never match a real configure.
#[derive(Debug, Default)]
pub struct SerialCounter {
    serial: Cell<u32>,
}

impl SerialCounter {
    /// Create a counter starting at 1
    pub fn new() -> SerialCounter {
        SerialCounter { serial: Cell::new(0) }
    }

    /// Retrieve the next serial from the counter
    pub fn next_serial(&self) -> Serial {
        let mut next = self.serial.get().wrapping_add(1);
        if next == 0 {
            next = 1;
        }
        self.serial.set(next);
        Serial(next)
    }
}
