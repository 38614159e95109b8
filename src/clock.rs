//! Animation clock for the time-driven idle effects.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of "milliseconds since start"
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock started at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start_time: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock for headless scrubbing and tests
///
/// Clones share the same time, so a test can keep one handle while the frame
/// driver owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn starting_at(ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
