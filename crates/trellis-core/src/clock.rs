//! Time sources for the dispatcher.
//!
//! Double-click detection, tooltip delays and the FPS estimate all read time
//! through [`Clock`] so tests can drive time explicitly with [`ManualClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A monotonic time source measured in seconds.
pub trait Clock: Send + Sync {
    /// Seconds elapsed since an arbitrary, fixed origin.
    fn now(&self) -> f64;
}

/// A clock shared between a screen and whoever created it.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock backed by [`Instant`], with its origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Create a shared handle to a new system clock.
    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// ```
/// use trellis_core::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1.0);
/// clock.advance(0.25);
/// assert_eq!(clock.now(), 1.25);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    seconds: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading `seconds`.
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds: AtomicU64::new(seconds.to_bits()),
        }
    }

    /// Set the current reading.
    pub fn set(&self, seconds: f64) {
        self.seconds.store(seconds.to_bits(), Ordering::SeqCst);
    }

    /// Move the reading forward by `delta` seconds.
    pub fn advance(&self, delta: f64) {
        self.set(self.now() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.seconds.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_only_moves_when_told() {
        let clock = ManualClock::new(2.0);
        assert_eq!(clock.now(), 2.0);
        clock.set(5.5);
        assert_eq!(clock.now(), 5.5);
        clock.advance(0.5);
        assert_eq!(clock.now(), 6.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_shared_clock_coerces() {
        let manual = Arc::new(ManualClock::new(3.0));
        let shared: SharedClock = manual.clone();
        manual.advance(1.0);
        assert_eq!(shared.now(), 4.0);
    }
}
