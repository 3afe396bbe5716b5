use std::time::{SystemTime, UNIX_EPOCH};

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Wall-clock abstraction for schedule resolution.
///
/// - seconds_since_midnight(): current time-of-day in seconds [0, 86400)
///
/// The engine itself never reads a clock; callers resolve the active basal
/// segment through this trait and pass the result in.
pub trait Clock {
    fn seconds_since_midnight(&self) -> u32;
}

/// Default real-time clock. Day boundary is UTC midnight; callers in other
/// timezones supply their own `Clock` with the local offset applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct WallClock;

impl WallClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for WallClock {
    #[inline]
    fn seconds_since_midnight(&self) -> u32 {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        (since_epoch.as_secs() % u64::from(SECONDS_PER_DAY)) as u32
    }
}

/// Deterministic clocks for tests and simulations.
pub mod test_clock {
    use super::*;

    /// Deterministic test clock pinned to a fixed time-of-day.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        seconds: std::sync::Arc<std::sync::Mutex<u32>>,
    }

    impl FixedClock {
        pub fn at(seconds: u32) -> Self {
            Self {
                seconds: std::sync::Arc::new(std::sync::Mutex::new(seconds % SECONDS_PER_DAY)),
            }
        }

        /// Move the clock to a new time-of-day.
        pub fn set(&self, seconds: u32) {
            if let Ok(mut s) = self.seconds.lock() {
                *s = seconds % SECONDS_PER_DAY;
            }
        }
    }

    impl Clock for FixedClock {
        fn seconds_since_midnight(&self) -> u32 {
            self.seconds.lock().map(|g| *g).unwrap_or(0)
        }
    }
}
