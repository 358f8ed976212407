use jiff::{SignedDuration, Timestamp};
use std::sync::{Arc, Mutex};

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: SignedDuration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// The service's notion of "now".
///
/// Wraps a [`Clock`] and, when test mode is enabled, accepts a per-request
/// override given as Unix epoch milliseconds. Outside test mode overrides are
/// ignored.
#[derive(Clone)]
pub struct TimeSource {
    clock: Arc<dyn Clock>,
    test_mode: bool,
}

impl TimeSource {
    pub fn new(clock: impl Clock + 'static, test_mode: bool) -> Self {
        Self {
            clock: Arc::new(clock),
            test_mode,
        }
    }

    /// A wall-clock source with overrides disabled.
    pub fn system() -> Self {
        Self::new(SystemClock, false)
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Returns the override instant if test mode is on and `override_ms`
    /// parses as epoch milliseconds, otherwise the clock's time.
    pub fn now_with_override(&self, override_ms: Option<&str>) -> Timestamp {
        if self.test_mode {
            if let Some(ts) = override_ms.and_then(parse_epoch_millis) {
                return ts;
            }
        }
        self.clock.now()
    }
}

impl std::fmt::Debug for TimeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSource")
            .field("now", &self.clock.now())
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

fn parse_epoch_millis(raw: &str) -> Option<Timestamp> {
    let millis = raw.trim().parse::<i64>().ok()?;
    Timestamp::from_millisecond(millis).ok()
}
