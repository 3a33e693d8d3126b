// Wall-clock capability
//
// The scheduler reads time through this trait so tests can pin the
// reference instant instead of waiting on real time.

use chrono::{DateTime, Local};

#[cfg(test)]
use mockall::automock;

/// Zero-argument now-provider for the ambient wall clock
#[cfg_attr(test, automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the system's local time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
