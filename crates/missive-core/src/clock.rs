//! Render-time clock.
//!
//! The footer prints the current year. Reading it through a trait keeps
//! rendering deterministic under test.

use chrono::Datelike;

pub trait Clock {
    /// Calendar year used by the footer copyright line.
    fn current_year(&self) -> i32;
}

/// Reads the local system date on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Always reports the same year.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}
