//! Calendar clock
//!
//! The engine only cares about which day it is.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;

/// Source of the current calendar day
pub trait Clock: Send {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock day
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same day.
#[derive(Debug, Clone)]
pub struct ManualClock {
    day: Arc<Mutex<NaiveDate>>,
}

impl ManualClock {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: Arc::new(Mutex::new(day)),
        }
    }

    pub fn set(&self, day: NaiveDate) {
        *self.day.lock() = day;
    }

    /// Move forward by `days` calendar days
    pub fn advance_days(&self, days: u64) {
        let mut day = self.day.lock();
        if let Some(next) = day.checked_add_days(Days::new(days)) {
            *day = next;
        }
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.day.lock()
    }
}
