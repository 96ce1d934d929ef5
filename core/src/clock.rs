//! Shift clock: decides which calendar day a scan belongs to.

use crate::types::ShiftDate;
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShiftClock {
    /// Today in the host's local time zone.
    Local,
    /// A fixed day. Used by drills and tests.
    Pinned { date: ShiftDate },
}

impl ShiftClock {
    pub fn local() -> Self {
        Self::Local
    }

    pub fn pinned(date: ShiftDate) -> Self {
        Self::Pinned { date }
    }

    pub fn today(&self) -> ShiftDate {
        match self {
            Self::Local => Local::now().date_naive(),
            Self::Pinned { date } => *date,
        }
    }

    /// Move to the next day. A local clock becomes pinned at tomorrow.
    /// Returns the new day.
    pub fn advance(&mut self) -> ShiftDate {
        let next = self.today() + Duration::days(1);
        *self = Self::Pinned { date: next };
        next
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned { .. })
    }
}
