//! Shared primitive types used across the desk.

use chrono::NaiveDate;

/// A stable badge identifier. Unique per worker.
pub type WorkerId = String;

/// A process path name. Roles have no identity beyond their name.
pub type RoleName = String;

/// A calendar day in the site's local time zone.
pub type ShiftDate = NaiveDate;

/// The canonical desk session identifier.
pub type SessionId = String;
