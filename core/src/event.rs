//! Desk events: the audit trail of every scan and admin change.
//!
//! RULE: every state change on the desk emits exactly one event, and
//! every event is persisted to the store's event log.

use crate::{
    config::{Requirement, RequirementField},
    engine::FillPass,
    types::{RoleName, SessionId, ShiftDate, WorkerId},
};
use serde::{Deserialize, Serialize};

/// Variants are appended over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    // ── Session events ─────────────────────────────
    SessionOpened {
        session_id: SessionId,
        date: ShiftDate,
        rotation_enabled: bool,
    },
    DayOpened {
        date: ShiftDate,
        carried_over: usize,
    },

    // ── Scan events ────────────────────────────────
    WorkerAssigned {
        date: ShiftDate,
        worker_id: WorkerId,
        role: RoleName,
        pass: FillPass,
        score: i64,
    },
    AssignmentRepeated {
        date: ShiftDate,
        worker_id: WorkerId,
        role: RoleName,
    },
    ScanRejected {
        date: ShiftDate,
        worker_id: WorkerId,
        reason: String,
    },

    // ── Admin events ───────────────────────────────
    RequirementUpdated {
        date: ShiftDate,
        role: RoleName,
        old: Option<Requirement>,
        new: Requirement,
    },
    RequirementRejected {
        date: ShiftDate,
        role: RoleName,
        field: Option<RequirementField>,
        reason: String,
    },
    RotationToggled {
        date: ShiftDate,
        enabled: bool,
    },
    BoardCleared {
        date: ShiftDate,
        removed: usize,
    },
}

impl DeskEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionOpened { .. }       => "session_opened",
            Self::DayOpened { .. }           => "day_opened",
            Self::WorkerAssigned { .. }      => "worker_assigned",
            Self::AssignmentRepeated { .. }  => "assignment_repeated",
            Self::ScanRejected { .. }        => "scan_rejected",
            Self::RequirementUpdated { .. }  => "requirement_updated",
            Self::RequirementRejected { .. } => "requirement_rejected",
            Self::RotationToggled { .. }     => "rotation_toggled",
            Self::BoardCleared { .. }        => "board_cleared",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub session_id: SessionId,
    pub shift_date: ShiftDate,
    pub event_type: String,
    pub payload: String, // JSON-serialized DeskEvent
}

impl EventLogEntry {
    pub fn decode(&self) -> serde_json::Result<DeskEvent> {
        serde_json::from_str(&self.payload)
    }
}
