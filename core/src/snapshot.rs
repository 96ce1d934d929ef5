//! Staffing snapshot: per-role headcount against targets.
//!
//! This is the admin view of the board: one row per catalog role, in
//! catalog order, serializable to JSON for hosts.

use crate::{
    config::{Requirement, RequirementTable, RoleCatalog},
    desk::AssignmentDesk,
    history::TodayBoard,
    types::{RoleName, SessionId, ShiftDate},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    Under,
    Good,
    Over,
}

impl StaffingStatus {
    pub fn of(count: i64, req: &Requirement) -> Self {
        if count < req.min {
            Self::Under
        } else if count > req.max {
            Self::Over
        } else {
            Self::Good
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRow {
    pub role: RoleName,
    pub current: i64,
    /// The role's record, or {0, 0, 10} when it has none.
    pub requirement: Requirement,
    pub has_requirement: bool,
    pub status: StaffingStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingSnapshot {
    pub session_id: SessionId,
    pub date: ShiftDate,
    pub rotation_enabled: bool,
    pub assigned: usize,
    pub rows: Vec<StaffingRow>,
}

impl StaffingSnapshot {
    pub fn capture(desk: &AssignmentDesk) -> Self {
        Self {
            session_id: desk.session_id.clone(),
            date: desk.today(),
            rotation_enabled: desk.rotation_enabled(),
            assigned: desk.board().len(),
            rows: staffing_rows(desk.catalog(), desk.requirements(), desk.board()),
        }
    }

    pub fn row(&self, role: &str) -> Option<&StaffingRow> {
        self.rows.iter().find(|r| r.role == role)
    }

    /// Roles still short of their minimum.
    pub fn understaffed(&self) -> impl Iterator<Item = &StaffingRow> {
        self.rows.iter().filter(|r| r.status == StaffingStatus::Under)
    }
}

pub fn staffing_rows(
    catalog: &RoleCatalog,
    requirements: &RequirementTable,
    board: &TodayBoard,
) -> Vec<StaffingRow> {
    catalog
        .iter()
        .map(|role| {
            let current = board.count_for(role);
            let record = requirements.get(role).copied();
            let requirement = record.unwrap_or_else(Requirement::unset);
            StaffingRow {
                role: role.clone(),
                current,
                requirement,
                has_requirement: record.is_some(),
                status: StaffingStatus::of(current, &requirement),
            }
        })
        .collect()
}
