use serde::{Deserialize, Serialize};
use crate::config::{Requirement, RequirementField};

/// Commands a host (scanner terminal, admin console, IPC client) can
/// send to the desk. Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DeskCommand {
    // ── Scanner ───────────────────────────────────
    Scan { badge: String },

    // ── Admin ─────────────────────────────────────
    UpdateRequirement {
        role:  String,
        field: RequirementField,
        value: i64,
    },
    SetRequirement {
        role:        String,
        requirement: Requirement,
    },
    SetRotation { enabled: bool },
    ClearToday,

    // ── Clock ─────────────────────────────────────
    AdvanceDay,
}
