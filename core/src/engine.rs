//! The allocation engine: the decision at the heart of the desk.
//!
//! ORDER (fixed, never reordered):
//!   1. Resolve the worker from the roster.
//!   2. Return today's existing assignment untouched.
//!   3. Pass 1: roles below their minimum.
//!   4. Pass 2: roles below their maximum, only if pass 1 chose nothing.
//!
//! RULES:
//!   - Roles are visited in catalog order; a later role must score
//!     strictly higher to displace an earlier one.
//!   - Roles without a requirement record are never candidates.
//!   - Roles the worker is not trained for are never candidates.
//!   - Nothing here writes. The desk persists a Fresh allocation.

use crate::{
    error::AllocationFailure,
    roster::{Roster, Worker},
    scoring::{score, AllocationContext},
    types::RoleName,
};
use serde::{Deserialize, Serialize};

/// Which pass produced an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPass {
    Minimum,
    Maximum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// The worker was already on today's board. Nothing to persist.
    Existing { role: RoleName },
    /// A new decision. The caller must write it to the board and to
    /// today's history entry.
    Fresh { role: RoleName, pass: FillPass, score: i64 },
}

impl Allocation {
    pub fn role(&self) -> &str {
        match self {
            Self::Existing { role } | Self::Fresh { role, .. } => role,
        }
    }

    pub fn needs_persist(&self) -> bool {
        matches!(self, Self::Fresh { .. })
    }
}

/// Decide a role for `worker_id` against the snapshot in `ctx`.
pub fn allocate(
    worker_id: &str,
    roster: &Roster,
    ctx: &AllocationContext<'_>,
) -> Result<Allocation, AllocationFailure> {
    let worker = roster.get(worker_id).ok_or_else(|| AllocationFailure::UnknownWorker {
        worker_id: worker_id.to_string(),
    })?;

    if let Some(role) = ctx.board.get(worker_id) {
        return Ok(Allocation::Existing { role: role.clone() });
    }

    let counts: Vec<(&RoleName, i64)> = ctx
        .catalog
        .iter()
        .map(|role| (role, ctx.board.count_for(role)))
        .collect();

    let chosen = best_open_role(worker, &counts, ctx, FillPass::Minimum)
        .map(|(role, score)| (role, score, FillPass::Minimum))
        .or_else(|| {
            best_open_role(worker, &counts, ctx, FillPass::Maximum)
                .map(|(role, score)| (role, score, FillPass::Maximum))
        });

    match chosen {
        Some((role, score, pass)) => Ok(Allocation::Fresh { role: role.clone(), pass, score }),
        None => Err(AllocationFailure::NoEligibleRole {
            worker_id: worker_id.to_string(),
        }),
    }
}

/// One pass over the catalog. Returns the first role with the strictly
/// highest score among roles that still have a slot under this pass.
fn best_open_role<'c>(
    worker: &Worker,
    counts: &[(&'c RoleName, i64)],
    ctx: &AllocationContext<'_>,
    pass: FillPass,
) -> Option<(&'c RoleName, i64)> {
    let mut best: Option<&RoleName> = None;
    let mut best_score: i64 = -1;

    for &(role, count) in counts {
        let Some(req) = ctx.requirements.get(role) else {
            continue;
        };
        let limit = match pass {
            FillPass::Minimum => req.min,
            FillPass::Maximum => req.max,
        };
        // Untrained roles are never candidates, even when every trained
        // open role scores below zero.
        if count >= limit || !worker.is_trained_for(role) {
            continue;
        }

        let s = score(worker, role, ctx);
        log::debug!(
            "allocate: worker={} pass={pass:?} role={role} count={count} limit={limit} score={s}",
            worker.id
        );
        if s > best_score {
            best_score = s;
            best = Some(role);
        }
    }

    best.map(|role| (role, best_score))
}
