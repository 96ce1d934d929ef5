use crate::types::{RoleName, WorkerId};
use thiserror::Error;

/// Typed failures of a single allocation call.
/// The Display strings are what the worker sees at the scanner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationFailure {
    #[error("Badge not found! Please contact your supervisor.")]
    UnknownWorker { worker_id: WorkerId },

    #[error("No available roles match your training. Please see your supervisor.")]
    NoEligibleRole { worker_id: WorkerId },
}

impl AllocationFailure {
    pub fn worker_id(&self) -> &str {
        match self {
            Self::UnknownWorker { worker_id } | Self::NoEligibleRole { worker_id } => worker_id,
        }
    }

    /// Stable snake_case code used in the event log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownWorker { .. } => "unknown_worker",
            Self::NoEligibleRole { .. } => "no_eligible_role",
        }
    }
}

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid requirement for '{role}': {reason}")]
    InvalidRequirement { role: RoleName, reason: String },

    #[error("Role '{role}' is not in the catalog")]
    UnknownRole { role: RoleName },

    #[error("Invalid date '{value}' in store")]
    InvalidDate { value: String },

    #[error("Desk lock poisoned by a panicked scan")]
    LockPoisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
