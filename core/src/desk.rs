//! The assignment desk: the stateful caller around the pure engine.
//!
//! SCAN ORDER (fixed, documented, never reordered):
//!   1. Roll the board over if the clock has moved to a new day.
//!   2. Ask the engine for a decision against the live snapshot.
//!   3. On a fresh decision, persist board + history, then update memory.
//!   4. Emit exactly one event.
//!
//! RULES:
//!   - A failed scan never touches the board or the history log.
//!   - One scan completes before the next starts. `&mut self` enforces it
//!     in-process; SharedDesk enforces it across threads.
//!   - Requirement edits are validated here, not in the engine.

use crate::{
    clock::ShiftClock,
    command::DeskCommand,
    config::{DeskConfig, Requirement, RequirementField, RequirementTable, RoleCatalog},
    engine::{allocate, Allocation},
    error::{AllocationFailure, DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
    history::{HistoryLog, TodayBoard},
    roster::Roster,
    scoring::AllocationContext,
    store::DeskStore,
    types::{RoleName, SessionId, ShiftDate, WorkerId},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// What the scanner shows after a badge scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Assigned {
        worker_id: WorkerId,
        name: String,
        role: RoleName,
        /// True when the worker already had today's assignment.
        repeated: bool,
    },
    Rejected {
        worker_id: WorkerId,
        code: String,
        message: String,
    },
}

impl ScanOutcome {
    fn rejected(failure: &AllocationFailure) -> Self {
        Self::Rejected {
            worker_id: failure.worker_id().to_string(),
            code: failure.code().to_string(),
            message: failure.to_string(),
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            Self::Assigned { role, .. } => Some(role),
            Self::Rejected { .. } => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned { .. })
    }
}

pub struct AssignmentDesk {
    pub session_id: SessionId,
    pub clock: ShiftClock,
    config: DeskConfig,
    roster: Roster,
    requirements: RequirementTable,
    rotation_enabled: bool,
    board_date: ShiftDate,
    board: TodayBoard,
    history: HistoryLog,
    store: DeskStore,
}

impl AssignmentDesk {
    /// Open a desk under a fresh session id.
    pub fn open(
        config: DeskConfig,
        roster: Roster,
        store: DeskStore,
        clock: ShiftClock,
    ) -> DeskResult<Self> {
        let session_id = uuid::Uuid::new_v4().to_string();
        Self::open_session(session_id, config, roster, store, clock)
    }

    /// Open a desk under a caller-chosen session id.
    ///
    /// Saved requirements, rotation flag, history and today's board are
    /// restored from the store. Anything never saved falls back to the
    /// config and is saved immediately.
    pub fn open_session(
        session_id: SessionId,
        config: DeskConfig,
        roster: Roster,
        store: DeskStore,
        clock: ShiftClock,
    ) -> DeskResult<Self> {
        let requirements = match store.load_requirements()? {
            Some(saved) => saved,
            None => {
                store.save_requirements(&config.requirements)?;
                config.requirements.clone()
            }
        };
        let rotation_enabled = match store.load_rotation_enabled()? {
            Some(saved) => saved,
            None => {
                store.save_rotation_enabled(config.rotation_enabled)?;
                config.rotation_enabled
            }
        };
        let history = store.load_history()?;
        let today = clock.today();
        let board = store.load_board(today)?;
        store.insert_session(&session_id, env!("CARGO_PKG_VERSION"), today)?;

        let desk = Self {
            session_id,
            clock,
            config,
            roster,
            requirements,
            rotation_enabled,
            board_date: today,
            board,
            history,
            store,
        };
        log::info!(
            "desk: session {} opened for {today} ({} workers, {} on board)",
            desk.session_id,
            desk.roster.len(),
            desk.board.len()
        );
        desk.emit(DeskEvent::SessionOpened {
            session_id: desk.session_id.clone(),
            date: today,
            rotation_enabled,
        })?;
        Ok(desk)
    }

    // ── Scanner ────────────────────────────────────────────────

    /// Process one badge scan to completion.
    pub fn scan(&mut self, badge: &str) -> DeskResult<ScanOutcome> {
        self.sync_day()?;
        let badge = badge.trim();
        let today = self.board_date;

        let decision = {
            let ctx = self.context();
            allocate(badge, &self.roster, &ctx)
        };

        match decision {
            Ok(Allocation::Existing { role }) => {
                log::debug!("desk: {badge} re-scanned, keeps {role}");
                self.emit(DeskEvent::AssignmentRepeated {
                    date: today,
                    worker_id: badge.to_string(),
                    role: role.clone(),
                })?;
                Ok(self.assigned(badge, role, true))
            }
            Ok(Allocation::Fresh { role, pass, score }) => {
                self.store.record_assignment(today, badge, &role)?;
                self.board.assign(badge, role.clone());
                self.history.record(today, badge, role.clone());
                log::info!("desk: {badge} assigned {role} ({pass:?} pass, score {score})");
                self.emit(DeskEvent::WorkerAssigned {
                    date: today,
                    worker_id: badge.to_string(),
                    role: role.clone(),
                    pass,
                    score,
                })?;
                Ok(self.assigned(badge, role, false))
            }
            Err(failure) => {
                log::warn!("desk: scan of '{badge}' rejected: {}", failure.code());
                self.emit(DeskEvent::ScanRejected {
                    date: today,
                    worker_id: badge.to_string(),
                    reason: failure.code().to_string(),
                })?;
                Ok(ScanOutcome::rejected(&failure))
            }
        }
    }

    fn assigned(&self, badge: &str, role: RoleName, repeated: bool) -> ScanOutcome {
        let name = self
            .roster
            .get(badge)
            .map(|w| w.name.clone())
            .unwrap_or_default();
        ScanOutcome::Assigned {
            worker_id: badge.to_string(),
            name,
            role,
            repeated,
        }
    }

    /// The snapshot the engine decides against.
    pub fn context(&self) -> AllocationContext<'_> {
        AllocationContext {
            catalog: &self.config.catalog,
            requirements: &self.requirements,
            board: &self.board,
            history: &self.history,
            today: self.board_date,
            rotation_enabled: self.rotation_enabled,
            lookback_days: self.config.lookback_days,
            weights: &self.config.scoring,
        }
    }

    // ── Day handling ───────────────────────────────────────────

    /// Pin the clock to `date` and switch the board to it, loading
    /// whatever was saved for that day.
    pub fn open_day(&mut self, date: ShiftDate) -> DeskResult<()> {
        self.clock = ShiftClock::pinned(date);
        self.switch_board(date)
    }

    fn switch_board(&mut self, date: ShiftDate) -> DeskResult<()> {
        self.board = self.store.load_board(date)?;
        self.board_date = date;
        log::info!("desk: day {date} opened ({} carried over)", self.board.len());
        self.emit(DeskEvent::DayOpened {
            date,
            carried_over: self.board.len(),
        })
    }

    /// Advance the clock one day and open it.
    pub fn advance_day(&mut self) -> DeskResult<ShiftDate> {
        let next = self.clock.advance();
        self.switch_board(next)?;
        Ok(next)
    }

    fn sync_day(&mut self) -> DeskResult<()> {
        let today = self.clock.today();
        if today != self.board_date {
            self.switch_board(today)?;
        }
        Ok(())
    }

    // ── Admin ──────────────────────────────────────────────────

    /// Edit one field of a role's requirement. A role with no record
    /// starts from {min 0, max 0, priority 10}. Invalid results are
    /// rejected and the table is left untouched.
    pub fn update_requirement(
        &mut self,
        role: &str,
        field: RequirementField,
        value: i64,
    ) -> DeskResult<Requirement> {
        let base = self.requirements.get(role).copied().unwrap_or_else(Requirement::unset);
        self.apply_requirement(role, base.with_field(field, value), Some(field))
    }

    /// Replace a role's requirement wholesale.
    pub fn set_requirement(&mut self, role: &str, requirement: Requirement) -> DeskResult<Requirement> {
        self.apply_requirement(role, requirement, None)
    }

    fn apply_requirement(
        &mut self,
        role: &str,
        new: Requirement,
        field: Option<RequirementField>,
    ) -> DeskResult<Requirement> {
        self.sync_day()?;
        let date = self.board_date;

        let rejection = if !self.config.catalog.contains(role) {
            Some((
                DeskError::UnknownRole { role: role.to_string() },
                "role not in catalog".to_string(),
            ))
        } else {
            new.validate().err().map(|reason| {
                (
                    DeskError::InvalidRequirement {
                        role: role.to_string(),
                        reason: reason.clone(),
                    },
                    reason,
                )
            })
        };

        if let Some((err, reason)) = rejection {
            log::warn!("desk: requirement edit for '{role}' rejected: {reason}");
            self.emit(DeskEvent::RequirementRejected {
                date,
                role: role.to_string(),
                field,
                reason,
            })?;
            return Err(err);
        }

        self.store.save_requirement(role, &new)?;
        let old = self.requirements.get(role).copied();
        self.requirements.set(role, new);
        log::info!("desk: requirement for '{role}' set to {new:?}");
        self.emit(DeskEvent::RequirementUpdated {
            date,
            role: role.to_string(),
            old,
            new,
        })?;
        Ok(new)
    }

    pub fn set_rotation_enabled(&mut self, enabled: bool) -> DeskResult<()> {
        self.sync_day()?;
        self.store.save_rotation_enabled(enabled)?;
        self.rotation_enabled = enabled;
        log::info!("desk: rotation {}", if enabled { "enabled" } else { "disabled" });
        self.emit(DeskEvent::RotationToggled {
            date: self.board_date,
            enabled,
        })
    }

    /// Empty today's board. Today's history entry is kept, so rotation
    /// on later days still sees what was handed out before the clear.
    pub fn clear_today(&mut self) -> DeskResult<usize> {
        self.sync_day()?;
        let date = self.board_date;
        let removed = self.store.clear_board(date)?;
        self.board.clear();
        log::info!("desk: board for {date} cleared ({removed} entries)");
        self.emit(DeskEvent::BoardCleared { date, removed })?;
        Ok(removed)
    }

    /// Dispatch a host command.
    pub fn apply(&mut self, command: DeskCommand) -> DeskResult<Option<ScanOutcome>> {
        match command {
            DeskCommand::Scan { badge } => self.scan(&badge).map(Some),
            DeskCommand::UpdateRequirement { role, field, value } => {
                self.update_requirement(&role, field, value).map(|_| None)
            }
            DeskCommand::SetRequirement { role, requirement } => {
                self.set_requirement(&role, requirement).map(|_| None)
            }
            DeskCommand::SetRotation { enabled } => self.set_rotation_enabled(enabled).map(|_| None),
            DeskCommand::ClearToday => self.clear_today().map(|_| None),
            DeskCommand::AdvanceDay => self.advance_day().map(|_| None),
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn today(&self) -> ShiftDate {
        self.board_date
    }

    pub fn board(&self) -> &TodayBoard {
        &self.board
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn requirements(&self) -> &RequirementTable {
        &self.requirements
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.config.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rotation_enabled(&self) -> bool {
        self.rotation_enabled
    }

    pub fn store(&self) -> &DeskStore {
        &self.store
    }

    /// Events logged by this session on `date`.
    pub fn events_for_day(&self, date: ShiftDate) -> DeskResult<Vec<EventLogEntry>> {
        self.store.events_for_day(&self.session_id, date)
    }

    fn emit(&self, event: DeskEvent) -> DeskResult<()> {
        let entry = EventLogEntry {
            id: None,
            session_id: self.session_id.clone(),
            shift_date: self.board_date,
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(&event)?,
        };
        self.store.append_event(&entry)
    }
}

/// A desk shared between threads. Every operation holds the lock for its
/// whole duration, so two scans never interleave their read of the board
/// with each other's write.
#[derive(Clone)]
pub struct SharedDesk {
    inner: Arc<Mutex<AssignmentDesk>>,
}

impl SharedDesk {
    pub fn new(desk: AssignmentDesk) -> Self {
        Self {
            inner: Arc::new(Mutex::new(desk)),
        }
    }

    pub fn scan(&self, badge: &str) -> DeskResult<ScanOutcome> {
        self.with(|desk| desk.scan(badge))
    }

    pub fn apply(&self, command: DeskCommand) -> DeskResult<Option<ScanOutcome>> {
        self.with(|desk| desk.apply(command))
    }

    /// Run `f` with exclusive access to the desk.
    pub fn with<T>(&self, f: impl FnOnce(&mut AssignmentDesk) -> DeskResult<T>) -> DeskResult<T> {
        let mut guard = self.inner.lock().map_err(|_| DeskError::LockPoisoned)?;
        f(&mut guard)
    }
}
