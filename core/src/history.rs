//! Today's board and the day-indexed assignment history.
//!
//! Both are plain values. The desk mutates them after a successful
//! allocation; the engine only ever reads snapshots.

use crate::types::{RoleName, ShiftDate, WorkerId};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One day's worker → role map. At most one role per worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodayBoard {
    entries: HashMap<WorkerId, RoleName>,
}

impl TodayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, worker_id: &str) -> Option<&RoleName> {
        self.entries.get(worker_id)
    }

    pub fn contains(&self, worker_id: &str) -> bool {
        self.entries.contains_key(worker_id)
    }

    /// Record an assignment. Returns the role it replaced, if any.
    pub fn assign(&mut self, worker_id: impl Into<String>, role: impl Into<String>) -> Option<RoleName> {
        self.entries.insert(worker_id.into(), role.into())
    }

    pub fn with(mut self, worker_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.assign(worker_id, role);
        self
    }

    /// Number of workers currently holding `role`.
    pub fn count_for(&self, role: &str) -> i64 {
        self.entries.values().filter(|r| r.as_str() == role).count() as i64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WorkerId, &RoleName)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(WorkerId, RoleName)> for TodayBoard {
    fn from_iter<T: IntoIterator<Item = (WorkerId, RoleName)>>(iter: T) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Calendar date → that day's board. Serializes with ISO date keys.
///
/// Entries are created the first time anything is assigned on a date and
/// are never pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    days: BTreeMap<ShiftDate, TodayBoard>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, date: ShiftDate) -> Option<&TodayBoard> {
        self.days.get(&date)
    }

    /// Append an assignment under `date`, creating the day on first use.
    pub fn record(&mut self, date: ShiftDate, worker_id: impl Into<String>, role: impl Into<String>) {
        self.days.entry(date).or_default().assign(worker_id, role);
    }

    pub fn with(mut self, date: ShiftDate, worker_id: impl Into<String>, role: impl Into<String>) -> Self {
        self.record(date, worker_id, role);
        self
    }

    pub fn dates(&self) -> impl Iterator<Item = &ShiftDate> {
        self.days.keys()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// A worker's roles over the `window_days` days before `today`, newest
/// first. Days with no record for the worker are skipped, so the result
/// may be shorter than the window and its first element is the most
/// recent day that has a record, not necessarily yesterday.
pub fn lookback(
    worker_id: &str,
    history: &HistoryLog,
    today: ShiftDate,
    window_days: u32,
) -> Vec<RoleName> {
    (1..=i64::from(window_days))
        .filter_map(|i| {
            let date = today.checked_sub_signed(Duration::days(i))?;
            history.day(date)?.get(worker_id).cloned()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> ShiftDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn board_counts_roles() {
        let board = TodayBoard::new()
            .with("1", "Stow")
            .with("2", "Stow")
            .with("3", "Rebin");
        assert_eq!(board.count_for("Stow"), 2);
        assert_eq!(board.count_for("Rebin"), 1);
        assert_eq!(board.count_for("Slam"), 0);
    }

    #[test]
    fn reassigning_a_worker_keeps_one_entry() {
        let mut board = TodayBoard::new().with("1", "Stow");
        let previous = board.assign("1", "Rebin");
        assert_eq!(previous.as_deref(), Some("Stow"));
        assert_eq!(board.len(), 1);
        assert_eq!(board.count_for("Stow"), 0);
    }

    #[test]
    fn lookback_is_newest_first_and_skips_gaps() {
        let today = date(2024, 3, 10);
        let history = HistoryLog::new()
            .with(date(2024, 3, 9), "w", "Stow")
            .with(date(2024, 3, 7), "w", "Rebin")
            .with(date(2024, 3, 6), "w", "Slam")
            .with(date(2024, 3, 8), "other", "WRAP");

        assert_eq!(lookback("w", &history, today, 4), vec!["Stow", "Rebin", "Slam"]);
        assert_eq!(lookback("other", &history, today, 4), vec!["WRAP"]);
    }

    #[test]
    fn lookback_first_element_may_be_older_than_yesterday() {
        let today = date(2024, 3, 10);
        let history = HistoryLog::new().with(date(2024, 3, 7), "w", "Rebin");
        assert_eq!(lookback("w", &history, today, 4), vec!["Rebin"]);
    }

    #[test]
    fn lookback_ignores_today_and_days_outside_window() {
        let today = date(2024, 3, 10);
        let history = HistoryLog::new()
            .with(today, "w", "Stow")
            .with(date(2024, 3, 6), "w", "Rebin")
            .with(date(2024, 3, 5), "w", "Slam");

        assert_eq!(lookback("w", &history, today, 4), vec!["Rebin"]);
        assert!(lookback("w", &history, today, 0).is_empty());
    }

    #[test]
    fn lookback_crosses_month_boundaries() {
        let today = date(2024, 3, 2);
        let history = HistoryLog::new()
            .with(date(2024, 3, 1), "w", "Stow")
            .with(date(2024, 2, 29), "w", "Rebin");
        assert_eq!(lookback("w", &history, today, 4), vec!["Stow", "Rebin"]);
    }

    #[test]
    fn history_serializes_with_iso_dates() {
        let history = HistoryLog::new().with(date(2024, 3, 9), "w", "Stow");
        let json = serde_json::to_string(&history).expect("serialize");
        assert_eq!(json, r#"{"2024-03-09":{"w":"Stow"}}"#);
        let back: HistoryLog = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, history);
    }
}
