//! Rotation score: how well a role suits a worker today.
//!
//! score = 0 for an untrained role, otherwise
//!   base + trained_bonus
//!   - repeat_penalty      if the newest lookback entry is this role
//!   - occurrence_penalty  per lookback entry equal to this role
//!   + (priority_pivot - priority) * priority_step
//!
//! The two rotation penalties overlap on purpose: a repeat of the most
//! recent day is charged both.

use crate::{
    config::{RequirementTable, RoleCatalog, ScoringWeights},
    history::{lookback, HistoryLog, TodayBoard},
    roster::Worker,
    types::ShiftDate,
};

/// Read-only snapshot of everything a decision looks at.
#[derive(Debug, Clone, Copy)]
pub struct AllocationContext<'a> {
    pub catalog: &'a RoleCatalog,
    pub requirements: &'a RequirementTable,
    pub board: &'a TodayBoard,
    pub history: &'a HistoryLog,
    pub today: ShiftDate,
    pub rotation_enabled: bool,
    pub lookback_days: u32,
    pub weights: &'a ScoringWeights,
}

/// Score `role` for `worker`. Pure.
pub fn score(worker: &Worker, role: &str, ctx: &AllocationContext<'_>) -> i64 {
    if !worker.is_trained_for(role) {
        return 0;
    }
    let w = ctx.weights;
    let mut score = w.base + w.trained_bonus;

    if ctx.rotation_enabled {
        let recent = lookback(&worker.id, ctx.history, ctx.today, ctx.lookback_days);
        if recent.first().is_some_and(|r| r == role) {
            score -= w.repeat_penalty;
        }
        let occurrences = recent.iter().filter(|r| r.as_str() == role).count() as i64;
        score -= occurrences * w.occurrence_penalty;
    }

    score + priority_adjustment(role, ctx)
}

/// Lower priority number means more urgent, so a larger bonus.
/// Out-of-range priorities are used as given.
pub fn priority_adjustment(role: &str, ctx: &AllocationContext<'_>) -> i64 {
    let w = ctx.weights;
    let priority = ctx
        .requirements
        .get(role)
        .map_or(w.default_priority, |req| req.priority);
    (w.priority_pivot - priority) * w.priority_step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Requirement;
    use chrono::{Duration, NaiveDate};

    struct Fixture {
        catalog: RoleCatalog,
        requirements: RequirementTable,
        board: TodayBoard,
        history: HistoryLog,
        weights: ScoringWeights,
        today: ShiftDate,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: RoleCatalog::new(["Stow", "Rebin", "Slam"]),
                requirements: RequirementTable::new()
                    .with("Stow", Requirement::new(1, 2, 5))
                    .with("Rebin", Requirement::new(1, 2, 5))
                    .with("Slam", Requirement::new(1, 2, 1)),
                board: TodayBoard::new(),
                history: HistoryLog::new(),
                weights: ScoringWeights::default(),
                today: NaiveDate::from_ymd_opt(2024, 5, 20).expect("date"),
            }
        }

        fn days_ago(&self, n: i64) -> ShiftDate {
            self.today - Duration::days(n)
        }

        fn ctx(&self, rotation_enabled: bool) -> AllocationContext<'_> {
            AllocationContext {
                catalog: &self.catalog,
                requirements: &self.requirements,
                board: &self.board,
                history: &self.history,
                today: self.today,
                rotation_enabled,
                lookback_days: 4,
                weights: &self.weights,
            }
        }
    }

    fn worker() -> Worker {
        Worker::new("w", "Worker").trained_in(["Stow", "Rebin", "Slam"])
    }

    #[test]
    fn untrained_role_scores_zero_regardless_of_history() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(1), "w", "WRAP");
        let w = Worker::new("w", "Worker").trained_in(["Stow"]);
        assert_eq!(score(&w, "Rebin", &fx.ctx(true)), 0);
        assert_eq!(score(&w, "Rebin", &fx.ctx(false)), 0);
        assert_eq!(score(&w, "WRAP", &fx.ctx(true)), 0);
    }

    #[test]
    fn fresh_trained_role_scores_base_plus_priority() {
        let fx = Fixture::new();
        // 150 + (15 - 5) * 10
        assert_eq!(score(&worker(), "Stow", &fx.ctx(true)), 250);
        // 150 + (15 - 1) * 10
        assert_eq!(score(&worker(), "Slam", &fx.ctx(true)), 290);
    }

    #[test]
    fn repeat_of_most_recent_day_is_charged_both_penalties() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(1), "w", "Stow");
        let ctx = fx.ctx(true);
        let repeated = score(&worker(), "Stow", &ctx);
        let untouched = score(&worker(), "Rebin", &ctx);
        assert_eq!(repeated, 150 - 80 - 30 + 100);
        assert_eq!(untouched - repeated, 110);
    }

    #[test]
    fn older_occurrences_only_cost_the_occurrence_penalty() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(1), "w", "Rebin");
        fx.history.record(fx.days_ago(2), "w", "Stow");
        fx.history.record(fx.days_ago(3), "w", "Stow");
        let ctx = fx.ctx(true);
        assert_eq!(score(&worker(), "Stow", &ctx), 250 - 60);
        assert_eq!(score(&worker(), "Rebin", &ctx), 250 - 80 - 30);
    }

    #[test]
    fn window_includes_four_days_ago_but_not_five() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(5), "w", "Stow");
        assert_eq!(score(&worker(), "Stow", &fx.ctx(true)), 250);

        fx.history.record(fx.days_ago(4), "w", "Stow");
        // Newest present entry, so both penalties apply.
        assert_eq!(score(&worker(), "Stow", &fx.ctx(true)), 250 - 110);
    }

    #[test]
    fn rotation_disabled_ignores_history() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(1), "w", "Stow");
        fx.history.record(fx.days_ago(2), "w", "Stow");
        assert_eq!(score(&worker(), "Stow", &fx.ctx(false)), 250);
    }

    #[test]
    fn missing_requirement_uses_default_priority() {
        let mut fx = Fixture::new();
        fx.requirements.remove("Rebin");
        // 150 + (15 - 10) * 10
        assert_eq!(score(&worker(), "Rebin", &fx.ctx(true)), 200);
    }

    #[test]
    fn out_of_range_priority_is_taken_literally() {
        let mut fx = Fixture::new();
        fx.requirements.set("Stow", Requirement::new(1, 2, 40));
        fx.requirements.set("Rebin", Requirement::new(1, 2, -5));
        let ctx = fx.ctx(true);
        assert_eq!(score(&worker(), "Stow", &ctx), 150 - 250);
        assert_eq!(score(&worker(), "Rebin", &ctx), 150 + 200);
    }

    #[test]
    fn scoring_does_not_touch_history() {
        let mut fx = Fixture::new();
        fx.history.record(fx.days_ago(1), "w", "Stow");
        let before = fx.history.clone();
        let _ = score(&worker(), "Stow", &fx.ctx(true));
        assert_eq!(fx.history, before);
    }
}
