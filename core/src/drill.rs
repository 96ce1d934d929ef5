//! Shift drill: a seeded multi-day run of the desk.
//!
//! Each drill day every roster worker scans exactly once, in an arrival
//! order drawn from the drill seed. The desk itself stays deterministic;
//! the seed only decides who walks up first, which decides who gets the
//! scarce slots. Same seed + same starting store = same boards.

use crate::{
    config::RoleCatalog,
    desk::{AssignmentDesk, ScanOutcome},
    error::DeskResult,
    name_generator::NameGenerator,
    rng::{DrillStream, RngBank, ScanRng},
    roster::Worker,
    types::ShiftDate,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Probability that a generated associate is trained for any one role.
const TRAINING_RATE: f64 = 0.25;

/// Badges for generated associates start here.
const GENERATED_BADGE_BASE: u64 = 50_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: ShiftDate,
    pub scanned: usize,
    pub assigned: usize,
    pub rejected: usize,
    /// Workers given the same role they held the previous day.
    pub repeats_of_previous_day: usize,
    pub understaffed_roles: Vec<String>,
}

pub struct Drill {
    bank: RngBank,
}

impl Drill {
    pub fn new(seed: u64) -> Self {
        Self {
            bank: RngBank::new(seed),
        }
    }

    /// Run `days` drill days. The first day is the desk's current day;
    /// every later day advances the desk's clock first.
    pub fn run(&self, desk: &mut AssignmentDesk, days: u64) -> DeskResult<Vec<DaySummary>> {
        let mut summaries = Vec::with_capacity(days as usize);
        for day in 0..days {
            if day > 0 {
                desk.advance_day()?;
            }
            summaries.push(self.run_day(desk, day)?);
        }
        Ok(summaries)
    }

    /// Scan every roster worker once on the desk's current day.
    pub fn run_day(&self, desk: &mut AssignmentDesk, day_index: u64) -> DeskResult<DaySummary> {
        let mut arrivals: Vec<String> = desk.roster().workers().iter().map(|w| w.id.clone()).collect();
        let mut rng = self.bank.for_stream_on_day(DrillStream::Arrivals, day_index);
        rng.shuffle(&mut arrivals);

        let mut summary = DaySummary {
            date: desk.today(),
            scanned: 0,
            assigned: 0,
            rejected: 0,
            repeats_of_previous_day: 0,
            understaffed_roles: Vec::new(),
        };

        for badge in &arrivals {
            summary.scanned += 1;
            match desk.scan(badge)? {
                ScanOutcome::Assigned { .. } => summary.assigned += 1,
                ScanOutcome::Rejected { .. } => summary.rejected += 1,
            }
        }

        let yesterday = summary.date - Duration::days(1);
        if let Some(previous) = desk.history().day(yesterday) {
            summary.repeats_of_previous_day = desk
                .board()
                .iter()
                .filter(|(worker_id, role)| previous.get(worker_id) == Some(*role))
                .count();
        }

        summary.understaffed_roles = desk
            .catalog()
            .iter()
            .filter(|role| {
                desk.requirements()
                    .get(role)
                    .is_some_and(|req| desk.board().count_for(role) < req.min)
            })
            .cloned()
            .collect();

        log::info!(
            "drill: {} scanned={} assigned={} rejected={} repeats={}",
            summary.date,
            summary.scanned,
            summary.assigned,
            summary.rejected,
            summary.repeats_of_previous_day
        );
        Ok(summary)
    }

    /// The reference site's four test associates followed by generated
    /// associates, up to `size` workers in total.
    pub fn demo_roster(&self, catalog: &RoleCatalog, size: usize) -> Vec<Worker> {
        let mut rng = self.bank.for_stream(DrillStream::Roster);
        demo_roster(catalog, size, &mut rng)
    }
}

pub fn demo_roster(catalog: &RoleCatalog, size: usize, rng: &mut ScanRng) -> Vec<Worker> {
    let mut workers: Vec<Worker> = reference_associates(catalog).into_iter().take(size).collect();

    let mut next_badge = GENERATED_BADGE_BASE;
    while workers.len() < size {
        let name = NameGenerator::generate_full_name(rng);
        let mut trained: Vec<&String> = catalog.iter().filter(|_| rng.chance(TRAINING_RATE)).collect();
        if trained.is_empty() && !catalog.is_empty() {
            let pick = rng.next_u64_below(catalog.len() as u64) as usize;
            trained.extend(catalog.iter().nth(pick));
        }
        workers.push(Worker::new(next_badge.to_string(), name).trained_in(trained.into_iter().cloned()));
        next_badge += 1;
    }
    workers
}

fn reference_associates(catalog: &RoleCatalog) -> Vec<Worker> {
    vec![
        Worker::new("11111111", "Test User 1").trained_in([
            "Pick Singles",
            "Pick Multis",
            "Stow",
            "Rebin",
            "Pack Singles",
        ]),
        Worker::new("22222222", "Test User 2").trained_in([
            "Pick Liquidation",
            "Pick Recycle",
            "Pick RMV-Hazmat",
            "CRETS",
            "Slam",
        ]),
        Worker::new("33333333", "Test User 3").trained_in([
            "Pick LTL",
            "Pick Donation",
            "WRAP",
            "TRANSHIP",
            "Pack LTL",
        ]),
        Worker::new("44444444", "Test User 4").trained_in(catalog.iter().cloned()),
    ]
}
