//! Worker records and the roster they are resolved from.
//!
//! The roster is supplied by the caller and is immutable for the length of
//! a shift. The engine only reads it.

use crate::types::{RoleName, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub name: String,
    pub trained_roles: BTreeSet<RoleName>,
}

impl Worker {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trained_roles: BTreeSet::new(),
        }
    }

    /// Adds trained roles.
    pub fn trained_in<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trained_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn is_trained_for(&self, role: &str) -> bool {
        self.trained_roles.contains(role)
    }
}

/// Workers indexed by badge id. Keeps load order for listings.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    workers: Vec<Worker>,
    by_id: HashMap<WorkerId, usize>,
}

impl Roster {
    /// Build a roster. A later record with a duplicate badge replaces the
    /// earlier one in place.
    pub fn new(workers: Vec<Worker>) -> Self {
        let mut roster = Self::default();
        for worker in workers {
            roster.insert(worker);
        }
        roster
    }

    pub fn insert(&mut self, worker: Worker) {
        match self.by_id.get(&worker.id) {
            Some(&idx) => {
                log::warn!("roster: duplicate badge {} replaces earlier record", worker.id);
                self.workers[idx] = worker;
            }
            None => {
                self.by_id.insert(worker.id.clone(), self.workers.len());
                self.workers.push(worker);
            }
        }
    }

    pub fn get(&self, worker_id: &str) -> Option<&Worker> {
        self.by_id.get(worker_id).map(|&idx| &self.workers[idx])
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
