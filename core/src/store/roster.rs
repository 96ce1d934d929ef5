//! Store methods for the worker roster.

use crate::{
    error::DeskResult,
    roster::{Roster, Worker},
};
use rusqlite::params;
use std::collections::BTreeSet;

use super::DeskStore;

impl DeskStore {
    /// Replace the stored roster with `workers`, keeping their order.
    pub fn replace_roster(&self, workers: &[Worker]) -> DeskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM worker", [])?;
        for (position, w) in workers.iter().enumerate() {
            tx.execute(
                "INSERT OR REPLACE INTO worker (worker_id, name, trained_roles, position)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &w.id,
                    &w.name,
                    serde_json::to_string(&w.trained_roles)?,
                    position as i64,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_roster(&self) -> DeskResult<Roster> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, name, trained_roles FROM worker ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut workers = Vec::with_capacity(rows.len());
        for (id, name, roles_json) in rows {
            let trained_roles: BTreeSet<String> = serde_json::from_str(&roles_json)?;
            workers.push(Worker { id, name, trained_roles });
        }
        Ok(Roster::new(workers))
    }
}
