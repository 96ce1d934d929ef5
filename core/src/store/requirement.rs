//! Store methods for the requirement table.

use crate::{
    config::{Requirement, RequirementTable},
    error::DeskResult,
};
use rusqlite::params;

use super::DeskStore;

impl DeskStore {
    pub fn save_requirement(&self, role: &str, req: &Requirement) -> DeskResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO requirement (role, min_count, max_count, priority)
             VALUES (?1, ?2, ?3, ?4)",
            params![role, req.min, req.max, req.priority],
        )?;
        Ok(())
    }

    pub fn save_requirements(&self, table: &RequirementTable) -> DeskResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (role, req) in table.iter() {
            tx.execute(
                "INSERT OR REPLACE INTO requirement (role, min_count, max_count, priority)
                 VALUES (?1, ?2, ?3, ?4)",
                params![role, req.min, req.max, req.priority],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// None when no requirement has ever been saved.
    pub fn load_requirements(&self) -> DeskResult<Option<RequirementTable>> {
        let mut stmt = self.conn.prepare(
            "SELECT role, min_count, max_count, priority FROM requirement",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    Requirement::new(row.get(1)?, row.get(2)?, row.get(3)?),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().collect()))
    }
}
