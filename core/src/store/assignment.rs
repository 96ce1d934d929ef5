//! Store methods for today's board and the rotation history.

use crate::{
    error::DeskResult,
    history::{HistoryLog, TodayBoard},
    types::ShiftDate,
};
use rusqlite::params;

use super::{parse_date, DeskStore};

impl DeskStore {
    /// Write one decision to the board and to that day's history entry.
    /// Both rows land or neither does.
    pub fn record_assignment(&self, date: ShiftDate, worker_id: &str, role: &str) -> DeskResult<()> {
        let day = date.to_string();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO board_entry (shift_date, worker_id, role) VALUES (?1, ?2, ?3)",
            params![day, worker_id, role],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO history_entry (shift_date, worker_id, role) VALUES (?1, ?2, ?3)",
            params![day, worker_id, role],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn load_board(&self, date: ShiftDate) -> DeskResult<TodayBoard> {
        let mut stmt = self.conn.prepare(
            "SELECT worker_id, role FROM board_entry WHERE shift_date = ?1",
        )?;
        let board = stmt
            .query_map(params![date.to_string()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<TodayBoard, _>>()?;
        Ok(board)
    }

    /// Empty the board for `date`. History is left alone.
    /// Returns the number of entries removed.
    pub fn clear_board(&self, date: ShiftDate) -> DeskResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM board_entry WHERE shift_date = ?1",
            params![date.to_string()],
        )?;
        Ok(removed)
    }

    pub fn load_history(&self) -> DeskResult<HistoryLog> {
        let mut stmt = self.conn.prepare(
            "SELECT shift_date, worker_id, role FROM history_entry ORDER BY shift_date ASC",
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

        let mut history = HistoryLog::new();
        for (day, worker_id, role) in rows {
            history.record(parse_date(&day)?, worker_id, role);
        }
        Ok(history)
    }

    /// Number of history rows recorded under `date` (for tests).
    pub fn history_count_for_day(&self, date: ShiftDate) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM history_entry WHERE shift_date = ?1",
            params![date.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
