use rusqlite::{params, OptionalExtension};
use shiftdesk_core::types::{NewShift, Shift, ShiftId, ShiftType};
use tracing::info;

use crate::error::Result;
use crate::store::SqliteStore;
use crate::stores::ShiftStore;

const SHIFT_SELECT_SQL: &str =
    "SELECT id, name, date, start_time, end_time, shift_type FROM shifts";

fn row_to_shift(row: &rusqlite::Row<'_>) -> rusqlite::Result<Shift> {
    let type_str: String = row.get(5)?;
    let shift_type = type_str.parse::<ShiftType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(Shift {
        id: row.get(0)?,
        name: row.get(1)?,
        date: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        shift_type,
    })
}

impl SqliteStore<'_> {
    /// Shifts in calendar order: `(date, start_time, id)`.
    pub fn list_shifts_chronological(&self) -> Result<Vec<Shift>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SHIFT_SELECT_SQL} ORDER BY date, start_time, id"
        ))?;
        let rows = stmt
            .query_map([], row_to_shift)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl ShiftStore for SqliteStore<'_> {
    fn list_shifts(&self) -> Result<Vec<Shift>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SHIFT_SELECT_SQL} ORDER BY id"))?;
        let rows = stmt
            .query_map([], row_to_shift)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_shift(&self, id: ShiftId) -> Result<Option<Shift>> {
        let shift = self
            .conn
            .query_row(
                &format!("{SHIFT_SELECT_SQL} WHERE id = ?1"),
                [id],
                row_to_shift,
            )
            .optional()?;
        Ok(shift)
    }

    fn create_shift(&self, shift: &NewShift) -> Result<Shift> {
        self.conn.execute(
            "INSERT INTO shifts (name, date, start_time, end_time, shift_type)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                shift.name,
                shift.date,
                shift.start_time,
                shift.end_time,
                shift.shift_type.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(shift_id = id, name = %shift.name, date = %shift.date, "shift created");
        Ok(Shift {
            id,
            name: shift.name.clone(),
            date: shift.date,
            start_time: shift.start_time,
            end_time: shift.end_time,
            shift_type: shift.shift_type,
        })
    }

    fn delete_shift(&self, id: ShiftId) -> Result<bool> {
        let n = self.conn.execute("DELETE FROM shifts WHERE id = ?1", [id])?;
        if n > 0 {
            info!(shift_id = id, "shift deleted");
        }
        Ok(n > 0)
    }
}
