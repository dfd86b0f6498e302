use rusqlite::{params, OptionalExtension};
use shiftdesk_core::types::{Assignment, AssignmentId, EmployeeId, ShiftId};
use tracing::{debug, info};

use crate::error::Result;
use crate::store::SqliteStore;
use crate::stores::AssignmentStore;

const ASSIGNMENT_SELECT_SQL: &str = "SELECT id, employee_id, shift_id FROM shift_assignments";

fn row_to_assignment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        shift_id: row.get(2)?,
    })
}

impl SqliteStore<'_> {
    fn query_assignments(
        &self,
        filter: &str,
        args: impl rusqlite::Params,
    ) -> Result<Vec<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} {filter} ORDER BY id"))?;
        let rows = stmt
            .query_map(args, row_to_assignment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl AssignmentStore for SqliteStore<'_> {
    fn list_assignments(&self) -> Result<Vec<Assignment>> {
        self.query_assignments("", [])
    }

    fn list_assignments_by_shift(&self, shift_id: ShiftId) -> Result<Vec<Assignment>> {
        self.query_assignments("WHERE shift_id = ?1", [shift_id])
    }

    fn list_assignments_by_employee(&self, employee_id: EmployeeId) -> Result<Vec<Assignment>> {
        self.query_assignments("WHERE employee_id = ?1", [employee_id])
    }

    fn get_assignment(&self, id: AssignmentId) -> Result<Option<Assignment>> {
        let assignment = self
            .conn
            .query_row(
                &format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1"),
                [id],
                row_to_assignment,
            )
            .optional()?;
        Ok(assignment)
    }

    fn create_assignment(&self, employee_id: EmployeeId, shift_id: ShiftId) -> Result<Assignment> {
        self.conn.execute(
            "INSERT INTO shift_assignments (employee_id, shift_id) VALUES (?1, ?2)",
            params![employee_id, shift_id],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(assignment_id = id, employee_id, shift_id, "assignment created");
        Ok(Assignment {
            id,
            employee_id,
            shift_id,
        })
    }

    fn update_assignment(
        &self,
        id: AssignmentId,
        employee_id: EmployeeId,
        shift_id: ShiftId,
    ) -> Result<Option<Assignment>> {
        let n = self.conn.execute(
            "UPDATE shift_assignments SET employee_id = ?1, shift_id = ?2 WHERE id = ?3",
            params![employee_id, shift_id, id],
        )?;
        if n == 0 {
            return Ok(None);
        }
        debug!(assignment_id = id, employee_id, shift_id, "assignment updated");
        Ok(Some(Assignment {
            id,
            employee_id,
            shift_id,
        }))
    }

    fn delete_assignment(&self, id: AssignmentId) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM shift_assignments WHERE id = ?1", [id])?;
        if n > 0 {
            info!(assignment_id = id, "assignment deleted");
        }
        Ok(n > 0)
    }
}
