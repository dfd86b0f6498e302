use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use shiftdesk_core::types::{Department, Employee, EmployeeId, EmployeePatch, NewEmployee};
use tracing::info;

use crate::error::Result;
use crate::stores::EmployeeStore;

const EMPLOYEE_SELECT_SQL: &str = "SELECT id, first_name, last_name, email, phone, start_date,
        department_id, avatar_url
 FROM employees";

/// SQLite-backed store over a borrowed connection.
///
/// Usually built by [`crate::Database::with_transaction`] over a live
/// transaction, so every call made through one instance shares its fate.
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    // --- departments -------------------------------------------------------

    pub fn create_department(&self, name: &str) -> Result<Department> {
        self.conn
            .execute("INSERT INTO departments (name) VALUES (?1)", [name])?;
        let id = self.conn.last_insert_rowid();
        info!(department_id = id, %name, "department created");
        Ok(Department {
            id,
            name: name.to_string(),
        })
    }

    pub fn list_departments(&self) -> Result<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM departments ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Department {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // --- employees ---------------------------------------------------------

    pub fn create_employee(&self, new: &NewEmployee) -> Result<Employee> {
        let start_date = new
            .start_date
            .unwrap_or_else(|| Local::now().date_naive());
        self.conn.execute(
            "INSERT INTO employees
             (first_name, last_name, email, phone, start_date, department_id, avatar_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.first_name,
                new.last_name,
                new.email,
                new.phone,
                start_date,
                new.department_id,
                new.avatar_url,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(employee_id = id, email = %new.email, "employee created");
        Ok(Employee {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            start_date,
            department_id: new.department_id,
            avatar_url: new.avatar_url.clone(),
        })
    }

    /// Apply a partial update. Returns `None` when the employee does not exist.
    pub fn update_employee(
        &self,
        id: EmployeeId,
        patch: &EmployeePatch,
    ) -> Result<Option<Employee>> {
        let Some(mut employee) = self.get_employee(id)? else {
            return Ok(None);
        };
        patch.apply(&mut employee);
        self.conn.execute(
            "UPDATE employees SET first_name = ?1, last_name = ?2, phone = ?3,
                department_id = ?4, avatar_url = ?5
             WHERE id = ?6",
            params![
                employee.first_name,
                employee.last_name,
                employee.phone,
                employee.department_id,
                employee.avatar_url,
                id,
            ],
        )?;
        Ok(Some(employee))
    }

    /// Deletes the employee together with all of their assignments.
    pub fn delete_employee(&self, id: EmployeeId) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1", [id])?;
        if n > 0 {
            info!(employee_id = id, "employee deleted");
        }
        Ok(n > 0)
    }
}

fn row_to_employee(row: &rusqlite::Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        start_date: row.get(5)?,
        department_id: row.get(6)?,
        avatar_url: row.get(7)?,
    })
}

impl EmployeeStore for SqliteStore<'_> {
    fn list_employees(&self) -> Result<Vec<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id"))?;
        let rows = stmt
            .query_map([], row_to_employee)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        let employee = self
            .conn
            .query_row(
                &format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1"),
                [id],
                row_to_employee,
            )
            .optional()?;
        Ok(employee)
    }
}
