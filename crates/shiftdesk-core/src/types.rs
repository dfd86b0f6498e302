use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row ids are SQLite `INTEGER PRIMARY KEY` values.
pub type DepartmentId = i64;
pub type EmployeeId = i64;
pub type ShiftId = i64;
pub type AssignmentId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Employee record. `email` is unique across the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub start_date: NaiveDate,
    pub department_id: Option<DepartmentId>,
    /// Relative URL of an uploaded profile picture, stored verbatim.
    pub avatar_url: Option<String>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating an employee. `start_date` defaults to today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Partial update: absent fields are left alone. For the nullable fields an
/// explicit `null` clears the value (`Some(None)`). Email is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Option<DepartmentId>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

/// Only called for keys present in the input, so `null` becomes `Some(None)`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl EmployeePatch {
    pub fn apply(&self, employee: &mut Employee) {
        if let Some(ref v) = self.first_name {
            employee.first_name = v.clone();
        }
        if let Some(ref v) = self.last_name {
            employee.last_name = v.clone();
        }
        if let Some(ref v) = self.phone {
            employee.phone = v.clone();
        }
        if let Some(v) = self.department_id {
            employee.department_id = v;
        }
        if let Some(ref v) = self.avatar_url {
            employee.avatar_url = v.clone();
        }
    }
}

/// Coarse classification of a shift, stored as its upper-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ShiftType::Morning => "MORNING",
            ShiftType::Afternoon => "AFTERNOON",
            ShiftType::Night => "NIGHT",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ShiftType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MORNING" => Ok(ShiftType::Morning),
            "AFTERNOON" => Ok(ShiftType::Afternoon),
            "NIGHT" => Ok(ShiftType::Night),
            other => Err(format!("unknown shift type: {other}")),
        }
    }
}

/// A staffed time window on one calendar date. `(date, name)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_type: ShiftType,
}

impl Shift {
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn overlaps(&self, other: &Shift) -> bool {
        self.slot().overlaps(&other.slot())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShift {
    pub name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub shift_type: ShiftType,
}

impl NewShift {
    /// Template for re-creating `source` on another date.
    pub fn cloned_from(source: &Shift, date: NaiveDate) -> Self {
        Self {
            name: source.name.clone(),
            date,
            start_time: source.start_time,
            end_time: source.end_time,
            shift_type: source.shift_type,
        }
    }
}

/// Links one employee to one shift. `(employee_id, shift_id)` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub employee_id: EmployeeId,
    pub shift_id: ShiftId,
}

/// Half-open `[start, end)` interval on a single date.
///
/// Times are compared exactly as stored; two slots on different dates never
/// overlap, and back-to-back slots (`a.end == b.start`) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date && self.start < other.end && self.end > other.start
    }
}
