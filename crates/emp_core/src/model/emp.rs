//! Employee domain model.
//!
//! # Responsibility
//! - Define the stored employee record and its write-side shapes.
//! - Own the small-integer code mapping for `gender`.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes afterwards.
//! - `create_time` is written once at insert.
//! - `update_time` is stamped by every update issued through core and never
//!   moves below its stored value.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage-generated employee identifier.
pub type EmpId = i64;

/// Gender code as persisted in `emp.gender`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Code `1`.
    Male,
    /// Code `2`.
    Female,
}

impl Gender {
    /// Returns the storage code.
    pub fn code(self) -> i16 {
        match self {
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Maps a storage code back to a gender, `None` for unknown codes.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

/// One row of the `emp` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emp {
    pub id: EmpId,
    /// Login name, unique across all rows.
    pub username: String,
    /// Display name.
    pub name: String,
    pub gender: Gender,
    /// Avatar path or URL.
    pub image: Option<String>,
    /// Job code. Opaque to core.
    pub job: Option<i16>,
    /// Persisted as `entrydate`.
    pub entry_date: Option<NaiveDate>,
    pub dept_id: Option<i64>,
    pub create_time: NaiveDateTime,
    pub update_time: NaiveDateTime,
}

/// Insert shape: every `Emp` column except the generated `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmp {
    pub username: String,
    pub name: String,
    pub gender: Gender,
    pub image: Option<String>,
    pub job: Option<i16>,
    pub entry_date: Option<NaiveDate>,
    pub dept_id: Option<i64>,
    pub create_time: NaiveDateTime,
    pub update_time: NaiveDateTime,
}

impl NewEmp {
    /// Creates an insert shape with both timestamps set to the current local time.
    ///
    /// Optional columns start as `None`.
    pub fn new(username: impl Into<String>, name: impl Into<String>, gender: Gender) -> Self {
        let now = now_timestamp();
        Self {
            username: username.into(),
            name: name.into(),
            gender,
            image: None,
            job: None,
            entry_date: None,
            dept_id: None,
            create_time: now,
            update_time: now,
        }
    }

    /// Builds the stored record once storage has assigned `id`.
    pub fn into_emp(self, id: EmpId) -> Emp {
        Emp {
            id,
            username: self.username,
            name: self.name,
            gender: self.gender,
            image: self.image,
            job: self.job,
            entry_date: self.entry_date,
            dept_id: self.dept_id,
            create_time: self.create_time,
            update_time: self.update_time,
        }
    }
}

/// Partial update for one row.
///
/// `None` leaves a column untouched. Nullable columns cannot be cleared
/// through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpPatch {
    pub id: EmpId,
    pub username: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub image: Option<String>,
    pub job: Option<i16>,
    pub entry_date: Option<NaiveDate>,
    pub dept_id: Option<i64>,
    /// Explicit stamp for `update_time`; `None` stamps the current time.
    /// A stamp older than the stored value leaves it unchanged.
    pub update_time: Option<NaiveDateTime>,
}

impl EmpPatch {
    /// Creates an empty patch targeting `id`.
    pub fn for_id(id: EmpId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Returns whether any data column is set. `update_time` does not count.
    pub fn has_changes(&self) -> bool {
        self.username.is_some()
            || self.name.is_some()
            || self.gender.is_some()
            || self.image.is_some()
            || self.job.is_some()
            || self.entry_date.is_some()
            || self.dept_id.is_some()
    }
}

/// Current local wall-clock time, the clock used for `create_time`/`update_time`.
pub fn now_timestamp() -> NaiveDateTime {
    Local::now().naive_local()
}
