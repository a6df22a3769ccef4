//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Translate employee use-cases into parameterized statements on `emp`.
//! - Assemble the conditional list predicate and the partial-update
//!   assignment list from whichever inputs are present.
//!
//! # Invariants
//! - Every value reaches SQLite as a bound parameter, never as SQL text.
//! - `update2` always assigns `update_time`, even for an otherwise empty patch,
//!   and never moves it below the stored value.
//! - Zero affected rows on `delete`/`update2` is reported as a count, not an error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::emp::{now_timestamp, Emp, EmpId, EmpPatch, Gender, NewEmp};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMP_TABLE: &str = "emp";

const EMP_COLUMNS: [&str; 10] = [
    "id",
    "username",
    "name",
    "gender",
    "image",
    "job",
    "entrydate",
    "dept_id",
    "create_time",
    "update_time",
];

const EMP_SELECT_SQL: &str = "SELECT
    id,
    username,
    name,
    gender,
    image,
    job,
    entrydate,
    dept_id,
    create_time,
    update_time
FROM emp";

// Matches the text layout rusqlite's chrono binding writes, so values bound
// through `Value` compare consistently with values bound through `params!`.
const DATE_FORMAT: &str = "%F";
const TIMESTAMP_FORMAT: &str = "%F %T%.f";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    /// Storage failure, including constraint violations.
    Db(DbError),
    /// A stored row cannot be decoded into `Emp`.
    InvalidData(String),
    /// Connection schema version differs from the one this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted emp data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    /// Returns whether the underlying storage rejected the write on a
    /// constraint (uniqueness, not-null, foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Filters for listing employees. Every `None` drops its clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmpListQuery {
    /// Substring of `name`; `%`, `_` and `\` match literally.
    pub name: Option<String>,
    pub gender: Option<Gender>,
    /// Inclusive lower bound on `entrydate`.
    pub entry_date_begin: Option<NaiveDate>,
    /// Inclusive upper bound on `entrydate`.
    pub entry_date_end: Option<NaiveDate>,
}

/// Repository interface for the employee table.
pub trait EmpRepository {
    /// Removes the row with `id`; returns the number of rows removed.
    fn delete(&self, id: EmpId) -> RepoResult<usize>;
    /// Inserts a row and returns its generated id.
    fn insert(&self, emp: &NewEmp) -> RepoResult<EmpId>;
    /// Lists rows matching every present filter, newest `update_time` first.
    fn list(&self, query: &EmpListQuery) -> RepoResult<Vec<Emp>>;
    /// Applies the present patch fields to row `patch.id`; returns rows changed.
    fn update2(&self, patch: &EmpPatch) -> RepoResult<usize>;
    /// Loads one row by id.
    fn get(&self, id: EmpId) -> RepoResult<Option<Emp>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmpRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmpRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when `emp` is malformed.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_emp_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmpRepository for SqliteEmpRepository<'_> {
    fn delete(&self, id: EmpId) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM emp WHERE id = ?1;", [id])?;
        Ok(changed)
    }

    fn insert(&self, emp: &NewEmp) -> RepoResult<EmpId> {
        self.conn.execute(
            "INSERT INTO emp (
                username,
                name,
                gender,
                image,
                job,
                entrydate,
                dept_id,
                create_time,
                update_time
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                emp.username.as_str(),
                emp.name.as_str(),
                emp.gender.code(),
                emp.image.as_deref(),
                emp.job,
                emp.entry_date,
                emp.dept_id,
                emp.create_time,
                emp.update_time,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list(&self, query: &EmpListQuery) -> RepoResult<Vec<Emp>> {
        let (sql, bind_values) = build_list_sql(query);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut emps = Vec::new();

        while let Some(row) = rows.next()? {
            emps.push(parse_emp_row(row)?);
        }

        Ok(emps)
    }

    fn update2(&self, patch: &EmpPatch) -> RepoResult<usize> {
        let stamp = patch.update_time.unwrap_or_else(now_timestamp);
        let (sql, bind_values) = build_update_sql(patch, stamp);
        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn get(&self, id: EmpId) -> RepoResult<Option<Emp>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMP_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_emp_row(row)?));
        }

        Ok(None)
    }
}

/// Ordered SQL fragments with the values they bind, in placeholder order.
#[derive(Debug, Default)]
struct Fragments {
    sql: Vec<&'static str>,
    values: Vec<Value>,
}

impl Fragments {
    fn push(&mut self, sql: &'static str, values: impl IntoIterator<Item = Value>) {
        self.sql.push(sql);
        self.values.extend(values);
    }

    fn push_some<T>(
        &mut self,
        sql: &'static str,
        value: Option<T>,
        to_value: impl FnOnce(T) -> Value,
    ) {
        if let Some(value) = value {
            self.push(sql, [to_value(value)]);
        }
    }

    fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    fn joined(&self, separator: &str) -> String {
        self.sql.join(separator)
    }
}

fn build_list_sql(query: &EmpListQuery) -> (String, Vec<Value>) {
    let mut predicate = Fragments::default();

    predicate.push_some(
        "name LIKE '%' || ? || '%' ESCAPE '\\'",
        query.name.as_deref(),
        |name| Value::Text(escape_like(name)),
    );
    predicate.push_some("gender = ?", query.gender, gender_value);
    match (query.entry_date_begin, query.entry_date_end) {
        (Some(begin), Some(end)) => predicate.push(
            "entrydate BETWEEN ? AND ?",
            [date_value(begin), date_value(end)],
        ),
        (Some(begin), None) => predicate.push("entrydate >= ?", [date_value(begin)]),
        (None, Some(end)) => predicate.push("entrydate <= ?", [date_value(end)]),
        (None, None) => {}
    }

    let mut sql = EMP_SELECT_SQL.to_string();
    if !predicate.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicate.joined(" AND "));
    }
    sql.push_str(" ORDER BY update_time DESC, id ASC;");

    (sql, predicate.values)
}

fn build_update_sql(patch: &EmpPatch, stamp: NaiveDateTime) -> (String, Vec<Value>) {
    let mut assignments = Fragments::default();

    assignments.push_some("username = ?", patch.username.clone(), Value::Text);
    assignments.push_some("name = ?", patch.name.clone(), Value::Text);
    assignments.push_some("gender = ?", patch.gender, gender_value);
    assignments.push_some("image = ?", patch.image.clone(), Value::Text);
    assignments.push_some("job = ?", patch.job, |job| Value::Integer(i64::from(job)));
    assignments.push_some("entrydate = ?", patch.entry_date, date_value);
    assignments.push_some("dept_id = ?", patch.dept_id, Value::Integer);
    // Stamps share one text layout, so text MAX is chronological MAX.
    assignments.push("update_time = MAX(update_time, ?)", [timestamp_value(stamp)]);

    let sql = format!("UPDATE emp SET {} WHERE id = ?;", assignments.joined(", "));
    let mut values = assignments.values;
    values.push(Value::Integer(patch.id));

    (sql, values)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn gender_value(gender: Gender) -> Value {
    Value::Integer(i64::from(gender.code()))
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format(DATE_FORMAT).to_string())
}

fn timestamp_value(stamp: NaiveDateTime) -> Value {
    Value::Text(stamp.format(TIMESTAMP_FORMAT).to_string())
}

fn parse_emp_row(row: &Row<'_>) -> RepoResult<Emp> {
    let id: EmpId = row.get("id")?;

    let gender_code: i64 = row.get("gender")?;
    let gender = i16::try_from(gender_code)
        .ok()
        .and_then(Gender::from_code)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid gender code `{gender_code}` in emp.gender for id {id}"
            ))
        })?;

    Ok(Emp {
        id,
        username: row.get("username")?,
        name: row.get("name")?,
        gender,
        image: row.get("image")?,
        job: row.get("job")?,
        entry_date: row.get("entrydate")?,
        dept_id: row.get("dept_id")?,
        create_time: row.get("create_time")?,
        update_time: row.get("update_time")?,
    })
}

fn ensure_emp_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let columns = emp_table_columns(conn)?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable(EMP_TABLE));
    }

    match EMP_COLUMNS
        .into_iter()
        .find(|required| !columns.iter().any(|present| present.as_str() == *required))
    {
        Some(column) => Err(RepoError::MissingRequiredColumn {
            table: EMP_TABLE,
            column,
        }),
        None => Ok(()),
    }
}

/// Column names of `emp`; empty when the table does not exist.
fn emp_table_columns(conn: &Connection) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({EMP_TABLE});"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
