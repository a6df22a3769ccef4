//! Employee use-case service.
//!
//! # Responsibility
//! - Provide hire/dismiss/search/revise/find entry points for core callers.
//! - Emit metadata-only diagnostic events per use-case.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Zero affected rows is passed through as a count; the service logs
//!   `status=noop` and leaves the policy to the caller.
//! - Log lines never carry employee names or usernames.

use crate::model::emp::{Emp, EmpId, EmpPatch, NewEmp};
use crate::repo::emp_repo::{EmpListQuery, EmpRepository, RepoError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type EmpServiceResult<T> = Result<T, EmpServiceError>;

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum EmpServiceError {
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl Display for EmpServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent emp state: {details}"),
        }
    }
}

impl Error for EmpServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for EmpServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service over an employee repository.
pub struct EmpService<R: EmpRepository> {
    repo: R,
}

impl<R: EmpRepository> EmpService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a new employee and returns the stored record.
    ///
    /// # Errors
    /// - `Repo` when storage rejects the row (e.g. duplicate `username`).
    /// - `InconsistentState` when the inserted row cannot be read back.
    pub fn hire(&self, emp: NewEmp) -> EmpServiceResult<Emp> {
        let started_at = Instant::now();
        let id = self.repo.insert(&emp).inspect_err(|err| {
            warn!(
                "event=emp_insert module=service status=error constraint={} error={err}",
                err.is_constraint_violation()
            );
        })?;

        let stored = self
            .repo
            .get(id)?
            .ok_or(EmpServiceError::InconsistentState(
                "inserted emp missing on read-back",
            ))?;

        info!(
            "event=emp_insert module=service status=ok id={id} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(stored)
    }

    /// Deletes one employee. Returns `0` when `id` matched nothing.
    pub fn dismiss(&self, id: EmpId) -> EmpServiceResult<usize> {
        let removed = self.repo.delete(id)?;
        info!(
            "event=emp_delete module=service status={} id={id} rows={removed}",
            affected_status(removed)
        );
        Ok(removed)
    }

    /// Lists employees matching `query`, newest `update_time` first.
    pub fn search(&self, query: &EmpListQuery) -> EmpServiceResult<Vec<Emp>> {
        let started_at = Instant::now();
        let emps = self.repo.list(query)?;
        debug!(
            "event=emp_list module=service status=ok name_filter={} gender_filter={} begin_filter={} end_filter={} rows={} duration_ms={}",
            query.name.is_some(),
            query.gender.is_some(),
            query.entry_date_begin.is_some(),
            query.entry_date_end.is_some(),
            emps.len(),
            started_at.elapsed().as_millis()
        );
        Ok(emps)
    }

    /// Applies a partial update. Returns `0` when `patch.id` matched nothing.
    pub fn revise(&self, patch: &EmpPatch) -> EmpServiceResult<usize> {
        let changed = self.repo.update2(patch)?;
        info!(
            "event=emp_update module=service status={} id={} rows={changed} has_changes={}",
            affected_status(changed),
            patch.id,
            patch.has_changes()
        );
        Ok(changed)
    }

    /// Loads one employee by id.
    pub fn find(&self, id: EmpId) -> EmpServiceResult<Option<Emp>> {
        Ok(self.repo.get(id)?)
    }
}

fn affected_status(rows: usize) -> &'static str {
    if rows == 0 {
        "noop"
    } else {
        "ok"
    }
}
