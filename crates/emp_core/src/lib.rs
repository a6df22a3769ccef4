//! Core employee-record store.
//! This crate owns the `emp` schema and every statement issued against it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::emp::{Emp, EmpId, EmpPatch, Gender, NewEmp};
pub use repo::emp_repo::{
    EmpListQuery, EmpRepository, RepoError, RepoResult, SqliteEmpRepository,
};
pub use service::emp_service::{EmpService, EmpServiceError, EmpServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
