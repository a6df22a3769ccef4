//! Repository layer for employee persistence.
//!
//! # Responsibility
//! - Define the data access contract for the `emp` table.
//! - Keep SQLite statement construction out of service orchestration.

pub mod emp_repo;
